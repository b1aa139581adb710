use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use profile_api::{build_router, router::RouterOptions, AppState};
use profile_core::repositories::MemberRepository;
use profile_shared::config::{AppConfig, AssetProvider, DatabaseSettings};
use profile_infrastructure::{
    build_asset_host, create_pool, run_migrations, seed_members, InMemoryMemberRepository,
    PgMemberRepository,
};

async fn build_member_repository(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn MemberRepository>> {
    if !settings.is_configured() {
        warn!("No database url configured, members are kept in memory");
        return Ok(Arc::new(InMemoryMemberRepository::new()));
    }

    info!("Connecting to database...");
    let pool = create_pool(settings).await?;
    run_migrations(&pool).await?;
    info!("Database connection established.");
    Ok(Arc::new(PgMemberRepository::new(pool)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    let _telemetry_guard = profile_shared::telemetry::init_telemetry();

    info!("Profile server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let member_repo = build_member_repository(&config.database).await?;
    let asset_host = build_asset_host(&config.asset_host)?;

    if let Some(path) = config.seed.path.as_deref() {
        if let Err(e) = seed_members(member_repo.as_ref(), path).await {
            error!("Seeding from {} failed: {}", path, e);
        }
    }

    let allowed_origin = match config.cors.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => Some(origin),
        Err(e) => {
            warn!("Ignoring invalid CORS origin {}: {}", config.cors.allowed_origin, e);
            None
        }
    };

    let state = AppState::new(member_repo, asset_host);
    let mut app = build_router(
        state,
        RouterOptions {
            expose_error_details: config.app.is_development(),
            allowed_origin,
        },
    );

    // Uploaded photos are served from disk when no remote host is used
    if config.asset_host.provider == AssetProvider::Local {
        app = app.nest_service("/photos", ServeDir::new(&config.asset_host.local_dir));
    }

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {} ({})", addr, config.app.env);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

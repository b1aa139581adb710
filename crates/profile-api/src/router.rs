//! Router assembly

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use profile_shared::constants::MAX_PHOTO_BYTES;

use crate::handlers::{health, members};
use crate::middleware::{expose_error_details, handle_panic};
use crate::state::AppState;

pub struct RouterOptions {
    /// Show full error details in 500 responses
    pub expose_error_details: bool,
    pub allowed_origin: Option<HeaderValue>,
}

pub fn build_router(state: AppState, options: RouterOptions) -> Router {
    let member_routes = Router::new()
        .route("/members", get(members::list_members).put(members::update_member))
        .route("/members/{id}", get(members::get_member))
        .route("/members/{id}/photos", get(members::get_member_photos))
        .route("/members/add-photo", post(members::add_photo))
        .route("/members/set-main-photo/{photo_id}", put(members::set_main_photo))
        .route("/members/delete-photo/{photo_id}", delete(members::delete_photo));

    let cors = match options.allowed_origin {
        Some(origin) => CorsLayer::new().allow_origin(AllowOrigin::exact(origin)),
        None => CorsLayer::new(),
    }
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
    .allow_headers([
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        header::HeaderName::from_static(profile_shared::constants::MEMBER_ID_HEADER),
    ]);

    let router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", member_routes)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES));

    let router = if options.expose_error_details {
        router.layer(middleware::from_fn(expose_error_details))
    } else {
        router
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(false)))
}

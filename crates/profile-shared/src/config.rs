//! Configuration management

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::ENV_DEVELOPMENT;
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub asset_host: AssetHostSettings,
    #[serde(default)]
    pub seed: SeedSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl AppSettings {
    /// Development mode exposes full error details to callers
    pub fn is_development(&self) -> bool {
        self.env.eq_ignore_ascii_case(ENV_DEVELOPMENT)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    /// Empty url selects the in-memory store
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseSettings {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssetProvider {
    Cloudinary,
    Local,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetHostSettings {
    pub provider: AssetProvider,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base_url: String,
    pub folder: String,
    pub local_dir: String,
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedSettings {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origin: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| ENV_DEVELOPMENT.into());
        let config = Config::builder()
            .set_default("app.env", env.as_str())?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 5001)?
            .set_default("app.name", "profile-server")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("asset_host.provider", "local")?
            .set_default("asset_host.cloud_name", "")?
            .set_default("asset_host.api_key", "")?
            .set_default("asset_host.api_secret", "")?
            .set_default("asset_host.api_base_url", "https://api.cloudinary.com/v1_1")?
            .set_default("asset_host.folder", "members")?
            .set_default("asset_host.local_dir", "static/photos")?
            .set_default("asset_host.public_base_url", "http://localhost:5001/photos")?
            .set_default("cors.allowed_origin", "http://localhost:4200")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that deserialize but cannot work together
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.is_configured() && self.database.min_connections > self.database.max_connections {
            return Err(AppError::InvalidConfig(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }

        let host = &self.asset_host;
        match host.provider {
            AssetProvider::Cloudinary => {
                let missing: Vec<&str> = [
                    ("cloud_name", &host.cloud_name),
                    ("api_key", &host.api_key),
                    ("api_secret", &host.api_secret),
                ]
                .into_iter()
                .filter(|(_, value)| value.trim().is_empty())
                .map(|(name, _)| name)
                .collect();
                if !missing.is_empty() {
                    return Err(AppError::InvalidConfig(format!(
                        "cloudinary asset host requires asset_host.{}",
                        missing.join(", asset_host.")
                    )));
                }
            }
            AssetProvider::Local => {
                if host.local_dir.trim().is_empty() {
                    return Err(AppError::InvalidConfig(
                        "local asset host requires asset_host.local_dir".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_detection_is_case_insensitive() {
        let settings = AppSettings {
            env: "Development".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5001,
            name: "profile-server".to_string(),
        };
        assert!(settings.is_development());

        let prod = AppSettings { env: "production".to_string(), ..settings };
        assert!(!prod.is_development());
    }

    #[test]
    fn test_blank_database_url_is_not_configured() {
        let db = DatabaseSettings {
            url: "  ".to_string(),
            max_connections: 5,
            min_connections: 1,
        };
        assert!(!db.is_configured());
    }

    fn sample() -> AppConfig {
        AppConfig {
            app: AppSettings {
                env: "development".to_string(),
                host: "127.0.0.1".to_string(),
                port: 5001,
                name: "profile-server".to_string(),
            },
            database: DatabaseSettings {
                url: String::new(),
                max_connections: 10,
                min_connections: 1,
            },
            asset_host: AssetHostSettings {
                provider: AssetProvider::Local,
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
                api_base_url: "https://api.cloudinary.com/v1_1".to_string(),
                folder: "members".to_string(),
                local_dir: "static/photos".to_string(),
                public_base_url: "http://localhost:5001/photos".to_string(),
            },
            seed: SeedSettings::default(),
            cors: CorsSettings {
                allowed_origin: "http://localhost:4200".to_string(),
            },
        }
    }

    #[test]
    fn test_cloudinary_without_credentials_is_invalid() {
        let mut config = sample();
        config.asset_host.provider = AssetProvider::Cloudinary;
        config.asset_host.cloud_name = "demo".to_string();

        let err = config.validate().unwrap_err();

        assert!(matches!(err, AppError::InvalidConfig(_)));
        assert!(err.to_string().contains("asset_host.api_key, asset_host.api_secret"));
    }

    #[test]
    fn test_pool_bounds_checked_only_with_database() {
        let mut config = sample();
        config.database.min_connections = 20;
        assert!(config.validate().is_ok());

        config.database.url = "postgres://localhost/profiles".to_string();
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_local_defaults_are_valid() {
        assert!(sample().validate().is_ok());
    }
}

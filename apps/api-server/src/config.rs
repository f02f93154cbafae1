//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use daybook_infra::{JwtConfig, PasswordPolicy};
use daybook_infra::database::DatabaseConfig;

#[cfg(feature = "mail")]
use daybook_infra::HttpMailerConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub password_policy: PasswordPolicy,
    /// Prefix of the URLs handed out for uploaded photos.
    pub public_base_url: String,
    pub upload_dir: PathBuf,
    /// Front-end page the reset token is appended to.
    pub password_reset_url: String,
    #[cfg(feature = "mail")]
    pub mail: Option<HttpMailerConfig>,
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parsed("PORT").unwrap_or(8080);

        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parsed("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parsed("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        Self {
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://{host}:{port}")),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads/photos")),
            password_reset_url: env::var("PASSWORD_RESET_URL")
                .unwrap_or_else(|_| "http://localhost:4200/reset-password".to_string()),
            jwt: JwtConfig::from_env(),
            password_policy: PasswordPolicy::from_env(),
            #[cfg(feature = "mail")]
            mail: HttpMailerConfig::from_env(),
            host,
            port,
            database,
        }
    }
}

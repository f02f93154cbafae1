//! Application state - shared across all handlers.

use std::sync::Arc;

use daybook_core::ports::{
    BlobStore, Mailer, PasswordService, PostRepository, TokenService, UserRepository,
};
use daybook_core::services::{AccountService, PostService};
use daybook_infra::database::DatabaseConnections;
use daybook_infra::{InMemoryPostRepository, InMemoryUserRepository, LocalBlobStore, LogMailer};

#[cfg(feature = "postgres")]
use daybook_infra::database::{PostgresPostRepository, PostgresUserRepository};

#[cfg(feature = "mail")]
use daybook_infra::HttpMailer;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub accounts: AccountService,
    pub blobs: Arc<dyn BlobStore>,
    pub db: Option<Arc<DatabaseConnections>>,
}

/// Store-side collaborators chosen at startup.
struct Stores {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    db: Option<Arc<DatabaseConnections>>,
}

impl Stores {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            db: None,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> Self {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let conn = Arc::new(connections);
                Self {
                    users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
                    posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
                    db: Some(conn),
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &AppConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory repository");
        Self::in_memory()
    }
}

fn log_mailer() -> Arc<dyn Mailer> {
    tracing::warn!("Mail provider not configured. Reset links will only be logged.");
    Arc::new(LogMailer)
}

#[cfg(feature = "mail")]
fn mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    match config.mail.clone() {
        Some(mail) => {
            tracing::info!(api = %mail.api_url, "HTTP mailer configured");
            Arc::new(HttpMailer::new(mail))
        }
        None => log_mailer(),
    }
}

#[cfg(not(feature = "mail"))]
fn mailer(_config: &AppConfig) -> Arc<dyn Mailer> {
    log_mailer()
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(
        config: &AppConfig,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        let stores = Stores::connect(config).await;
        let state = Self::assemble(stores, config, tokens, passwords);

        let store = if state.db.is_some() { "postgres" } else { "memory" };
        tracing::info!(store, "Application state initialized");
        state
    }

    /// State over caller-supplied repositories.
    #[cfg(test)]
    pub fn with_repositories(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        config: &AppConfig,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        let stores = Stores {
            users,
            posts,
            db: None,
        };
        Self::assemble(stores, config, tokens, passwords)
    }

    fn assemble(
        stores: Stores,
        config: &AppConfig,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        let accounts = AccountService::new(
            stores.users,
            passwords,
            tokens,
            mailer(config),
            config.password_reset_url.clone(),
        );

        Self {
            posts: PostService::new(stores.posts),
            accounts,
            blobs: Arc::new(LocalBlobStore::new(
                config.upload_dir.clone(),
                config.public_base_url.clone(),
            )),
            db: stores.db,
        }
    }
}

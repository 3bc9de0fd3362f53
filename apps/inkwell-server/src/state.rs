//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::domain::User;
use inkwell_core::ports::{PasswordService, TokenService};
use inkwell_core::{BlogQueries, ContentStore, Repositories};
use inkwell_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

use crate::config::{AdminBootstrap, AppConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub site_name: String,
    /// Which backend the repositories run on, for the health check.
    pub store_kind: &'static str,
    pub content: ContentStore,
    pub queries: BlogQueries,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the state, connecting to the database when configured and
    /// creating the bootstrap admin if requested.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let (repos, store_kind) = Self::repositories(config).await;
        let state = Self::with_repositories(repos, store_kind, config);

        if let Some(admin) = &config.admin {
            state.bootstrap_admin(admin).await?;
        }

        tracing::info!(store = store_kind, "Application state initialized");
        Ok(state)
    }

    pub fn with_repositories(
        repos: Repositories,
        store_kind: &'static str,
        config: &AppConfig,
    ) -> Self {
        Self {
            site_name: config.site_name.clone(),
            store_kind,
            content: ContentStore::new(repos.clone()),
            queries: BlogQueries::new(repos, config.queries.clone()),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    pub fn in_memory(config: &AppConfig) -> Self {
        Self::with_repositories(memory_repositories(), "memory", config)
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> (Repositories, &'static str) {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (memory_repositories(), "memory");
        };

        match inkwell_infra::connect(db_config).await {
            Ok(db) => (inkwell_infra::postgres_repositories(db), "postgres"),
            Err(e) => {
                tracing::error!("Failed to connect to database: {}. Using in-memory fallback.", e);
                (memory_repositories(), "memory")
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> (Repositories, &'static str) {
        tracing::info!("Running without postgres feature - using in-memory store");
        (memory_repositories(), "memory")
    }

    /// Create the configured staff account unless its email is taken.
    pub async fn bootstrap_admin(&self, admin: &AdminBootstrap) -> anyhow::Result<()> {
        let users = &self.content.repositories().users;
        if users.find_by_email(&admin.email).await?.is_some() {
            tracing::debug!("Bootstrap admin already exists");
            return Ok(());
        }

        let password_hash = self.passwords.hash(&admin.password)?;
        let user = User::new(admin.username.clone(), admin.email.clone(), password_hash).staff();
        let user = users.insert(user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Bootstrap admin created");
        Ok(())
    }
}

fn memory_repositories() -> Repositories {
    Repositories::from_store(Arc::new(InMemoryStore::new()))
}

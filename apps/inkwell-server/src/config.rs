//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use inkwell_core::QueryConfig;
use inkwell_infra::JwtConfig;

#[cfg(feature = "postgres")]
use inkwell_infra::DatabaseConfig;

/// Staff account created at startup when no user has this email yet.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub site_name: String,
    pub queries: QueryConfig,
    pub jwt: JwtConfig,
    pub admin: Option<AdminBootstrap>,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            site_name: "Inkwell".to_string(),
            queries: QueryConfig::default(),
            jwt: JwtConfig::default(),
            admin: None,
            #[cfg(feature = "postgres")]
            database: None,
        }
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let jwt_defaults = JwtConfig::default();

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap {
                    username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
                    email,
                    password,
                })
            }
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT", defaults.port),
            site_name: env::var("SITE_NAME").unwrap_or(defaults.site_name),
            queries: QueryConfig {
                posts_per_page: parsed("POSTS_PER_PAGE", defaults.queries.posts_per_page).max(1),
                ..defaults.queries
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").unwrap_or(jwt_defaults.secret),
                expiration_hours: parsed("JWT_EXPIRATION_HOURS", jwt_defaults.expiration_hours),
                issuer: env::var("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
            },
            admin,
            #[cfg(feature = "postgres")]
            database: env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
                url,
                max_connections: parsed("DB_MAX_CONNECTIONS", 20),
                min_connections: parsed("DB_MIN_CONNECTIONS", 2),
            }),
        }
    }
}

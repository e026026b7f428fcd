use ghost_core::query::DEFAULT_PAGE_SIZE;

use crate::auth::jwt::JwtConfig;

/// Credentials for the first admin account, seeded when the store has none.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// PostgreSQL URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Page size used when a list request gives none.
    pub default_page_size: u32,
    /// Whether exports include the internal reply column unless the request says otherwise.
    pub export_include_reply: bool,
    /// Optional JSON file replacing the built-in taxonomy.
    pub taxonomy_path: Option<String>,
    /// First-run admin account.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `5000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `DATABASE_URL`             | unset (in-memory store) |
    /// | `DEFAULT_PAGE_SIZE`        | `20`                    |
    /// | `EXPORT_INCLUDE_REPLY`     | `false`                 |
    /// | `TAXONOMY_PATH`            | unset (built-in)        |
    /// | `BOOTSTRAP_ADMIN_EMAIL`    | unset                   |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | unset                   |
    ///
    /// See [`JwtConfig::from_env`] for the token settings.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let default_page_size: u32 = std::env::var("DEFAULT_PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
            .parse()
            .expect("DEFAULT_PAGE_SIZE must be a valid u32");
        assert!(default_page_size > 0, "DEFAULT_PAGE_SIZE must be positive");

        let export_include_reply: bool = std::env::var("EXPORT_INCLUDE_REPLY")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("EXPORT_INCLUDE_REPLY must be true or false");

        let bootstrap_admin = match (
            non_empty_var("BOOTSTRAP_ADMIN_EMAIL"),
            non_empty_var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            database_url: non_empty_var("DATABASE_URL"),
            default_page_size,
            export_include_reply,
            taxonomy_path: non_empty_var("TAXONOMY_PATH"),
            bootstrap_admin,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

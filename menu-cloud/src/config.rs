//! Cloud server configuration

use crate::settings::RuntimeSettings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Cloud server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret shared with the identity provider
    pub jwt_secret: String,
    /// Pairing suggestion service endpoint (enrichment disabled when unset)
    pub pairing_service_url: Option<String>,
    /// Bearer key for the pairing suggestion service
    pub pairing_service_key: Option<String>,
    /// Mark the customer_session cookie `Secure`
    pub session_cookie_secure: bool,
    /// Initial lifecycle / recommendation settings (reloadable at runtime)
    pub settings: RuntimeSettings,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: environment.clone(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            pairing_service_url: std::env::var("PAIRING_SERVICE_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            pairing_service_key: std::env::var("PAIRING_SERVICE_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            session_cookie_secure: std::env::var("SESSION_COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            settings: RuntimeSettings::from_env()?,
        })
    }
}

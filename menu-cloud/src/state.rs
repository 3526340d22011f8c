//! Application state for menu-cloud

use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;
use crate::services::pairing::{
    FuzzyNameMatcher, HttpPairingSuggester, ItemMatcher, PairingSuggester,
};
use crate::settings::{RuntimeSettings, SettingsStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT secret for owner authentication
    pub jwt_secret: String,
    /// Reloadable lifecycle / recommendation settings
    pub settings: SettingsStore,
    /// Rate limiter for the public customer routes
    pub rate_limiter: RateLimiter,
    /// External pairing suggestion source (item enrichment off when `None`)
    pub suggester: Option<Arc<dyn PairingSuggester>>,
    /// Maps suggestion names onto venue items
    pub matcher: Arc<dyn ItemMatcher>,
    /// Add `Secure` to the customer_session cookie
    pub session_cookie_secure: bool,
}

impl AppState {
    /// Connect, migrate and wire collaborators from configuration
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let suggester: Option<Arc<dyn PairingSuggester>> = match &config.pairing_service_url {
            Some(url) => {
                tracing::info!(url = %url, "Pairing suggestion service enabled");
                Some(Arc::new(HttpPairingSuggester::new(
                    url.clone(),
                    config.pairing_service_key.clone(),
                )?))
            }
            None => {
                tracing::info!("PAIRING_SERVICE_URL not set, item pairing enrichment disabled");
                None
            }
        };

        let mut state = Self::from_parts(pool, config.jwt_secret.clone(), config.settings.clone());
        state.suggester = suggester;
        state.session_cookie_secure = config.session_cookie_secure;
        Ok(state)
    }

    /// State around an existing pool with default collaborators
    pub fn from_parts(pool: PgPool, jwt_secret: String, settings: RuntimeSettings) -> Self {
        Self {
            pool,
            jwt_secret,
            settings: SettingsStore::new(settings),
            rate_limiter: RateLimiter::new(),
            suggester: None,
            matcher: Arc::new(FuzzyNameMatcher),
            session_cookie_secure: false,
        }
    }
}

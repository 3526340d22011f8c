//! Runtime settings store
//!
//! Lifecycle thresholds and recommendation limits are read once from the
//! environment at startup and can be reloaded while the server runs.
//! Readers take a cheap `Arc` snapshot; background tasks subscribe to change
//! notifications through a `tokio::sync::watch` channel.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Upper bound for either lifecycle threshold (one year)
const MAX_THRESHOLD_SECS: u64 = 365 * 24 * 3600;

/// Live-reconfigurable parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeSettings {
    /// Age after which a `placed` order becomes `preparing`
    pub advance_after_secs: u64,
    /// Age after which a `placed` order is left alone
    pub stale_after_hours: u64,
    /// Sweeper period (0 disables the sweeper)
    pub sweep_interval_secs: u64,
    pub fbt_limit: i64,
    pub pairing_limit: i64,
    pub similar_limit: i64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            advance_after_secs: 30,
            stale_after_hours: 24,
            sweep_interval_secs: 15,
            fbt_limit: 3,
            pairing_limit: 3,
            similar_limit: 3,
        }
    }
}

impl RuntimeSettings {
    /// Read `ORDER_*` and `RECOMMEND_*` variables, falling back to defaults
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let defaults = Self::default();
        let settings = Self {
            advance_after_secs: parse_or(
                &lookup,
                "ORDER_ADVANCE_AFTER_SECS",
                defaults.advance_after_secs,
            )?,
            stale_after_hours: parse_or(
                &lookup,
                "ORDER_STALE_AFTER_HOURS",
                defaults.stale_after_hours,
            )?,
            sweep_interval_secs: parse_or(
                &lookup,
                "ORDER_SWEEP_INTERVAL_SECS",
                defaults.sweep_interval_secs,
            )?,
            fbt_limit: parse_or(&lookup, "RECOMMEND_FBT_LIMIT", defaults.fbt_limit)?,
            pairing_limit: parse_or(&lookup, "RECOMMEND_PAIRING_LIMIT", defaults.pairing_limit)?,
            similar_limit: parse_or(&lookup, "RECOMMEND_SIMILAR_LIMIT", defaults.similar_limit)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), BoxError> {
        let stale_secs = self
            .stale_after_hours
            .checked_mul(3600)
            .filter(|secs| *secs <= MAX_THRESHOLD_SECS)
            .ok_or("ORDER_STALE_AFTER_HOURS must be at most one year")?;
        if self.advance_after_secs > MAX_THRESHOLD_SECS {
            return Err("ORDER_ADVANCE_AFTER_SECS must be at most one year".into());
        }
        if stale_secs <= self.advance_after_secs {
            return Err("ORDER_STALE_AFTER_HOURS must exceed ORDER_ADVANCE_AFTER_SECS".into());
        }
        for (name, limit) in [
            ("RECOMMEND_FBT_LIMIT", self.fbt_limit),
            ("RECOMMEND_PAIRING_LIMIT", self.pairing_limit),
            ("RECOMMEND_SIMILAR_LIMIT", self.similar_limit),
        ] {
            if !(0..=50).contains(&limit) {
                return Err(format!("{name} must be between 0 and 50").into());
            }
        }
        Ok(())
    }

    pub fn advance_after(&self) -> Duration {
        Duration::from_secs(self.advance_after_secs)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_hours.saturating_mul(3600))
    }

    /// `None` when the sweeper is disabled
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T, BoxError>
where
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| format!("{name} is not a valid number: {raw}").into()),
        _ => Ok(default),
    }
}

/// Process-wide settings holder with change notification
#[derive(Clone)]
pub struct SettingsStore {
    tx: Arc<watch::Sender<Arc<RuntimeSettings>>>,
}

impl SettingsStore {
    pub fn new(initial: RuntimeSettings) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current settings
    pub fn current(&self) -> Arc<RuntimeSettings> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<RuntimeSettings>> {
        self.tx.subscribe()
    }

    /// Swap in new settings; subscribers are notified only when values change
    pub fn replace(&self, next: RuntimeSettings) -> bool {
        self.tx.send_if_modified(|current| {
            if **current == next {
                return false;
            }
            *current = Arc::new(next);
            true
        })
    }

    /// Re-read the environment; invalid values leave the current settings untouched
    pub fn reload_from_env(&self) -> Result<Arc<RuntimeSettings>, BoxError> {
        let next = RuntimeSettings::from_env()?;
        if self.replace(next) {
            tracing::info!(settings = ?self.current(), "Runtime settings reloaded");
        }
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let settings = RuntimeSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, RuntimeSettings::default());
        assert_eq!(settings.advance_after(), Duration::from_secs(30));
        assert_eq!(settings.stale_after(), Duration::from_secs(24 * 3600));
        assert_eq!(settings.sweep_interval(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn overrides_and_disabled_sweeper() {
        let settings = RuntimeSettings::from_lookup(lookup(&[
            ("ORDER_ADVANCE_AFTER_SECS", "60"),
            ("ORDER_SWEEP_INTERVAL_SECS", "0"),
            ("RECOMMEND_SIMILAR_LIMIT", "5"),
        ]))
        .unwrap();
        assert_eq!(settings.advance_after_secs, 60);
        assert_eq!(settings.sweep_interval(), None);
        assert_eq!(settings.similar_limit, 5);
        assert_eq!(settings.fbt_limit, 3);
    }

    #[test]
    fn rejects_garbage_and_inverted_window() {
        assert!(RuntimeSettings::from_lookup(lookup(&[("ORDER_ADVANCE_AFTER_SECS", "soon")])).is_err());
        assert!(
            RuntimeSettings::from_lookup(lookup(&[
                ("ORDER_ADVANCE_AFTER_SECS", "7200"),
                ("ORDER_STALE_AFTER_HOURS", "1"),
            ]))
            .is_err()
        );
        assert!(RuntimeSettings::from_lookup(lookup(&[("RECOMMEND_FBT_LIMIT", "-1")])).is_err());
    }

    #[test]
    fn rejects_thresholds_beyond_a_year() {
        for vars in [
            [("ORDER_STALE_AFTER_HOURS", "18446744073709551615")],
            [("ORDER_STALE_AFTER_HOURS", "8761")],
            [("ORDER_ADVANCE_AFTER_SECS", "18446744073709551615")],
        ] {
            assert!(RuntimeSettings::from_lookup(lookup(&vars)).is_err());
        }
        let settings =
            RuntimeSettings::from_lookup(lookup(&[("ORDER_STALE_AFTER_HOURS", "8760")])).unwrap();
        assert_eq!(settings.stale_after(), Duration::from_secs(MAX_THRESHOLD_SECS));
    }

    #[tokio::test]
    async fn replace_notifies_subscribers() {
        let store = SettingsStore::new(RuntimeSettings::default());
        let mut rx = store.subscribe();

        // Same values: no notification
        assert!(!store.replace(RuntimeSettings::default()));
        assert!(!rx.has_changed().unwrap());

        let next = RuntimeSettings {
            sweep_interval_secs: 5,
            ..RuntimeSettings::default()
        };
        assert!(store.replace(next));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().sweep_interval_secs, 5);
        assert_eq!(store.current().sweep_interval_secs, 5);
    }
}

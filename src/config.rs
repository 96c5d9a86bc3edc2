use std::{env, fmt::Display, str::FromStr};

use log::warn;

use crate::session::FillPolicy;

/// Tuning constants for the scheduling engine. Defaults follow the SM-2
/// family; every knob is overridable through an `SRS_*` environment
/// variable so tuning needs no code change.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval synthesized for a card that has never been reviewed.
    pub initial_interval_days: f64,
    /// Interval after the first successful review.
    pub first_interval_days: f64,
    /// Interval after the second consecutive successful review.
    pub second_interval_days: f64,
    /// Floor for every computed interval, and the interval after a lapse.
    pub min_interval_days: f64,
    pub initial_ease: f64,
    pub min_ease: f64,
    pub max_ease: f64,
    /// Subtracted from the ease factor on a failed review.
    pub ease_penalty: f64,
    pub hard_ease_delta: f64,
    pub easy_ease_delta: f64,
    pub hard_interval_multiplier: f64,
    pub easy_interval_multiplier: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_interval_days: 1.0,
            first_interval_days: 1.0,
            second_interval_days: 6.0,
            min_interval_days: 1.0,
            initial_ease: 2.5,
            min_ease: 1.3,
            max_ease: 3.0,
            ease_penalty: 0.2,
            hard_ease_delta: -0.15,
            easy_ease_delta: 0.15,
            hard_interval_multiplier: 0.8,
            easy_interval_multiplier: 1.3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Batch size when the request does not ask for one.
    pub default_limit: usize,
    /// Hard cap on the requested batch size.
    pub max_limit: usize,
    pub fill: FillPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
            fill: FillPolicy::DueOnly,
        }
    }
}

pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub deck_path: Option<String>,
    pub scheduler: SchedulerConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn load() -> Self {
        let defaults = SchedulerConfig::default();
        let scheduler = SchedulerConfig {
            initial_interval_days: try_load("SRS_INITIAL_INTERVAL_DAYS", defaults.initial_interval_days),
            first_interval_days: try_load("SRS_FIRST_INTERVAL_DAYS", defaults.first_interval_days),
            second_interval_days: try_load("SRS_SECOND_INTERVAL_DAYS", defaults.second_interval_days),
            min_interval_days: try_load("SRS_MIN_INTERVAL_DAYS", defaults.min_interval_days),
            initial_ease: try_load("SRS_INITIAL_EASE", defaults.initial_ease),
            min_ease: try_load("SRS_MIN_EASE", defaults.min_ease),
            max_ease: try_load("SRS_MAX_EASE", defaults.max_ease),
            ease_penalty: try_load("SRS_EASE_PENALTY", defaults.ease_penalty),
            hard_ease_delta: try_load("SRS_HARD_EASE_DELTA", defaults.hard_ease_delta),
            easy_ease_delta: try_load("SRS_EASY_EASE_DELTA", defaults.easy_ease_delta),
            hard_interval_multiplier: try_load("SRS_HARD_INTERVAL_MULT", defaults.hard_interval_multiplier),
            easy_interval_multiplier: try_load("SRS_EASY_INTERVAL_MULT", defaults.easy_interval_multiplier),
        };

        let session_defaults = SessionConfig::default();
        let session = SessionConfig {
            default_limit: try_load("SESSION_LIMIT", session_defaults.default_limit),
            max_limit: try_load("SESSION_MAX_LIMIT", session_defaults.max_limit),
            fill: if try_load("SESSION_FILL_AHEAD", false) {
                FillPolicy::FillAhead
            } else {
                FillPolicy::DueOnly
            },
        };

        Self {
            port: try_load("PORT", 3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://flashdeck.db?mode=rwc".to_string()),
            deck_path: env::var("DECK_PATH").ok(),
            scheduler,
            session,
        }
    }
}

/// Parse an env var, falling back to the default (with a warning) when the
/// variable is unset or malformed.
fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                warn!("invalid {key} value {raw:?}: {e}; using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}

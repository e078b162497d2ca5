use std::env;

use crate::error::{AnalyticsError, Result};

pub const DEFAULT_RISK_THRESHOLD: f64 = 70.0;
pub const DEFAULT_TOP_N: usize = 10;

/// Knobs passed into every metric computation that needs them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsConfig {
    /// Course averages strictly below this value are flagged as at risk.
    pub risk_threshold: f64,
    /// Row limit for leaderboard-style views.
    pub top_n: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_threshold: DEFAULT_RISK_THRESHOLD,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.risk_threshold.is_finite() {
            return Err(AnalyticsError::InvalidParameter(format!(
                "risk threshold must be a finite number, got {}",
                self.risk_threshold
            )));
        }
        if self.top_n == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "top-N limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Process-level settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            AnalyticsError::InvalidParameter("DATABASE_URL must be set".to_string())
        })?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().map_err(|_| {
                AnalyticsError::InvalidParameter(format!(
                    "DATABASE_MAX_CONNECTIONS must be a positive integer, got {raw:?}"
                ))
            })?,
            None => 5,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "LOG_FORMAT must be `text` or `json`, got {other:?}"
                )))
            }
        };

        Ok(Self {
            database_url,
            max_connections,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format,
        })
    }
}

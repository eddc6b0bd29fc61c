use std::collections::HashMap;
use std::env;

use crate::params::{AnalyzerConfig, Thresholds};
use crate::provider::{DEFAULT_CHART_URL, DEFAULT_USER_AGENT};
use crate::Result;

/// Server configuration derived from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,

    // ── Market data ────────────────────────────────────────────────
    pub data_url: String,
    pub user_agent: String,

    // ── Classification ─────────────────────────────────────────────
    pub analyzer: AnalyzerConfig,
}

/// Prefix for threshold overrides, e.g. `CANDLESTAT_DOJI_RATIO`.
pub const THRESHOLD_ENV_PREFIX: &str = "CANDLESTAT_";

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any name -> value source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let str_or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let port = match get("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(%raw, "ignoring unparsable PORT, using 5000");
                5000
            }),
            None => 5000,
        };

        let mut overrides: HashMap<&str, f64> = HashMap::new();
        for meta in Thresholds::param_meta() {
            let var = format!("{THRESHOLD_ENV_PREFIX}{}", meta.name.to_uppercase());
            let Some(raw) = get(&var) else { continue };
            match raw.parse::<f64>() {
                Ok(value) => {
                    overrides.insert(meta.name, value);
                }
                Err(_) => tracing::warn!(%var, %raw, "ignoring unparsable threshold"),
            }
        }
        let analyzer = AnalyzerConfig::with_thresholds(Thresholds::with_params(&overrides)?);

        Ok(Self {
            bind: str_or("BIND", "0.0.0.0"),
            port,
            data_url: str_or("CANDLESTAT_DATA_URL", DEFAULT_CHART_URL),
            user_agent: str_or("CANDLESTAT_USER_AGENT", DEFAULT_USER_AGENT),
            analyzer,
        })
    }
}

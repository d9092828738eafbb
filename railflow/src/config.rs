//! Configuration management for the booking application.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Assistant (LLM service) configuration
    pub assistant: AssistantConfig,
    /// Payment simulator configuration
    pub payment: PaymentConfig,
    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

/// Assistant service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// API key; assistant features degrade gracefully when absent
    pub api_key: Option<String>,
    /// OpenAI-compatible endpoint override
    pub base_url: Option<String>,
    /// Per-call timeout in seconds
    pub request_timeout_secs: u64,
}

/// Payment simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Fraction of charges that fail (0.0 ..= 1.0)
    pub failure_rate: f64,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup (testable).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            assistant: AssistantConfig {
                api_key: lookup("RAILFLOW_AI_API_KEY"),
                base_url: lookup("RAILFLOW_AI_BASE_URL"),
                request_timeout_secs: parse_or(
                    lookup("RAILFLOW_AI_TIMEOUT_SECS"),
                    "RAILFLOW_AI_TIMEOUT_SECS",
                    10,
                ),
            },
            payment: PaymentConfig {
                failure_rate: parse_or(
                    lookup("RAILFLOW_PAYMENT_FAILURE_RATE"),
                    "RAILFLOW_PAYMENT_FAILURE_RATE",
                    0.1,
                ),
            },
            telemetry: TelemetryConfig {
                log_filter: lookup("RAILFLOW_LOG").unwrap_or_else(|| "railflow=info".to_string()),
            },
        }
    }
}

/// Parse an optional variable, falling back (with a warning) on bad input.
fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> T {
    match value {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, raw, "Unparseable configuration value, using default");
            default
        }),
    }
}

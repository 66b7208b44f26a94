use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::scoring::DEFAULT_NORMALIZED_SCALE;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let rules_path = env::var("HOME_SCORE_RULES")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let normalized_scale = match env::var("HOME_SCORE_NORMALIZED_SCALE") {
            Ok(raw) => parse_scale(&raw)?,
            Err(_) => DEFAULT_NORMALIZED_SCALE,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            scoring: ScoringConfig {
                rules_path,
                normalized_scale,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_scale(raw: &str) -> Result<f64, ConfigError> {
    let scale = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidScale(raw.to_string()))?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(ConfigError::InvalidScale(raw.to_string()))
    }
}

/// Where rules come from and how results are normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub rules_path: Option<PathBuf>,
    pub normalized_scale: f64,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidScale(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidScale(value) => write!(
                f,
                "HOME_SCORE_NORMALIZED_SCALE must be a positive number, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

//! Configuration module

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// API title displayed in health and documentation responses
pub const API_TITLE: &str = "API za detekciju prevare s kilometražom";

/// API description used by the OpenAPI document
pub const API_DESCRIPTION: &str =
    "Detektira potencijalnu prevaru s kilometražom u polovnim automobilima koristeći AI modele.";

pub const CREATOR_NAME: &str = "Zoran Janjic";
pub const CREATOR_WEBSITE: &str = "https://www.linkedin.com/in/janjiczoran/";
pub const DATASET_SOURCE: &str = "autoscout24-germany-dataset.csv";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Mileage regressor artifact
    pub regressor_path: PathBuf,

    /// Fraud classifier artifact
    pub classifier_path: PathBuf,

    /// Detection thresholds
    pub detection: DetectionConfig,

    /// CORS settings
    pub cors: CorsConfig,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Thresholds applied on top of the model outputs
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Used when the classifier artifact carries no threshold (0.0 - 1.0)
    pub default_fraud_threshold: f64,

    /// reported_km / expected_km below this is flagged as suspiciously low
    pub suspicious_ratio_threshold: f64,

    /// reported_km - expected_km below this is far under the market average
    pub market_diff_threshold: i64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            default_fraud_threshold: 0.5,
            suspicious_ratio_threshold: 0.70,
            market_diff_threshold: -30_000,
        }
    }
}

/// Allowed origins for cross-origin requests
#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated allow-list; `*` anywhere means any origin
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(|o| o.trim_end_matches('/').to_string())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub origins: CorsOrigins,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: CorsOrigins::Any,
            allow_credentials: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = PathBuf::from("models");
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            environment: "development".to_string(),
            regressor_path: models_dir.join("mileage_regressor.json"),
            classifier_path: models_dir.join("fraud_classifier.json"),
            detection: DetectionConfig::default(),
            cors: CorsConfig::default(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let detection = DetectionConfig::default();

        let models_dir = env::var("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("models"));

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),

            port: parse_var("PORT", defaults.port),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),

            regressor_path: env::var("REGRESSOR_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| models_dir.join("mileage_regressor.json")),

            classifier_path: env::var("CLASSIFIER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| models_dir.join("fraud_classifier.json")),

            detection: DetectionConfig {
                default_fraud_threshold: parse_var(
                    "DEFAULT_FRAUD_THRESHOLD",
                    detection.default_fraud_threshold,
                ),
                suspicious_ratio_threshold: parse_var(
                    "SUSPICIOUS_RATIO_THRESHOLD",
                    detection.suspicious_ratio_threshold,
                ),
                market_diff_threshold: parse_var(
                    "MARKET_DIFF_THRESHOLD",
                    detection.market_diff_threshold,
                ),
            },

            cors: CorsConfig {
                origins: env::var("CORS_ORIGINS")
                    .map(|raw| CorsOrigins::parse(&raw))
                    .unwrap_or(CorsOrigins::Any),
                allow_credentials: parse_var("CORS_ALLOW_CREDENTIALS", true),
            },

            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

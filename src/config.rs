use crate::core::{DeckSettings, SwipeThresholds, SwipeTimings};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub deck: DeckConfig,
    #[serde(default)]
    pub swipe: SwipeSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Hosted backend (auth, profile store, deletion function)
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub url: String,
    pub anon_key: String,
    #[serde(default)]
    pub service_key: Option<String>,
    pub jwt_secret: String,
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
    #[serde(default = "default_deletion_function")]
    pub deletion_function: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_jwt_audience() -> String { "authenticated".to_string() }
fn default_deletion_function() -> String { "delete-account".to_string() }
fn default_request_timeout() -> u64 { 30 }

/// Swipe ledger database; the ledger is disabled without a URL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeckConfig {
    #[serde(default = "default_deck_size")]
    pub default_size: usize,
    #[serde(default = "default_max_deck_size")]
    pub max_size: usize,
    /// TOML fixture used when profiles are not fetched from the backend
    #[serde(default)]
    pub candidates_file: Option<String>,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            default_size: default_deck_size(),
            max_size: default_max_deck_size(),
            candidates_file: None,
            session_ttl_secs: default_session_ttl(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_deck_size() -> usize { 20 }
fn default_max_deck_size() -> usize { 200 }
fn default_session_ttl() -> u64 { 1800 }
fn default_max_sessions() -> u64 { 10_000 }

/// Gesture and animation tunables
#[derive(Debug, Clone, Deserialize)]
pub struct SwipeSettings {
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f64,
    #[serde(default = "default_haptic_threshold")]
    pub haptic_threshold: f64,
    #[serde(default = "default_exit_offset")]
    pub exit_offset: f64,
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            distance_threshold: default_distance_threshold(),
            velocity_threshold: default_velocity_threshold(),
            haptic_threshold: default_haptic_threshold(),
            exit_offset: default_exit_offset(),
            animation_ms: default_animation_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

fn default_distance_threshold() -> f64 { 150.0 }
fn default_velocity_threshold() -> f64 { 500.0 }
fn default_haptic_threshold() -> f64 { 100.0 }
fn default_exit_offset() -> f64 { 400.0 }
fn default_animation_ms() -> u64 { 500 }
fn default_settle_ms() -> u64 { 600 }

impl SwipeSettings {
    pub fn deck_settings(&self) -> DeckSettings {
        DeckSettings {
            thresholds: SwipeThresholds {
                distance: self.distance_threshold,
                velocity: self.velocity_threshold,
            },
            haptic_threshold: self.haptic_threshold,
            timings: SwipeTimings {
                exit_offset: self.exit_offset,
                animation: Duration::from_millis(self.animation_ms),
                settle_delay: Duration::from_millis(self.settle_ms),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PITCHFLIC__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PITCHFLIC__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PITCHFLIC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_well_known_env(settings)?;

        settings.try_deserialize()
    }
}

/// Honour the conventional unprefixed variables used by the hosting platform
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(jwt_secret) = env::var("BACKEND_JWT_SECRET") {
        builder = builder.set_override("backend.jwt_secret", jwt_secret)?;
    }
    if let Ok(service_key) = env::var("BACKEND_SERVICE_KEY") {
        builder = builder.set_override("backend.service_key", service_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_swipe_settings() {
        let swipe = SwipeSettings::default();
        assert_eq!(swipe.distance_threshold, 150.0);
        assert_eq!(swipe.velocity_threshold, 500.0);
        assert_eq!(swipe.haptic_threshold, 100.0);
        assert_eq!(swipe.exit_offset, 400.0);
        assert_eq!(swipe.animation_ms, 500);
        assert_eq!(swipe.settle_ms, 600);
        assert_eq!(swipe.deck_settings(), DeckSettings::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_minimal_document_fills_defaults() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [backend]
            url = "https://backend.test"
            anon_key = "anon"
            jwt_secret = "secret"

            [swipe]
            settle_ms = 900
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.backend.jwt_audience, "authenticated");
        assert_eq!(settings.backend.deletion_function, "delete-account");
        assert!(settings.database.url.is_none());
        assert_eq!(settings.deck.default_size, 20);
        assert_eq!(settings.swipe.settle_ms, 900);
        assert_eq!(settings.swipe.distance_threshold, 150.0);
        assert_eq!(
            settings.swipe.deck_settings().timings.settle_delay,
            Duration::from_millis(900)
        );
    }
}

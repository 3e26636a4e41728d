use anyhow::Result;
use config::Config;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_END_BUFFER_MINUTES, DEFAULT_LOG_LEVEL, DEFAULT_MAX_EXPANDED_PER_SEGMENT,
    DEFAULT_MAX_RESULTS, ENV_PREFIX, ENV_SEPARATOR,
};
use crate::error::{CoreError, CoreResult};


#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub occurrences: OccurrenceConfig,
    pub logging: LoggingConfig,
}

/// Tunables for occurrence materialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OccurrenceConfig {
    /// Grace period after an occurrence's scheduled end before it counts as past.
    pub end_buffer_minutes: i64,
    /// Result cap used by the sync projection.
    pub default_max_results: usize,
    /// Raw rule instants examined per pattern segment before giving up.
    pub max_expanded_per_segment: usize,
}

impl OccurrenceConfig {
    /// ## Summary
    /// Returns the end buffer as a `TimeDelta`.
    #[must_use]
    pub fn end_buffer(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::minutes(self.end_buffer_minutes)
    }

    /// ## Summary
    /// Rejects values the materializer cannot work with.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` for a negative end buffer or a zero
    /// expansion cap.
    pub fn validate(&self) -> CoreResult<()> {
        if self.end_buffer_minutes < 0 {
            return Err(CoreError::ConfigError(format!(
                "occurrences.end_buffer_minutes must not be negative, got {}",
                self.end_buffer_minutes
            )));
        }
        if self.max_expanded_per_segment == 0 {
            return Err(CoreError::ConfigError(
                "occurrences.max_expanded_per_segment must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OccurrenceConfig {
    fn default() -> Self {
        Self {
            end_buffer_minutes: DEFAULT_END_BUFFER_MINUTES,
            default_max_results: DEFAULT_MAX_RESULTS,
            max_expanded_per_segment: DEFAULT_MAX_EXPANDED_PER_SEGMENT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive string such as `info` or `cadence_service=trace`.
    pub level: String,
}

impl LoggingConfig {
    /// ## Summary
    /// Builds the filter a host installs on its `tracing` subscriber.
    ///
    /// An unparseable level falls back to `info` with a warning.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(self.level.as_str()).unwrap_or_else(|e| {
            tracing::warn!(level = %self.level, error = %e, "Invalid log level in config, using default");
            EnvFilter::new(DEFAULT_LOG_LEVEL)
        })
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, an optional `config.toml` and
    /// `CADENCE__`-prefixed environment variables, in increasing precedence.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("occurrences.end_buffer_minutes", DEFAULT_END_BUFFER_MINUTES)?
            .set_default(
                "occurrences.default_max_results",
                u64::try_from(DEFAULT_MAX_RESULTS)?,
            )?
            .set_default(
                "occurrences.max_expanded_per_segment",
                u64::try_from(DEFAULT_MAX_EXPANDED_PER_SEGMENT)?,
            )?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            // TOML file
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            // Env vars
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;
        settings.occurrences.validate()?;

        tracing::debug!(
            end_buffer_minutes = settings.occurrences.end_buffer_minutes,
            default_max_results = settings.occurrences.default_max_results,
            "Loaded settings"
        );
        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

//! Layered settings: built-in defaults, then an optional `ludo-dates.toml`,
//! then `LUDO_*` environment variables (`LUDO_LOGGING__LEVEL=debug`).

use anyhow::{bail, Result};
use config::Config;
use ludo_recurrence::{DstPolicy, Locale, DEFAULT_SAFETY_CAP};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "ludo-dates.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub generation: GenerationConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. "warn" or "ludo_recurrence=debug".
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub safety_cap: usize,
    pub dst_policy: DstPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub locale: Locale,
}

impl Settings {
    /// Load settings. `path` replaces the default config file and must exist.
    ///
    /// # Errors
    /// Returns an error if a source cannot be read, the merged
    /// configuration does not deserialize into `Settings`, or
    /// `generation.safety_cap` is zero.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("logging.level", "warn")?
            .set_default("generation.safety_cap", DEFAULT_SAFETY_CAP as i64)?
            .set_default("generation.dst_policy", "shift_forward")?
            .set_default("display.locale", "de")?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("LUDO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        if settings.generation.safety_cap == 0 {
            bail!("generation.safety_cap must be at least 1");
        }
        Ok(settings)
    }
}

/// Load `.env` (if present) into the environment, then the settings.
///
/// # Errors
/// See [`Settings::load`].
pub fn load_config(path: Option<&str>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load(path)
}

//! Analyzer settings loaded from a JSON file.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::calendar::{WorkCalendar, WorkCalendarConfig};
use crate::duration::{DEFAULT_HOURS_PER_WORKDAY, DurationResolver};
use crate::error::ConfigError;

pub const CONFIG_ENV_VAR: &str = "CRITICAL_PATH_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "critical_path.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub hours_per_workday: f64,
    pub calendar: WorkCalendarConfig,
    /// `EnvFilter` directive used by the binaries when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            hours_per_workday: DEFAULT_HOURS_PER_WORKDAY,
            calendar: WorkCalendarConfig::default(),
            log_filter: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: shown.clone(),
            source,
        })?;
        let mut config: AnalyzerConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: shown.clone(),
                source,
            })?;
        config.calendar = WorkCalendarConfig::new(
            config.calendar.working_days().iter().copied(),
            config.calendar.holidays().iter().copied(),
        );
        config.validate()?;
        info!(path = %shown, "loaded analyzer config");
        Ok(config)
    }

    /// `$CRITICAL_PATH_CONFIG`, then `./critical_path.json`, then built-in defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::load(path);
            }
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::load(local);
        }
        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.calendar.working_days().is_empty() {
            return Err(ConfigError::Invalid(
                "calendar.working_days must name at least one weekday".into(),
            ));
        }
        if !self.hours_per_workday.is_finite() || self.hours_per_workday <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "hours_per_workday must be positive, got {}",
                self.hours_per_workday
            )));
        }
        Ok(())
    }

    pub fn work_calendar(&self) -> WorkCalendar {
        WorkCalendar::from_config(&self.calendar)
    }

    pub fn duration_resolver(&self) -> DurationResolver {
        DurationResolver::new(self.work_calendar(), self.hours_per_workday)
    }
}

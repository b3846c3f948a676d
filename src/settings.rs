use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{DEFAULT_BAR_WIDTH, DEFAULT_DELIMITER, DEFAULT_WORK_GROUP_SIZE, ENV_PREFIX};

/// Run settings, merged from defaults, an optional settings file, the
/// environment (`WEATHER_AGG_*`) and command-line overrides, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(range(min = 1, max = 1048576))]
    pub work_group_size: usize,

    #[validate(range(min = 1, max = 4096))]
    pub max_workers: usize,

    pub delimiter: char,

    pub use_mmap: bool,

    #[validate(range(min = 1, max = 500))]
    pub bar_width: usize,

    /// Histogram bin count to use without prompting. Not validated here: a
    /// bad value falls through to the interactive bin prompt.
    #[serde(default)]
    pub bins: Option<i64>,
}

/// Values given on the command line; `None` leaves the loaded setting alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub work_group_size: Option<usize>,
    pub max_workers: Option<usize>,
    pub delimiter: Option<char>,
    pub use_mmap: Option<bool>,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("work_group_size", DEFAULT_WORK_GROUP_SIZE as i64)?
            .set_default("max_workers", num_cpus::get() as i64)?
            .set_default("delimiter", DEFAULT_DELIMITER.to_string())?
            .set_default("use_mmap", false)?
            .set_default("bar_width", DEFAULT_BAR_WIDTH as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Result<Self> {
        if let Some(work_group_size) = overrides.work_group_size {
            self.work_group_size = work_group_size;
        }
        if let Some(max_workers) = overrides.max_workers {
            self.max_workers = max_workers;
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter = delimiter;
        }
        if let Some(use_mmap) = overrides.use_mmap {
            self.use_mmap = use_mmap;
        }

        self.validate()?;
        Ok(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_group_size: DEFAULT_WORK_GROUP_SIZE,
            max_workers: num_cpus::get(),
            delimiter: DEFAULT_DELIMITER,
            use_mmap: false,
            bar_width: DEFAULT_BAR_WIDTH,
            bins: None,
        }
    }
}

/// Kernel names
pub const KERNEL_MIN: &str = "min";
pub const KERNEL_MAX: &str = "max";
pub const KERNEL_SUM: &str = "sum";
pub const KERNEL_AVERAGE: &str = "average";
pub const KERNEL_HISTOGRAM: &str = "histogram";

/// Record layout: station year month day time temperature
pub const FIELD_COUNT: usize = 6;
pub const FILTER_FIELD_COUNT: usize = 5;
pub const DEFAULT_DELIMITER: char = ' ';

/// Temperatures are carried as integers in tenths of a degree
pub const TEMPERATURE_SCALE: i32 = 10;

/// Processing defaults
pub const DEFAULT_WORK_GROUP_SIZE: usize = 64;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const PROGRESS_UPDATE_INTERVAL: usize = 100_000;
pub const MAX_RETAINED_ERRORS: usize = 10;

/// Report rendering
pub const DEFAULT_BAR_WIDTH: usize = 60;
pub const BAR_MARKER: char = '#';
pub const REPORT_SEPARATOR_WIDTH: usize = 101;

/// Environment variable prefix for settings (e.g. WEATHER_AGG_WORK_GROUP_SIZE)
pub const ENV_PREFIX: &str = "WEATHER_AGG";

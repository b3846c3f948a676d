pub mod cancel;
pub mod constants;
pub mod filename;
pub mod logging;
pub mod progress;
pub mod prompt;

pub use cancel::CancellationToken;
pub use constants::*;
pub use filename::generate_default_report_filename;
pub use logging::init_logging;
pub use progress::ProgressReporter;
pub use prompt::{parse_bin_count, prompt_bin_count, prompt_filter_criteria, resolve_bin_count};

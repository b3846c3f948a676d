use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(
        "No records available for {stage}: {lines_read} lines read, \
         {lines_skipped} skipped, {records_matched} matched the filters"
    )]
    EmptyInput {
        stage: String,
        lines_read: usize,
        lines_skipped: usize,
        records_matched: usize,
    },

    #[error("Kernel '{kernel}' failed: {message}")]
    Execution { kernel: String, message: String },

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Processing cancelled by user")]
    Cancelled,
}

impl ProcessingError {
    /// Empty-input error for a stage that has no observation counts to report.
    pub fn empty(stage: &str) -> Self {
        ProcessingError::EmptyInput {
            stage: stage.to_string(),
            lines_read: 0,
            lines_skipped: 0,
            records_matched: 0,
        }
    }

    /// Parse and bin-count errors leave the run intact; everything else ends it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProcessingError::Parse { .. } | ProcessingError::Config(_))
    }
}

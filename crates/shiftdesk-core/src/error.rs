use thiserror::Error;

/// Process-level errors: configuration and startup. Request-level failures
/// live in the store/scheduler/agent crates so each layer maps its own cases.
#[derive(Debug, Error)]
pub enum ShiftdeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShiftdeskError {
    /// Short, stable error code string for logs.
    pub fn code(&self) -> &'static str {
        match self {
            ShiftdeskError::Config(_) => "CONFIG_ERROR",
            ShiftdeskError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, ShiftdeskError>;

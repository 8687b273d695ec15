use thiserror::Error;

use crate::bridge::BridgeError;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("terminal I/O failed")]
    Terminal(#[from] std::io::Error),

    #[error("host bridge failed")]
    Bridge(#[from] BridgeError),
}

/// Result type for TUI operations
pub type TuiResult<T> = Result<T, TuiError>;

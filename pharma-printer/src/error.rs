//! Invoice printer errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
    /// Could not reach the printer
    #[error("Printer unreachable: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Connect or write took longer than the configured timeout
    #[error("Printer timed out: {0}")]
    Timeout(String),

    /// Bad printer address
    #[error("Invalid printer address: {0}")]
    InvalidConfig(String),
}

pub type PrintResult<T> = Result<T, PrintError>;

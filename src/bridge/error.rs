//! Bridge error types.

use thiserror::Error;

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors raised while starting or running the HTTP channels.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Bind failed for a reason other than the port being taken.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Every port in the retry window was taken; startup is fatal.
    #[error(
        "{channel} channel found no free port within {attempts} attempts starting at {preferred}"
    )]
    BindExhausted {
        channel: &'static str,
        preferred: u16,
        attempts: u32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server error: {0}")]
    Serve(String),
}

impl BridgeError {
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    pub fn serve(msg: impl Into<String>) -> Self {
        Self::Serve(msg.into())
    }
}

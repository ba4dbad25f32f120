use std::{mem::discriminant, sync::Arc};

use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

use crate::{chain_client::client::Error as ChainClientError, types::ScannerResult};

/// Errors emitted by the scanner.
///
/// Construction-time validation failures (`NoInstruments`, `Invalid*`) are
/// fatal and surface from the builder. Runtime scanning never returns an
/// error per tick; transient trouble is folded into the tick outcome
/// instead. The checkpoint variants are only produced by explicit
/// [`save_checkpoint`](crate::DebtScanner::save_checkpoint) calls.
#[derive(Error, Debug, Clone)]
pub enum ScannerError {
    /// The underlying RPC transport returned an error.
    #[error("RPC error: {0}")]
    RpcError(Arc<RpcError<TransportErrorKind>>),

    /// A timeout elapsed while waiting for an RPC response.
    #[error("Operation timed out")]
    Timeout,

    /// No tracked instrument addresses were configured.
    #[error("At least one tracked instrument address is required")]
    NoInstruments,

    /// The configured chunk size is invalid (must be greater than zero).
    #[error("Chunk size must be greater than 0")]
    InvalidChunkSize,

    /// The configured provider range cap is invalid (must be greater than zero).
    #[error("Sub-chunk size must be greater than 0")]
    InvalidSubChunkSize,

    /// The configured forward-window bound is invalid (must be greater than zero).
    #[error("Max windows per tick must be greater than 0")]
    InvalidWindowsPerTick,

    /// Writing the checkpoint file failed.
    #[error("Checkpoint I/O error: {0}")]
    CheckpointIo(Arc<std::io::Error>),

    /// Serializing the checkpoint document failed.
    #[error("Checkpoint encoding error: {0}")]
    CheckpointEncode(Arc<serde_json::Error>),
}

impl From<ChainClientError> for ScannerError {
    fn from(error: ChainClientError) -> ScannerError {
        match error {
            ChainClientError::Timeout => ScannerError::Timeout,
            ChainClientError::RpcError(err) => ScannerError::RpcError(err),
        }
    }
}

impl From<RpcError<TransportErrorKind>> for ScannerError {
    fn from(error: RpcError<TransportErrorKind>) -> Self {
        ScannerError::RpcError(Arc::new(error))
    }
}

impl From<std::io::Error> for ScannerError {
    fn from(error: std::io::Error) -> Self {
        ScannerError::CheckpointIo(Arc::new(error))
    }
}

impl From<serde_json::Error> for ScannerError {
    fn from(error: serde_json::Error) -> Self {
        ScannerError::CheckpointEncode(Arc::new(error))
    }
}

impl<T: Clone> PartialEq<ScannerError> for ScannerResult<T> {
    fn eq(&self, other: &ScannerError) -> bool {
        match self {
            Ok(_) => false,
            Err(err) => discriminant(err) == discriminant(other),
        }
    }
}

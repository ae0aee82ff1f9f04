//! Subsidiary ledger error types.

use std::time::Duration;

use thiserror::Error;

/// Join stage a store fetch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    /// Voucher headers.
    Vouchers,
    /// Voucher detail lines.
    DetailLines,
    /// Chart-of-accounts descriptions.
    Accounts,
    /// Active auxiliary master.
    Auxiliaries,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vouchers => write!(f, "vouchers"),
            Self::DetailLines => write!(f, "detail lines"),
            Self::Accounts => write!(f, "accounts"),
            Self::Auxiliaries => write!(f, "auxiliaries"),
        }
    }
}

/// Error raised by a `SubledgerSource` implementation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SourceError {
    /// Store message, kept verbatim.
    pub message: String,
}

impl SourceError {
    /// Creates a source error from any displayable store error.
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Errors that abort report generation.
///
/// An empty result is not an error; see `SubledgerReport::is_empty`.
#[derive(Debug, Error)]
pub enum SubledgerError {
    /// A store fetch failed. No retry, no partial result.
    #[error("Data source error while fetching {stage}: {source}")]
    DataSource {
        /// Failing stage.
        stage: FetchStage,
        /// Store error.
        source: SourceError,
    },

    /// The request deadline elapsed.
    #[error("Report deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl SubledgerError {
    /// Wraps a store error for the given stage.
    #[must_use]
    pub const fn data_source(stage: FetchStage, source: SourceError) -> Self {
        Self::DataSource { stage, source }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DataSource { .. } => "DATA_SOURCE_ERROR",
            Self::DeadlineExceeded(_) => "DEADLINE_EXCEEDED",
        }
    }
}

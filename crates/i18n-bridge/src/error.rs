//! Error types for the binding layer
//!
//! Every native failure code is converted into one of these variants before
//! it leaves the crate. Raw integers only survive as context inside
//! [`Error::EngineProtocolViolation`] reasons.

use std::path::PathBuf;
use thiserror::Error;

use crate::negotiate::NegotiationError;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum Error {
    /// The engine refused to hand out a usable handle
    #[error("Failed to initialize translation engine: {reason}")]
    InitializationFailed { reason: String },

    /// A call was attempted after the engine was freed
    #[error("Translation engine has already been disposed")]
    ResourceDisposed,

    /// Loading a catalog failed
    #[error("Failed to load catalog from {source_name}{}", detail_suffix(.detail))]
    LoadFailed {
        source_name: String,
        detail: Option<String>,
    },

    /// The engine rejected a translation request
    #[error("Translation of '{token}' failed{}", detail_suffix(.detail))]
    TranslationFailed {
        token: String,
        detail: Option<String>,
    },

    /// Exporting the binary catalog failed
    #[error("Binary export to {} failed{}", .path.display(), detail_suffix(.detail))]
    ExportFailed {
        path: PathBuf,
        detail: Option<String>,
    },

    /// A read-only query (metadata, dump, find, check) failed
    #[error("Engine query '{call}' failed{}", detail_suffix(.detail))]
    QueryFailed {
        call: &'static str,
        detail: Option<String>,
    },

    /// The engine broke the boundary contract.
    ///
    /// A well-formed result that is larger than `max_result_bytes` is also
    /// reported here. Its reason starts with [`SIZE_LIMIT_REASON`]; use
    /// [`Error::is_size_limit`] to tell it apart from a contract breach.
    #[error("Engine protocol violation in '{call}': {reason}")]
    EngineProtocolViolation { call: &'static str, reason: String },

    /// An argument cannot be represented across the boundary
    #[error("Invalid {what}: {reason}")]
    InvalidArgument { what: &'static str, reason: String },

    /// The loaded engine does not export an optional symbol
    #[error("Engine does not support '{symbol}'")]
    Unsupported { symbol: &'static str },

    /// Resolving or loading the engine library failed
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Errors raised while locating and loading the engine library
#[derive(Error, Debug)]
pub enum LibraryError {
    /// No candidate file exists for the requested library
    #[error("Engine library '{name}' not found in {searched} search path(s)")]
    NotFound { name: String, searched: usize },

    /// The dynamic loader rejected the library
    #[error("Failed to load engine library {}: {source}", .path.display())]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// A required symbol is missing from the library
    #[error("Symbol '{symbol}' not found in {}", .path.display())]
    SymbolNotFound { symbol: &'static str, path: PathBuf },
}

/// Reason prefix for results refused by the configured size cap
pub const SIZE_LIMIT_REASON: &str = "size limit";

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(text) if !text.is_empty() => format!(": {}", text),
        _ => String::new(),
    }
}

impl Error {
    /// Create a protocol violation for the given boundary call
    pub fn protocol(call: &'static str, reason: impl Into<String>) -> Self {
        Self::EngineProtocolViolation {
            call,
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(what: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            what,
            reason: reason.into(),
        }
    }

    /// Get the error record text attached to this error, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::LoadFailed { detail, .. }
            | Self::TranslationFailed { detail, .. }
            | Self::ExportFailed { detail, .. }
            | Self::QueryFailed { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Check whether this error means the engine is gone for good
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::ResourceDisposed)
    }

    /// Check whether the engine answered correctly but the result was
    /// larger than the configured cap
    pub fn is_size_limit(&self) -> bool {
        matches!(
            self,
            Self::EngineProtocolViolation { reason, .. } if reason.starts_with(SIZE_LIMIT_REASON)
        )
    }

    /// Map a negotiation failure that is not an engine rejection.
    ///
    /// Rejections carry an error record and must be mapped by the caller, so
    /// they only reach this function when no better mapping exists.
    pub(crate) fn from_negotiation(call: &'static str, err: NegotiationError) -> Self {
        match err {
            NegotiationError::TooLarge { .. } => {
                Self::protocol(call, format!("{}: {}", SIZE_LIMIT_REASON, err))
            }
            other => Self::protocol(call, other.to_string()),
        }
    }
}

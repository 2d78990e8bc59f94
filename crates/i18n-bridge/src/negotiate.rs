//! Two-phase buffer negotiation
//!
//! Engine calls that produce text follow one convention: called with a null
//! buffer they report the required length (without terminator), called with
//! a buffer of `length + 1` bytes they copy the text, terminate it and return
//! the same length. Negative returns are failures whose detail lives in the
//! engine's error record.
//!
//! [`BufferNegotiator`] drives that convention for any such call. It never
//! reads the error record itself; callers map [`NegotiationError::Rejected`]
//! after reading it under the same guard.

use std::fmt;
use std::os::raw::{c_char, c_int};
use thiserror::Error;
use tracing::trace;

use crate::config::DEFAULT_MAX_RESULT_BYTES;

/// First buffer size tried by [`BufferNegotiator::bounded_report`]
pub const INITIAL_REPORT_CAPACITY: usize = 4 * 1024;

/// Which half of the protocol a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Length query with a null buffer
    Probe,
    /// Copy into the caller's buffer
    Fill,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Probe => write!(f, "probe"),
            Phase::Fill => write!(f, "fill"),
        }
    }
}

/// Ways a negotiated call can go wrong
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    /// The engine returned a negative code
    #[error("engine rejected the {phase} call with code {code}")]
    Rejected { phase: Phase, code: i32 },

    /// The fill confirmed a different length than the probe announced
    #[error("probe reported {expected} bytes but fill returned {actual}")]
    LengthMismatch { expected: usize, actual: i32 },

    /// No NUL byte where the engine should have terminated the result
    #[error("result of {len} bytes is not NUL-terminated")]
    MissingTerminator { len: usize },

    /// The announced result exceeds what we are willing to allocate
    #[error("result of {len} bytes exceeds the {limit}-byte limit")]
    TooLarge { len: usize, limit: usize },

    /// The result is not UTF-8
    #[error("result is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

impl NegotiationError {
    /// Whether the engine itself signalled failure (error record is meaningful)
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Drives the probe/fill protocol with a result size cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferNegotiator {
    max_len: usize,
}

impl Default for BufferNegotiator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULT_BYTES)
    }
}

impl BufferNegotiator {
    /// Create a negotiator that refuses results longer than `max_len` bytes.
    ///
    /// The cap is clamped so `max_len + 1` always fits a C `int`.
    pub fn new(max_len: usize) -> Self {
        let ceiling = (c_int::MAX as usize).saturating_sub(1);
        Self {
            max_len: max_len.min(ceiling),
        }
    }

    /// Largest accepted result in bytes
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Run `call` through probe and fill and return the raw content bytes.
    ///
    /// `call` receives the output buffer pointer and its capacity. It is
    /// invoked once for a zero-length result and twice otherwise.
    pub fn bytes<F>(&self, mut call: F) -> Result<Vec<u8>, NegotiationError>
    where
        F: FnMut(*mut c_char, c_int) -> c_int,
    {
        let probed = call(std::ptr::null_mut(), 0);
        if probed < 0 {
            return Err(NegotiationError::Rejected {
                phase: Phase::Probe,
                code: probed,
            });
        }

        let len = probed as usize;
        trace!(len, "Probe reported result length");
        if len == 0 {
            return Ok(Vec::new());
        }
        if len > self.max_len {
            return Err(NegotiationError::TooLarge {
                len,
                limit: self.max_len,
            });
        }

        let mut buffer = vec![0xFFu8; len + 1];
        // len <= max_len <= c_int::MAX - 1, so the capacity fits.
        let written = call(buffer.as_mut_ptr().cast::<c_char>(), (len + 1) as c_int);
        if written < 0 {
            return Err(NegotiationError::Rejected {
                phase: Phase::Fill,
                code: written,
            });
        }
        if written as usize != len {
            return Err(NegotiationError::LengthMismatch {
                expected: len,
                actual: written,
            });
        }
        if buffer[len] != 0 {
            return Err(NegotiationError::MissingTerminator { len });
        }

        buffer.truncate(len);
        Ok(buffer)
    }

    /// Like [`bytes`](Self::bytes), decoded as UTF-8
    pub fn text<F>(&self, call: F) -> Result<String, NegotiationError>
    where
        F: FnMut(*mut c_char, c_int) -> c_int,
    {
        let bytes = self.bytes(call)?;
        String::from_utf8(bytes).map_err(|err| NegotiationError::InvalidUtf8 {
            valid_up_to: err.utf8_error().valid_up_to(),
        })
    }

    /// Read a report from a call that returns a status code instead of a length.
    ///
    /// Such calls copy as much of the report as fits and always terminate it.
    /// The buffer starts at [`INITIAL_REPORT_CAPACITY`] and doubles while the
    /// report fills it completely, up to the size cap. A report cut at the cap
    /// is returned truncated, dropping any split trailing character.
    pub fn bounded_report<F>(&self, mut call: F) -> Result<(i32, String), NegotiationError>
    where
        F: FnMut(*mut c_char, c_int) -> c_int,
    {
        let limit = self.max_len + 1;
        let mut capacity = INITIAL_REPORT_CAPACITY.min(limit);

        loop {
            let mut buffer = vec![0u8; capacity];
            let status = call(buffer.as_mut_ptr().cast::<c_char>(), capacity as c_int);
            if status < 0 {
                return Err(NegotiationError::Rejected {
                    phase: Phase::Fill,
                    code: status,
                });
            }

            let len = buffer
                .iter()
                .position(|&b| b == 0)
                .ok_or(NegotiationError::MissingTerminator { len: capacity })?;

            let saturated = len + 1 == capacity;
            if saturated && capacity < limit {
                capacity = capacity.saturating_mul(2).min(limit);
                trace!(capacity, "Report filled the buffer, growing");
                continue;
            }

            buffer.truncate(len);
            return match String::from_utf8(buffer) {
                Ok(text) => Ok((status, text)),
                Err(err) if saturated && err.utf8_error().error_len().is_none() => {
                    let valid = err.utf8_error().valid_up_to();
                    let mut bytes = err.into_bytes();
                    bytes.truncate(valid);
                    Ok((status, String::from_utf8(bytes).unwrap_or_default()))
                }
                Err(err) => Err(NegotiationError::InvalidUtf8 {
                    valid_up_to: err.utf8_error().valid_up_to(),
                }),
            };
        }
    }
}

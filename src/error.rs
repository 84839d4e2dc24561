//! Error type shared by the parser, the archive lister and the plan limiters.

use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while parsing an archive or building a plan.
///
/// Structural failures are terminal for the parse that raised them. Nothing
/// in this crate retries or recovers; the caller decides whether to abort
/// the whole patch-generation run.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A record did not start with the signature its position implies.
    #[error("invalid {what} signature: expected {expected:#010x}, found {found:#010x}")]
    BadSignature {
        what: &'static str,
        expected: u32,
        found: u32,
    },

    /// The source ended inside a fixed or declared-length field.
    #[error("truncated {what}")]
    Truncated { what: &'static str },

    /// No end-of-central-directory signature within the search window.
    #[error("end of central directory record not found")]
    EocdNotFound,

    /// An offset or length points outside the region it must lie in.
    #[error("{what} out of range at offset {offset}")]
    OutOfRange { what: &'static str, offset: u64 },

    /// The archive relies on ZIP64 extensions.
    #[error("ZIP64 archives are not supported")]
    Zip64Unsupported,

    /// An entry has not been through the local header pass yet.
    #[error("compressed data offset of {name:?} has not been computed")]
    MissingDataOffset { name: String },

    /// A size budget below zero was handed to a limiter.
    #[error("size budget must be non-negative, got {0}")]
    InvalidBudget(i64),

    /// Positioned read against a byte source failed.
    #[error("I/O error reading {len} bytes at offset {offset}: {source}")]
    Io {
        offset: u64,
        len: usize,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure (open, metadata).
    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),

    /// The blocking listing task panicked or was cancelled.
    #[cfg(feature = "async")]
    #[error("listing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Maps an [`io::Error`] from a sequential read into a parse failure.
///
/// Running out of bytes mid-record means the archive is truncated, which is
/// a structural problem rather than an I/O one.
pub(crate) fn truncated(what: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::Truncated { what }
        } else {
            Error::Stream(e)
        }
    }
}

//! Minimal ZIP structure parsing.
//!
//! Only the metadata needed to plan a delta is extracted; entry contents
//! are never inflated.
//!
//! ## Architecture
//!
//! - [`structures`]: record constants and the parsed value types
//! - [`parser`]: record-at-a-time parsing from a positioned stream
//! - [`archive`]: whole-archive listing over a random-access source
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! The EOCD is found by scanning backwards from the end, because it may be
//! followed by a comment of any length up to 65535 bytes.
//!
//! ## Limitations
//!
//! - No ZIP64 support; archives that need it are rejected
//! - No multi-disk archive support
//! - No general-purpose validation beyond what planning relies on

pub mod archive;
mod cp437;
pub mod parser;
pub mod structures;

pub use archive::MinimalZipArchive;
#[cfg(feature = "async")]
pub use archive::list_entries_async;
pub use structures::*;

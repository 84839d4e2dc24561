//! # zipplan
//!
//! Prepares pairs of ZIP archives for binary delta generation.
//!
//! Diffing compressed bytes gives poor deltas, so a patch generator wants
//! to inflate matching entries before diffing. This crate provides the two
//! pieces that decide what to inflate without inflating anything itself:
//!
//! - A minimal ZIP structure parser that lists entries together with the
//!   exact offset of their compressed data
//! - A pre-diff plan model plus greedy size limiters that keep the
//!   temporary delta-friendly blobs within a byte budget
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use zipplan::{DeltaFriendlyOldBlobSizeLimiter, MinimalZipArchive, PreDiffPlanEntryModifier};
//!
//! fn main() -> zipplan::Result<()> {
//!     let entries = MinimalZipArchive::list_entries(Path::new("old.apk"))?;
//!     for entry in &entries {
//!         println!("{entry}");
//!     }
//!
//!     // Entries would be paired and classified upstream; then:
//!     let limiter = DeltaFriendlyOldBlobSizeLimiter::new(64 * 1024 * 1024)?;
//!     let plan = limiter.modify(&[]);
//!     assert!(plan.is_empty());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod io;
pub mod plan;
pub mod range;
pub mod zip;

pub use error::{Error, Result};
pub use io::{LocalFileReader, ReadAt};
pub use plan::{
    DeltaFriendlyOldBlobSizeLimiter, PreDiffPlan, PreDiffPlanEntry, PreDiffPlanEntryModifier,
    TotalRecompressionLimiter, UncompressionOptionExplanation, ZipEntryPair,
    ZipEntryUncompressionOption,
};
pub use range::TypedRange;
pub use zip::{MinimalCentralDirectoryMetadata, MinimalZipArchive, MinimalZipEntry};

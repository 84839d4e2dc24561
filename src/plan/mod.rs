//! Pre-diff planning.
//!
//! A plan is a list of [`PreDiffPlanEntry`] values, one per matched pair of
//! old and new archive entries, each saying which side(s) to inflate before
//! the delta is computed. Plans come from an upstream classifier, are then
//! passed through [`PreDiffPlanEntryModifier`]s such as the size limiters,
//! and finally become a [`PreDiffPlan`]: the byte ranges of each archive to
//! inflate.

mod entry;
mod limiter;

pub use entry::{
    PreDiffPlanEntry, UncompressionOptionExplanation, ZipEntryPair, ZipEntryUncompressionOption,
};
pub use limiter::{DeltaFriendlyOldBlobSizeLimiter, TotalRecompressionLimiter};

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::range::TypedRange;
use crate::zip::MinimalZipEntry;

/// A pass that may revise the decisions of a plan.
///
/// Implementations return a list of the same length and order as their
/// input and never mutate the input entries.
pub trait PreDiffPlanEntryModifier {
    fn modify(&self, entries: &[PreDiffPlanEntry]) -> Vec<PreDiffPlanEntry>;
}

/// Run `entries` through each modifier in turn.
pub fn apply_modifiers(
    entries: Vec<PreDiffPlanEntry>,
    modifiers: &[&dyn PreDiffPlanEntryModifier],
) -> Vec<PreDiffPlanEntry> {
    modifiers
        .iter()
        .fold(entries, |entries, modifier| modifier.modify(&entries))
}

/// Byte range of an archive to inflate, tagged with the entry it belongs to.
pub type UncompressionRange = TypedRange<Arc<MinimalZipEntry>>;

/// The final plan: which compressed regions of each archive to inflate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreDiffPlan {
    entries: Vec<PreDiffPlanEntry>,
    old_file_uncompression_plan: Vec<UncompressionRange>,
    new_file_uncompression_plan: Vec<UncompressionRange>,
}

impl PreDiffPlan {
    /// Derive the per-archive uncompression ranges from finalized entries.
    ///
    /// Each range spans an entry's compressed data. Ranges are sorted by
    /// offset; an entry inflated by several plan entries appears once.
    ///
    /// # Errors
    ///
    /// [`Error::MissingDataOffset`] if an entry to inflate was never
    /// through the local header pass, and [`Error::OutOfRange`] if two
    /// ranges of the same archive overlap.
    pub fn new(entries: Vec<PreDiffPlanEntry>) -> Result<Self> {
        let old_file_uncompression_plan = uncompression_ranges(
            entries
                .iter()
                .filter(|e| e.uncompression_option().uncompresses_old())
                .map(PreDiffPlanEntry::old_entry),
        )?;
        let new_file_uncompression_plan = uncompression_ranges(
            entries
                .iter()
                .filter(|e| e.uncompression_option().uncompresses_new())
                .map(PreDiffPlanEntry::new_entry),
        )?;
        Ok(Self {
            entries,
            old_file_uncompression_plan,
            new_file_uncompression_plan,
        })
    }

    pub fn entries(&self) -> &[PreDiffPlanEntry] {
        &self.entries
    }

    pub fn old_file_uncompression_plan(&self) -> &[UncompressionRange] {
        &self.old_file_uncompression_plan
    }

    pub fn new_file_uncompression_plan(&self) -> &[UncompressionRange] {
        &self.new_file_uncompression_plan
    }
}

fn uncompression_ranges<'a>(
    entries: impl Iterator<Item = &'a Arc<MinimalZipEntry>>,
) -> Result<Vec<UncompressionRange>> {
    let mut ranges = Vec::new();
    for entry in entries {
        let Some(offset) = entry.file_offset_of_compressed_data() else {
            return Err(Error::MissingDataOffset {
                name: entry.file_name(),
            });
        };
        ranges.push(TypedRange::new(
            offset,
            entry.compressed_size(),
            Some(Arc::clone(entry)),
        ));
    }
    ranges.sort_by_key(TypedRange::offset);
    ranges.dedup();

    for pair in ranges.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            return Err(Error::OutOfRange {
                what: "uncompression range",
                offset: pair[1].offset(),
            });
        }
    }
    Ok(ranges)
}

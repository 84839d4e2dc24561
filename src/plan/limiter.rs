//! Size budgets for the delta-friendly blobs.
//!
//! Both limiters run the same greedy pass: the candidates that would cost
//! the most are considered first, each one is admitted while it still fits
//! in what is left of the budget, and anything that does not fit is demoted
//! to [`UncompressNeither`](ZipEntryUncompressionOption::UncompressNeither).
//! A rejected candidate leaves the remaining budget untouched, so a smaller
//! candidate further down the list may still be admitted. This is not an
//! optimal packing and is not meant to be one: the same inputs always give
//! the same plan.

use crate::error::{Error, Result};

use super::PreDiffPlanEntryModifier;
use super::entry::{PreDiffPlanEntry, UncompressionOptionExplanation, ZipEntryUncompressionOption};

/// Caps the extra bytes the old archive grows by when entries are inflated.
///
/// Inflating an old entry adds `uncompressed_size - compressed_size` bytes
/// to the delta-friendly old blob. Entries using
/// [`UncompressOld`](ZipEntryUncompressionOption::UncompressOld) or
/// [`UncompressBoth`](ZipEntryUncompressionOption::UncompressBoth) compete
/// for the budget; everything else passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaFriendlyOldBlobSizeLimiter {
    max_size_bytes: i64,
}

impl DeltaFriendlyOldBlobSizeLimiter {
    /// # Errors
    ///
    /// [`Error::InvalidBudget`] if `max_size_bytes` is negative.
    pub fn new(max_size_bytes: i64) -> Result<Self> {
        if max_size_bytes < 0 {
            return Err(Error::InvalidBudget(max_size_bytes));
        }
        Ok(Self { max_size_bytes })
    }

    pub fn max_size_bytes(&self) -> i64 {
        self.max_size_bytes
    }
}

impl PreDiffPlanEntryModifier for DeltaFriendlyOldBlobSizeLimiter {
    fn modify(&self, entries: &[PreDiffPlanEntry]) -> Vec<PreDiffPlanEntry> {
        limit_greedily(
            entries,
            self.max_size_bytes,
            |e| e.uncompression_option().uncompresses_old(),
            |e| {
                let old = e.old_entry();
                signed(old.uncompressed_size()).saturating_sub(signed(old.compressed_size()))
            },
        )
    }
}

/// Caps the total bytes the receiving side has to recompress.
///
/// Every entry using
/// [`UncompressNew`](ZipEntryUncompressionOption::UncompressNew) or
/// [`UncompressBoth`](ZipEntryUncompressionOption::UncompressBoth) must be
/// recompressed after patching, costing its new uncompressed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalRecompressionLimiter {
    max_bytes_to_recompress: i64,
}

impl TotalRecompressionLimiter {
    /// # Errors
    ///
    /// [`Error::InvalidBudget`] if `max_bytes_to_recompress` is negative.
    pub fn new(max_bytes_to_recompress: i64) -> Result<Self> {
        if max_bytes_to_recompress < 0 {
            return Err(Error::InvalidBudget(max_bytes_to_recompress));
        }
        Ok(Self {
            max_bytes_to_recompress,
        })
    }

    pub fn max_bytes_to_recompress(&self) -> i64 {
        self.max_bytes_to_recompress
    }
}

impl PreDiffPlanEntryModifier for TotalRecompressionLimiter {
    fn modify(&self, entries: &[PreDiffPlanEntry]) -> Vec<PreDiffPlanEntry> {
        limit_greedily(
            entries,
            self.max_bytes_to_recompress,
            |e| e.uncompression_option().uncompresses_new(),
            |e| signed(e.new_entry().uncompressed_size()),
        )
    }
}

fn signed(size: u64) -> i64 {
    i64::try_from(size).unwrap_or(i64::MAX)
}

/// Admit candidates largest cost first; demote whatever no longer fits.
///
/// The output has the same length and order as `entries`. Non-candidates
/// and admitted candidates are clones of their inputs.
fn limit_greedily<P, C>(
    entries: &[PreDiffPlanEntry],
    budget: i64,
    is_candidate: P,
    cost: C,
) -> Vec<PreDiffPlanEntry>
where
    P: Fn(&PreDiffPlanEntry) -> bool,
    C: Fn(&PreDiffPlanEntry) -> i64,
{
    let mut candidates: Vec<(usize, i64)> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| is_candidate(e))
        .map(|(i, e)| (i, cost(e)))
        .collect();
    // Stable: equal costs keep their input order.
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    let mut demoted = vec![false; entries.len()];
    let mut remaining = budget;
    for (index, cost) in candidates {
        if cost <= remaining {
            remaining = remaining.saturating_sub(cost);
            log::trace!(
                "admitted {} ({cost} bytes), {remaining} left",
                entries[index]
            );
        } else {
            demoted[index] = true;
            log::debug!(
                "demoting {}: needs {cost} bytes, {remaining} left",
                entries[index]
            );
        }
    }

    entries
        .iter()
        .zip(demoted)
        .map(|(entry, demote)| {
            if demote {
                entry.reclassify(
                    ZipEntryUncompressionOption::UncompressNeither,
                    UncompressionOptionExplanation::ResourceConstrained,
                )
            } else {
                entry.clone()
            }
        })
        .collect()
}

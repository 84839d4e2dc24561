use std::fmt;
use std::sync::Arc;

use crate::zip::MinimalZipEntry;

/// Which side(s) of a matched entry pair to decompress before diffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZipEntryUncompressionOption {
    UncompressNeither,
    UncompressOld,
    UncompressNew,
    UncompressBoth,
}

impl ZipEntryUncompressionOption {
    /// True for options that inflate the old entry into the delta-friendly old blob.
    pub fn uncompresses_old(self) -> bool {
        matches!(self, Self::UncompressOld | Self::UncompressBoth)
    }

    /// True for options whose new entry must be recompressed when the patch is applied.
    pub fn uncompresses_new(self) -> bool {
        matches!(self, Self::UncompressNew | Self::UncompressBoth)
    }
}

/// Why an uncompression option was chosen. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UncompressionOptionExplanation {
    /// The new entry is deflated in a way that cannot be reproduced.
    DeflateUnsuitable,
    /// At least one entry uses a compression method other than deflate.
    Unsuitable,
    /// Both entries are stored; there is nothing to inflate.
    BothEntriesUncompressed,
    /// The old entry is stored and the new one deflated.
    UncompressedChangedToCompressed,
    /// The old entry is deflated and the new one stored.
    CompressedChangedToUncompressed,
    /// Both entries are deflated and their compressed bytes differ.
    CompressedBytesChanged,
    /// Both entries are deflated and their compressed bytes are identical.
    CompressedBytesIdentical,
    /// Decompression would exceed a size budget.
    ResourceConstrained,
}

/// An old entry and its matching new entry, not yet classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZipEntryPair {
    old_entry: Arc<MinimalZipEntry>,
    new_entry: Arc<MinimalZipEntry>,
}

impl ZipEntryPair {
    pub fn new(old_entry: Arc<MinimalZipEntry>, new_entry: Arc<MinimalZipEntry>) -> Self {
        Self {
            old_entry,
            new_entry,
        }
    }

    pub fn old_entry(&self) -> &Arc<MinimalZipEntry> {
        &self.old_entry
    }

    pub fn new_entry(&self) -> &Arc<MinimalZipEntry> {
        &self.new_entry
    }

    /// Attach a decision, producing a plan entry.
    pub fn classify(
        self,
        option: ZipEntryUncompressionOption,
        explanation: UncompressionOptionExplanation,
    ) -> PreDiffPlanEntry {
        PreDiffPlanEntry {
            pair: self,
            option,
            explanation,
        }
    }
}

/// A classified entry pair: what to decompress before diffing, and why.
///
/// Values are immutable. Limiters that change a decision produce a new
/// entry with [`reclassify`](Self::reclassify), which shares the two zip
/// entries with the original.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreDiffPlanEntry {
    pair: ZipEntryPair,
    option: ZipEntryUncompressionOption,
    explanation: UncompressionOptionExplanation,
}

impl PreDiffPlanEntry {
    pub fn new(
        old_entry: Arc<MinimalZipEntry>,
        new_entry: Arc<MinimalZipEntry>,
        option: ZipEntryUncompressionOption,
        explanation: UncompressionOptionExplanation,
    ) -> Self {
        ZipEntryPair::new(old_entry, new_entry).classify(option, explanation)
    }

    pub fn old_entry(&self) -> &Arc<MinimalZipEntry> {
        self.pair.old_entry()
    }

    pub fn new_entry(&self) -> &Arc<MinimalZipEntry> {
        self.pair.new_entry()
    }

    pub fn pair(&self) -> &ZipEntryPair {
        &self.pair
    }

    pub fn uncompression_option(&self) -> ZipEntryUncompressionOption {
        self.option
    }

    pub fn explanation(&self) -> UncompressionOptionExplanation {
        self.explanation
    }

    /// Same entry pair, different decision.
    pub fn reclassify(
        &self,
        option: ZipEntryUncompressionOption,
        explanation: UncompressionOptionExplanation,
    ) -> Self {
        self.pair.clone().classify(option, explanation)
    }
}

impl fmt::Display for PreDiffPlanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {:?} ({:?})",
            self.old_entry().file_name(),
            self.new_entry().file_name(),
            self.option,
            self.explanation
        )
    }
}

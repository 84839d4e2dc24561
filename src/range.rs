use std::fmt;

/// A half-open byte range `[offset, offset + length)` with optional metadata.
///
/// Ranges order by offset, then length, then metadata; a missing metadata
/// value sorts before any present one and is a distinct value for equality
/// and hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypedRange<M> {
    offset: u64,
    length: u64,
    metadata: Option<M>,
}

impl<M> TypedRange<M> {
    pub fn new(offset: u64, length: u64, metadata: Option<M>) -> Self {
        Self {
            offset,
            length,
            metadata,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    /// First offset past the range.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }

    pub fn metadata(&self) -> Option<&M> {
        self.metadata.as_ref()
    }

    pub fn overlaps<N>(&self, other: &TypedRange<N>) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

impl<M: fmt::Debug> fmt::Display for TypedRange<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.offset, self.end())?;
        if let Some(metadata) = &self.metadata {
            write!(f, " {metadata:?}")?;
        }
        Ok(())
    }
}

use std::fmt;

use super::cp437;
use crate::error::{Error, Result};

/// End of Central Directory (EOCD) - 22 bytes minimum
pub const EOCD_SIGNATURE: u32 = 0x0605_4b50;
pub const EOCD_SIZE: u64 = 22;

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: u32 = 0x0201_4b50;
pub const CDFH_MIN_SIZE: u64 = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: u32 = 0x0403_4b50;
pub const LFH_SIZE: u64 = 30;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
pub const MAX_COMMENT_SIZE: u64 = 65535;

/// General purpose flag bit 11: file name and comment are UTF-8.
pub const FLAG_UTF8: u16 = 1 << 11;

pub const METHOD_STORED: u16 = 0;
pub const METHOD_DEFLATE: u16 = 8;

/// Where the central directory lives and how many records it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinimalCentralDirectoryMetadata {
    offset_of_central_directory: u64,
    length_of_central_directory: u64,
    number_of_entries: u16,
}

impl MinimalCentralDirectoryMetadata {
    pub fn new(offset: u64, length: u64, number_of_entries: u16) -> Self {
        Self {
            offset_of_central_directory: offset,
            length_of_central_directory: length,
            number_of_entries,
        }
    }

    pub fn offset_of_central_directory(&self) -> u64 {
        self.offset_of_central_directory
    }

    pub fn length_of_central_directory(&self) -> u64 {
        self.length_of_central_directory
    }

    pub fn number_of_entries(&self) -> usize {
        self.number_of_entries as usize
    }
}

/// The subset of a ZIP entry's metadata needed to plan a delta.
///
/// Built from a central directory record. The offset of the compressed data
/// is only known after the entry's local header has been read, because the
/// local header may carry an extra field of a different length than the
/// central directory copy; see [`with_compressed_data_offset`].
///
/// [`with_compressed_data_offset`]: MinimalZipEntry::with_compressed_data_offset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MinimalZipEntry {
    compression_method: u16,
    crc32_of_uncompressed_data: u32,
    compressed_size: u64,
    uncompressed_size: u64,
    file_name_bytes: Vec<u8>,
    general_purpose_flag_bit11: bool,
    file_offset_of_local_entry: u64,
    file_offset_of_compressed_data: Option<u64>,
}

impl MinimalZipEntry {
    pub fn new(
        compression_method: u16,
        crc32_of_uncompressed_data: u32,
        compressed_size: u64,
        uncompressed_size: u64,
        file_name_bytes: Vec<u8>,
        general_purpose_flag_bit11: bool,
        file_offset_of_local_entry: u64,
    ) -> Self {
        Self {
            compression_method,
            crc32_of_uncompressed_data,
            compressed_size,
            uncompressed_size,
            file_name_bytes,
            general_purpose_flag_bit11,
            file_offset_of_local_entry,
            file_offset_of_compressed_data: None,
        }
    }

    /// Returns this entry with the absolute offset of its compressed data.
    ///
    /// The data always follows a local header, so an offset at or before
    /// the header start is rejected.
    pub fn with_compressed_data_offset(mut self, offset: u64) -> Result<Self> {
        if offset <= self.file_offset_of_local_entry {
            return Err(Error::OutOfRange {
                what: "compressed data offset",
                offset,
            });
        }
        self.file_offset_of_compressed_data = Some(offset);
        Ok(self)
    }

    pub fn compression_method(&self) -> u16 {
        self.compression_method
    }

    pub fn crc32_of_uncompressed_data(&self) -> u32 {
        self.crc32_of_uncompressed_data
    }

    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// Raw name bytes exactly as stored in the central directory.
    pub fn file_name_bytes(&self) -> &[u8] {
        &self.file_name_bytes
    }

    /// The decoded file name: UTF-8 when bit 11 is set, code page 437 otherwise.
    pub fn file_name(&self) -> String {
        if self.general_purpose_flag_bit11 {
            String::from_utf8_lossy(&self.file_name_bytes).into_owned()
        } else {
            cp437::decode(&self.file_name_bytes)
        }
    }

    pub fn general_purpose_flag_bit11(&self) -> bool {
        self.general_purpose_flag_bit11
    }

    pub fn file_offset_of_local_entry(&self) -> u64 {
        self.file_offset_of_local_entry
    }

    /// `None` until the local header pass has run.
    pub fn file_offset_of_compressed_data(&self) -> Option<u64> {
        self.file_offset_of_compressed_data
    }
}

impl fmt::Display for MinimalZipEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (method {}, {} -> {} bytes @ {})",
            self.file_name(),
            self.compression_method,
            self.compressed_size,
            self.uncompressed_size,
            self.file_offset_of_local_entry
        )
    }
}

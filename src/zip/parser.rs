//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of the three ZIP records the
//! planner cares about, reading each one from a stream positioned at its
//! signature.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) near the file's end
//! 2. Read the Central Directory to get metadata for all entries
//! 3. Read each entry's Local File Header to learn where its data starts
//!
//! Nothing here inflates entry data, and nothing here guesses: a wrong
//! signature, a short read or a ZIP64 marker ends the parse with an error.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};

use crate::error::{Error, Result, truncated};
use crate::io::ReadAt;

use super::structures::*;

/// Find the EOCD signature by scanning an in-memory buffer backwards.
///
/// The whole buffer is searched; the last occurrence wins. Returns `None`
/// when the buffer contains no signature, which is the expected answer for
/// anything that is not a ZIP archive.
pub fn locate_eocd_in_buffer(buffer: &[u8]) -> Option<usize> {
    let signature = EOCD_SIGNATURE.to_le_bytes();
    buffer
        .windows(signature.len())
        .rposition(|w| w == signature)
}

/// Find the EOCD signature near the end of a random-access source.
///
/// The EOCD record can be followed by a comment of up to
/// `max_comment_size` bytes, so only the trailing
/// `min(size, max_comment_size + 22)` bytes are read and scanned.
///
/// # Returns
///
/// The absolute offset of the signature, or `None` if the window holds no
/// signature.
///
/// # Errors
///
/// Only read failures; a missing signature is not an error here.
pub fn locate_eocd<R: ReadAt + ?Sized>(source: &R, max_comment_size: u64) -> Result<Option<u64>> {
    let size = source.size();
    let window = max_comment_size.saturating_add(EOCD_SIZE).min(size);
    let window_start = size - window;

    let mut buf = vec![0u8; window as usize];
    source.read_exact_at(window_start, &mut buf)?;

    Ok(locate_eocd_in_buffer(&buf).map(|i| window_start + i as u64))
}

/// Parse the EOCD record the reader is positioned at.
///
/// Only the central directory location, length and entry count are
/// extracted. The trailing comment is not read.
///
/// # Errors
///
/// [`Error::BadSignature`] if the reader is not at an EOCD record,
/// [`Error::Truncated`] if the record is cut short, and
/// [`Error::Zip64Unsupported`] if any field holds a ZIP64 sentinel.
pub fn parse_eocd_record<R: Read>(reader: &mut R) -> Result<MinimalCentralDirectoryMetadata> {
    const WHAT: &str = "end of central directory record";

    expect_signature(reader, EOCD_SIGNATURE, WHAT)?;

    let mut fields = [0u8; (EOCD_SIZE - 4) as usize];
    reader.read_exact(&mut fields).map_err(truncated(WHAT))?;
    let mut fields = &fields[..];

    let _disk_number = fields.read_u16::<LittleEndian>()?;
    let _disk_with_cd = fields.read_u16::<LittleEndian>()?;
    let _disk_entries = fields.read_u16::<LittleEndian>()?;
    let total_entries = fields.read_u16::<LittleEndian>()?;
    let cd_size = fields.read_u32::<LittleEndian>()?;
    let cd_offset = fields.read_u32::<LittleEndian>()?;

    if total_entries == 0xFFFF || cd_size == 0xFFFF_FFFF || cd_offset == 0xFFFF_FFFF {
        return Err(Error::Zip64Unsupported);
    }

    Ok(MinimalCentralDirectoryMetadata::new(
        cd_offset as u64,
        cd_size as u64,
        total_entries,
    ))
}

/// Parse one Central Directory File Header.
///
/// On success the reader has consumed the whole record, including the
/// file name, extra field and comment, so it sits at the start of the next
/// record. The returned entry has no compressed-data offset yet.
///
/// # Errors
///
/// [`Error::BadSignature`], [`Error::Truncated`] (also when a declared
/// variable-length section runs past the end), and
/// [`Error::Zip64Unsupported`] for sentinel sizes or offsets.
pub fn parse_central_directory_entry<R: Read>(reader: &mut R) -> Result<MinimalZipEntry> {
    const WHAT: &str = "central directory file header";

    expect_signature(reader, CDFH_SIGNATURE, WHAT)?;

    let mut fixed = [0u8; (CDFH_MIN_SIZE - 4) as usize];
    reader.read_exact(&mut fixed).map_err(truncated(WHAT))?;
    let mut fixed = &fixed[..];

    let _version_made_by = fixed.read_u16::<LittleEndian>()?;
    let _version_needed = fixed.read_u16::<LittleEndian>()?;
    let flags = fixed.read_u16::<LittleEndian>()?;
    let compression_method = fixed.read_u16::<LittleEndian>()?;
    let _last_mod_time = fixed.read_u16::<LittleEndian>()?;
    let _last_mod_date = fixed.read_u16::<LittleEndian>()?;
    let crc32 = fixed.read_u32::<LittleEndian>()?;
    let compressed_size = fixed.read_u32::<LittleEndian>()?;
    let uncompressed_size = fixed.read_u32::<LittleEndian>()?;
    let file_name_length = fixed.read_u16::<LittleEndian>()?;
    let extra_field_length = fixed.read_u16::<LittleEndian>()?;
    let file_comment_length = fixed.read_u16::<LittleEndian>()?;
    let _disk_number_start = fixed.read_u16::<LittleEndian>()?;
    let _internal_attrs = fixed.read_u16::<LittleEndian>()?;
    let _external_attrs = fixed.read_u32::<LittleEndian>()?;
    let lfh_offset = fixed.read_u32::<LittleEndian>()?;

    if compressed_size == 0xFFFF_FFFF
        || uncompressed_size == 0xFFFF_FFFF
        || lfh_offset == 0xFFFF_FFFF
    {
        return Err(Error::Zip64Unsupported);
    }

    let mut file_name_bytes = vec![0u8; file_name_length as usize];
    reader
        .read_exact(&mut file_name_bytes)
        .map_err(truncated("central directory file name"))?;

    // Extra field and comment are unused but must be consumed so the
    // reader lands on the next record.
    skip_exact(
        reader,
        extra_field_length as u64 + file_comment_length as u64,
        "central directory extra field or comment",
    )?;

    Ok(MinimalZipEntry::new(
        compression_method,
        crc32,
        compressed_size as u64,
        uncompressed_size as u64,
        file_name_bytes,
        flags & FLAG_UTF8 != 0,
        lfh_offset as u64,
    ))
}

/// Parse a Local File Header and return where its data begins.
///
/// The returned value is relative to the start of the header: the fixed
/// 30 bytes plus the local file name and extra field lengths, which may
/// differ from the central directory's copy. Add it to
/// [`MinimalZipEntry::file_offset_of_local_entry`] for the absolute offset.
pub fn parse_local_entry_and_get_compressed_data_offset<R: Read>(reader: &mut R) -> Result<u64> {
    const WHAT: &str = "local file header";

    expect_signature(reader, LFH_SIGNATURE, WHAT)?;

    let mut fixed = [0u8; (LFH_SIZE - 4) as usize];
    reader.read_exact(&mut fixed).map_err(truncated(WHAT))?;

    // Name and extra lengths sit at +26 and +28 from the signature
    let mut lengths = &fixed[22..];
    let file_name_length = lengths.read_u16::<LittleEndian>()? as u64;
    let extra_field_length = lengths.read_u16::<LittleEndian>()? as u64;

    Ok(LFH_SIZE + file_name_length + extra_field_length)
}

fn expect_signature<R: Read>(reader: &mut R, expected: u32, what: &'static str) -> Result<()> {
    let found = reader.read_u32::<LittleEndian>().map_err(truncated(what))?;
    if found != expected {
        return Err(Error::BadSignature {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

fn skip_exact<R: Read>(reader: &mut R, len: u64, what: &'static str) -> Result<()> {
    let skipped = io::copy(&mut reader.take(len), &mut io::sink()).map_err(truncated(what))?;
    if skipped != len {
        return Err(Error::Truncated { what });
    }
    Ok(())
}

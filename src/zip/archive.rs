use std::io::Cursor;
use std::path::Path;

use crate::error::{Error, Result};
use crate::io::{LocalFileReader, ReadAt};

use super::parser;
use super::structures::{EOCD_SIZE, LFH_SIZE, MAX_COMMENT_SIZE, MinimalZipEntry};

/// Lists the entries of a ZIP archive with their compressed-data offsets.
pub struct MinimalZipArchive;

impl MinimalZipArchive {
    /// List all entries of the archive at `path`, in file order.
    pub fn list_entries(path: &Path) -> Result<Vec<MinimalZipEntry>> {
        let reader = LocalFileReader::new(path)?;
        Self::list_entries_from(&reader)
    }

    /// List all entries of an archive held by any random-access source.
    ///
    /// The whole central directory is read in one request and parsed from
    /// memory. For each record the entry's local header is read at its
    /// absolute offset to compute where its compressed data starts. The
    /// result is sorted by local header offset.
    ///
    /// # Errors
    ///
    /// Fails if no EOCD record is found, if fewer records than declared can
    /// be read, if an entry's header or data would overlap the next entry
    /// or the central directory, or on any read failure. Read failures carry
    /// the offset and length of the request ([`Error::Io`]).
    pub fn list_entries_from<R: ReadAt + ?Sized>(source: &R) -> Result<Vec<MinimalZipEntry>> {
        let eocd_offset =
            parser::locate_eocd(source, MAX_COMMENT_SIZE)?.ok_or(Error::EocdNotFound)?;
        log::debug!("found end of central directory at offset {eocd_offset}");

        // A signature in the last few bytes leaves a short record, which
        // the parser reports as truncated.
        let eocd_len = EOCD_SIZE.min(source.size() - eocd_offset);
        let eocd = read_region(source, eocd_offset, eocd_len)?;
        let metadata = parser::parse_eocd_record(&mut eocd.as_slice())?;

        let cd_start = metadata.offset_of_central_directory();
        let cd_end = cd_start + metadata.length_of_central_directory();
        if cd_end > eocd_offset {
            return Err(Error::OutOfRange {
                what: "central directory",
                offset: cd_start,
            });
        }
        log::debug!(
            "central directory: {} entries, {} bytes at offset {cd_start}",
            metadata.number_of_entries(),
            metadata.length_of_central_directory()
        );

        let central_directory =
            read_region(source, cd_start, metadata.length_of_central_directory())?;
        let mut records = Cursor::new(central_directory.as_slice());
        let mut local_header = [0u8; LFH_SIZE as usize];
        let mut entries = Vec::with_capacity(metadata.number_of_entries());
        for _ in 0..metadata.number_of_entries() {
            let entry = parser::parse_central_directory_entry(&mut records)?;

            let local_offset = entry.file_offset_of_local_entry();
            if local_offset >= cd_start {
                return Err(Error::OutOfRange {
                    what: "local file header",
                    offset: local_offset,
                });
            }
            source.read_exact_at(local_offset, &mut local_header)?;
            let relative =
                parser::parse_local_entry_and_get_compressed_data_offset(&mut &local_header[..])?;
            entries.push(entry.with_compressed_data_offset(local_offset + relative)?);
        }

        entries.sort_by_key(MinimalZipEntry::file_offset_of_local_entry);
        check_entry_bounds(&entries, cd_start)?;
        Ok(entries)
    }
}

fn read_region<R: ReadAt + ?Sized>(source: &R, offset: u64, len: u64) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len as usize];
    source.read_exact_at(offset, &mut buf)?;
    Ok(buf)
}

/// Each entry's header and data must end before the next entry (or, for
/// the last one, the central directory) begins.
fn check_entry_bounds(entries: &[MinimalZipEntry], cd_start: u64) -> Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        let limit = entries
            .get(i + 1)
            .map_or(cd_start, MinimalZipEntry::file_offset_of_local_entry);
        let Some(data_start) = entry.file_offset_of_compressed_data() else {
            return Err(Error::MissingDataOffset {
                name: entry.file_name(),
            });
        };
        let data_end = data_start.saturating_add(entry.compressed_size());
        if data_end > limit {
            return Err(Error::OutOfRange {
                what: "entry data",
                offset: data_start,
            });
        }
    }
    Ok(())
}

/// List the entries of the archive at `path` on tokio's blocking pool.
///
/// The parse itself stays synchronous; this only moves it off the async
/// executor so the old and new archives can be listed concurrently.
#[cfg(feature = "async")]
pub async fn list_entries_async(path: impl AsRef<Path>) -> Result<Vec<MinimalZipEntry>> {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || MinimalZipArchive::list_entries(&path)).await?
}

//! Synthetic ZIP archives with known layout.

#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::Crc;
use flate2::write::DeflateEncoder;

pub struct TestEntry {
    pub path: &'static str,
    pub content: Vec<u8>,
    /// 0 stores the entry, anything else deflates at that level.
    pub level: u32,
    pub local_extra: Vec<u8>,
    pub central_extra: Vec<u8>,
    pub comment: Vec<u8>,
}

impl TestEntry {
    pub fn new(path: &'static str, content: impl Into<Vec<u8>>, level: u32) -> Self {
        Self {
            path,
            content: content.into(),
            level,
            local_extra: Vec::new(),
            central_extra: Vec::new(),
            comment: Vec::new(),
        }
    }

    pub fn local_extra(mut self, extra: &[u8]) -> Self {
        self.local_extra = extra.to_vec();
        self
    }

    pub fn central_extra(mut self, extra: &[u8]) -> Self {
        self.central_extra = extra.to_vec();
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn method(&self) -> u16 {
        if self.level == 0 { 0 } else { 8 }
    }

    pub fn compressed(&self) -> Vec<u8> {
        if self.level == 0 {
            return self.content.clone();
        }
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(self.level));
        encoder.write_all(&self.content).unwrap();
        encoder.finish().unwrap()
    }

    pub fn crc32(&self) -> u32 {
        let mut crc = Crc::new();
        crc.update(&self.content);
        crc.sum()
    }
}

/// Where each piece of a built archive landed.
pub struct Layout {
    pub local_offsets: Vec<u64>,
    pub data_offsets: Vec<u64>,
    pub cd_offset: u64,
    pub cd_length: u64,
    pub eocd_offset: u64,
}

/// Lay out `entries` in order, followed by the central directory (in
/// `cd_order`, or file order when `None`) and an EOCD with `archive_comment`.
pub fn build_zip(
    entries: &[TestEntry],
    cd_order: Option<&[usize]>,
    archive_comment: &[u8],
) -> (Vec<u8>, Layout) {
    let mut out = Vec::new();
    let mut local_offsets = Vec::new();
    let mut data_offsets = Vec::new();
    let mut compressed = Vec::new();

    for entry in entries {
        let data = entry.compressed();
        local_offsets.push(out.len() as u64);
        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes()); // version needed
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        out.extend_from_slice(&entry.method().to_le_bytes());
        out.extend_from_slice(&0x6d20u16.to_le_bytes()); // time
        out.extend_from_slice(&0x5a21u16.to_le_bytes()); // date
        out.extend_from_slice(&entry.crc32().to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(entry.content.len() as u32).to_le_bytes());
        out.extend_from_slice(&(entry.path.len() as u16).to_le_bytes());
        out.extend_from_slice(&(entry.local_extra.len() as u16).to_le_bytes());
        out.extend_from_slice(entry.path.as_bytes());
        out.extend_from_slice(&entry.local_extra);
        data_offsets.push(out.len() as u64);
        out.extend_from_slice(&data);
        compressed.push(data);
    }

    let cd_offset = out.len() as u64;
    let file_order: Vec<usize> = (0..entries.len()).collect();
    for &i in cd_order.unwrap_or(&file_order) {
        let entry = &entries[i];
        out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes()); // made by
        out.extend_from_slice(&20u16.to_le_bytes()); // needed
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        out.extend_from_slice(&entry.method().to_le_bytes());
        out.extend_from_slice(&0x6d20u16.to_le_bytes());
        out.extend_from_slice(&0x5a21u16.to_le_bytes());
        out.extend_from_slice(&entry.crc32().to_le_bytes());
        out.extend_from_slice(&(compressed[i].len() as u32).to_le_bytes());
        out.extend_from_slice(&(entry.content.len() as u32).to_le_bytes());
        out.extend_from_slice(&(entry.path.len() as u16).to_le_bytes());
        out.extend_from_slice(&(entry.central_extra.len() as u16).to_le_bytes());
        out.extend_from_slice(&(entry.comment.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // disk
        out.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
        out.extend_from_slice(&0u32.to_le_bytes()); // external attrs
        out.extend_from_slice(&(local_offsets[i] as u32).to_le_bytes());
        out.extend_from_slice(entry.path.as_bytes());
        out.extend_from_slice(&entry.central_extra);
        out.extend_from_slice(&entry.comment);
    }
    let cd_length = out.len() as u64 - cd_offset;

    let eocd_offset = out.len() as u64;
    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(cd_length as u32).to_le_bytes());
    out.extend_from_slice(&(cd_offset as u32).to_le_bytes());
    out.extend_from_slice(&(archive_comment.len() as u16).to_le_bytes());
    out.extend_from_slice(archive_comment);

    (
        out,
        Layout {
            local_offsets,
            data_offsets,
            cd_offset,
            cd_length,
            eocd_offset,
        },
    )
}

/// A mix of stored and deflated entries, with local extra fields that
/// differ from the central directory copies.
pub fn sample_entries() -> Vec<TestEntry> {
    let text = "All work and no play makes Jack a dull boy. ".repeat(200);
    let ramp: Vec<u8> = (0..=255u8).cycle().take(3000).collect();
    vec![
        TestEntry::new("file1.txt", "This is a stored file.", 0),
        TestEntry::new("dir/file2.txt", text.clone(), 6).local_extra(&[0xCA, 0xFE, 0x00, 0x00]),
        TestEntry::new("dir/", Vec::new(), 0),
        TestEntry::new("file3.bin", ramp, 9)
            .central_extra(&[0x55, 0x54, 0x05, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00])
            .comment(b"binary ramp"),
        TestEntry::new("file4.txt", text.to_uppercase(), 1).local_extra(&[0u8; 12]),
    ]
}

#![forbid(unsafe_code)]

use std::io::Read;

use crate::archive::error::{CupError, CupResult};
use crate::archive::io::{read_bytes, read_u16, read_u32, read_u64};

/// Cup archive signature.
pub const SIGNATURE: [u8; 11] = *b"__C__U__P__";

/// Copy granularity for streaming contents in and out of archives. Any
/// chunk size reproduces an identical archive.
pub(crate) const CHUNK_SIZE: usize = 4096;

/// Fixed part of an encoded header: offset (8) + mtime (4) + size (4) +
/// path length (2).
pub(crate) const FIXED_HEADER_LEN: usize = 18;

/// One file's metadata record in the header block.
///
/// Encoded layout, all integers little-endian:
/// - `[u64 content_offset]` absolute offset of the file's bytes
/// - `[u32 modified_time]` UNIX timestamp, whole seconds
/// - `[u32 content_size]`
/// - `[u16 path_length]` UTF-8 byte length of the path
/// - `[path bytes]` relative path, forward slashes, no terminator
///
/// The path length is part of the layout, so the path is only replaced
/// through [`FileHeader::with_path`], which rebuilds the whole record.
#[derive(Debug, Clone)]
pub(crate) struct FileHeader {
    pub content_offset: u64,
    pub modified_time: u32,
    pub content_size: u32,
    path: String,
}

impl FileHeader {
    /// Build a record for a file about to be packed. The content offset
    /// stays zero until the whole header block is laid out.
    pub fn new(path: String, modified_time: u32, content_size: u32) -> CupResult<Self> {
        if path.len() > u16::MAX as usize {
            return Err(CupError::InvalidPath(path));
        }
        Ok(FileHeader {
            content_offset: 0,
            modified_time,
            content_size,
            path,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Encoded length of this record.
    pub fn header_size(&self) -> u64 {
        (FIXED_HEADER_LEN + self.path.len()) as u64
    }

    /// Replace the path, rebuilding the record around the same
    /// offset/time/size prefix.
    pub fn with_path(&self, new_path: &str) -> CupResult<Self> {
        let mut renamed = Self::new(new_path.to_string(), self.modified_time, self.content_size)?;
        renamed.content_offset = self.content_offset;
        Ok(renamed)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.header_size() as usize);
        buf.extend_from_slice(&self.content_offset.to_le_bytes());
        buf.extend_from_slice(&self.modified_time.to_le_bytes());
        buf.extend_from_slice(&self.content_size.to_le_bytes());
        buf.extend_from_slice(&(self.path.len() as u16).to_le_bytes());
        buf.extend_from_slice(self.path.as_bytes());
        buf
    }

    /// Decode one record, consuming exactly `18 + path_length` bytes from
    /// the reader. End-of-file mid-record means the archive was cut short.
    pub fn decode(r: &mut dyn Read) -> CupResult<Self> {
        let content_offset = read_u64(r)?;
        let modified_time = read_u32(r)?;
        let content_size = read_u32(r)?;
        let path_len = read_u16(r)? as usize;

        let path = String::from_utf8(read_bytes(r, path_len)?)
            .map_err(|_| CupError::CorruptHeaderBlock("header path is not utf-8".into()))?;

        Ok(FileHeader {
            content_offset,
            modified_time,
            content_size,
            path,
        })
    }
}

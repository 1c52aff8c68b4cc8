#![forbid(unsafe_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::debug;

use crate::archive::error::{CupError, CupResult};
use crate::archive::format::{FileHeader, SIGNATURE};
use crate::archive::io::copy_chunked;
use crate::archive::path::{flatten, SourceFile};

/// Cup archive layout:
/// - `[SIGNATURE 11]`
/// - header block: one record per file, pack order (see `format`)
/// - content block: raw file bytes, same order, no padding
///
/// The first header's content offset marks where the header block ends;
/// `read::read_headers` leans on that when scanning the block back.
pub(crate) fn write_archive(inputs: &[PathBuf], archive_path: &Path) -> CupResult<()> {
    let files = flatten(inputs)?;
    let mut headers = headers_for(&files)?;
    assign_offsets(&mut headers);

    let archive_abs = std::path::absolute(archive_path)?;
    if files.iter().any(|f| f.source == archive_abs) {
        return Err(CupError::ArchiveAlreadyExists(archive_abs));
    }

    let mut out = File::create(archive_path)?;
    out.write_all(&SIGNATURE)?;
    for header in &headers {
        out.write_all(&header.encode())?;
    }
    for file in &files {
        debug!(path = %file.rel_path, "packing");
        let mut src = File::open(&file.source)?;
        copy_chunked(&mut src, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn headers_for(files: &[SourceFile]) -> CupResult<Vec<FileHeader>> {
    let mut headers = Vec::with_capacity(files.len());
    for file in files {
        let meta = fs::metadata(&file.source)?;
        if meta.len() > u64::from(u32::MAX) {
            return Err(CupError::ResourceTooLarge(file.source.clone()));
        }
        let modified = meta
            .modified()?
            .duration_since(UNIX_EPOCH)
            // whole seconds; sub-second precision is dropped, pre-epoch
            // mtimes clamp to zero
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        headers.push(FileHeader::new(
            file.rel_path.clone(),
            modified,
            meta.len() as u32,
        )?);
    }
    Ok(headers)
}

/// Lay the content block immediately after the header block: the first
/// file starts at `signature + total header bytes`, each next file starts
/// where the previous one ends.
pub(crate) fn assign_offsets(headers: &mut [FileHeader]) {
    let mut offset =
        SIGNATURE.len() as u64 + headers.iter().map(FileHeader::header_size).sum::<u64>();
    for header in headers {
        header.content_offset = offset;
        offset += u64::from(header.content_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_contiguous_and_start_after_headers() {
        let mut headers = vec![
            FileHeader::new("a.txt".to_string(), 0, 2).unwrap(),
            FileHeader::new("b.txt".to_string(), 0, 5).unwrap(),
        ];
        assign_offsets(&mut headers);

        let block: u64 = headers.iter().map(FileHeader::header_size).sum();
        assert_eq!(block, 46);
        assert_eq!(headers[0].content_offset, 11 + 46);
        assert_eq!(headers[1].content_offset, 11 + 46 + 2);
    }

    #[test]
    fn offsets_follow_pack_order_not_path_order() {
        let mut headers = vec![
            FileHeader::new("zz.bin".to_string(), 0, 10).unwrap(),
            FileHeader::new("aa.bin".to_string(), 0, 4).unwrap(),
        ];
        assign_offsets(&mut headers);
        assert!(headers[0].content_offset < headers[1].content_offset);
        assert_eq!(
            headers[1].content_offset,
            headers[0].content_offset + u64::from(headers[0].content_size)
        );
    }
}

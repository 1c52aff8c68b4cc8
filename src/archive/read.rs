#![forbid(unsafe_code)]

use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::archive::error::{CupError, CupResult};
use crate::archive::format::{FileHeader, SIGNATURE};

/// Scan the header block of an archive stream positioned at byte 0.
///
/// The block stores no record count. The first header's content offset
/// doubles as the block's end (the packer lays content immediately after
/// the last header), so the scan decodes records until the running cursor
/// reaches that sentinel:
///
/// - the cursor starts at `signature + first header size`,
/// - each further record advances it by its own encoded size,
/// - `cursor == sentinel` terminates the scan; `cursor > sentinel` means
///   the cursor stepped over the sentinel and can never land on it, so
///   the block is corrupt and the scan stops rather than reading into
///   content bytes.
///
/// Headers come back in pack order; callers sort by path when they need
/// deterministic output.
pub(crate) fn read_headers(
    archive: &mut dyn Read,
    archive_path: &Path,
) -> CupResult<Vec<FileHeader>> {
    let mut signature = [0u8; SIGNATURE.len()];
    match archive.read_exact(&mut signature) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(CupError::ArchiveNotRecognizable(archive_path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    }
    if signature != SIGNATURE {
        return Err(CupError::ArchiveNotRecognizable(archive_path.to_path_buf()));
    }

    let first = FileHeader::decode(archive)?;
    let sentinel = first.content_offset;
    let mut cursor = SIGNATURE.len() as u64 + first.header_size();
    let mut headers = vec![first];

    while cursor < sentinel {
        let header = FileHeader::decode(archive)?;
        cursor += header.header_size();
        headers.push(header);
    }

    if cursor != sentinel {
        return Err(CupError::CorruptHeaderBlock(format!(
            "header scan overran content start: cursor {cursor}, expected {sentinel}"
        )));
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::build::assign_offsets;
    use std::io::Cursor;

    fn archive_bytes(paths: &[&str]) -> Vec<u8> {
        let mut headers: Vec<FileHeader> = paths
            .iter()
            .map(|p| FileHeader::new(p.to_string(), 0, 3).unwrap())
            .collect();
        assign_offsets(&mut headers);

        let mut bytes = SIGNATURE.to_vec();
        for h in &headers {
            bytes.extend_from_slice(&h.encode());
        }
        for _ in paths {
            bytes.extend_from_slice(b"xyz");
        }
        bytes
    }

    #[test]
    fn scans_exactly_n_headers_and_stops_at_content_start() {
        let bytes = archive_bytes(&["a", "deep/nested/path.txt", "bb.txt"]);
        let mut cur = Cursor::new(bytes);

        let headers = read_headers(&mut cur, Path::new("t.cup")).unwrap();
        assert_eq!(headers.len(), 3);
        // pack order, not sorted
        assert_eq!(headers[0].path(), "a");
        assert_eq!(headers[2].path(), "bb.txt");
        // the stream is left exactly at the content block
        assert_eq!(cur.position(), headers[0].content_offset);
    }

    #[test]
    fn single_entry_archive_terminates_immediately() {
        let bytes = archive_bytes(&["only.txt"]);
        let mut cur = Cursor::new(bytes);

        let headers = read_headers(&mut cur, Path::new("t.cup")).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(cur.position(), headers[0].content_offset);
    }

    #[test]
    fn overshooting_sentinel_is_corrupt() {
        let mut bytes = archive_bytes(&["a", "bb"]);
        // shrink the stored sentinel by one so no cursor step can land on it
        let sentinel = u64::from_le_bytes(bytes[11..19].try_into().unwrap());
        bytes[11..19].copy_from_slice(&(sentinel - 1).to_le_bytes());

        assert!(matches!(
            read_headers(&mut Cursor::new(bytes), Path::new("t.cup")),
            Err(CupError::CorruptHeaderBlock(_))
        ));
    }

    #[test]
    fn bad_signature_is_not_recognizable() {
        let mut bytes = archive_bytes(&["a"]);
        bytes[0] = b'X';
        assert!(matches!(
            read_headers(&mut Cursor::new(bytes), Path::new("t.cup")),
            Err(CupError::ArchiveNotRecognizable(_))
        ));
    }

    #[test]
    fn empty_file_is_not_recognizable() {
        assert!(matches!(
            read_headers(&mut Cursor::new(Vec::new()), Path::new("t.cup")),
            Err(CupError::ArchiveNotRecognizable(_))
        ));
    }

    #[test]
    fn header_block_cut_short_is_truncated() {
        let bytes = archive_bytes(&["a", "bb"]);

        // signature alone: the first header cannot be read at all
        let mut cur = Cursor::new(bytes[..11].to_vec());
        assert!(matches!(
            read_headers(&mut cur, Path::new("t.cup")),
            Err(CupError::TruncatedArchive)
        ));

        // cut mid-way through the first record
        let mut cur = Cursor::new(bytes[..25].to_vec());
        assert!(matches!(
            read_headers(&mut cur, Path::new("t.cup")),
            Err(CupError::TruncatedArchive)
        ));
    }
}

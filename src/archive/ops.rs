#![forbid(unsafe_code)]

use std::fs::{self, File};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use chrono::DateTime;
use tracing::{debug, info};

use crate::archive::build::write_archive;
use crate::archive::error::{CupError, CupResult};
use crate::archive::format::FileHeader;
use crate::archive::io::copy_exact;
use crate::archive::read::read_headers;

/// Public view of one archived file (for listings and tooling).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// 1-based position in the path-sorted listing.
    pub index: usize,
    pub size: u32,
    /// UNIX timestamp, whole seconds.
    pub modified_time: u32,
    pub path: String,
}

/// Picks an archive member for renaming: by its path, or by its 1-based
/// index in the path-sorted listing (as printed by `list`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Index(usize),
    Path(String),
}

/// Pack files/directories into a new archive.
///
/// Directory arguments are walked recursively; every file lands in the
/// archive under its path relative to the directory's parent. Fails
/// before writing anything if the archive path is itself one of the
/// inputs.
pub fn pack(paths: &[PathBuf], archive_name: &Path) -> CupResult<()> {
    info!(archive = %archive_name.display(), "packing");
    write_archive(paths, archive_name)?;
    info!(archive = %archive_name.display(), "packed");
    Ok(())
}

/// Read an archive's metadata without touching its contents. Entries come
/// back sorted by path, indexed from 1.
pub fn entries(archive_path: &Path) -> CupResult<Vec<FileInfo>> {
    let (_, headers) = sorted_headers(archive_path)?;
    Ok(headers
        .iter()
        .enumerate()
        .map(|(i, h)| FileInfo {
            index: i + 1,
            size: h.content_size,
            modified_time: h.modified_time,
            path: h.path().to_string(),
        })
        .collect())
}

/// Print the archive's members, sorted by path.
pub fn list(archive_path: &Path) -> CupResult<()> {
    for entry in entries(archive_path)? {
        let time = DateTime::from_timestamp(i64::from(entry.modified_time), 0)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| entry.modified_time.to_string());
        println!(
            "{:>4}  {:>12}  {}  {}",
            entry.index, entry.size, time, entry.path
        );
    }
    Ok(())
}

/// Unpack an archive into `destination`, creating it if absent.
///
/// Every member is extracted; `renamings` only changes where the selected
/// members land. Extraction aborts on the first failure.
pub fn unpack(
    renamings: &[(Selector, String)],
    archive_path: &Path,
    destination: &Path,
) -> CupResult<()> {
    let (mut archive, mut headers) = sorted_headers(archive_path)?;
    apply_renamings(&mut headers, renamings)?;

    info!(
        archive = %archive_path.display(),
        destination = %destination.display(),
        "unpacking"
    );
    fs::create_dir_all(destination)?;

    for header in &headers {
        let out_path = destination.join(native_rel_path(header.path()));
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!(path = %header.path(), "extracting");
        let mut out = File::create(&out_path)?;
        archive.seek(SeekFrom::Start(header.content_offset))?;
        copy_exact(&mut archive, &mut out, u64::from(header.content_size))?;
    }

    info!(archive = %archive_path.display(), "unpacked");
    Ok(())
}

/// Open the archive and scan its header block, sorted by path. The sort
/// happens on every read; on-disk order is pack order and is never
/// trusted to be sorted.
fn sorted_headers(archive_path: &Path) -> CupResult<(File, Vec<FileHeader>)> {
    if !archive_path.exists() {
        return Err(CupError::ArchiveNonExistent(archive_path.to_path_buf()));
    }
    let mut archive = File::open(archive_path)?;
    let mut headers = read_headers(&mut archive, archive_path)?;
    headers.sort_by(|a, b| a.path().as_bytes().cmp(b.path().as_bytes()));
    Ok((archive, headers))
}

/// Rewrite the paths of the selected members. Selectors resolve one at a
/// time against the current list: index selectors by position in the
/// sorted listing, path selectors against member paths as they stand
/// (an already renamed member no longer matches its old path).
fn apply_renamings(
    headers: &mut [FileHeader],
    renamings: &[(Selector, String)],
) -> CupResult<()> {
    for (selector, new_path) in renamings {
        let idx = match selector {
            Selector::Index(i) => (1..=headers.len())
                .contains(i)
                .then(|| i - 1)
                .ok_or_else(|| CupError::NoSuchMember(i.to_string()))?,
            Selector::Path(p) => headers
                .iter()
                .position(|h| h.path() == p)
                .ok_or_else(|| CupError::NoSuchMember(p.clone()))?,
        };
        let renamed = headers[idx].with_path(new_path)?;
        headers[idx] = renamed;
    }
    Ok(())
}

fn native_rel_path(rel: &str) -> PathBuf {
    rel.split('/').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<FileHeader> {
        vec![
            FileHeader::new("a.txt".to_string(), 0, 2).unwrap(),
            FileHeader::new("b/c.txt".to_string(), 0, 5).unwrap(),
        ]
    }

    #[test]
    fn renaming_by_index_is_one_based() {
        let mut hs = headers();
        apply_renamings(&mut hs, &[(Selector::Index(2), "renamed.txt".to_string())]).unwrap();
        assert_eq!(hs[0].path(), "a.txt");
        assert_eq!(hs[1].path(), "renamed.txt");
    }

    #[test]
    fn renaming_by_path_matches_exactly() {
        let mut hs = headers();
        apply_renamings(
            &mut hs,
            &[(Selector::Path("b/c.txt".to_string()), "d.txt".to_string())],
        )
        .unwrap();
        assert_eq!(hs[1].path(), "d.txt");
    }

    #[test]
    fn unknown_selectors_are_rejected() {
        let mut hs = headers();
        assert!(matches!(
            apply_renamings(&mut hs, &[(Selector::Index(0), "x".to_string())]),
            Err(CupError::NoSuchMember(_))
        ));
        assert!(matches!(
            apply_renamings(&mut hs, &[(Selector::Index(3), "x".to_string())]),
            Err(CupError::NoSuchMember(_))
        ));
        assert!(matches!(
            apply_renamings(
                &mut hs,
                &[(Selector::Path("missing".to_string()), "x".to_string())]
            ),
            Err(CupError::NoSuchMember(_))
        ));
    }

    #[test]
    fn native_rel_path_splits_on_forward_slash() {
        let p = native_rel_path("a/b/c.txt");
        let parts: Vec<_> = p.components().collect();
        assert_eq!(parts.len(), 3);
    }
}

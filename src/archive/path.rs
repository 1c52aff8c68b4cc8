#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::archive::error::{CupError, CupResult};

/// One file selected for packing: where it sits in the archive and where
/// its bytes come from.
#[derive(Debug, Clone)]
pub(crate) struct SourceFile {
    pub rel_path: String,
    pub source: PathBuf,
}

/// Flatten input files/directories into the ordered entry list.
///
/// A file argument keeps its base name. A directory argument contributes
/// every file below it, prefixed with the directory's own name. Sibling
/// order is whatever the filesystem enumerates; the same list drives both
/// header encoding and content writing, so the two stay paired
/// index-for-index.
pub(crate) fn flatten(inputs: &[PathBuf]) -> CupResult<Vec<SourceFile>> {
    let mut files = Vec::new();
    for input in inputs {
        let abs = std::path::absolute(input)?;
        if !abs.exists() {
            return Err(CupError::ResourceNonExistent(abs));
        }
        if abs.is_file() {
            files.push(SourceFile {
                rel_path: base_name(&abs),
                source: abs,
            });
        } else if abs.is_dir() {
            let prefix = base_name(&abs);
            for ent in WalkDir::new(&abs).follow_links(false) {
                let ent = ent.map_err(|e| {
                    let msg = e.to_string();
                    let io = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other(msg));
                    CupError::Io(io)
                })?;

                let ft = ent.file_type();
                if ft.is_dir() {
                    continue;
                }
                if !ft.is_file() {
                    return Err(CupError::ResourceCantBeArchived(ent.path().to_path_buf()));
                }

                let rel = rel_path_under(&abs, ent.path())?;
                files.push(SourceFile {
                    rel_path: prefixed(&prefix, &rel),
                    source: ent.path().to_path_buf(),
                });
            }
        } else {
            return Err(CupError::ResourceCantBeArchived(abs));
        }
    }
    Ok(files)
}

fn base_name(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn rel_path_under(root: &Path, file_path: &Path) -> CupResult<String> {
    let rel = file_path
        .strip_prefix(root)
        .map_err(|_| CupError::ResourceCantBeArchived(file_path.to_path_buf()))?;

    let mut out = String::new();
    for (i, comp) in rel.components().enumerate() {
        if i != 0 {
            out.push('/');
        }
        out.push_str(&comp.as_os_str().to_string_lossy());
    }
    Ok(out)
}

fn prefixed(prefix: &str, rel: &str) -> String {
    if prefix.is_empty() {
        rel.to_string()
    } else {
        format!("{prefix}/{rel}")
    }
}

#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CupError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive output collides with an input: {}", .0.display())]
    ArchiveAlreadyExists(PathBuf),

    #[error("input does not exist: {}", .0.display())]
    ResourceNonExistent(PathBuf),

    #[error("input is neither a file nor a directory: {}", .0.display())]
    ResourceCantBeArchived(PathBuf),

    #[error("file does not fit in a cup archive: {}", .0.display())]
    ResourceTooLarge(PathBuf),

    #[error("archive does not exist: {}", .0.display())]
    ArchiveNonExistent(PathBuf),

    #[error("not a cup archive: {}", .0.display())]
    ArchiveNotRecognizable(PathBuf),

    #[error("corrupt header block: {0}")]
    CorruptHeaderBlock(String),

    #[error("archive is cut short")]
    TruncatedArchive,

    #[error("path does not fit in a header: {0}")]
    InvalidPath(String),

    #[error("no archive member matches selector: {0}")]
    NoSuchMember(String),
}

pub type CupResult<T> = Result<T, CupError>;

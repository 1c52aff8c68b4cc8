//! # cup
//!
//! Cup (Custom Unpacker-Packer) is an archiver without compression.
//!
//! Cup packs multiple files or directories into a single flat `.cup`
//! archive: an 11-byte signature, a block of little-endian file headers,
//! and the raw file contents back to back. The same crate lists and
//! unpacks such archives, optionally renaming members on the way out.
//!
//! The header block stores no record count; the first header's content
//! offset doubles as the end of the block, and readers scan headers until
//! they reach it. See [`archive`] for the format details.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//!
//! fn main() -> cup::CupResult<()> {
//!     cup::pack(&[PathBuf::from("assets")], Path::new("assets.cup"))?;
//!
//!     for entry in cup::entries(Path::new("assets.cup"))? {
//!         println!("{} {}", entry.size, entry.path);
//!     }
//!
//!     cup::unpack(&[], Path::new("assets.cup"), Path::new("restored"))?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

pub mod archive;

pub use archive::{entries, list, pack, unpack, CupError, CupResult, FileInfo, Selector, SIGNATURE};

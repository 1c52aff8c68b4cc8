#![forbid(unsafe_code)]

use std::io::{ErrorKind, Read, Write};

use crate::archive::error::{CupError, CupResult};
use crate::archive::format::CHUNK_SIZE;

fn eof_as_truncation(e: std::io::Error) -> CupError {
    if e.kind() == ErrorKind::UnexpectedEof {
        CupError::TruncatedArchive
    } else {
        CupError::Io(e)
    }
}

pub(crate) fn read_exact<const N: usize>(r: &mut dyn Read) -> CupResult<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(eof_as_truncation)?;
    Ok(buf)
}

pub(crate) fn read_u16(r: &mut dyn Read) -> CupResult<u16> {
    Ok(u16::from_le_bytes(read_exact::<2>(r)?))
}

pub(crate) fn read_u32(r: &mut dyn Read) -> CupResult<u32> {
    Ok(u32::from_le_bytes(read_exact::<4>(r)?))
}

pub(crate) fn read_u64(r: &mut dyn Read) -> CupResult<u64> {
    Ok(u64::from_le_bytes(read_exact::<8>(r)?))
}

pub(crate) fn read_bytes(r: &mut dyn Read, len: usize) -> CupResult<Vec<u8>> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).map_err(eof_as_truncation)?;
    Ok(buf)
}

/// Stream `r` to exhaustion into `w` through a bounded buffer.
pub(crate) fn copy_chunked(r: &mut dyn Read, w: &mut dyn Write) -> CupResult<u64> {
    let mut buf = [0u8; CHUNK_SIZE];
    let mut written = 0u64;
    loop {
        let n = r.read(&mut buf)?;
        if n == 0 {
            return Ok(written);
        }
        w.write_all(&buf[..n])?;
        written += n as u64;
    }
}

/// Copy exactly `len` bytes from `r` into `w` through a bounded buffer.
pub(crate) fn copy_exact(r: &mut dyn Read, w: &mut dyn Write, len: u64) -> CupResult<()> {
    let mut buf = [0u8; CHUNK_SIZE];
    let mut remaining = len;
    while remaining > 0 {
        let want = remaining.min(CHUNK_SIZE as u64) as usize;
        r.read_exact(&mut buf[..want]).map_err(eof_as_truncation)?;
        w.write_all(&buf[..want])?;
        remaining -= want as u64;
    }
    Ok(())
}

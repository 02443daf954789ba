//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::{
    boxed::Box,
    io::{self, Read, Seek, SeekFrom},
    vec,
};

use thiserror::Error;

use crate::sans::{
    check::Checksum,
    header::{SECTOR_SIZE, SectorHeaderError},
};

use super::{
    FromSector,
    slice::{self, Summary},
};

extern crate std;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader, including one ending before a full
    /// sector could be read.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Incorrect sector header.
    #[error("Incorrect sector header: {0}")]
    Header(#[from] SectorHeaderError),
}

impl From<slice::Error> for Error {
    fn from(err: slice::Error) -> Self {
        match err {
            slice::Error::EndOfSlice => Self::Io(io::ErrorKind::UnexpectedEof.into()),
            slice::Error::Header(err) => Self::Header(err),
        }
    }
}

/// Read the sector at `index` from a reader of a log.
///
/// Fails unless a full sector can be read.
pub fn read_sector(r: &mut (impl Read + Seek), index: u32) -> io::Result<Box<[u8]>> {
    r.seek(SeekFrom::Start(u64::from(index) * SECTOR_SIZE as u64))?;

    let mut buf = vec![0; SECTOR_SIZE].into_boxed_slice();
    r.read_exact(&mut buf)?;

    Ok(buf)
}

/// Count the whole sectors in a reader of a log.
pub fn sector_count(r: &mut impl Seek) -> io::Result<u32> {
    let len = r.seek(SeekFrom::End(0))?;

    u32::try_from(len / SECTOR_SIZE as u64).map_err(io::Error::other)
}

/// Decode the sector at `index` from a reader of a log, publishing to a
/// receiver.
///
/// This method is also re-exported as `mtklog::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode<C: Checksum + ?Sized>(
    r: &mut (impl Read + Seek),
    index: u32,
    o: &mut impl FromSector,
    check: &C,
) -> Result<Summary, Error> {
    let sector = read_sector(r, index)?;

    Ok(slice::decode(&sector, index, o, check)?)
}

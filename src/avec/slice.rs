//! Slice-based decoder implementation.

use either::Either::{Left, Right};
use thiserror::Error;
use tracing::{debug, trace};

use crate::sans::{
    Decoder,
    check::Checksum,
    header::{HEADER_SIZE, SECTOR_SIZE, SectorHeaderError},
    setting::Config,
    stream::{End, Records},
};

use super::FromSector;

/// Errors occurring while decoding from a slice.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The slice is shorter than a sector.
    #[error("Unexpectedly reached the end of the slice.")]
    EndOfSlice,
    /// Incorrect sector header.
    #[error("Incorrect sector header: {0}")]
    Header(#[from] SectorHeaderError),
}

/// The outcome of decoding a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Data records passing the checksum, and published.
    pub accepted: u32,
    /// Data records failing the checksum, and skipped.
    pub rejected: u32,
    /// Why the record stream ended.
    pub end: End,
}

/// Decode the sector at the start of a slice, publishing to a receiver.
///
/// Data records failing `check` are skipped. Bytes past the first
/// [`SECTOR_SIZE`] are ignored.
///
/// This method is also re-exported as `mtklog::avec::decode_slice`.
pub fn decode<C: Checksum + ?Sized>(
    r: &[u8],
    index: u32,
    o: &mut impl FromSector,
    check: &C,
) -> Result<Summary, Error> {
    let sector = r.get(..SECTOR_SIZE).ok_or(Error::EndOfSlice)?;

    let header = Decoder::decode(take(sector))?;
    o.add_header(index, &header);

    let mut summary = Summary {
        accepted: 0,
        rejected: 0,
        end: End::SectorEnd,
    };

    let mut records = Records::new(sector, Config::from(&header));

    for (offset, record) in records.by_ref() {
        match record {
            Left(setting) => {
                trace!(index, offset, ?setting, "configuration change");
                o.add_setting(&setting);
            }
            Right(data) => {
                if !check.verify(data.bytes()) {
                    debug!(index, offset, "checksum rejected");
                    summary.rejected += 1;
                    continue;
                }

                summary.accepted += 1;

                // Shadow the sector receiver with that of a single record.
                if let Some(o) = o.add_point(summary.accepted) {
                    data.fields().for_each(|v| o.add_value(v));
                }
            }
        }
    }

    summary.end = records.end().unwrap_or(End::SectorEnd);

    debug!(
        index,
        accepted = summary.accepted,
        rejected = summary.rejected,
        end = ?summary.end,
        "sector decoded"
    );

    Ok(summary)
}

/// Take the header region from the start of a sector.
fn take(r: &[u8]) -> [u8; HEADER_SIZE] {
    let mut buf = [0; HEADER_SIZE];
    buf.copy_from_slice(&r[..HEADER_SIZE]);
    buf
}

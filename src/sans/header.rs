//! Sector header decoding.

use tartan_bitfield::bitfield;
use thiserror::Error;
use zerocopy::FromBytes;

/// Size of a log sector, in bytes.
pub const SECTOR_SIZE: usize = 0x10000;

/// Size of the header region at the start of every sector, in bytes.
pub const HEADER_SIZE: usize = 0x200;

/// Value of a valid sector's end marker.
pub const END_MARKER: u32 = 0xBBBB_BBBB;

/// An error decoding a sector header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SectorHeaderError {
    /// The end marker did not match, so the sector holds no usable records.
    #[error("Incorrect sector end marker ({0:#010x}).")]
    EndMarker(u32),
}

/// The recording configuration stored at the start of a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorHeader {
    /// Number of records the logger claims to have written to this sector.
    pub record_count: u16,
    /// Format register selecting the fields of every data record.
    pub format: u32,
    /// Recording mode, see [`LogStatus`].
    pub mode: u16,
    /// Time trigger threshold, in tenths of a second.
    pub sec_interval: u32,
    /// Distance trigger threshold, in tenths of a metre.
    pub dis_interval: u32,
    /// Speed trigger threshold, in tenths of a kilometre per hour.
    pub spd_interval: u32,
    /// Per-satellite-system filter map.
    pub filter: [u8; 32],
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct RawHeader {
    record_count: [u8; 2],
    format: [u8; 4],
    mode: [u8; 2],
    sec_interval: [u8; 4],
    dis_interval: [u8; 4],
    spd_interval: [u8; 4],
    filter: [u8; 32],
    _reserved: [u8; HEADER_SIZE - 56],
    end_marker: [u8; 4],
}

impl SectorHeader {
    /// Decode the header region of a sector.
    ///
    /// Fails if the end marker in the last four bytes of the region is not
    /// [`END_MARKER`].
    pub fn decode(r: [u8; HEADER_SIZE]) -> Result<Self, SectorHeaderError> {
        let RawHeader {
            record_count,
            format,
            mode,
            sec_interval,
            dis_interval,
            spd_interval,
            filter,
            end_marker,
            ..
        } = zerocopy::transmute!(r);

        let end_marker = u32::from_le_bytes(end_marker);
        if end_marker != END_MARKER {
            Err(SectorHeaderError::EndMarker(end_marker))?;
        }

        Ok(Self {
            record_count: u16::from_le_bytes(record_count),
            format: u32::from_le_bytes(format),
            mode: u16::from_le_bytes(mode),
            sec_interval: u32::from_le_bytes(sec_interval),
            dis_interval: u32::from_le_bytes(dis_interval),
            spd_interval: u32::from_le_bytes(spd_interval),
            filter,
        })
    }

    /// The recording mode, viewed as logger status flags.
    pub fn status(&self) -> LogStatus {
        LogStatus::new(self.mode)
    }

    /// Whether the logger stops, rather than overwrites, once memory is full.
    pub fn stops_when_full(&self) -> bool {
        self.status().stop_when_full()
    }
}

bitfield! {
    /// Logger status flags held in a recording mode word.
    pub struct LogStatus(u16) {
        [1] pub auto_log,
        [2] pub stop_when_full,
        [8] pub enabled,
        [9] pub disabled,
        [10] pub needs_format,
        [11] pub full,
    }
}

impl LogStatus {
    pub fn new(raw: u16) -> Self {
        Self(raw)
    }
}

//! Data records and their field catalog.
//!
//! Every data record of a sector carries the fields selected by the active
//! format register, laid out in the fixed order of [`CATALOG`], followed by a
//! two-byte checksum trailer. The record's stride (its total width) is a fold
//! over the selected entries of the catalog.

use tartan_bitfield::bitfield;

/// Format register bits.
pub mod flag {
    pub const UTC: u32 = 1 << 0;
    pub const VAL: u32 = 1 << 1;
    pub const LAT: u32 = 1 << 2;
    pub const LON: u32 = 1 << 3;
    pub const HGT: u32 = 1 << 4;
    pub const SPD: u32 = 1 << 5;
    pub const TRK: u32 = 1 << 6;
    pub const DSTA: u32 = 1 << 7;
    pub const DAGE: u32 = 1 << 8;
    pub const PDOP: u32 = 1 << 9;
    pub const HDOP: u32 = 1 << 10;
    pub const VDOP: u32 = 1 << 11;
    pub const NSAT: u32 = 1 << 12;
    pub const SID: u32 = 1 << 13;
    pub const ELE: u32 = 1 << 14;
    pub const AZI: u32 = 1 << 15;
    pub const SNR: u32 = 1 << 16;
    pub const RCR: u32 = 1 << 17;
    pub const MS: u32 = 1 << 18;
    pub const DIST: u32 = 1 << 19;
}

/// Size of the checksum trailer ending every data record, in bytes.
pub const CHECKSUM_SIZE: usize = 2;

/// Size of a satellite entry header, and of an empty satellite list.
pub const SATELLITE_HEADER_SIZE: usize = 4;

/// Count byte value marking an empty satellite list.
const NO_SATELLITES: u8 = 0xFF;

/// Raw timestamp value left by erased flash.
const NO_TIME: u32 = u32::MAX;

/// A decoded field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Seconds since 1970-01-01 UTC.
    Utc(u32),
    /// Fix quality bitmask, see [`Validity`].
    Valid(u16),
    /// Degrees.
    Latitude(f64),
    /// Degrees.
    Longitude(f64),
    /// Metres.
    Height(f32),
    Speed(f32),
    Heading(f32),
    /// Differential station identifier.
    Station(u16),
    /// Age of differential corrections.
    Age(f32),
    /// Hundredths.
    Pdop(u16),
    /// Hundredths.
    Hdop(u16),
    /// Hundredths.
    Vdop(u16),
    SatelliteCount(SatelliteCount),
    /// Number of entries in the satellite list, each published next as a
    /// [`Value::Satellite`].
    Satellites(u8),
    Satellite(Satellite),
    /// Recording reason bitmask, see [`Reason`].
    Reason(u16),
    Millisecond(u16),
    /// Metres.
    Distance(f64),
}

/// Satellites in view and in use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SatelliteCount {
    pub in_view: u8,
    pub in_use: u8,
}

/// An entry of the satellite list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Satellite {
    pub id: u8,
    pub in_use: bool,
    /// Degrees.
    pub elevation: Option<i8>,
    /// Degrees.
    pub azimuth: Option<i16>,
    /// Signal to noise ratio.
    pub snr: Option<u16>,
}

bitfield! {
    /// Fix quality bitmask.
    pub struct Validity(u16) {
        [0] pub fix,
        [1] pub sps,
        [2] pub dgps,
        [6] pub estimated,
    }
}

bitfield! {
    /// Recording reason bitmask.
    pub struct Reason(u16) {
        [0] pub sec,
        [1] pub spd,
        [2] pub dis,
        [3] pub button,
    }
}

impl Validity {
    pub fn new(raw: u16) -> Self {
        Self(raw)
    }
}

impl Reason {
    pub fn new(raw: u16) -> Self {
        Self(raw)
    }
}

/// An entry of the field catalog.
pub struct Slot {
    /// Format register bit selecting this field.
    pub flag: u32,
    width: Width,
}

enum Width {
    Fixed(usize, fn(&[u8]) -> Value),
    Satellites,
}

/// Fields of a data record, in the order they are stored.
pub const CATALOG: [Slot; 17] = [
    Slot { flag: flag::UTC, width: Width::Fixed(4, |r| Value::Utc(u32::from_le_bytes(take(r)))) },
    Slot { flag: flag::VAL, width: Width::Fixed(2, |r| Value::Valid(u16::from_le_bytes(take(r)))) },
    Slot { flag: flag::LAT, width: Width::Fixed(8, |r| Value::Latitude(f64::from_le_bytes(take(r)))) },
    Slot { flag: flag::LON, width: Width::Fixed(8, |r| Value::Longitude(f64::from_le_bytes(take(r)))) },
    Slot { flag: flag::HGT, width: Width::Fixed(4, |r| Value::Height(f32::from_le_bytes(take(r)))) },
    Slot { flag: flag::SPD, width: Width::Fixed(4, |r| Value::Speed(f32::from_le_bytes(take(r)))) },
    Slot { flag: flag::TRK, width: Width::Fixed(4, |r| Value::Heading(f32::from_le_bytes(take(r)))) },
    Slot { flag: flag::DSTA, width: Width::Fixed(2, |r| Value::Station(u16::from_le_bytes(take(r)))) },
    Slot { flag: flag::DAGE, width: Width::Fixed(4, |r| Value::Age(f32::from_le_bytes(take(r)))) },
    Slot { flag: flag::PDOP, width: Width::Fixed(2, |r| Value::Pdop(u16::from_le_bytes(take(r)))) },
    Slot { flag: flag::HDOP, width: Width::Fixed(2, |r| Value::Hdop(u16::from_le_bytes(take(r)))) },
    Slot { flag: flag::VDOP, width: Width::Fixed(2, |r| Value::Vdop(u16::from_le_bytes(take(r)))) },
    Slot {
        flag: flag::NSAT,
        width: Width::Fixed(2, |r| {
            Value::SatelliteCount(SatelliteCount { in_view: r[0], in_use: r[1] })
        }),
    },
    Slot { flag: flag::SID, width: Width::Satellites },
    Slot { flag: flag::RCR, width: Width::Fixed(2, |r| Value::Reason(u16::from_le_bytes(take(r)))) },
    Slot { flag: flag::MS, width: Width::Fixed(2, |r| Value::Millisecond(u16::from_le_bytes(take(r)))) },
    Slot { flag: flag::DIST, width: Width::Fixed(8, |r| Value::Distance(f64::from_le_bytes(take(r)))) },
];

/// Compute the stride of a data record starting at the tip of `r`.
///
/// Returns `None` if the satellite list's count byte lies beyond the end of
/// `r`. The returned stride may still exceed the length of `r`.
pub fn stride(format: u32, r: &[u8]) -> Option<usize> {
    let fields = CATALOG
        .iter()
        .filter(|slot| format & slot.flag != 0)
        .try_fold(0, |i, slot| match slot.width {
            Width::Fixed(n, _) => Some(i + n),
            Width::Satellites => Some(i + satellite_list_width(format, satellite_count(r, i)?)),
        })?;

    Some(fields + CHECKSUM_SIZE)
}

/// Whether a raw timestamp can be interpreted.
pub fn is_valid_timestamp(raw: u32) -> bool {
    raw != NO_TIME
}

/// The number of satellite entries in a list starting at offset `i`.
fn satellite_count(r: &[u8], i: usize) -> Option<u8> {
    match *r.get(i + 2)? {
        NO_SATELLITES => Some(0),
        n => Some(n),
    }
}

fn satellite_width(format: u32) -> usize {
    [flag::ELE, flag::AZI, flag::SNR]
        .into_iter()
        .filter(|f| format & f != 0)
        .fold(SATELLITE_HEADER_SIZE, |acc, _| acc + 2)
}

fn satellite_list_width(format: u32, count: u8) -> usize {
    match count {
        0 => SATELLITE_HEADER_SIZE,
        n => n as usize * satellite_width(format),
    }
}

/// A data record accepted by the termination checks.
#[derive(Debug, Clone, Copy)]
pub struct DataRecord<'a> {
    pub(super) offset: usize,
    pub(super) format: u32,
    pub(super) r: &'a [u8],
}

impl<'a> DataRecord<'a> {
    /// Offset of the record from the start of its sector.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Format register the record was laid out with.
    pub fn format(&self) -> u32 {
        self.format
    }

    /// The record's bytes, including its checksum trailer.
    pub fn bytes(&self) -> &'a [u8] {
        self.r
    }

    /// The record's checksum trailer.
    pub fn checksum(&self) -> [u8; CHECKSUM_SIZE] {
        take(&self.r[self.r.len() - CHECKSUM_SIZE..])
    }

    /// Decode the record's fields, in catalog order.
    pub fn fields(&self) -> Fields<'a> {
        Fields {
            r: self.r,
            format: self.format,
            slot: 0,
            i: 0,
            satellites: 0,
        }
    }
}

/// Iterator over the field values of a data record.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    r: &'a [u8],
    format: u32,
    slot: usize,
    i: usize,
    satellites: u8,
}

impl Iterator for Fields<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.satellites != 0 {
            self.satellites -= 1;
            return Some(Value::Satellite(self.satellite()));
        }

        while let Some(slot) = CATALOG.get(self.slot) {
            self.slot += 1;

            if self.format & slot.flag == 0 {
                continue;
            }

            let value = match slot.width {
                Width::Fixed(n, decode) => {
                    let value = decode(&self.r[self.i..]);
                    self.i += n;
                    value
                }
                Width::Satellites => {
                    // Bounds were established when the stride was computed.
                    let n = satellite_count(self.r, self.i).unwrap_or(0);
                    if n == 0 {
                        self.i += SATELLITE_HEADER_SIZE;
                    }
                    self.satellites = n;
                    Value::Satellites(n)
                }
            };

            return Some(value);
        }

        None
    }
}

impl Fields<'_> {
    fn satellite(&mut self) -> Satellite {
        bitfield! {
            struct SatelliteFlags(u8) {
                [0] in_use,
            }
        }

        let r = &self.r[self.i..];
        let mut satellite = Satellite {
            id: r[0],
            in_use: SatelliteFlags(r[1]).in_use(),
            ..Default::default()
        };
        self.i += SATELLITE_HEADER_SIZE;

        // Elevation is a single signed byte stored in a two-byte slot.
        if self.format & flag::ELE != 0 {
            satellite.elevation = Some(self.r[self.i] as i8);
            self.i += 2;
        }
        if self.format & flag::AZI != 0 {
            satellite.azimuth = Some(i16::from_le_bytes(take(&self.r[self.i..])));
            self.i += 2;
        }
        if self.format & flag::SNR != 0 {
            satellite.snr = Some(u16::from_le_bytes(take(&self.r[self.i..])));
            self.i += 2;
        }

        satellite
    }
}

/// Take an exact number of bytes from the start of a slice.
fn take<const N: usize>(r: &[u8]) -> [u8; N] {
    let mut buf = [0; N];
    buf.copy_from_slice(&r[..N]);
    buf
}

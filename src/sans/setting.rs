//! Configuration-change records and the decoding configuration they mutate.
//!
//! A configuration change occupies 16 bytes:
//!
//! ```text
//! AA AA AA AA  AA AA AA ID
//! DD DD DD DD  BB BB BB BB
//! ```
//!
//! where `ID` selects the setting and `DD` holds its new value, truncated to
//! the setting's width.

use zerocopy::FromBytes;

use super::header::SectorHeader;

/// Size of a configuration-change record, in bytes.
pub const SETTING_SIZE: usize = 16;

const PREAMBLE: u8 = 0xAA;
const TRAILER: u8 = 0xBB;

#[repr(C, packed)]
#[derive(FromBytes)]
struct RawSetting {
    preamble: [u8; 7],
    id: u8,
    payload: [u8; 4],
    trailer: [u8; 4],
}

/// One of the logging trigger thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Elapsed time.
    Sec,
    /// Distance travelled.
    Dis,
    /// Speed.
    Spd,
}

/// What the logger does once its memory is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMethod {
    /// Overwrite the oldest sectors.
    Overlap,
    /// Stop logging.
    Stop,
}

impl RecordMethod {
    /// Interpret a raw recording method value. Returns `None` for values the
    /// logger does not define.
    pub fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            1 => Some(Self::Overlap),
            2 => Some(Self::Stop),
            _ => None,
        }
    }
}

/// A decoded configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// A new format register.
    Format(u32),
    /// A new trigger threshold, in tenths of the trigger's unit.
    Interval(Trigger, u32),
    /// A new recording method, see [`RecordMethod`].
    Method(u16),
    /// A new recording mode.
    Mode(u16),
    /// A setting with an unrecognised identifier, which changes nothing.
    Unknown { id: u8, payload: [u8; 4] },
}

impl Setting {
    /// Classify the bytes at the tip of the cursor.
    ///
    /// Returns the configuration change they hold, or `None` if they begin a
    /// data record instead. Fewer than 16 available bytes never match.
    pub fn classify(r: &[u8]) -> Option<Self> {
        let r: [u8; SETTING_SIZE] = r.get(..SETTING_SIZE)?.try_into().ok()?;

        let RawSetting {
            preamble,
            id,
            payload,
            trailer,
        } = zerocopy::transmute!(r);

        // Both zones are checked in full before deciding.
        let is_setting = preamble.iter().all(|b| *b == PREAMBLE);
        let is_setting = trailer.iter().all(|b| *b == TRAILER) && is_setting;

        is_setting.then(|| Self::from_parts(id, payload))
    }

    fn from_parts(id: u8, payload: [u8; 4]) -> Self {
        let long = u32::from_le_bytes(payload);
        let short = u16::from_le_bytes([payload[0], payload[1]]);

        match id {
            2 => Self::Format(long),
            3 => Self::Interval(Trigger::Sec, long),
            4 => Self::Interval(Trigger::Dis, long),
            5 => Self::Interval(Trigger::Spd, long),
            6 => Self::Method(short),
            7 => Self::Mode(short),
            _ => Self::Unknown { id, payload },
        }
    }
}

/// The active decoding configuration of a sector.
///
/// Seeded from each sector's own header, and never carried between sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Format register selecting the fields of following data records.
    pub format: u32,
    /// Time trigger threshold, in tenths of a second.
    pub sec_interval: u32,
    /// Distance trigger threshold, in tenths of a metre.
    pub dis_interval: u32,
    /// Speed trigger threshold, in tenths of a kilometre per hour.
    pub spd_interval: u32,
    /// Raw recording method, zero until a method change is found. See
    /// [`RecordMethod`].
    pub method: u16,
    /// Recording mode, see [`LogStatus`](super::header::LogStatus).
    pub mode: u16,
}

impl From<&SectorHeader> for Config {
    fn from(header: &SectorHeader) -> Self {
        Self {
            format: header.format,
            sec_interval: header.sec_interval,
            dis_interval: header.dis_interval,
            spd_interval: header.spd_interval,
            method: 0,
            mode: header.mode,
        }
    }
}

impl Config {
    /// The active recording method, if one has been set.
    pub fn recording_method(&self) -> Option<RecordMethod> {
        RecordMethod::from_raw(self.method)
    }

    /// Apply a configuration change. Unknown settings are ignored.
    pub fn apply(&mut self, setting: &Setting) {
        match *setting {
            Setting::Format(v) => self.format = v,
            Setting::Interval(Trigger::Sec, v) => self.sec_interval = v,
            Setting::Interval(Trigger::Dis, v) => self.dis_interval = v,
            Setting::Interval(Trigger::Spd, v) => self.spd_interval = v,
            Setting::Method(v) => self.method = v,
            Setting::Mode(v) => self.mode = v,
            Setting::Unknown { .. } => {}
        }
    }
}

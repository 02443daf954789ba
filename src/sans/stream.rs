//! The record stream following a sector header.

use either::Either::{self, Left, Right};

use super::{
    data::{self, DataRecord, flag},
    header::HEADER_SIZE,
    setting::{Config, SETTING_SIZE, Setting},
};

/// A record found in the stream: either a configuration change (already
/// applied to the stream's configuration), or a data record laid out with the
/// configuration active when found.
pub type Record<'a> = Either<Setting, DataRecord<'a>>;

/// Why a record stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    /// The cursor reached the end of the sector.
    SectorEnd,
    /// The next record would extend past the end of the sector.
    Truncated,
    /// The next record's bytes were never written.
    Padding,
    /// The next record's timestamp could not be interpreted.
    UnparseableTimestamp,
}

/// Iterator over the records of a sector, with their offsets from the start
/// of the sector.
///
/// Once exhausted, [`Records::end`] reports why.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    r: &'a [u8],
    i: usize,
    config: Config,
    end: Option<End>,
}

impl<'a> Records<'a> {
    /// Begin iterating over the records of a sector, starting after its
    /// header.
    pub fn new(sector: &'a [u8], config: Config) -> Self {
        Self {
            r: sector,
            i: HEADER_SIZE,
            config,
            end: None,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Why the stream ended, if it has.
    pub fn end(&self) -> Option<End> {
        self.end
    }

    fn stop(&mut self, end: End) -> Option<(usize, Record<'a>)> {
        self.end = Some(end);
        None
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = (usize, Record<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.end.is_some() {
            return None;
        }

        let offset = self.i;
        let Some(r) = self.r.get(offset..).filter(|r| !r.is_empty()) else {
            return self.stop(End::SectorEnd);
        };

        if let Some(setting) = Setting::classify(r) {
            self.config.apply(&setting);
            self.i += SETTING_SIZE;
            return Some((offset, Left(setting)));
        }

        let format = self.config.format;
        let stride = data::stride(format, r).filter(|s| *s <= r.len());
        let erased = |s: usize| r[..s].iter().all(|b| *b == 0xFF);

        // The timestamp leads the record, so it is judged before the rest of
        // the record is measured. A wholly erased record is still padding.
        if format & flag::UTC != 0 {
            if let Some(raw) = r.first_chunk::<4>() {
                if !data::is_valid_timestamp(u32::from_le_bytes(*raw)) {
                    return match stride {
                        Some(s) if erased(s) => self.stop(End::Padding),
                        _ => self.stop(End::UnparseableTimestamp),
                    };
                }
            }
        }

        let Some(stride) = stride else {
            return self.stop(End::Truncated);
        };

        if erased(stride) {
            return self.stop(End::Padding);
        }

        let r = &r[..stride];
        self.i += stride;

        Some((offset, Right(DataRecord { offset, format, r })))
    }
}

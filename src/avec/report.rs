//! Textual report of a log's contents.
//!
//! _Requires Cargo feature `std`._
//!
//! Each valid sector renders as a delimited header block, followed by a
//! one-line annotation for each configuration change, and a numbered block
//! for each accepted data record with one labelled line per field.

use core::fmt::{self, Write};
use std::string::String;

use chrono::DateTime;

use crate::sans::{
    data::{Reason, Satellite, Validity, Value},
    header::SectorHeader,
    setting::{Setting, Trigger},
};

use super::{FromPoint, FromSector};

extern crate std;

const BANNER: &str = "##################################################";
const RULE: &str = "--------------------------------";

/// A receiver rendering a sector into text.
#[derive(Debug, Default, Clone)]
pub struct SectorReport {
    out: String,
}

impl SectorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn write(&mut self, render: impl FnOnce(&mut String) -> fmt::Result) {
        // Writing to a `String` cannot fail.
        let _ = render(&mut self.out);
    }
}

impl FromSector for SectorReport {
    fn add_header(&mut self, index: u32, header: &SectorHeader) {
        self.write(|w| render_header(w, index, header));
    }

    fn add_setting(&mut self, setting: &Setting) {
        self.write(|w| render_setting(w, setting));
    }

    fn add_point(&mut self, number: u32) -> Option<&mut dyn FromPoint> {
        self.write(|w| writeln!(w, "({number})==================================================="));
        Some(self)
    }
}

impl FromPoint for SectorReport {
    fn add_value(&mut self, value: Value) {
        self.write(|w| render_value(w, &value));
    }
}

/// Render the header block of a sector.
pub fn render_header(w: &mut impl Write, index: u32, header: &SectorHeader) -> fmt::Result {
    let method = if header.stops_when_full() { "STOP" } else { "OVP" };

    writeln!(w, "{BANNER}")?;
    writeln!(w, "# SECTOR # : {index:<8}                                #")?;
    writeln!(w, "# SECTOR COUNT : {:<8x}                            #", header.record_count)?;
    writeln!(w, "# FORMAT REGISTER: {:<8x}                         #", header.format)?;
    writeln!(w, "# RCD METHOD : {method:<8}                              #")?;
    writeln!(w, "# RCD MODE : {:<8x}                                #", header.mode)?;
    writeln!(w, "# SEC MODE : {:<8}                                #", header.sec_interval)?;
    writeln!(w, "# DIS MODE : {:<8}                                #", header.dis_interval)?;
    writeln!(w, "# SPD MODE : {:<8}                                #", header.spd_interval)?;
    write!(w, "# FSEC MODE : ")?;
    for b in header.filter {
        write!(w, "{b:<2x} ")?;
    }
    writeln!(w, "#")?;
    writeln!(w, "{BANNER}")
}

/// Render the annotation of a configuration change. Unknown settings render
/// nothing.
pub fn render_setting(w: &mut impl Write, setting: &Setting) -> fmt::Result {
    match *setting {
        Setting::Format(v) => writeln!(w, "<CHANGE FORMAT : {v:08x}h >"),
        Setting::Interval(trigger, v) => {
            let name = match trigger {
                Trigger::Sec => "SEC",
                Trigger::Dis => "DIS",
                Trigger::Spd => "SPD",
            };
            writeln!(w, "<CHANGE {name} : {:08.6} >", f64::from(v) / 10.0)
        }
        Setting::Method(v) => writeln!(w, "<CHANGE METHOD : {v:04x}h >"),
        Setting::Mode(v) => writeln!(w, "<CHANGE MOD : {v:04x}h >"),
        Setting::Unknown { .. } => Ok(()),
    }
}

/// Render the line (or lines) of a field value.
pub fn render_value(w: &mut impl Write, value: &Value) -> fmt::Result {
    match *value {
        Value::Utc(v) => {
            // Every `u32` second count lies within chrono's range.
            let t = DateTime::from_timestamp(i64::from(v), 0).unwrap_or_default();
            writeln!(w, "{:>10}: {}", "UTC", t.format("%a %b %e %H:%M:%S %Y"))
        }
        Value::Valid(v) => {
            let valid = Validity::new(v);
            write!(w, "{:>10}: ", "VAL")?;
            if valid.fix() {
                write!(w, "[FIX]")?;
            }
            if valid.sps() {
                write!(w, " [SPS]")?;
            }
            if valid.dgps() {
                write!(w, " [DGPS]")?;
            }
            if valid.estimated() {
                write!(w, " [EST]")?;
            }
            if v == 0 {
                write!(w, "[NO FIX]")?;
            }
            writeln!(w)
        }
        Value::Latitude(v) => writeln!(w, "{:>10}: {v:<9.6}", "LAT"),
        Value::Longitude(v) => writeln!(w, "{:>10}: {v:<9.6}", "LON"),
        Value::Height(v) => writeln!(w, "{:>10}: {v:<9.2}", "HGT"),
        Value::Speed(v) => writeln!(w, "{:>10}: {v:<9.2}", "SPD"),
        Value::Heading(v) => writeln!(w, "{:>10}: {v:<9.2}", "TRK"),
        Value::Station(v) => writeln!(w, "{:>10}: {v:x}", "DSTA"),
        Value::Age(v) => writeln!(w, "{:>10}: {v:<9.2}", "DAGE"),
        Value::Pdop(v) => writeln!(w, "{:>10}: {:<9.2}", "PDOP", f64::from(v) / 100.0),
        Value::Hdop(v) => writeln!(w, "{:>10}: {:<9.2}", "HDOP", f64::from(v) / 100.0),
        Value::Vdop(v) => writeln!(w, "{:>10}: {:<9.2}", "VDOP", f64::from(v) / 100.0),
        Value::SatelliteCount(v) => {
            writeln!(w, "{:>10}: {}", "IN_VIEW", v.in_view)?;
            writeln!(w, "{:>10}: {}", "IN_USE", v.in_use)
        }
        Value::Satellites(0) => writeln!(w, "{:>10}: NO SAT IN VIEW", "SID"),
        Value::Satellites(_) => Ok(()),
        Value::Satellite(v) => render_satellite(w, &v),
        Value::Reason(v) => {
            let reason = Reason::new(v);
            write!(w, "{:>10}: {v:x}", "RCR")?;
            if reason.sec() {
                write!(w, " [SEC]")?;
            }
            if reason.spd() {
                write!(w, " [SPD]")?;
            }
            if reason.dis() {
                write!(w, " [DIS]")?;
            }
            if reason.button() {
                write!(w, " [BTN]")?;
            }
            writeln!(w)
        }
        Value::Millisecond(v) => writeln!(w, "{:>10}: {v}", "MS"),
        Value::Distance(v) => writeln!(w, "{:>10}: {v:<9.2}", "DIST"),
    }
}

fn render_satellite(w: &mut impl Write, satellite: &Satellite) -> fmt::Result {
    writeln!(w, "{RULE}")?;
    write!(w, " {:>10}# {:02}", "SID", satellite.id)?;
    if satellite.in_use {
        write!(w, " [IN_USE]")?;
    }
    writeln!(w)?;

    if let Some(v) = satellite.elevation {
        writeln!(w, " {:>10}: {v:02}", "ELE")?;
    }
    if let Some(v) = satellite.azimuth {
        writeln!(w, " {:>10}: {v:02}", "AZI")?;
    }
    if let Some(v) = satellite.snr {
        writeln!(w, " {:>10}: {v:02}", "SNR")?;
    }

    Ok(())
}

#![cfg(feature = "std")]

mod builder;

use std::io::Cursor;

use builder::{SectorBuilder, satellite};
use mtklog::{
    avec::{decode_reader, decode_slice, report::SectorReport, slice::Summary},
    sans::{
        check::{AcceptAll, Checksum, StarXor},
        data::flag,
        header::{HEADER_SIZE, SECTOR_SIZE},
        stream::End,
    },
};

fn render(sector: &[u8], index: u32, check: &impl Checksum) -> (String, Summary) {
    let mut o = SectorReport::new();
    let summary = decode_slice(sector, index, &mut o, check).unwrap();
    (o.into_string(), summary)
}

/// The rendered report without its header block.
fn body(report: &str) -> Vec<&str> {
    report.lines().skip(11).collect()
}

#[test]
fn header_block() {
    let mut filter = [0; 32];
    filter[0] = 0x1f;
    filter[1] = 2;

    let sector = SectorBuilder::new(0x3f)
        .record_count(0x1a)
        .mode(0x04)
        .intervals(50, 0, 0)
        .filter(filter)
        .build();

    let (report, _) = render(&sector, 7, &AcceptAll);
    let lines: Vec<_> = report.lines().collect();

    assert_eq!(lines[0], "#".repeat(50));
    assert_eq!(lines[1], "# SECTOR # : 7                                       #");
    assert_eq!(lines[2], "# SECTOR COUNT : 1a                                  #");
    assert_eq!(lines[3], "# FORMAT REGISTER: 3f                               #");
    assert_eq!(lines[4], "# RCD METHOD : STOP                                  #");
    assert_eq!(lines[5], "# RCD MODE : 4                                       #");
    assert_eq!(lines[6], "# SEC MODE : 50                                      #");
    assert_eq!(lines[7], "# DIS MODE : 0                                       #");
    assert_eq!(lines[8], "# SPD MODE : 0                                       #");
    assert_eq!(
        lines[9],
        format!("# FSEC MODE : 1f 2  {}#", "0  ".repeat(30))
    );
    assert_eq!(lines[10], "#".repeat(50));
    assert_eq!(lines.len(), 11);
}

#[test]
fn scenario_position_record() {
    let sector = SectorBuilder::new(flag::LAT | flag::LON)
        .record(&[&25.033f64.to_le_bytes()[..], &121.565f64.to_le_bytes()].concat())
        .build();

    let (report, summary) = render(&sector, 0, &AcceptAll);
    assert_eq!(summary.accepted, 1);
    assert_eq!(
        body(&report),
        [
            "(1)===================================================",
            "       LAT: 25.033000",
            "       LON: 121.565000",
        ]
    );
}

#[test]
fn scenario_padding() {
    let sector = SectorBuilder::new(flag::LAT | flag::LON).build();

    let (report, summary) = render(&sector, 0, &AcceptAll);
    assert_eq!(summary.accepted, 0);
    assert_eq!(summary.end, End::Padding);
    assert!(body(&report).is_empty());
}

#[test]
fn scenario_interval_setting() {
    let sector = SectorBuilder::new(flag::LAT | flag::LON)
        .setting(3, 50)
        .record(&[&1.5f64.to_le_bytes()[..], &(-2.25f64).to_le_bytes()].concat())
        .build();

    let (report, summary) = render(&sector, 0, &AcceptAll);
    assert_eq!(summary.accepted, 1);
    assert_eq!(
        body(&report),
        [
            "<CHANGE SEC : 5.000000 >",
            "(1)===================================================",
            "       LAT: 1.500000 ",
            "       LON: -2.250000",
        ]
    );
}

#[test]
fn scenario_empty_satellite_list() {
    let sector = SectorBuilder::new(flag::NSAT | flag::SID | flag::ELE | flag::MS)
        .record(&[0, 0, 0, 0, 0xFF, 0, 0x2c, 0x01])
        .build();

    let (report, _) = render(&sector, 0, &AcceptAll);
    assert_eq!(
        body(&report),
        [
            "(1)===================================================",
            "   IN_VIEW: 0",
            "    IN_USE: 0",
            "       SID: NO SAT IN VIEW",
            "        MS: 300",
        ]
    );
}

#[test]
fn satellites_and_flags() {
    let format = flag::VAL | flag::SID | flag::ELE | flag::AZI | flag::SNR | flag::RCR;
    let body_bytes = [
        &0x45u16.to_le_bytes()[..],
        &satellite(5, true, 2, 12, 7, 41),
        &satellite(29, false, 2, 80, -1, 9),
        &0x0au16.to_le_bytes(),
    ]
    .concat();
    let sector = SectorBuilder::new(format).record(&body_bytes).build();

    let (report, _) = render(&sector, 0, &AcceptAll);
    assert_eq!(
        body(&report),
        [
            "(1)===================================================",
            "       VAL: [FIX] [DGPS] [EST]",
            "--------------------------------",
            "        SID# 05 [IN_USE]",
            "        ELE: 12",
            "        AZI: 07",
            "        SNR: 41",
            "--------------------------------",
            "        SID# 29",
            "        ELE: 80",
            "        AZI: -1",
            "        SNR: 09",
            "       RCR: a [SPD] [BTN]",
        ]
    );
}

#[test]
fn settings_render() {
    let sector = SectorBuilder::new(flag::UTC)
        .setting(2, 0x0008_0fcd)
        .setting(4, 125)
        .setting(5, 7)
        .setting(6, 1)
        .setting(7, 0x0102)
        .setting(0x42, 0x1234_5678)
        .build();

    let (report, summary) = render(&sector, 0, &AcceptAll);
    assert_eq!(summary.accepted, 0);
    assert_eq!(
        body(&report),
        [
            "<CHANGE FORMAT : 00080fcdh >",
            "<CHANGE DIS : 12.500000 >",
            "<CHANGE SPD : 0.700000 >",
            "<CHANGE METHOD : 0001h >",
            "<CHANGE MOD : 0102h >",
        ]
    );
}

#[test]
fn invalid_header_renders_nothing() {
    let sector = SectorBuilder::new(flag::UTC)
        .end_marker(0)
        .record(&1_000u32.to_le_bytes())
        .build();

    let mut o = SectorReport::new();
    assert!(decode_slice(&sector, 0, &mut o, &AcceptAll).is_err());
    assert!(o.as_str().is_empty());
}

#[test]
fn unparseable_timestamp_keeps_earlier_points() {
    let utc = |t: u32| [&t.to_le_bytes()[..], &[0x01, 0x00]].concat();
    let sector = SectorBuilder::new(flag::UTC | flag::VAL)
        .record(&utc(0))
        .record(&utc(u32::MAX))
        .record(&utc(60))
        .build();

    let (report, summary) = render(&sector, 0, &AcceptAll);
    assert_eq!(summary.end, End::UnparseableTimestamp);
    assert_eq!(
        body(&report),
        [
            "(1)===================================================",
            "       UTC: Thu Jan  1 00:00:00 1970",
            "       VAL: [FIX]",
        ]
    );
}

#[test]
fn latest_timestamp() {
    let sector = SectorBuilder::new(flag::UTC)
        .record(&(u32::MAX - 1).to_le_bytes())
        .build();

    let (report, summary) = render(&sector, 0, &AcceptAll);
    assert_eq!(summary.accepted, 1);
    assert_eq!(
        body(&report),
        [
            "(1)===================================================",
            "       UTC: Sun Feb  7 06:28:14 2106",
        ]
    );
}

#[test]
fn checksum_rejection() {
    let sector = SectorBuilder::new(flag::UTC | flag::MS)
        .record(&[&1_000u32.to_le_bytes()[..], &1u16.to_le_bytes()].concat())
        .raw(&[&2_000u32.to_le_bytes()[..], &2u16.to_le_bytes(), b"*", &[0]].concat())
        .record(&[&3_000u32.to_le_bytes()[..], &3u16.to_le_bytes()].concat())
        .build();

    let (report, summary) = render(&sector, 0, &StarXor);
    assert_eq!(
        summary,
        Summary {
            accepted: 2,
            rejected: 1,
            end: End::Padding,
        }
    );

    let lines = body(&report);
    assert_eq!(lines[0], "(1)===================================================");
    assert_eq!(lines[2], "        MS: 1");
    assert_eq!(lines[3], "(2)===================================================");
    assert_eq!(lines[5], "        MS: 3");
    assert_eq!(lines.len(), 6);

    let (_, summary) = render(&sector, 0, &AcceptAll);
    assert_eq!(summary.accepted, 3);
    assert_eq!(summary.rejected, 0);
}

#[test]
fn decoding_is_idempotent() {
    let data = std::fs::read("fixtures/three-sectors.bin").unwrap();
    let sector = &data[..SECTOR_SIZE];

    let (first, _) = render(sector, 0, &AcceptAll);
    let (second, _) = render(sector, 0, &AcceptAll);
    assert_eq!(first, second);
}

#[test]
fn sectors_are_independent() {
    let mut data = std::fs::read("fixtures/three-sectors.bin").unwrap();

    let decode = |data: &[u8], index| {
        let mut o = SectorReport::new();
        let _ = decode_reader(&mut Cursor::new(data), index, &mut o, &AcceptAll);
        o.into_string()
    };

    let before = [decode(&data[..], 0), decode(&data[..], 2)];

    // Rewrite the middle sector's header, marker included.
    data[SECTOR_SIZE..SECTOR_SIZE + HEADER_SIZE].fill(0x5A);
    data[SECTOR_SIZE + HEADER_SIZE - 4..SECTOR_SIZE + HEADER_SIZE]
        .copy_from_slice(&0xBBBB_BBBBu32.to_le_bytes());

    assert!(!decode(&data[..], 1).is_empty());
    assert_eq!([decode(&data[..], 0), decode(&data[..], 2)], before);
}

#![cfg(feature = "std")]

use std::{fs::File, io::Cursor, path::Path};

use csv::ReaderBuilder;
use mtklog::{
    avec::{FromPoint, FromSector, reader, report::SectorReport, slice},
    sans::{
        check::{AcceptAll, StarXor},
        data::Value,
        header::{SECTOR_SIZE, SectorHeader},
        stream::End,
    },
};

const PATH: &str = "fixtures/three-sectors.bin";

#[test]
fn decode_slice_report() {
    let data = std::fs::read(PATH).unwrap();
    let mut report = String::new();

    for (index, sector) in data.chunks(SECTOR_SIZE).enumerate() {
        let mut o = SectorReport::new();
        let _ = mtklog::avec::decode_slice(sector, index as u32, &mut o, &AcceptAll);
        report.push_str(o.as_str());
    }

    let expected = std::fs::read_to_string(Path::new(PATH).with_extension("txt")).unwrap();
    assert_eq!(report, expected);
}

#[test]
fn decode_slice_summaries() {
    let data = std::fs::read(PATH).unwrap();
    let sectors: Vec<_> = data.chunks(SECTOR_SIZE).collect();
    let mut o = SectorReport::new();

    let summary = mtklog::avec::decode_slice(sectors[0], 0, &mut o, &AcceptAll).unwrap();
    assert_eq!(
        summary,
        slice::Summary {
            accepted: 3,
            rejected: 0,
            end: End::Padding
        }
    );

    let err = mtklog::avec::decode_slice(sectors[1], 1, &mut o, &AcceptAll).unwrap_err();
    assert!(matches!(err, slice::Error::Header(_)));

    let summary = mtklog::avec::decode_slice(sectors[2], 2, &mut o, &AcceptAll).unwrap();
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.end, End::UnparseableTimestamp);
}

#[test]
fn decode_slice_short() {
    let data = std::fs::read(PATH).unwrap();
    let mut o = SectorReport::new();

    assert_eq!(
        mtklog::avec::decode_slice(&data[..SECTOR_SIZE - 1], 0, &mut o, &AcceptAll),
        Err(slice::Error::EndOfSlice)
    );
    assert!(o.as_str().is_empty());
}

#[test]
fn decode_slice_values() {
    let data = std::fs::read(PATH).unwrap();
    let mut validator = Validator::new(PATH);

    for (index, sector) in data.chunks(SECTOR_SIZE).enumerate() {
        let _ = mtklog::avec::decode_slice(sector, index as u32, &mut validator, &StarXor);
    }

    validator.finish();
}

#[test]
fn decode_reader_values() {
    let mut file = File::open(PATH).unwrap();
    let count = reader::sector_count(&mut file).unwrap();
    assert_eq!(count, 3);

    let mut validator = Validator::new(PATH);
    for index in 0..count {
        let _ = mtklog::avec::decode_reader(&mut file, index, &mut validator, &StarXor);
    }

    validator.finish();
}

#[test]
fn decode_reader_past_end() {
    let mut file = File::open(PATH).unwrap();
    let mut o = SectorReport::new();

    let err = mtklog::avec::decode_reader(&mut file, 3, &mut o, &AcceptAll).unwrap_err();
    assert!(matches!(err, reader::Error::Io(_)));
    assert!(o.as_str().is_empty());
}

#[test]
fn decode_reader_partial_sector() {
    let data = std::fs::read(PATH).unwrap();
    let mut cursor = Cursor::new(&data[..2 * SECTOR_SIZE + 100]);

    assert_eq!(reader::sector_count(&mut cursor).unwrap(), 2);

    let mut o = SectorReport::new();
    let err = mtklog::avec::decode_reader(&mut cursor, 2, &mut o, &AcceptAll).unwrap_err();
    assert!(matches!(err, reader::Error::Io(_)));
}

/// Checks received values against rows of `sector,number,value...`, with
/// values in their `Debug` form.
struct Validator {
    row: Vec<String>,
    rows: Vec<Vec<String>>,
    index: u32,
}

impl Validator {
    fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().with_extension("csv");

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .unwrap();

        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        Self {
            row: vec![],
            rows,
            index: 0,
        }
    }

    fn finish(&self) {
        assert!(self.row.is_empty(), "unreceived values: {:?}", self.row);
        assert!(self.rows.is_empty(), "unreceived points: {:?}", self.rows);
    }
}

impl FromSector for Validator {
    fn add_header(&mut self, index: u32, _: &SectorHeader) {
        self.index = index;
    }

    fn add_point(&mut self, number: u32) -> Option<&mut dyn FromPoint> {
        assert!(self.row.is_empty(), "unreceived values: {:?}", self.row);
        self.row = self.rows.remove(0);
        assert_eq!(self.row.remove(0), self.index.to_string());
        assert_eq!(self.row.remove(0), number.to_string());
        Some(self)
    }
}

impl FromPoint for Validator {
    fn add_value(&mut self, value: Value) {
        assert_eq!(self.row.remove(0), format!("{value:?}"));
    }
}

#![allow(dead_code)]

use mtklog::sans::{
    check::compute_xor,
    header::{END_MARKER, HEADER_SIZE, SECTOR_SIZE},
    setting::SETTING_SIZE,
};

/// Assembles a synthetic sector. Bytes never written stay erased (`0xFF`).
pub struct SectorBuilder {
    buf: Vec<u8>,
    i: usize,
}

impl SectorBuilder {
    pub fn new(format: u32) -> Self {
        let mut buf = vec![0xFF; SECTOR_SIZE];
        buf[..HEADER_SIZE].fill(0);
        buf[2..6].copy_from_slice(&format.to_le_bytes());
        buf[HEADER_SIZE - 4..HEADER_SIZE].copy_from_slice(&END_MARKER.to_le_bytes());

        Self {
            buf,
            i: HEADER_SIZE,
        }
    }

    pub fn record_count(mut self, count: u16) -> Self {
        self.buf[0..2].copy_from_slice(&count.to_le_bytes());
        self
    }

    pub fn mode(mut self, mode: u16) -> Self {
        self.buf[6..8].copy_from_slice(&mode.to_le_bytes());
        self
    }

    pub fn intervals(mut self, sec: u32, dis: u32, spd: u32) -> Self {
        self.buf[8..12].copy_from_slice(&sec.to_le_bytes());
        self.buf[12..16].copy_from_slice(&dis.to_le_bytes());
        self.buf[16..20].copy_from_slice(&spd.to_le_bytes());
        self
    }

    pub fn filter(mut self, filter: [u8; 32]) -> Self {
        self.buf[20..52].copy_from_slice(&filter);
        self
    }

    pub fn end_marker(mut self, marker: u32) -> Self {
        self.buf[HEADER_SIZE - 4..HEADER_SIZE].copy_from_slice(&marker.to_le_bytes());
        self
    }

    /// Append a configuration change.
    pub fn setting(self, id: u8, payload: u32) -> Self {
        let mut r = [0xAA; SETTING_SIZE];
        r[7] = id;
        r[8..12].copy_from_slice(&payload.to_le_bytes());
        r[12..].fill(0xBB);
        self.raw(&r)
    }

    /// Append a data record body, framed with a valid `*` and XOR trailer.
    pub fn record(self, body: &[u8]) -> Self {
        let xor = compute_xor(body);
        self.raw(body).raw(&[b'*', xor])
    }

    /// Append bytes verbatim.
    pub fn raw(mut self, r: &[u8]) -> Self {
        self.buf[self.i..self.i + r.len()].copy_from_slice(r);
        self.i += r.len();
        self
    }

    /// Append unknown configuration changes until `remaining` bytes are left
    /// in the sector.
    pub fn fill_until(mut self, remaining: usize) -> Self {
        while SECTOR_SIZE - self.i > remaining {
            self = self.setting(0x42, 0);
        }
        assert_eq!(SECTOR_SIZE - self.i, remaining);
        self
    }

    pub fn cursor(&self) -> usize {
        self.i
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// A satellite list entry as stored, with every per-satellite field present.
pub fn satellite(id: u8, in_use: bool, count: u8, elevation: i8, azimuth: i16, snr: u16) -> Vec<u8> {
    [
        &[id, in_use as u8, count, 0][..],
        &[elevation as u8, 0],
        &azimuth.to_le_bytes(),
        &snr.to_le_bytes(),
    ]
    .concat()
}

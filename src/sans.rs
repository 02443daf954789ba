//! Allocation-free sector grammar for implementing decoders.
//!
//! This module is intended for applications that need fine control over
//! decoding. See [`crate::avec`] for implementations covering common decoding
//! patterns.
//!
//! # Architecture
//!
//! A log is a sequence of [`header::SECTOR_SIZE`]-byte sectors, each decoded
//! independently of the others:
//!
//! - The first [`header::HEADER_SIZE`] bytes hold a [`header::SectorHeader`],
//! which seeds a [`setting::Config`]. A sector whose header lacks its end
//! marker holds no records.
//!
//! - A [`stream::Records`] iterator then walks the rest of the sector,
//! yielding configuration changes (applied to its configuration as they are
//! found) and data records laid out by the active format register.
//!
//! - Data record fields are decoded lazily with [`data::DataRecord::fields`].
//!
//! Some areas of the decoding process are not represented here and must be
//! handled by the caller:
//!
//! - Reading each sector's bytes from the correct place in the log.
//!
//! - Verifying checksums. Strategies are provided in the [`check`] module.

pub mod check;
pub mod data;
pub mod header;
pub mod setting;
pub mod stream;

/// Entrypoint to the sector grammar.
pub type Decoder = header::SectorHeader;

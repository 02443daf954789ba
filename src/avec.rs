//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module are suited to decoding sectors from files and
//! data slices, publishing to the [`FromSector`] and [`FromPoint`] traits.
//!
//! In many cases these traits can be derived. See the
//! [`FromSector`](macro@FromSector) and [`FromPoint`](macro@FromPoint) macros
//! for details. For a textual report of a log, see the [`report`] module.

#[cfg(feature = "std")]
pub mod file;
#[cfg(feature = "std")]
pub mod reader;
#[cfg(feature = "std")]
pub mod report;
pub mod slice;

#[cfg(feature = "std")]
pub use file::decode as decode_file;
#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

use crate::sans::{data::Value, header::SectorHeader, setting::Setting};

/// Derive [`FromSector`] for a struct collecting the contents of a sector.
///
/// _Requires Cargo feature `derive`._
///
/// # Example
///
/// Add `sector(header)` to an `Option<SectorHeader>` struct field to receive
/// the header, `sector(setting)` to a `Vec<Setting>` to receive configuration
/// changes, and `sector(point)` to a `Vec<T>` (or `Option<T>`, keeping the
/// last) to receive data records, where `T` implements [`FromPoint`] and
/// [`Default`].
///
/// ```
/// #[derive(Debug, Default, FromSector)]
/// struct Track {
///     #[sector(header)]
///     header: Option<SectorHeader>,
///     #[sector(point)]
///     points: Vec<Point>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use mtklog_derive::FromSector;

/// Receive the contents of a sector.
///
/// The default implementation of each method ignores received values.
///
/// See the [`FromSector`](macro@FromSector) derive macro for an automatic
/// implementation of this trait.
#[allow(unused_variables)]
pub trait FromSector {
    /// Add the header of the sector at `index`.
    fn add_header(&mut self, index: u32, header: &SectorHeader) {}
    /// Add a configuration change.
    fn add_setting(&mut self, setting: &Setting) {}
    /// Retrieve a receiver for the `number`th accepted data record of the
    /// sector, counting from one.
    fn add_point(&mut self, number: u32) -> Option<&mut dyn FromPoint> {
        None
    }
}

/// Derive [`FromPoint`] for a struct representing a single data record.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To receive a field, add the `field(Variant)` attribute to an `Option<T>`
/// struct field, where `Variant` names a [`Value`] variant and `T` is its
/// payload.
///
/// ```
/// #[derive(Debug, Default, FromPoint)]
/// struct Point {
///     #[field(Utc)]
///     time: Option<u32>,
///     #[field(Latitude)]
///     latitude: Option<f64>,
///     #[field(Longitude)]
///     longitude: Option<f64>,
/// }
/// ```
///
/// To receive repeated values (such as satellite list entries), supply an
/// accumulator closure. If the value is used beyond being moved, its
/// parameter must be typed.
///
/// ```
/// #[derive(Debug, Default, FromPoint)]
/// struct Sky {
///     #[field(Satellite, |v, s: Satellite| v.push(s))]
///     satellites: Vec<Satellite>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use mtklog_derive::FromPoint;

/// Receive field values for a data record, in catalog order.
///
/// See the [`FromPoint`](macro@FromPoint) derive macro for an automatic
/// implementation of this trait.
pub trait FromPoint {
    /// Add a field value to the record.
    fn add_value(&mut self, value: Value);
}

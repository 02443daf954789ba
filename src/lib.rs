#![no_std]

//! A sector decoder for the binary logs of MTK-based GPS data loggers.
//!
//! A log is a sequence of fixed-size sectors. Each sector opens with a header
//! holding the active recording configuration, followed by a stream of
//! configuration changes and data records whose fields are selected by that
//! configuration.
//!
//! Most users should begin with the functions and derive macros in the [`avec`]
//! module. If these prove insufficient, consider walking sectors directly with
//! the grammar described in the [`sans`] module.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable reader, file and report interfaces (default).
//! - `cli`: build the `mtklog` command-line tool (default).

pub mod avec;
pub mod sans;

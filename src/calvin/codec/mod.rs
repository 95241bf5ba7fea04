//! Codec layer: byte-level primitives shared by all format parsers.
//!
//! # Submodules
//!
//! - [`byte_reader`][]: Bounds-checked big-endian reads and validated seeks
//! - [`text`][]: Length-prefixed byte and UTF-16BE strings
//! - [`value`][]: Column cells by type code, parameter coercion by type tag

pub mod byte_reader;
pub mod text;
pub mod value;

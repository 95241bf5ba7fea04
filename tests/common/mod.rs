//! Hand-encoded Calvin fixtures.
//!
//! Offsets that are only known later (next group, first element, ...) are
//! written as `u32` placeholders and patched once the target position is known.

#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::io::Cursor;

pub type Param<'a> = (&'a str, Vec<u8>, &'a str);

pub fn utf16be(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()
}

#[derive(Default)]
pub struct Fixture {
    pub buf: Vec<u8>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pos(&self) -> u32 {
        self.buf.len() as u32
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.write_u8(v).unwrap();
        self
    }

    pub fn i8(&mut self, v: i8) -> &mut Self {
        self.buf.write_i8(v).unwrap();
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.write_u16::<BigEndian>(v).unwrap();
        self
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.buf.write_i16::<BigEndian>(v).unwrap();
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.write_u32::<BigEndian>(v).unwrap();
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.write_i32::<BigEndian>(v).unwrap();
        self
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.buf.write_f32::<BigEndian>(v).unwrap();
        self
    }

    pub fn bytes(&mut self, b: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(b);
        self
    }

    pub fn byte_string(&mut self, b: &[u8]) -> &mut Self {
        self.i32(b.len() as i32).bytes(b)
    }

    pub fn wide_string(&mut self, s: &str) -> &mut Self {
        let units = s.encode_utf16().count();
        self.i32(units as i32).bytes(&utf16be(s))
    }

    /// Writes a zero `u32` and returns where it lives.
    pub fn placeholder(&mut self) -> usize {
        let at = self.buf.len();
        self.u32(0);
        at
    }

    pub fn patch(&mut self, at: usize, v: u32) {
        BigEndian::write_u32(&mut self.buf[at..at + 4], v);
    }

    /// Writes the file header and returns the first-group placeholder.
    pub fn file_header(&mut self, group_count: i32) -> usize {
        self.u8(59).u8(1).i32(group_count);
        self.placeholder()
    }

    pub fn parameters(&mut self, params: &[Param]) -> &mut Self {
        self.i32(params.len() as i32);
        for (name, raw, tag) in params {
            self.wide_string(name).byte_string(raw).wide_string(tag);
        }
        self
    }

    pub fn header(&mut self, uid: &str, guid: &str, datetime: &str, locale: &str, params: &[Param]) -> &mut Self {
        self.byte_string(uid.as_bytes())
            .byte_string(guid.as_bytes())
            .wide_string(datetime)
            .wide_string(locale)
            .parameters(params)
    }

    /// Writes a group record; returns `(start, next_group_at, first_data_set_at)`.
    pub fn group(&mut self, name: &str, data_set_count: i32) -> (u32, usize, usize) {
        let start = self.pos();
        let next_at = self.placeholder();
        let first_at = self.placeholder();
        self.i32(data_set_count).wide_string(name);
        (start, next_at, first_at)
    }

    /// Writes a data set header followed directly by its value block.
    ///
    /// Returns `(start, next_data_set_at)`; the next offset is pre-patched to
    /// the position right after the value block.
    pub fn data_set(
        &mut self,
        name: &str,
        params: &[Param],
        columns: &[(&str, u8, i32)],
        row_count: u32,
        values: impl FnOnce(&mut Fixture),
    ) -> (u32, usize) {
        let start = self.pos();
        let first_element_at = self.placeholder();
        let next_at = self.placeholder();
        self.wide_string(name).parameters(params).i32(columns.len() as i32);
        for (col_name, code, size) in columns {
            self.wide_string(col_name).u8(*code).i32(*size);
        }
        self.u32(row_count);
        let values_start = self.pos();
        self.patch(first_element_at, values_start);
        values(self);
        let end = self.pos();
        self.patch(next_at, end);
        (start, next_at)
    }

    pub fn cursor(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.buf.clone())
    }
}

/// A complete file with headers, an extra block and two data groups:
///
/// - `Intensity`: data sets `Intensity` (3 float rows) and `Outlier` (2 rows of two u16)
/// - `Annotations`: data set `Labels` (wide string, byte string, i8 columns)
pub fn sample_file() -> Fixture {
    let mut f = Fixture::new();
    let first_group_at = f.file_header(2);

    f.header(
        "affymetrix-calvin-intensity",
        "0123-4567-89ab",
        "2024-03-01T10:00:00Z",
        "en-US",
        &[
            ("affymetrix-algorithm-name", utf16be("Percentile"), "text/plain"),
            ("affymetrix-cel-rows", 1164i32.to_be_bytes().to_vec(), "text/x-calvin-integer-32"),
            ("affymetrix-percentile", 0.75f32.to_be_bytes().to_vec(), "text/x-calvin-float"),
        ],
    );

    // parent headers
    f.i32(1);
    f.header(
        "affymetrix-calvin-scan-acquisition",
        "parent-guid",
        "2024-02-28T09:00:00Z",
        "en-US",
        &[("affymetrix-scanner-id", b"\0SCAN-01\0\0".to_vec(), "text/ascii")],
    );

    // extra block
    f.i32(1);
    f.header(
        "affymetrix-calvin-array",
        "array-guid",
        "",
        "",
        &[
            ("affymetrix-array-id", utf16be("ARRAY-42\0\0"), "text/plain"),
            ("affymetrix-array-barcode", utf16be("5201234"), "text/plain"),
        ],
    );

    let group_start = f.pos();
    f.patch(first_group_at, group_start);
    let (_, next_group_at, first_ds_at) = f.group("Intensity", 2);

    let (ds_start, _) = f.data_set(
        "Intensity",
        &[("affymetrix-unit", utf16be("counts"), "text/plain")],
        &[("Intensity", 6, 4)],
        3,
        |f| {
            f.f32(100.5).f32(200.25).f32(0.0);
        },
    );
    f.patch(first_ds_at, ds_start);

    f.data_set("Outlier", &[], &[("X", 3, 2), ("Y", 3, 2)], 2, |f| {
        f.u16(1).u16(2).u16(3).u16(4);
    });

    let second_group = f.pos();
    f.patch(next_group_at, second_group);
    let (_, _, first_ds_at) = f.group("Annotations", 1);
    let (ds_start, _) = f.data_set(
        "Labels",
        &[],
        &[("Probe", 8, 4), ("Code", 7, 4), ("Flag", 0, 1)],
        2,
        |f| {
            f.wide_string("AFFX-1").byte_string(b"ab").i8(-1);
            f.i32(0).i32(0).i8(127);
        },
    );
    f.patch(first_ds_at, ds_start);

    f
}

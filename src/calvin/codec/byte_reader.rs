//! Positioned, bounds-checked primitive reader.
//!
//! All multi-byte integers and floats in a Calvin file are big-endian.
//! The reader knows the total length of its source up front, so every read
//! and seek is validated before the underlying source is touched.

use std::io::{Read, Seek, SeekFrom};
use byteorder::{BigEndian, ReadBytesExt};
use log::trace;

use crate::calvin::types::error::{CalvinError, Result};

/// Owns the byte source and the single cursor of a decode session.
#[derive(Debug)]
pub struct ByteReader<R> {
    inner: R,
    pos: u64,
    len: u64,
}

impl<R: Read + Seek> ByteReader<R> {
    /// Wraps a source, measuring its length and rewinding to offset 0.
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        trace!("Byte source opened: {} bytes", len);
        Ok(Self { inner, pos: 0, len })
    }

    /// Current absolute cursor position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Total length of the source in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the source holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left between the cursor and the end of the source.
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    /// Moves the cursor to an absolute offset.
    ///
    /// Seeking to exactly the end of the source is allowed; anything past it is not.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.len {
            return Err(CalvinError::InvalidOffset {
                offset,
                len: self.len,
            });
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        Ok(())
    }

    fn ensure(&self, needed: u64) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            return Err(CalvinError::TruncatedData {
                offset: self.pos,
                needed,
                available,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let v = self.inner.read_u8()?;
        self.pos += 1;
        Ok(v)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        let v = self.inner.read_i8()?;
        self.pos += 1;
        Ok(v)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        let v = self.inner.read_u16::<BigEndian>()?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        let v = self.inner.read_i16::<BigEndian>()?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        let v = self.inner.read_u32::<BigEndian>()?;
        self.pos += 4;
        Ok(v)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        let v = self.inner.read_i32::<BigEndian>()?;
        self.pos += 4;
        Ok(v)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        let v = self.inner.read_f32::<BigEndian>()?;
        self.pos += 4;
        Ok(v)
    }

    /// Reads exactly `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure(n as u64)?;
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        self.pos += n as u64;
        Ok(buf)
    }

    /// Reads a signed count prefix and checks that `count` items of at least
    /// `min_item_size` bytes each could still fit in the source.
    ///
    /// Negative counts and counts that cannot possibly be satisfied are
    /// reported as `MalformedCount` at the offset of the prefix.
    pub fn read_count(&mut self, context: &'static str, min_item_size: u64) -> Result<usize> {
        let offset = self.pos;
        let count = self.read_i32()?;
        self.check_count(offset, context, i64::from(count), min_item_size)
    }

    /// Validates an already-read count against the bytes remaining after the cursor.
    pub fn check_count(
        &self,
        offset: u64,
        context: &'static str,
        count: i64,
        min_item_size: u64,
    ) -> Result<usize> {
        let malformed = CalvinError::MalformedCount {
            offset,
            context,
            count,
        };
        if count < 0 {
            return Err(malformed);
        }
        let needed = (count as u64).checked_mul(min_item_size);
        match needed {
            Some(needed) if needed <= self.remaining() => Ok(count as usize),
            _ => Err(malformed),
        }
    }

    /// Releases the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

//! Bounds-checked reads over an in-memory byte buffer.
//!
//! Every offset computed while scanning a legacy map passes through here, so
//! a malformed file surfaces as [`MapError::Format`] instead of a panic.

use crate::error::MapError;

pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// A cursor positioned at `pos`, which may be at most `data.len()`.
    pub fn at(data: &'a [u8], pos: usize) -> Result<Self, MapError> {
        let mut cursor = Self::new(data);
        cursor.seek(pos)?;
        Ok(cursor)
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn seek(&mut self, pos: usize) -> Result<(), MapError> {
        if pos > self.data.len() {
            return Err(out_of_range(pos, 0, self.data.len()));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), MapError> {
        self.take(n).map(|_| ())
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], MapError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| out_of_range(self.pos, n, self.data.len()))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, MapError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, MapError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_i32_be(&mut self) -> Result<i32, MapError> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// A string or blob preceded by its big-endian u16 length.
    pub fn read_prefixed(&mut self) -> Result<&'a [u8], MapError> {
        let len = self.read_u16_be()?;
        self.take(len as usize)
    }

    /// Offset of the first occurrence of `pattern` at or after the cursor.
    /// Does not move the cursor.
    pub fn find(&self, pattern: &[u8]) -> Option<usize> {
        self.data[self.pos..]
            .windows(pattern.len())
            .position(|window| window == pattern)
            .map(|i| self.pos + i)
    }
}

fn out_of_range(pos: usize, len: usize, size: usize) -> MapError {
    MapError::format(format!(
        "read of {} bytes at offset {} runs past end of {}-byte buffer",
        len, pos, size
    ))
}

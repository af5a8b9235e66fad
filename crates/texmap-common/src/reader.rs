//! Binary reader for fixed-layout texture headers.
//!
//! [`BinaryReader`] is a cursor over a byte slice. Every read consumes an
//! exact, statically known number of bytes and fails with
//! [`Error::UnexpectedEof`] instead of zero-filling a short read.

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A little-endian cursor over a byte slice.
///
/// # Example
///
/// ```
/// use texmap_common::BinaryReader;
///
/// let data = [b'V', b'T', b'F', 0, 7, 0, 0, 0, 2, 0, 0, 0];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(&reader.read_magic().unwrap(), b"VTF\0");
/// assert_eq!(reader.peek_u32().unwrap(), 7);
/// let version: [u32; 2] = reader.read_struct().unwrap();
/// assert_eq!(version, [7, 2]);
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Fail unless at least `count` bytes remain.
    #[inline]
    pub fn ensure(&self, count: usize) -> Result<()> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        self.ensure(count)?;
        self.data
            .get(self.position..self.position + count)
            .ok_or(Error::UnexpectedEof {
                needed: count,
                available: 0,
            })
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a four-byte container signature.
    #[inline]
    pub fn read_magic(&mut self) -> Result<[u8; 4]> {
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Peek at a little-endian u32 without advancing.
    #[inline]
    pub fn peek_u32(&self) -> Result<u32> {
        let bytes = self.peek_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a fixed-layout struct using zerocopy.
    ///
    /// Consumes exactly `size_of::<T>()` bytes.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }

    /// Read `count` consecutive fixed-layout structs.
    pub fn read_array<T: FromBytes>(&mut self, count: usize) -> Result<Vec<T>> {
        let size = std::mem::size_of::<T>();
        self.ensure(size.saturating_mul(count))?;
        (0..count).map(|_| self.read_struct::<T>()).collect()
    }
}

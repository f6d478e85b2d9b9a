//! Bounds-checked binary cursor for Unity files

use crate::error::{BinaryError, Result};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::warn;

/// Byte order for reading binary data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ByteOrder {
    /// Big endian (network byte order)
    #[default]
    Big,
    /// Little endian
    Little,
}

/// Sequential, seekable reader over an in-memory byte buffer
///
/// Every read checks the remaining length first and fails with
/// [`BinaryError::UnexpectedEof`] instead of truncating.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    cursor: Cursor<&'a [u8]>,
    byte_order: ByteOrder,
}

macro_rules! read_ordered {
    ($self:ident, $method:ident, $size:expr) => {{
        $self.require($size)?;
        match $self.byte_order {
            ByteOrder::Big => Ok($self.cursor.$method::<BigEndian>()?),
            ByteOrder::Little => Ok($self.cursor.$method::<LittleEndian>()?),
        }
    }};
}

impl<'a> ByteCursor<'a> {
    /// Create a new cursor over a byte slice
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        Self {
            cursor: Cursor::new(data),
            byte_order,
        }
    }

    /// Current position relative to this cursor's own buffer start
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    /// Check if the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes left between the current position and the end
    pub fn remaining_len(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    /// Get the current byte order
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Set the byte order used by subsequent multi-byte reads
    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    fn require(&self, count: usize) -> Result<()> {
        let remaining = self.remaining_len();
        if remaining < count {
            return Err(BinaryError::unexpected_eof(count, remaining));
        }
        Ok(())
    }

    /// Reject a declared element count that cannot fit in the remaining bytes
    ///
    /// Call this before allocating storage for `count` records of at least
    /// `min_record_size` bytes each.
    pub fn ensure_count(&self, count: usize, min_record_size: usize) -> Result<()> {
        let needed = count
            .checked_mul(min_record_size)
            .ok_or_else(|| BinaryError::unexpected_eof(usize::MAX, self.remaining_len()))?;
        self.require(needed)
    }

    /// Move to an absolute offset; the end of the buffer is a valid target
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.len() {
            return Err(BinaryError::unexpected_eof(offset, self.len()));
        }
        self.cursor.set_position(offset as u64);
        Ok(())
    }

    /// Skip forward `count` bytes
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.require(count)?;
        self.cursor.set_position((self.position() + count) as u64);
        Ok(())
    }

    /// Align to the next 4-byte boundary
    pub fn align(&mut self) -> Result<()> {
        self.align_to(4)
    }

    /// Align to `alignment` (a power of two) relative to this cursor's buffer start
    pub fn align_to(&mut self, alignment: usize) -> Result<()> {
        let pos = self.position();
        let aligned = (pos + alignment - 1) & !(alignment - 1);
        if aligned != pos {
            self.skip(aligned - pos)?;
        }
        Ok(())
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        Ok(self.cursor.read_u8()?)
    }

    /// Read a signed 8-bit integer
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a boolean byte (0 = false, anything else = true)
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        read_ordered!(self, read_u16, 2)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        read_ordered!(self, read_i16, 2)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        read_ordered!(self, read_u32, 4)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        read_ordered!(self, read_i32, 4)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        read_ordered!(self, read_u64, 8)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        read_ordered!(self, read_i64, 8)
    }

    /// Borrow the next `count` bytes without copying
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.require(count)?;
        let start = self.position();
        let data: &'a [u8] = *self.cursor.get_ref();
        self.cursor.set_position((start + count) as u64);
        Ok(&data[start..start + count])
    }

    /// Read a fixed-size byte array such as a GUID or hash
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    /// Read a null-terminated string of at most `limit` bytes
    ///
    /// Stops after the 0x00 terminator. If `limit` bytes are consumed without
    /// finding one, the accumulated bytes are returned and the cursor stays
    /// right after them. Invalid UTF-8 is replaced rather than rejected.
    pub fn read_cstring(&mut self, limit: usize) -> Result<String> {
        let (bytes, terminated) = self.read_cstring_bytes(limit)?;
        if !terminated {
            warn!(limit, "string not terminated within limit, keeping {} bytes", bytes.len());
        }
        Ok(match std::str::from_utf8(bytes) {
            Ok(text) => text.to_owned(),
            Err(_) => {
                warn!("string is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(bytes).into_owned()
            }
        })
    }

    /// Read a null-terminated string that must end within `limit` bytes
    ///
    /// Fails with [`BinaryError::InvalidStringEncoding`] when no terminator is
    /// found or the bytes are not UTF-8.
    pub fn read_cstring_strict(&mut self, limit: usize) -> Result<String> {
        let (bytes, terminated) = self.read_cstring_bytes(limit)?;
        if !terminated {
            return Err(BinaryError::invalid_string(format!(
                "no terminator within {} bytes",
                limit
            )));
        }
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| BinaryError::invalid_string(e.to_string()))
    }

    fn read_cstring_bytes(&mut self, limit: usize) -> Result<(&'a [u8], bool)> {
        let start = self.position();
        let data: &'a [u8] = *self.cursor.get_ref();
        for i in 0..limit {
            let byte = self.read_u8()?;
            if byte == 0 {
                return Ok((&data[start..start + i], true));
            }
        }
        Ok((&data[start..start + limit], false))
    }

    /// Carve the next `count` bytes into an independent cursor
    pub fn sub_cursor(&mut self, count: usize, byte_order: ByteOrder) -> Result<ByteCursor<'a>> {
        let bytes = self.read_bytes(count)?;
        Ok(ByteCursor::new(bytes, byte_order))
    }

    /// Unread bytes, without advancing
    pub fn remaining_slice(&self) -> &'a [u8] {
        let data: &'a [u8] = *self.cursor.get_ref();
        &data[self.position().min(data.len())..]
    }
}

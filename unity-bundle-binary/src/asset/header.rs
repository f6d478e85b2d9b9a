//! SerializedFile header parsing

use crate::error::Result;
use crate::format::FormatVersion;
use crate::reader::{ByteCursor, ByteOrder};
use serde::{Deserialize, Serialize};

/// Header of a Unity SerializedFile
///
/// The four size fields and the endianness marker are always big-endian.
/// The byte order they select applies to everything after the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedFileHeader {
    /// Size of the metadata section
    pub metadata_size: u32,
    /// Total file size
    pub file_size: u32,
    /// File format version
    pub format: FormatVersion,
    /// Offset to the object data section
    pub data_offset: u32,
    /// Raw endianness marker (format 9 and later)
    pub endian_marker: Option<u32>,
    /// Byte order of the rest of the file
    pub byte_order: ByteOrder,
}

impl SerializedFileHeader {
    /// Parse the header at the cursor position
    ///
    /// Leaves the cursor in big-endian mode; callers switch to
    /// [`SerializedFileHeader::byte_order`] for the sections that follow.
    pub fn from_cursor(cursor: &mut ByteCursor) -> Result<Self> {
        cursor.set_byte_order(ByteOrder::Big);

        let metadata_size = cursor.read_u32()?;
        let file_size = cursor.read_u32()?;
        let format = FormatVersion(cursor.read_u32()?);
        let data_offset = cursor.read_u32()?;

        let endian_marker = if format.has_endian_marker() {
            Some(cursor.read_u32()?)
        } else {
            None
        };
        let byte_order = match endian_marker {
            Some(0) => ByteOrder::Little,
            _ => ByteOrder::Big,
        };

        Ok(Self {
            metadata_size,
            file_size,
            format,
            data_offset,
            endian_marker,
            byte_order,
        })
    }

    /// Size of the header itself in bytes
    pub fn header_size(&self) -> usize {
        if self.endian_marker.is_some() { 20 } else { 16 }
    }
}

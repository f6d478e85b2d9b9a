//! Object directory records

use crate::error::Result;
use crate::format::FormatVersion;
use crate::reader::ByteCursor;
use serde::{Deserialize, Serialize};

/// Smallest object record: 32-bit path id, offset, size, type id, class id, trailer
const MIN_OBJECT_RECORD_SIZE: usize = 4 + 4 + 4 + 4 + 2 + 2;

/// One stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Path ID of the object (unique within file)
    pub path_id: i64,
    /// Offset of the object data, relative to the file's data offset
    pub data_offset: u32,
    /// Size of object data
    pub size: u32,
    /// Type ID of the object
    pub type_id: i32,
    /// Unity class ID
    pub class_id: i32,
    /// Legacy "is destroyed" field (format 10 and earlier)
    pub is_destroyed: Option<u16>,
    /// Script type index (format 11 and later)
    pub script_type_index: Option<i16>,
    /// Stripped flag (format 15 and later)
    pub stripped: Option<bool>,
}

impl ObjectRecord {
    /// Read one record; alignment is the caller's job
    pub fn from_cursor(
        cursor: &mut ByteCursor,
        format: FormatVersion,
        long_object_ids: bool,
    ) -> Result<Self> {
        let path_id = if format.has_long_path_ids(long_object_ids) {
            cursor.read_i64()?
        } else {
            i64::from(cursor.read_i32()?)
        };

        let data_offset = cursor.read_u32()?;
        let size = cursor.read_u32()?;
        let type_id = cursor.read_i32()?;
        let class_id = i32::from(cursor.read_i16()?);

        let mut record = Self {
            path_id,
            data_offset,
            size,
            type_id,
            class_id,
            is_destroyed: None,
            script_type_index: None,
            stripped: None,
        };

        if format.has_destroyed_flag() {
            record.is_destroyed = Some(cursor.read_u16()?);
        } else if format.has_script_type_index() {
            record.script_type_index = Some(cursor.read_i16()?);
            if format.has_stripped_flag() {
                record.stripped = Some(cursor.read_bool()?);
            }
        }

        Ok(record)
    }

    /// End offset of the object data, relative to the file's data offset
    pub fn data_end(&self) -> u64 {
        u64::from(self.data_offset) + u64::from(self.size)
    }
}

/// Read the object count and every object record
pub fn read_object_directory(
    cursor: &mut ByteCursor,
    format: FormatVersion,
    long_object_ids: bool,
) -> Result<Vec<ObjectRecord>> {
    let count = cursor.read_u32()? as usize;
    cursor.ensure_count(count, MIN_OBJECT_RECORD_SIZE)?;

    let mut objects = Vec::with_capacity(count);
    for _ in 0..count {
        if format.needs_alignment() {
            cursor.align()?;
        }
        objects.push(ObjectRecord::from_cursor(cursor, format, long_object_ids)?);
    }
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ByteOrder;

    #[test]
    fn test_format_10_trailer() {
        let mut data = Vec::new();
        data.extend_from_slice(&7i32.to_le_bytes());
        data.extend_from_slice(&16u32.to_le_bytes());
        data.extend_from_slice(&32u32.to_le_bytes());
        data.extend_from_slice(&28i32.to_le_bytes());
        data.extend_from_slice(&28i16.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());

        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let record = ObjectRecord::from_cursor(&mut cursor, FormatVersion(10), false).unwrap();
        assert_eq!(record.path_id, 7);
        assert_eq!(record.data_end(), 48);
        assert_eq!(record.class_id, 28);
        assert_eq!(record.is_destroyed, Some(1));
        assert_eq!(record.script_type_index, None);
        assert_eq!(cursor.remaining_len(), 0);
    }

    #[test]
    fn test_format_15_trailer_and_alignment() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_le_bytes());
        for path_id in [-2i64, 0x1_0000_0000] {
            let start = data.len();
            data.resize((start + 3) & !3, 0);
            data.extend_from_slice(&path_id.to_le_bytes());
            data.extend_from_slice(&0u32.to_le_bytes());
            data.extend_from_slice(&4u32.to_le_bytes());
            data.extend_from_slice(&0i32.to_le_bytes());
            data.extend_from_slice(&(-1i16).to_le_bytes());
            data.extend_from_slice(&3i16.to_le_bytes());
            data.push(1);
        }

        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let objects = read_object_directory(&mut cursor, FormatVersion(15), false).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].path_id, -2);
        assert_eq!(objects[1].path_id, 0x1_0000_0000);
        assert_eq!(objects[1].class_id, -1);
        assert_eq!(objects[1].script_type_index, Some(3));
        assert_eq!(objects[1].stripped, Some(true));
        assert_eq!(cursor.remaining_len(), 0);
    }

    #[test]
    fn test_object_count_guard() {
        let data = 1000u32.to_le_bytes();
        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        assert!(read_object_directory(&mut cursor, FormatVersion(15), false).is_err());
    }
}

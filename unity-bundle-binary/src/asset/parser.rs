//! SerializedFile parser implementation
//!
//! Sections are read in file order: header, type metadata, long-object-ids
//! flag, object directory, reference tables.

use super::externals::ReferenceTables;
use super::header::SerializedFileHeader;
use super::object::{ObjectRecord, read_object_directory};
use super::types::{SerializedType, TypeMetadata};
use crate::error::{BinaryError, Result};
use crate::format::FormatVersion;
use crate::options::DecodeOptions;
use crate::reader::{ByteCursor, ByteOrder};
use serde::Serialize;
use tracing::debug;

/// A decoded SerializedFile borrowing the node bytes it was parsed from
#[derive(Debug, Clone, Serialize)]
pub struct SerializedFile<'a> {
    /// File header
    pub header: SerializedFileHeader,
    /// Class catalogue
    pub type_metadata: TypeMetadata,
    /// Whether object path ids were flagged as 64-bit (formats 7 to 13)
    pub long_object_ids: bool,
    /// Object directory
    pub objects: Vec<ObjectRecord>,
    /// Additional objects, external references, trailing string
    pub references: ReferenceTables,
    #[serde(skip)]
    data: &'a [u8],
}

impl<'a> SerializedFile<'a> {
    /// Parse a SerializedFile with default options
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        Self::parse_with_options(data, &DecodeOptions::default())
    }

    /// Parse a SerializedFile
    pub fn parse_with_options(data: &'a [u8], options: &DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::new(data, ByteOrder::Big);

        let header = SerializedFileHeader::from_cursor(&mut cursor)?;
        let format = header.format;
        cursor.set_byte_order(header.byte_order);
        debug!(
            format = format.get(),
            byte_order = ?header.byte_order,
            metadata_size = header.metadata_size,
            data_offset = header.data_offset,
            "parsed serialized file header"
        );

        let type_metadata = TypeMetadata::from_cursor(&mut cursor, format, options)?;

        let long_object_ids = if format.has_long_id_flag() {
            cursor.read_u32()? != 0
        } else {
            false
        };

        let objects = read_object_directory(&mut cursor, format, long_object_ids)?;
        debug!(object_count = objects.len(), long_object_ids, "parsed object directory");

        let references = ReferenceTables::from_cursor(&mut cursor, format, options)?;
        debug!(
            additional_objects = references.additional_objects.len(),
            externals = references.externals.len(),
            "parsed reference tables"
        );

        Ok(Self {
            header,
            type_metadata,
            long_object_ids,
            objects,
            references,
            data,
        })
    }

    /// Format version of this file
    pub fn format(&self) -> FormatVersion {
        self.header.format
    }

    /// Raw bytes the file was parsed from
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Get object count
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get type count
    pub fn type_count(&self) -> usize {
        self.type_metadata.types.len()
    }

    /// Find object by path ID
    pub fn find_object(&self, path_id: i64) -> Option<&ObjectRecord> {
        self.objects.iter().find(|obj| obj.path_id == path_id)
    }

    /// Find type by class ID
    pub fn find_type(&self, class_id: i32) -> Option<&SerializedType> {
        self.type_metadata.find_type(class_id)
    }

    /// Get all objects of a specific class
    pub fn objects_of_class(&self, class_id: i32) -> impl Iterator<Item = &ObjectRecord> + '_ {
        self.objects.iter().filter(move |obj| obj.class_id == class_id)
    }

    /// Bytes of one object, located at the header's data offset plus the record's offset
    pub fn object_data(&self, record: &ObjectRecord) -> Result<&'a [u8]> {
        let start = u64::from(self.header.data_offset) + u64::from(record.data_offset);
        let end = start + u64::from(record.size);
        if end > self.data.len() as u64 {
            return Err(BinaryError::invalid_data(format!(
                "Object {} spans {}..{} beyond {} bytes",
                record.path_id,
                start,
                end,
                self.data.len()
            )));
        }
        Ok(&self.data[start as usize..end as usize])
    }
}

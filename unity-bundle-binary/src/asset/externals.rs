//! Reference tables that follow the object directory

use crate::error::Result;
use crate::format::FormatVersion;
use crate::options::DecodeOptions;
use crate::reader::ByteCursor;
use serde::{Deserialize, Serialize};

/// Entry of the "additional objects" table, kept as an opaque pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalObject {
    pub path_id: i64,
    pub value: i32,
}

/// Reference to an object in another bundle or file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Asset path
    pub asset_path: String,
    /// GUID of the referenced file
    pub guid: [u8; 16],
    /// Type of the reference
    pub ref_type: i32,
    /// Path to the referenced file
    pub file_path: String,
}

impl AssetRef {
    /// Parse an AssetRef from binary data
    pub fn from_cursor(cursor: &mut ByteCursor, options: &DecodeOptions) -> Result<Self> {
        let asset_path = cursor.read_cstring(options.string_limit)?;
        let guid = cursor.read_array::<16>()?;
        let ref_type = cursor.read_i32()?;
        let file_path = cursor.read_cstring(options.string_limit)?;

        Ok(Self {
            asset_path,
            guid,
            ref_type,
            file_path,
        })
    }

    /// GUID as 32 lowercase hex digits
    pub fn guid_string(&self) -> String {
        self.guid.iter().map(|byte| format!("{:02x}", byte)).collect()
    }
}

/// Additional-object table, external references and the trailing string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub additional_objects: Vec<AdditionalObject>,
    pub externals: Vec<AssetRef>,
    /// Trailing string present in every observed format
    pub user_information: String,
}

impl ReferenceTables {
    /// Parse the tables that follow the object directory
    pub fn from_cursor(
        cursor: &mut ByteCursor,
        format: FormatVersion,
        options: &DecodeOptions,
    ) -> Result<Self> {
        let mut tables = Self::default();

        if format.has_additional_objects() {
            let count = cursor.read_u32()? as usize;
            cursor.ensure_count(count, 12)?;
            tables.additional_objects.reserve(count);
            for _ in 0..count {
                if format.needs_alignment() {
                    cursor.align()?;
                }
                tables.additional_objects.push(AdditionalObject {
                    path_id: cursor.read_i64()?,
                    value: cursor.read_i32()?,
                });
            }
        }

        if format.has_external_refs() {
            let count = cursor.read_u32()? as usize;
            // Two empty strings, the GUID and the type
            cursor.ensure_count(count, 2 + 16 + 4)?;
            tables.externals.reserve(count);
            for _ in 0..count {
                tables.externals.push(AssetRef::from_cursor(cursor, options)?);
            }
        }

        tables.user_information = cursor.read_cstring(options.string_limit)?;
        Ok(tables)
    }
}

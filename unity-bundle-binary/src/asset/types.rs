//! Type metadata: the class catalogue at the start of a SerializedFile

use crate::error::{BinaryError, Result};
use crate::format::FormatVersion;
use crate::options::DecodeOptions;
use crate::reader::ByteCursor;
use crate::typetree::{TypeTree, TypeTreeParser};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Length of the hash stored for built-in classes
pub const TYPE_HASH_SIZE: usize = 16;

/// Length of the hash stored for script classes (negative class ids)
pub const SCRIPT_TYPE_HASH_SIZE: usize = 32;

/// One class entry of the type metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedType {
    /// Unity class ID; negative for script types
    pub class_id: i32,
    /// Type hash (format 13 and later), 16 or 32 bytes
    pub hash: Vec<u8>,
    /// Field schema, when the file carries type trees
    pub type_tree: Option<TypeTree>,
}

impl SerializedType {
    /// Read one entry: class id, optional hash, optional tree
    fn from_cursor(
        cursor: &mut ByteCursor,
        format: FormatVersion,
        read_hash: bool,
        read_tree: bool,
        options: &DecodeOptions,
    ) -> Result<Self> {
        let class_id = cursor.read_i32()?;

        let hash = if read_hash {
            let hash_size = if class_id < 0 {
                SCRIPT_TYPE_HASH_SIZE
            } else {
                TYPE_HASH_SIZE
            };
            cursor.read_bytes(hash_size)?.to_vec()
        } else {
            Vec::new()
        };

        let type_tree = if read_tree {
            Some(TypeTreeParser::from_cursor(cursor, class_id, format, options)?)
        } else {
            None
        };

        Ok(Self {
            class_id,
            hash,
            type_tree,
        })
    }

    /// Check if this is a script type
    pub fn is_script_type(&self) -> bool {
        self.class_id < 0
    }

    /// Check if this type has a TypeTree
    pub fn has_type_tree(&self) -> bool {
        self.type_tree.as_ref().is_some_and(|tree| !tree.is_empty())
    }
}

/// Schema catalogue for one serialized file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMetadata {
    /// Unity version that wrote the file
    pub player_version: String,
    /// Build target platform
    pub target_platform: u32,
    /// Whether per-class type trees are stored
    pub has_type_trees: bool,
    /// Class entries in file order
    pub types: Vec<SerializedType>,
}

impl TypeMetadata {
    /// Parse the type metadata section
    pub fn from_cursor(
        cursor: &mut ByteCursor,
        format: FormatVersion,
        options: &DecodeOptions,
    ) -> Result<Self> {
        let player_version = cursor.read_cstring(options.string_limit)?;
        let target_platform = cursor.read_u32()?;

        // Older formats store a tree for every class and no hash table
        let (has_type_trees, read_hash) = if format.has_type_hashes() {
            (cursor.read_bool()?, true)
        } else {
            (true, false)
        };

        let count = cursor.read_i32()?;
        if count < 0 {
            return Err(BinaryError::invalid_data(format!(
                "Negative type count: {}",
                count
            )));
        }
        let count = count as usize;
        cursor.ensure_count(count, 4)?;

        let mut types = Vec::with_capacity(count);
        for _ in 0..count {
            types.push(SerializedType::from_cursor(
                cursor,
                format,
                read_hash,
                has_type_trees,
                options,
            )?);
        }

        debug!(
            player_version = %player_version,
            target_platform,
            has_type_trees,
            type_count = types.len(),
            "parsed type metadata"
        );

        Ok(Self {
            player_version,
            target_platform,
            has_type_trees,
            types,
        })
    }

    /// Find a class entry by class id
    pub fn find_type(&self, class_id: i32) -> Option<&SerializedType> {
        self.types.iter().find(|t| t.class_id == class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ByteOrder;

    fn metadata_prefix(has_trees: Option<bool>, count: i32) -> Vec<u8> {
        let mut data = b"5.3.4p1\0".to_vec();
        data.extend_from_slice(&5u32.to_le_bytes());
        if let Some(has_trees) = has_trees {
            data.push(has_trees as u8);
        }
        data.extend_from_slice(&count.to_le_bytes());
        data
    }

    #[test]
    fn test_hash_table_without_trees() {
        let mut data = metadata_prefix(Some(false), 2);
        data.extend_from_slice(&1i32.to_le_bytes());
        data.extend_from_slice(&[0x11; 16]);
        data.extend_from_slice(&(-3i32).to_le_bytes());
        data.extend_from_slice(&[0x22; 32]);

        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let metadata =
            TypeMetadata::from_cursor(&mut cursor, FormatVersion(15), &DecodeOptions::default())
                .unwrap();

        assert_eq!(cursor.remaining_len(), 0);
        assert_eq!(metadata.player_version, "5.3.4p1");
        assert_eq!(metadata.target_platform, 5);
        assert!(!metadata.has_type_trees);
        assert_eq!(metadata.types.len(), 2);
        assert_eq!(metadata.types[0].hash.len(), 16);
        assert_eq!(metadata.types[1].hash.len(), 32);
        assert!(metadata.types[1].is_script_type());
        assert!(!metadata.types[0].has_type_tree());
        assert_eq!(metadata.find_type(-3).unwrap().hash[0], 0x22);
    }

    #[test]
    fn test_old_format_reads_tree_per_class() {
        let mut data = metadata_prefix(None, 1);
        data.extend_from_slice(&114i32.to_le_bytes());
        // Recursive-form tree: one leaf node
        data.extend_from_slice(b"MonoBehaviour\0Base\0");
        for value in [-1i32, 0, 0, 1, 0, 0] {
            data.extend_from_slice(&value.to_le_bytes());
        }

        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let metadata =
            TypeMetadata::from_cursor(&mut cursor, FormatVersion(9), &DecodeOptions::default())
                .unwrap();

        assert!(metadata.has_type_trees);
        let entry = &metadata.types[0];
        assert!(entry.hash.is_empty());
        let tree = entry.type_tree.as_ref().unwrap();
        assert_eq!(tree.class_id, 114);
        assert_eq!(tree.root().unwrap().type_name, "MonoBehaviour");
    }

    #[test]
    fn test_negative_type_count() {
        let data = metadata_prefix(Some(false), -1);
        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        assert!(matches!(
            TypeMetadata::from_cursor(&mut cursor, FormatVersion(15), &DecodeOptions::default()),
            Err(BinaryError::InvalidData(_))
        ));
    }
}

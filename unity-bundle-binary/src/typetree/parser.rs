//! TypeTree parser implementation
//!
//! Two layouts exist. Formats 10 and 12+ store a flat table of fixed-size,
//! depth-annotated records plus a string pool ("blob" form). Every other
//! format stores each node followed by its children, recursively.

use super::common_strings;
use super::types::{TypeTree, TypeTreeNode};
use crate::error::{BinaryError, Result};
use crate::format::FormatVersion;
use crate::options::DecodeOptions;
use crate::reader::ByteCursor;
use tracing::trace;

/// Size of one blob-form node record
pub const NODE_RECORD_SIZE: usize = 24;

/// Smallest possible recursive-form node: two empty strings and six i32s
const MIN_RECURSIVE_NODE_SIZE: usize = 2 + 6 * 4;

/// One fixed-size blob-form record before string resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRecord {
    pub version: i16,
    pub depth: u8,
    pub is_array: bool,
    pub type_str_offset: i32,
    pub name_str_offset: i32,
    pub byte_size: i32,
    pub index: u32,
    pub meta_flags: i32,
}

impl NodeRecord {
    /// Read one record
    pub fn from_cursor(cursor: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            version: cursor.read_i16()?,
            depth: cursor.read_u8()?,
            is_array: cursor.read_u8()? > 0,
            type_str_offset: cursor.read_i32()?,
            name_str_offset: cursor.read_i32()?,
            byte_size: cursor.read_i32()?,
            index: cursor.read_u32()?,
            meta_flags: cursor.read_i32()?,
        })
    }

    fn into_node(self, pool: &[u8]) -> Result<TypeTreeNode> {
        Ok(TypeTreeNode {
            type_name: common_strings::resolve(self.type_str_offset, pool)?,
            name: common_strings::resolve(self.name_str_offset, pool)?,
            byte_size: self.byte_size,
            index: i64::from(self.index),
            is_array: self.is_array,
            version: i32::from(self.version),
            meta_flags: self.meta_flags,
            level: u32::from(self.depth),
            type_str_offset: Some(self.type_str_offset),
            name_str_offset: Some(self.name_str_offset),
            children: Vec::new(),
        })
    }
}

/// TypeTree parser
pub struct TypeTreeParser;

impl TypeTreeParser {
    /// Parse one class's TypeTree using the layout `format` selects
    pub fn from_cursor(
        cursor: &mut ByteCursor,
        class_id: i32,
        format: FormatVersion,
        options: &DecodeOptions,
    ) -> Result<TypeTree> {
        if format.uses_blob_type_tree() {
            Self::from_cursor_blob(cursor, class_id, options)
        } else {
            Self::from_cursor_recursive(cursor, class_id, options)
        }
    }

    /// Parse the flat record table and rebuild the hierarchy from depths
    pub fn from_cursor_blob(
        cursor: &mut ByteCursor,
        class_id: i32,
        options: &DecodeOptions,
    ) -> Result<TypeTree> {
        let node_count = cursor.read_u32()? as usize;
        let string_buffer_size = cursor.read_u32()? as usize;

        cursor.ensure_count(node_count, NODE_RECORD_SIZE)?;
        let node_data = cursor.read_bytes(node_count * NODE_RECORD_SIZE)?;
        let string_buffer = cursor.read_bytes(string_buffer_size)?;

        let mut records_cursor = ByteCursor::new(node_data, cursor.byte_order());
        let mut records = Vec::with_capacity(node_count);
        for _ in 0..node_count {
            records.push(NodeRecord::from_cursor(&mut records_cursor)?);
        }

        let mut tree = build_hierarchy(class_id, &records, string_buffer)?;
        tree.node_data = node_data.to_vec();
        tree.string_buffer = string_buffer.to_vec();

        trace!(class_id, node_count, string_buffer_size, "parsed blob type tree");
        Ok(tree)
    }

    /// Parse a self-describing recursive tree
    pub fn from_cursor_recursive(
        cursor: &mut ByteCursor,
        class_id: i32,
        options: &DecodeOptions,
    ) -> Result<TypeTree> {
        let mut tree = TypeTree::new(class_id);
        Self::read_recursive_node(cursor, &mut tree, None, 0, options)?;
        trace!(class_id, node_count = tree.len(), "parsed recursive type tree");
        Ok(tree)
    }

    fn read_recursive_node(
        cursor: &mut ByteCursor,
        tree: &mut TypeTree,
        parent: Option<usize>,
        level: u32,
        options: &DecodeOptions,
    ) -> Result<()> {
        if level as usize > options.max_type_tree_depth {
            return Err(BinaryError::malformed_type_tree(format!(
                "nesting deeper than {} levels",
                options.max_type_tree_depth
            )));
        }

        let type_name = cursor.read_cstring(options.string_limit)?;
        let name = cursor.read_cstring(options.string_limit)?;
        let byte_size = cursor.read_i32()?;
        let index = cursor.read_i32()?;
        let is_array = cursor.read_i32()? > 0;
        let version = cursor.read_i32()?;
        let meta_flags = cursor.read_i32()?;
        let child_count = cursor.read_i32()?;

        if child_count < 0 {
            return Err(BinaryError::malformed_type_tree(format!(
                "node '{}' has negative child count {}",
                name, child_count
            )));
        }
        cursor.ensure_count(child_count as usize, MIN_RECURSIVE_NODE_SIZE)?;

        let node = TypeTreeNode {
            type_name,
            name,
            byte_size,
            index: i64::from(index),
            is_array,
            version,
            meta_flags,
            level,
            type_str_offset: None,
            name_str_offset: None,
            children: Vec::with_capacity(child_count as usize),
        };
        let this = tree.push_node(node, parent);

        for _ in 0..child_count {
            Self::read_recursive_node(cursor, tree, Some(this), level + 1, options)?;
        }
        Ok(())
    }
}

/// Rebuild parent/child links from pre-order, depth-annotated records
///
/// The stack holds the currently open ancestors; `stack[d - 1]` is the
/// parent of a record at depth `d`.
pub fn build_hierarchy(class_id: i32, records: &[NodeRecord], pool: &[u8]) -> Result<TypeTree> {
    let mut tree = TypeTree::with_capacity(class_id, records.len());
    let mut stack: Vec<usize> = Vec::new();

    for (position, record) in records.iter().enumerate() {
        let depth = record.depth as usize;
        let node = record.into_node(pool)?;

        if position == 0 {
            if depth != 0 {
                return Err(BinaryError::malformed_type_tree(format!(
                    "first record has depth {}, expected the root",
                    depth
                )));
            }
            stack.push(tree.push_node(node, None));
            continue;
        }

        if depth == 0 {
            return Err(BinaryError::malformed_type_tree(format!(
                "record {} is a second root",
                position
            )));
        }
        if depth > stack.len() {
            return Err(BinaryError::malformed_type_tree(format!(
                "record {} has depth {} with only {} open ancestors",
                position,
                depth,
                stack.len()
            )));
        }

        stack.truncate(depth);
        let parent = stack.last().copied().ok_or_else(|| {
            BinaryError::malformed_type_tree(format!("record {} has no parent", position))
        })?;
        stack.push(tree.push_node(node, Some(parent)));
    }

    Ok(tree)
}

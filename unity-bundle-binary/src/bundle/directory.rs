//! Node directory: block table and node table of a UnityFS bundle

use super::header::BundleEnvelope;
use crate::compression::{CompressionType, decompress};
use crate::error::{BinaryError, Result};
use crate::options::DecodeOptions;
use crate::reader::{ByteCursor, ByteOrder};
use crate::unity_version::DirectoryLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, trace};

const BLOCK_RECORD_SIZE: usize = 4 + 4 + 2;

/// Offset, size, status and an empty name
const MIN_NODE_RECORD_SIZE: usize = 8 + 8 + 4 + 1;

/// One compressed chunk of payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub compressed_size: i32,
    pub uncompressed_size: i32,
    pub flags: i16,
}

impl Block {
    /// Get the compression type for this block
    pub fn compression_type(&self) -> Result<CompressionType> {
        CompressionType::from_flags(u32::from(self.flags as u16))
    }
}

/// One logical file inside the bundle payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Offset relative to the directory start
    pub offset: i64,
    /// Size of the node data
    pub size: i64,
    /// Status flags
    pub status: i32,
    /// Node name, unique within the directory
    pub name: String,
}

/// Decoded directory of a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDirectory {
    pub guid: [u8; 16],
    pub blocks: Vec<Block>,
    pub nodes: Vec<Node>,
    /// Absolute offset that node offsets are relative to
    pub directory_start: u64,
}

impl NodeDirectory {
    /// Locate and decode the directory described by `envelope`
    ///
    /// `cursor` is the whole-bundle cursor, positioned right after the envelope.
    pub fn read(
        cursor: &mut ByteCursor,
        envelope: &BundleEnvelope,
        options: &DecodeOptions,
    ) -> Result<Self> {
        let layout = DirectoryLayout::for_player_version(&envelope.player_version)?;
        trace!(?layout, player_version = %envelope.player_version, "selected directory layout");

        let remaining = cursor.remaining_len() as u64;
        let directory_start = envelope.file_size.checked_sub(remaining).ok_or_else(|| {
            BinaryError::invalid_data(format!(
                "File size {} is smaller than the {} bytes after the header",
                envelope.file_size, remaining
            ))
        })?;

        let compression = envelope.compression_type()?;
        let block_size = envelope.compressed_directory_size as u64;
        let block_pos = envelope.file_size.checked_sub(block_size).ok_or_else(|| {
            BinaryError::invalid_data(format!(
                "Directory size {} exceeds file size {}",
                block_size, envelope.file_size
            ))
        })?;
        let block_pos = usize::try_from(block_pos)
            .map_err(|_| BinaryError::unexpected_eof(usize::MAX, cursor.len()))?;

        cursor.seek(block_pos)?;
        let block = cursor.sub_cursor(block_size as usize, ByteOrder::Big)?;
        let compressed = block.remaining_slice();
        let directory = decompress(
            compressed,
            compression,
            envelope.uncompressed_directory_size as usize,
        )?;
        trace!(
            compression = compression.name(),
            compressed = compressed.len(),
            uncompressed = directory.len(),
            "read directory block"
        );

        let mut directory_cursor = ByteCursor::new(&directory, ByteOrder::Big);
        Self::from_cursor(&mut directory_cursor, directory_start, options)
    }

    /// Decode an uncompressed directory block
    pub fn from_cursor(
        cursor: &mut ByteCursor,
        directory_start: u64,
        options: &DecodeOptions,
    ) -> Result<Self> {
        cursor.set_byte_order(ByteOrder::Big);
        let guid = cursor.read_array::<16>()?;

        let block_count = read_count(cursor, "block")?;
        cursor.ensure_count(block_count, BLOCK_RECORD_SIZE)?;
        let mut blocks = Vec::with_capacity(block_count);
        for index in 0..block_count {
            let block = Block {
                compressed_size: cursor.read_i32()?,
                uncompressed_size: cursor.read_i32()?,
                flags: cursor.read_i16()?,
            };
            if block.compressed_size < 0 || block.uncompressed_size < 0 {
                return Err(BinaryError::invalid_data(format!(
                    "Block {} has negative size ({}, {})",
                    index, block.compressed_size, block.uncompressed_size
                )));
            }
            blocks.push(block);
        }

        let node_count = read_count(cursor, "node")?;
        cursor.ensure_count(node_count, MIN_NODE_RECORD_SIZE)?;
        let mut nodes = Vec::with_capacity(node_count);
        let mut names = HashSet::with_capacity(node_count);
        for _ in 0..node_count {
            let node = Node {
                offset: cursor.read_i64()?,
                size: cursor.read_i64()?,
                status: cursor.read_i32()?,
                name: cursor.read_cstring(options.string_limit)?,
            };
            if node.offset < 0 || node.size < 0 {
                return Err(BinaryError::invalid_data(format!(
                    "Node '{}' has negative offset or size ({}, {})",
                    node.name, node.offset, node.size
                )));
            }
            if !names.insert(node.name.clone()) {
                return Err(BinaryError::invalid_data(format!(
                    "Duplicate node name '{}'",
                    node.name
                )));
            }
            trace!(name = %node.name, offset = node.offset, size = node.size, "directory node");
            nodes.push(node);
        }

        debug!(
            block_count = blocks.len(),
            node_count = nodes.len(),
            directory_start,
            "parsed node directory"
        );

        Ok(Self {
            guid,
            blocks,
            nodes,
            directory_start,
        })
    }

    /// Absolute byte range of a node: `[directory_start + offset, + size)`
    pub fn node_range(&self, node: &Node) -> Result<Range<u64>> {
        let overflow = || {
            BinaryError::invalid_data(format!("Node '{}' range overflows", node.name))
        };
        let start = self
            .directory_start
            .checked_add(u64::try_from(node.offset).map_err(|_| overflow())?)
            .ok_or_else(overflow)?;
        let end = start
            .checked_add(u64::try_from(node.size).map_err(|_| overflow())?)
            .ok_or_else(overflow)?;
        Ok(start..end)
    }

    /// Find a node by name
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }
}

fn read_count(cursor: &mut ByteCursor, what: &str) -> Result<usize> {
    let count = cursor.read_i32()?;
    usize::try_from(count)
        .map_err(|_| BinaryError::invalid_data(format!("Negative {} count: {}", what, count)))
}

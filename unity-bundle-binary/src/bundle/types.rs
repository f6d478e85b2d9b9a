//! Bundle data structures

use super::directory::{Node, NodeDirectory};
use super::header::BundleEnvelope;
use crate::asset::SerializedFile;
use crate::error::{BinaryError, Result};
use crate::options::DecodeOptions;
use crate::reader::{ByteCursor, ByteOrder};
use std::ops::Range;
use tracing::debug;

/// Decoded content of one node
#[derive(Debug)]
pub enum NodeContent<'a> {
    /// A serialized object file
    SerializedFile(Box<SerializedFile<'a>>),
    /// An opaque resource blob (`.resource` / `.resS`)
    Resource(&'a [u8]),
}

/// A Unity AssetBundle
///
/// The envelope and directory are decoded eagerly; node contents are decoded
/// one at a time through [`AssetBundle::decode_node`], so a broken node does
/// not stop its siblings from being read.
#[derive(Debug, Clone)]
pub struct AssetBundle<'a> {
    /// Bundle envelope
    pub envelope: BundleEnvelope,
    /// Block and node tables
    pub directory: NodeDirectory,
    options: DecodeOptions,
    data: &'a [u8],
}

impl<'a> AssetBundle<'a> {
    /// Parse an AssetBundle with default options
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        Self::parse_with_options(data, DecodeOptions::default())
    }

    /// Parse an AssetBundle's envelope and node directory
    pub fn parse_with_options(data: &'a [u8], options: DecodeOptions) -> Result<Self> {
        let mut cursor = ByteCursor::new(data, ByteOrder::Big);
        let envelope = BundleEnvelope::from_cursor(&mut cursor, &options)?;
        let directory = NodeDirectory::read(&mut cursor, &envelope, &options)?;

        Ok(Self {
            envelope,
            directory,
            options,
            data,
        })
    }

    /// Raw bundle bytes
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Options the bundle was parsed with
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Nodes in directory order
    pub fn nodes(&self) -> &[Node] {
        &self.directory.nodes
    }

    /// Find a node by name
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.directory.find_node(name)
    }

    /// Byte range of a node inside the bundle buffer
    pub fn node_range(&self, node: &Node) -> Result<Range<usize>> {
        let range = self.directory.node_range(node)?;
        if range.end > self.data.len() as u64 {
            return Err(BinaryError::invalid_data(format!(
                "Node '{}' spans {}..{} beyond {} bytes",
                node.name,
                range.start,
                range.end,
                self.data.len()
            )));
        }
        Ok(range.start as usize..range.end as usize)
    }

    /// Borrow a node's bytes
    pub fn node_data(&self, node: &Node) -> Result<&'a [u8]> {
        let range = self.node_range(node)?;
        Ok(&self.data[range])
    }

    /// Decode one node's content
    pub fn decode_node(&self, node: &Node) -> Result<NodeContent<'a>> {
        let bytes = self.node_data(node)?;
        if self.options.is_resource_node(&node.name) {
            debug!(name = %node.name, size = bytes.len(), "resource node left undecoded");
            return Ok(NodeContent::Resource(bytes));
        }

        debug!(name = %node.name, size = bytes.len(), "decoding serialized file node");
        let file = SerializedFile::parse_with_options(bytes, &self.options)?;
        Ok(NodeContent::SerializedFile(Box::new(file)))
    }

    /// `(name, bytes)` pairs for every node, for extraction
    pub fn entries(&self) -> impl Iterator<Item = Result<(&str, &'a [u8])>> + '_ {
        self.directory
            .nodes
            .iter()
            .map(move |node| self.node_data(node).map(|bytes| (node.name.as_str(), bytes)))
    }
}

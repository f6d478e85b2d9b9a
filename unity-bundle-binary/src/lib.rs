//! Unity Binary Bundle Decoder
//!
//! This crate decodes Unity asset bundles:
//! - the UnityFS envelope and its node directory
//! - the SerializedFile inside each non-resource node
//! - per-class TypeTrees, in both the flat and the recursive layout
//! - object directories and external reference tables
//!
//! Decoding works on an in-memory buffer and borrows from it. Compressed
//! directories are recognized but not decompressed.
//!
//! # Example
//!
//! ```rust,no_run
//! use unity_bundle_binary::{AssetBundle, NodeContent};
//!
//! let data = std::fs::read("example.bundle")?;
//! let bundle = AssetBundle::parse(&data)?;
//!
//! for node in bundle.nodes() {
//!     if let NodeContent::SerializedFile(file) = bundle.decode_node(node)? {
//!         for ty in &file.type_metadata.types {
//!             let nodes = ty.type_tree.as_ref().map_or(0, |t| t.len());
//!             println!("class {} ({} tree nodes)", ty.class_id, nodes);
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod asset;
pub mod bundle;
pub mod compression;
pub mod error;
pub mod format;
pub mod options;
pub mod reader;
pub mod typetree;
pub mod unity_version;

pub use asset::{AssetRef, ObjectRecord, SerializedFile, SerializedFileHeader, TypeMetadata};
pub use bundle::{AssetBundle, BundleEnvelope, Node, NodeContent, NodeDirectory};
pub use compression::{CompressionType, decompress};
pub use error::{BinaryError, ErrorKind, Result};
pub use format::FormatVersion;
pub use options::DecodeOptions;
pub use reader::{ByteCursor, ByteOrder};
pub use typetree::{TypeTree, TypeTreeNode};
pub use unity_version::{DirectoryLayout, UnityVersion, UnityVersionType};

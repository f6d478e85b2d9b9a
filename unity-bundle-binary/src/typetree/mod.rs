//! Unity TypeTree decoding
//!
//! - `types` - arena-backed TypeTree and TypeTreeNode
//! - `parser` - blob-form and recursive-form decoders
//! - `common_strings` - the built-in string table used by blob-form offsets
//!
//! # Examples
//!
//! ```rust,no_run
//! use unity_bundle_binary::format::FormatVersion;
//! use unity_bundle_binary::options::DecodeOptions;
//! use unity_bundle_binary::reader::{ByteCursor, ByteOrder};
//! use unity_bundle_binary::typetree::TypeTreeParser;
//!
//! # let data: Vec<u8> = Vec::new();
//! let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
//! let options = DecodeOptions::default();
//! let tree = TypeTreeParser::from_cursor(&mut cursor, 1, FormatVersion(17), &options)?;
//! for (depth, node) in tree.iter() {
//!     println!("{}{} {}", "  ".repeat(depth as usize), node.type_name, node.name);
//! }
//! # Ok::<(), unity_bundle_binary::error::BinaryError>(())
//! ```

pub mod common_strings;
pub mod parser;
pub mod types;

pub use parser::{NODE_RECORD_SIZE, NodeRecord, TypeTreeParser, build_hierarchy};
pub use types::{PreOrder, TypeTree, TypeTreeNode};

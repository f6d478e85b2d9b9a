//! Unity AssetBundle decoding
//!
//! - `header` - the UnityFS envelope
//! - `directory` - the block and node tables
//! - `types` - [`AssetBundle`], which ties them to the bundle buffer
//!
//! # Examples
//!
//! ```rust,no_run
//! use unity_bundle_binary::bundle::{AssetBundle, NodeContent};
//!
//! use unity_bundle_binary::error::BinaryError;
//!
//! let data = std::fs::read("example.bundle").map_err(BinaryError::from)?;
//! let bundle = AssetBundle::parse(&data)?;
//! for node in bundle.nodes() {
//!     match bundle.decode_node(node) {
//!         Ok(NodeContent::SerializedFile(file)) => {
//!             println!("{}: {} objects", node.name, file.object_count())
//!         }
//!         Ok(NodeContent::Resource(bytes)) => {
//!             println!("{}: {} raw bytes", node.name, bytes.len())
//!         }
//!         Err(e) => eprintln!("{}: {}", node.name, e),
//!     }
//! }
//! # Ok::<(), unity_bundle_binary::error::BinaryError>(())
//! ```

pub mod directory;
pub mod header;
pub mod types;

pub use directory::{Block, Node, NodeDirectory};
pub use header::{BundleEnvelope, Signature};
pub use types::{AssetBundle, NodeContent};

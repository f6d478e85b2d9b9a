//! Unity SerializedFile decoding
//!
//! - `header` - the per-node header that selects format and byte order
//! - `types` - type metadata (class ids, hashes, type trees)
//! - `object` - object directory records
//! - `externals` - additional-object and external reference tables
//! - `parser` - [`SerializedFile`], which runs all of the above in order
//!
//! # Examples
//!
//! ```rust,no_run
//! use unity_bundle_binary::asset::SerializedFile;
//!
//! # let data: Vec<u8> = Vec::new();
//! let file = SerializedFile::parse(&data)?;
//! for object in &file.objects {
//!     let bytes = file.object_data(object)?;
//!     println!("{} class {} ({} bytes)", object.path_id, object.class_id, bytes.len());
//! }
//! # Ok::<(), unity_bundle_binary::error::BinaryError>(())
//! ```

pub mod externals;
pub mod header;
pub mod object;
pub mod parser;
pub mod types;

pub use externals::{AdditionalObject, AssetRef, ReferenceTables};
pub use header::SerializedFileHeader;
pub use object::{ObjectRecord, read_object_directory};
pub use parser::SerializedFile;
pub use types::{SerializedType, TypeMetadata};

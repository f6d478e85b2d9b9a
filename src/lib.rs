//! Unity Bundle
//!
//! Decoder for Unity UnityFS asset bundles and the serialized files packed
//! inside them. This crate re-exports [`unity_bundle_binary`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use unity_bundle::AssetBundle;
//!
//! let data = std::fs::read("example.bundle")?;
//! let bundle = AssetBundle::parse(&data)?;
//! for entry in bundle.entries() {
//!     let (name, bytes) = entry?;
//!     println!("{name}: {} bytes", bytes.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use unity_bundle_binary::*;

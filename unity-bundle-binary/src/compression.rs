//! Compression support for Unity bundle blocks
//!
//! Only the uncompressed path is wired. The other algorithms are recognized so
//! that callers get a typed [`BinaryError::UnsupportedCompressionType`] instead
//! of a garbage read.

use crate::error::{BinaryError, Result};
use serde::{Deserialize, Serialize};

/// Compression types Unity writes into bundle and block flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionType {
    /// No compression
    None = 0,
    /// LZMA compression
    Lzma = 1,
    /// LZ4 compression
    Lz4 = 2,
    /// LZ4HC (High Compression) compression
    Lz4Hc = 3,
    /// LZHAM compression
    Lzham = 4,
}

impl CompressionType {
    /// Create compression type from the low bits of a flags field
    pub fn from_flags(flags: u32) -> Result<Self> {
        match flags & ArchiveFlags::COMPRESSION_TYPE_MASK {
            0 => Ok(CompressionType::None),
            1 => Ok(CompressionType::Lzma),
            2 => Ok(CompressionType::Lz4),
            3 => Ok(CompressionType::Lz4Hc),
            4 => Ok(CompressionType::Lzham),
            other => Err(BinaryError::unsupported_compression(other)),
        }
    }

    /// Get the name of the compression type
    pub fn name(self) -> &'static str {
        match self {
            CompressionType::None => "None",
            CompressionType::Lzma => "LZMA",
            CompressionType::Lz4 => "LZ4",
            CompressionType::Lz4Hc => "LZ4HC",
            CompressionType::Lzham => "LZHAM",
        }
    }
}

/// Decompress `data` into exactly `expected_len` bytes
pub fn decompress(
    data: &[u8],
    compression: CompressionType,
    expected_len: usize,
) -> Result<Vec<u8>> {
    match compression {
        CompressionType::None => {
            if data.len() != expected_len {
                return Err(BinaryError::invalid_data(format!(
                    "Uncompressed block size mismatch: expected {}, got {}",
                    expected_len,
                    data.len()
                )));
            }
            Ok(data.to_vec())
        }
        other => Err(BinaryError::unsupported_compression(other as u32)),
    }
}

/// Archive flags used in UnityFS headers
pub struct ArchiveFlags;

impl ArchiveFlags {
    /// Compression type mask
    pub const COMPRESSION_TYPE_MASK: u32 = 0x3F;
}

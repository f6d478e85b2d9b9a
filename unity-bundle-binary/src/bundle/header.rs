//! AssetBundle envelope parsing
//!
//! The envelope is always big-endian. Only UnityFS bundles carry the size and
//! flag fields needed to find the node directory; the older web and raw
//! containers are recognized and rejected.

use crate::compression::{ArchiveFlags, CompressionType};
use crate::error::{BinaryError, Result};
use crate::options::DecodeOptions;
use crate::reader::{ByteCursor, ByteOrder};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Bundle container signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signature {
    UnityWeb,
    UnityRaw,
    UnityFS,
}

impl Signature {
    /// Recognize a signature string
    pub fn parse(signature: &str) -> Result<Self> {
        match signature {
            "UnityWeb" => Ok(Signature::UnityWeb),
            "UnityRaw" => Ok(Signature::UnityRaw),
            "UnityFS" => Ok(Signature::UnityFS),
            other => Err(BinaryError::unsupported_format(format!(
                "Unknown bundle signature: {:?}",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Signature::UnityWeb => "UnityWeb",
            Signature::UnityRaw => "UnityRaw",
            Signature::UnityFS => "UnityFS",
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outer container metadata of a UnityFS bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEnvelope {
    /// Bundle signature
    pub signature: Signature,
    /// Bundle format version
    pub format_version: i32,
    /// Engine version string (e.g. "5.x.x")
    pub engine_version: String,
    /// Player version that wrote the bundle (e.g. "5.3.4p1")
    pub player_version: String,
    /// Total bundle size
    pub file_size: u64,
    /// Size of the directory block as stored
    pub compressed_directory_size: u32,
    /// Size of the directory block once decompressed
    pub uncompressed_directory_size: u32,
    /// Archive flags (compression type in the low 6 bits)
    pub flags: u32,
    /// Bytes consumed by the envelope
    pub header_size: usize,
}

impl BundleEnvelope {
    /// Parse the envelope at the start of the bundle
    ///
    /// Fails with [`BinaryError::UnsupportedFormat`] for anything but UnityFS.
    pub fn from_cursor(cursor: &mut ByteCursor, options: &DecodeOptions) -> Result<Self> {
        cursor.set_byte_order(ByteOrder::Big);

        let signature_text = cursor.read_cstring(options.string_limit)?;
        let signature = Signature::parse(&signature_text)?;
        if signature != Signature::UnityFS {
            return Err(BinaryError::unsupported_format(format!(
                "{} bundles are not decoded",
                signature
            )));
        }

        let format_version = cursor.read_i32()?;
        let engine_version = cursor.read_cstring(options.string_limit)?;
        let player_version = cursor.read_cstring(options.string_limit)?;

        let file_size = cursor.read_u64()?;
        let compressed_directory_size = cursor.read_u32()?;
        let uncompressed_directory_size = cursor.read_u32()?;
        let flags = cursor.read_u32()?;

        let envelope = Self {
            signature,
            format_version,
            engine_version,
            player_version,
            file_size,
            compressed_directory_size,
            uncompressed_directory_size,
            flags,
            header_size: cursor.position(),
        };

        debug!(
            format_version,
            player_version = %envelope.player_version,
            file_size,
            flags,
            "parsed bundle envelope"
        );
        Ok(envelope)
    }

    /// Raw compression bits of the flags
    pub fn compression_bits(&self) -> u32 {
        self.flags & ArchiveFlags::COMPRESSION_TYPE_MASK
    }

    /// Get the compression type from flags
    pub fn compression_type(&self) -> Result<CompressionType> {
        CompressionType::from_flags(self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope_bytes(signature: &str, flags: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(signature.as_bytes());
        data.push(0);
        data.extend_from_slice(&6i32.to_be_bytes());
        data.extend_from_slice(b"5.x.x\0");
        data.extend_from_slice(b"5.3.4p1\0");
        data.extend_from_slice(&100u64.to_be_bytes());
        data.extend_from_slice(&40u32.to_be_bytes());
        data.extend_from_slice(&40u32.to_be_bytes());
        data.extend_from_slice(&flags.to_be_bytes());
        data
    }

    #[test]
    fn test_unity_fs_envelope() {
        let data = envelope_bytes("UnityFS", 0x43);
        let options = DecodeOptions::default();
        let mut cursor = ByteCursor::new(&data, ByteOrder::Little);
        let envelope = BundleEnvelope::from_cursor(&mut cursor, &options).unwrap();

        assert_eq!(envelope.signature, Signature::UnityFS);
        assert_eq!(envelope.format_version, 6);
        assert_eq!(envelope.engine_version, "5.x.x");
        assert_eq!(envelope.player_version, "5.3.4p1");
        assert_eq!(envelope.file_size, 100);
        assert_eq!(envelope.compressed_directory_size, 40);
        assert_eq!(envelope.compression_bits(), 3);
        assert_eq!(envelope.compression_type().unwrap(), CompressionType::Lz4Hc);
        assert_eq!(envelope.header_size, data.len());
    }

    #[test]
    fn test_legacy_signatures_are_unsupported() {
        for signature in ["UnityWeb", "UnityRaw"] {
            let data = envelope_bytes(signature, 0);
            let options = DecodeOptions::default();
            let mut cursor = ByteCursor::new(&data, ByteOrder::Big);
            let err = BundleEnvelope::from_cursor(&mut cursor, &options).unwrap_err();
            assert!(matches!(err, BinaryError::UnsupportedFormat(_)), "{signature}");
        }
    }

    #[test]
    fn test_truncated_legacy_signature_is_unsupported() {
        // Only the signature survives; the rest of the envelope is missing
        let data = b"UnityWeb\0\0\0";
        let options = DecodeOptions::default();
        let mut cursor = ByteCursor::new(data, ByteOrder::Big);
        let err = BundleEnvelope::from_cursor(&mut cursor, &options).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UnsupportedFormat);
        assert_eq!(cursor.position(), 9);
    }

    #[test]
    fn test_unknown_signature() {
        let data = envelope_bytes("NotUnity", 0);
        let options = DecodeOptions::default();
        let mut cursor = ByteCursor::new(&data, ByteOrder::Big);
        let err = BundleEnvelope::from_cursor(&mut cursor, &options).unwrap_err();
        assert!(matches!(err, BinaryError::UnsupportedFormat(_)));
        assert!(err.is_unsupported());
    }
}

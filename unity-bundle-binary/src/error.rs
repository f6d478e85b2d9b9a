//! Error types for Unity bundle decoding

use thiserror::Error;

/// Result type for Unity bundle operations
pub type Result<T> = std::result::Result<T, BinaryError>;

/// Errors that can occur while decoding a bundle or one of its nodes
#[derive(Error, Debug)]
pub enum BinaryError {
    /// I/O errors surfaced by the underlying cursor
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fixed-width or length-prefixed read ran past the end of the buffer
    #[error("Unexpected end of data: expected {expected} bytes, {actual} remaining")]
    UnexpectedEof { expected: usize, actual: usize },

    /// Envelope signature is not a decodable UnityFS bundle
    #[error("Unsupported bundle format: {0}")]
    UnsupportedFormat(String),

    /// Player version string does not select a modeled directory layout
    #[error("Unsupported player version: {0}")]
    UnsupportedPlayerVersion(String),

    /// Compression type other than "none"
    #[error("Unsupported compression type: {0}")]
    UnsupportedCompressionType(u32),

    /// TypeTree node table is inconsistent (bad depth, bad string offset, ...)
    #[error("Malformed type tree: {0}")]
    MalformedTypeTree(String),

    /// Bounded string was not terminated within its limit, or is not text
    #[error("Invalid string encoding: {0}")]
    InvalidStringEncoding(String),

    /// Structurally invalid data (negative sizes, duplicate names, ...)
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Fieldless category of a [`BinaryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    UnexpectedEof,
    UnsupportedFormat,
    UnsupportedPlayerVersion,
    UnsupportedCompressionType,
    MalformedTypeTree,
    InvalidStringEncoding,
    InvalidData,
}

impl BinaryError {
    /// Create a new unexpected end of data error
    pub fn unexpected_eof(expected: usize, actual: usize) -> Self {
        Self::UnexpectedEof { expected, actual }
    }

    /// Create a new unsupported format error
    pub fn unsupported_format<S: Into<String>>(msg: S) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Create a new unsupported player version error
    pub fn unsupported_player_version<S: Into<String>>(version: S) -> Self {
        Self::UnsupportedPlayerVersion(version.into())
    }

    /// Create a new unsupported compression error from the raw flag value
    pub fn unsupported_compression(compression: u32) -> Self {
        Self::UnsupportedCompressionType(compression)
    }

    /// Create a new malformed type tree error
    pub fn malformed_type_tree<S: Into<String>>(msg: S) -> Self {
        Self::MalformedTypeTree(msg.into())
    }

    /// Create a new invalid string encoding error
    pub fn invalid_string<S: Into<String>>(msg: S) -> Self {
        Self::InvalidStringEncoding(msg.into())
    }

    /// Create a new invalid data error
    pub fn invalid_data<S: Into<String>>(msg: S) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Get the category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BinaryError::Io(_) => ErrorKind::Io,
            BinaryError::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            BinaryError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            BinaryError::UnsupportedPlayerVersion(_) => ErrorKind::UnsupportedPlayerVersion,
            BinaryError::UnsupportedCompressionType(_) => ErrorKind::UnsupportedCompressionType,
            BinaryError::MalformedTypeTree(_) => ErrorKind::MalformedTypeTree,
            BinaryError::InvalidStringEncoding(_) => ErrorKind::InvalidStringEncoding,
            BinaryError::InvalidData(_) => ErrorKind::InvalidData,
        }
    }

    /// Check if this error must abort the current parse
    ///
    /// Only string-encoding problems are tolerable; everything else leaves
    /// the cursor in a state that cannot be trusted.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, BinaryError::InvalidStringEncoding(_))
    }

    /// Check if this error means "variant not supported yet" rather than corruption
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            BinaryError::UnsupportedFormat(_)
                | BinaryError::UnsupportedPlayerVersion(_)
                | BinaryError::UnsupportedCompressionType(_)
        )
    }
}

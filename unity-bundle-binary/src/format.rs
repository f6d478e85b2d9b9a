//! SerializedFile format version matrix
//!
//! Every field whose width or presence depends on the serialized-file format
//! is decided by one of the predicates below, so the branch points live in a
//! single place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Format version branch points
pub mod versions {
    pub const FIRST_WITH_EXTERNAL_REFS: u32 = 6;
    pub const FIRST_WITH_LONG_ID_FLAG: u32 = 7;
    pub const LAST_WITH_LONG_ID_FLAG: u32 = 13;
    pub const FIRST_WITH_ENDIAN_MARKER: u32 = 9;
    pub const LAST_WITH_DESTROYED_FLAG: u32 = 10;
    pub const FIRST_WITH_SCRIPT_TYPES: u32 = 11;
    pub const FIRST_WITH_TYPE_HASHES: u32 = 13;
    pub const FIRST_WITH_ALIGNED_OBJECTS: u32 = 14;
    pub const FIRST_WITH_STRIPPED_FLAG: u32 = 15;
}

/// Serialized-file format version, threaded through every decode call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormatVersion(pub u32);

impl FormatVersion {
    pub fn get(self) -> u32 {
        self.0
    }

    /// Header carries an endianness marker after the four size fields
    pub fn has_endian_marker(self) -> bool {
        self.0 >= versions::FIRST_WITH_ENDIAN_MARKER
    }

    /// Type metadata has the "has type trees" byte and per-class hash table
    pub fn has_type_hashes(self) -> bool {
        self.0 >= versions::FIRST_WITH_TYPE_HASHES
    }

    /// TypeTrees use the flat depth-annotated node table plus string pool
    pub fn uses_blob_type_tree(self) -> bool {
        self.0 == 10 || self.0 >= 12
    }

    /// A "long object ids" flag precedes the object table
    pub fn has_long_id_flag(self) -> bool {
        (versions::FIRST_WITH_LONG_ID_FLAG..=versions::LAST_WITH_LONG_ID_FLAG).contains(&self.0)
    }

    /// Object path ids are read as 64-bit
    pub fn has_long_path_ids(self, long_id_flag: bool) -> bool {
        long_id_flag || self.0 >= versions::FIRST_WITH_ALIGNED_OBJECTS
    }

    /// Object and additional-object records start on a 4-byte boundary
    pub fn needs_alignment(self) -> bool {
        self.0 >= versions::FIRST_WITH_ALIGNED_OBJECTS
    }

    /// Object records end with a legacy 2-byte "is destroyed" field
    pub fn has_destroyed_flag(self) -> bool {
        self.0 <= versions::LAST_WITH_DESTROYED_FLAG
    }

    /// Object records end with a 2-byte script type index
    pub fn has_script_type_index(self) -> bool {
        self.0 >= versions::FIRST_WITH_SCRIPT_TYPES
    }

    /// Object records end with a 1-byte stripped flag
    pub fn has_stripped_flag(self) -> bool {
        self.0 >= versions::FIRST_WITH_STRIPPED_FLAG
    }

    /// The "additional objects" table follows the object directory
    pub fn has_additional_objects(self) -> bool {
        self.0 >= versions::FIRST_WITH_SCRIPT_TYPES
    }

    /// The external reference table follows the object directory
    pub fn has_external_refs(self) -> bool {
        self.0 >= versions::FIRST_WITH_EXTERNAL_REFS
    }
}

impl From<u32> for FormatVersion {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

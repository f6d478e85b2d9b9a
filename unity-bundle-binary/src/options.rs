//! Decoding options

use serde::{Deserialize, Serialize};

/// Bound used for every null-terminated string unless overridden
pub const DEFAULT_STRING_LIMIT: usize = 256;

/// Deepest recursive TypeTree accepted by default
pub const DEFAULT_MAX_TYPE_TREE_DEPTH: usize = 512;

/// Options threaded through bundle and serialized-file decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Maximum bytes read for a null-terminated string, terminator included
    ///
    /// TypeTree string-pool names are bounded by the pool instead.
    pub string_limit: usize,
    /// Maximum nesting of a recursive-form TypeTree
    pub max_type_tree_depth: usize,
    /// Treat `.resource` / `.resS` nodes as raw blobs instead of serialized files
    pub skip_resource_nodes: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            string_limit: DEFAULT_STRING_LIMIT,
            max_type_tree_depth: DEFAULT_MAX_TYPE_TREE_DEPTH,
            skip_resource_nodes: true,
        }
    }
}

impl DecodeOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the null-terminated string bound
    pub fn with_string_limit(mut self, limit: usize) -> Self {
        self.string_limit = limit;
        self
    }

    /// Set the recursive TypeTree depth bound
    pub fn with_max_type_tree_depth(mut self, depth: usize) -> Self {
        self.max_type_tree_depth = depth;
        self
    }

    /// Decode every node as a serialized file, including resource blobs
    pub fn with_skip_resource_nodes(mut self, skip: bool) -> Self {
        self.skip_resource_nodes = skip;
        self
    }

    /// Check whether a node with this name should be left undecoded
    pub fn is_resource_node(&self, name: &str) -> bool {
        self.skip_resource_nodes && (name.ends_with(".resource") || name.ends_with(".resS"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::default();
        assert_eq!(options.string_limit, 256);
        assert_eq!(options.max_type_tree_depth, 512);
        assert!(options.skip_resource_nodes);
    }

    #[test]
    fn test_resource_node_names() {
        let options = DecodeOptions::new();
        assert!(options.is_resource_node("CAB-abc.resource"));
        assert!(options.is_resource_node("CAB-abc.resS"));
        assert!(!options.is_resource_node("CAB-abc"));
        assert!(!options.is_resource_node("resource"));

        let decode_all = options.with_skip_resource_nodes(false);
        assert!(!decode_all.is_resource_node("CAB-abc.resource"));
    }

    #[test]
    fn test_builder() {
        let options = DecodeOptions::new()
            .with_string_limit(64)
            .with_max_type_tree_depth(8);
        assert_eq!(options.string_limit, 64);
        assert_eq!(options.max_type_tree_depth, 8);
    }
}

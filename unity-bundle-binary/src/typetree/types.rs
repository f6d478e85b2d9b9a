//! TypeTree data structures
//!
//! A TypeTree describes the field layout of one Unity class. Nodes live in a
//! flat arena in pre-order; parents refer to their children by index.

use serde::{Deserialize, Serialize};

/// Meta flag marking a field that is padded to 4 bytes after reading
pub const ALIGN_BYTES_FLAG: i32 = 0x4000;

/// A node in the Unity TypeTree
///
/// Each node represents a field or type in the Unity object structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTreeNode {
    /// Type name (e.g., "int", "string", "GameObject")
    pub type_name: String,
    /// Field name (e.g., "m_Name", "m_IsActive")
    pub name: String,
    /// Size in bytes (-1 for variable size)
    pub byte_size: i32,
    /// Index in the type tree
    pub index: i64,
    /// Whether the node is an array
    pub is_array: bool,
    /// Version of this type
    pub version: i32,
    /// Meta flags (alignment, etc.)
    pub meta_flags: i32,
    /// Depth level in the tree, 0 for the root
    pub level: u32,
    /// Raw type-name offset for blob-form nodes
    pub type_str_offset: Option<i32>,
    /// Raw field-name offset for blob-form nodes
    pub name_str_offset: Option<i32>,
    /// Arena indices of the child nodes, in declaration order
    pub children: Vec<usize>,
}

impl TypeTreeNode {
    /// Create a new node with basic information
    pub fn with_info(
        type_name: impl Into<String>,
        name: impl Into<String>,
        byte_size: i32,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            byte_size,
            ..Default::default()
        }
    }

    /// Check if this node is aligned
    pub fn is_aligned(&self) -> bool {
        (self.meta_flags & ALIGN_BYTES_FLAG) != 0
    }
}

/// Complete TypeTree for one class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTree {
    /// Class id the tree belongs to
    pub class_id: i32,
    /// Node arena; index 0 is the root when the tree is not empty
    pub nodes: Vec<TypeTreeNode>,
    /// Raw node-record table (blob form only)
    pub node_data: Vec<u8>,
    /// String pool for type and field names (blob form only)
    pub string_buffer: Vec<u8>,
}

impl TypeTree {
    /// Create a new empty TypeTree
    pub fn new(class_id: i32) -> Self {
        Self {
            class_id,
            ..Default::default()
        }
    }

    /// Create a TypeTree with initial node capacity
    pub fn with_capacity(class_id: i32, capacity: usize) -> Self {
        Self {
            class_id,
            nodes: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Append a node, attaching it to `parent` if given, and return its index
    pub(crate) fn push_node(&mut self, node: TypeTreeNode, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(index);
        }
        index
    }

    /// Check if the TypeTree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Root node, if any
    pub fn root(&self) -> Option<&TypeTreeNode> {
        self.nodes.first()
    }

    /// Node at an arena index
    pub fn node(&self, index: usize) -> Option<&TypeTreeNode> {
        self.nodes.get(index)
    }

    /// Direct children of the node at `index`
    pub fn children(&self, index: usize) -> impl Iterator<Item = &TypeTreeNode> + '_ {
        self.nodes
            .get(index)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&child| self.nodes.get(child))
    }

    /// Arena index of the first direct child of `index` with this field name
    pub fn find_child(&self, index: usize, name: &str) -> Option<usize> {
        self.nodes
            .get(index)?
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes.get(child).is_some_and(|n| n.name == name))
    }

    /// Walk the tree from the root in pre-order
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: if self.nodes.is_empty() {
                Vec::new()
            } else {
                vec![(0, 0)]
            },
        }
    }

    /// Maximum depth reached by any node, or `None` for an empty tree
    pub fn max_depth(&self) -> Option<u32> {
        self.iter().map(|(depth, _)| depth).max()
    }
}

/// Pre-order traversal yielding `(tree depth, node)`
pub struct PreOrder<'a> {
    tree: &'a TypeTree,
    stack: Vec<(usize, u32)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (u32, &'a TypeTreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, depth) = self.stack.pop()?;
        let node = self.tree.nodes.get(index)?;
        self.stack
            .extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        Some((depth, node))
    }
}

//! Isolation tree node
//!
//! Trees are stored as flat arrays of nodes; internal nodes refer to their
//! children by index into the same array.

use serde::{Deserialize, Serialize};

use crate::{average_path_length, MLError, MLResult};

/// Node type in the isolation tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Internal node with split condition
    Internal {
        /// Feature index to split on
        feature: usize,
        /// Values below go left, the rest go right
        split_value: f64,
        /// Left child index
        left: usize,
        /// Right child index
        right: usize,
    },
    /// Leaf node (external)
    External {
        /// Number of training samples that reached this leaf
        size: usize,
    },
}

/// Tree node with its depth from the root
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node type and data
    pub node_type: NodeType,
    /// Edges from the root
    pub depth: usize,
}

impl Node {
    /// Create an internal node
    pub fn internal(feature: usize, split_value: f64, left: usize, right: usize, depth: usize) -> Self {
        Self {
            node_type: NodeType::Internal {
                feature,
                split_value,
                left,
                right,
            },
            depth,
        }
    }

    /// Create an external (leaf) node
    pub fn external(size: usize, depth: usize) -> Self {
        Self {
            node_type: NodeType::External { size },
            depth,
        }
    }

    /// Check if node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self.node_type, NodeType::External { .. })
    }

    /// Path length credited to a sample ending at this node
    ///
    /// For a leaf holding `size` training points this is the depth plus
    /// `c(size)`, the expected depth of the subtree that was never built.
    pub fn path_length(&self) -> f64 {
        match self.node_type {
            NodeType::External { size } => self.depth as f64 + average_path_length(size),
            NodeType::Internal { .. } => self.depth as f64,
        }
    }

    /// Child index to visit next for `sample`
    pub fn traverse(&self, sample: &[f64]) -> MLResult<usize> {
        match self.node_type {
            NodeType::Internal {
                feature,
                split_value,
                left,
                right,
            } => {
                let value = sample.get(feature).ok_or(MLError::InvalidFeature)?;
                if *value < split_value {
                    Ok(left)
                } else {
                    Ok(right)
                }
            }
            NodeType::External { .. } => Err(MLError::InvalidConfig("Cannot traverse from leaf node")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let internal = Node::internal(0, 25.0, 1, 2, 3);
        assert!(!internal.is_leaf());
        assert_eq!(internal.depth, 3);

        let external = Node::external(10, 5);
        assert!(external.is_leaf());
        assert_eq!(external.depth, 5);
    }

    #[test]
    fn test_node_traverse() {
        let node = Node::internal(0, 25.0, 1, 2, 0);
        assert_eq!(node.traverse(&[20.0]).unwrap(), 1);
        assert_eq!(node.traverse(&[25.0]).unwrap(), 2);
        assert_eq!(node.traverse(&[]), Err(MLError::InvalidFeature));
        assert!(Node::external(1, 0).traverse(&[1.0]).is_err());
    }

    #[test]
    fn leaf_path_length_credits_unbuilt_subtree() {
        assert_eq!(Node::external(1, 4).path_length(), 4.0);
        assert_eq!(Node::external(2, 4).path_length(), 5.0);
        assert!(Node::external(50, 4).path_length() > 5.0);
    }
}

//! Isolation tree implementation
//!
//! Trees are built by recursively partitioning a subsample: pick a random
//! feature whose values are not all equal, split uniformly between its
//! minimum and maximum, recurse. A branch stops at `max_depth`, at a single
//! sample, or when every remaining sample is identical.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{MLError, MLResult, Node, NodeType};

/// Configuration for isolation tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig {
    /// Maximum depth of tree
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        // ceil(log2(256))
        Self { max_depth: 8 }
    }
}

/// Isolation tree in array representation; the root is node 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    /// Grow a tree over `samples`, drawing splits from `rng`
    ///
    /// Every sample must have the same, non-zero number of finite features.
    pub fn fit<S, R>(samples: &[S], config: TreeConfig, rng: &mut R) -> MLResult<Self>
    where
        S: AsRef<[f64]>,
        R: Rng,
    {
        if samples.is_empty() {
            return Err(MLError::InsufficientData);
        }
        let rows: Vec<&[f64]> = samples.iter().map(|s| s.as_ref()).collect();
        let num_features = rows[0].len();
        if num_features == 0
            || rows
                .iter()
                .any(|r| r.len() != num_features || r.iter().any(|v| !v.is_finite()))
        {
            return Err(MLError::InvalidFeature);
        }

        let mut tree = Self { nodes: Vec::new() };
        tree.build(rows, 0, config.max_depth, rng);
        Ok(tree)
    }

    fn build<R: Rng>(
        &mut self,
        samples: Vec<&[f64]>,
        depth: usize,
        max_depth: usize,
        rng: &mut R,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node::external(samples.len(), depth));

        if depth >= max_depth || samples.len() <= 1 {
            return index;
        }
        let Some((feature, split_value)) = select_split(&samples, rng) else {
            // No feature with a usable range
            return index;
        };

        let (left, right): (Vec<&[f64]>, Vec<&[f64]>) =
            samples.into_iter().partition(|s| s[feature] < split_value);
        if left.is_empty() || right.is_empty() {
            return index;
        }

        let left_index = self.build(left, depth + 1, max_depth, rng);
        let right_index = self.build(right, depth + 1, max_depth, rng);
        self.nodes[index] = Node::internal(feature, split_value, left_index, right_index, depth);
        index
    }

    /// Calculate path length for a sample
    ///
    /// A sample shorter than the features the tree splits on stops at the
    /// first node it cannot traverse.
    pub fn path_length(&self, sample: &[f64]) -> f64 {
        let mut current = 0;
        while let Some(node) = self.nodes.get(current) {
            if node.is_leaf() {
                return node.path_length();
            }
            match node.traverse(sample) {
                Ok(next) => current = next,
                Err(_) => return node.depth as f64,
            }
        }
        0.0
    }

    /// Nodes in array order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get the number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest node depth
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Check that every child index points forward inside the tree and every
    /// split feature is below `num_features`
    ///
    /// Children always follow their parent, so a well-formed tree cannot
    /// loop during traversal.
    pub fn is_well_formed(&self, num_features: usize) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(i, node)| match node.node_type {
                NodeType::Internal {
                    feature,
                    split_value,
                    left,
                    right,
                } => {
                    feature < num_features
                        && split_value.is_finite()
                        && left > i
                        && right > i
                        && left < self.nodes.len()
                        && right < self.nodes.len()
                }
                NodeType::External { .. } => true,
            })
    }
}

/// Random feature with a non-degenerate range and a split inside it
///
/// Features whose span overflows `f64` cannot be sampled uniformly and are
/// not split on.
fn select_split<R: Rng>(samples: &[&[f64]], rng: &mut R) -> Option<(usize, f64)> {
    let num_features = samples[0].len();
    let candidates: Vec<(usize, f64, f64)> = (0..num_features)
        .filter_map(|feature| {
            let (min, max) = feature_range(samples, feature);
            (max > min && (max - min).is_finite()).then_some((feature, min, max))
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
    Some((feature, rng.gen_range(min..max)))
}

/// Get min/max range for a feature
fn feature_range(samples: &[&[f64]], feature: usize) -> (f64, f64) {
    samples
        .iter()
        .map(|s| s[feature])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_samples() -> Vec<Vec<f64>> {
        vec![
            // Normal samples
            vec![20.0, 50.0, 1013.0],
            vec![22.0, 55.0, 1012.0],
            vec![21.0, 52.0, 1014.0],
            vec![19.0, 48.0, 1013.0],
            // Anomaly
            vec![35.0, 90.0, 1000.0],
        ]
    }

    #[test]
    fn test_tree_fit() {
        let mut rng = ChaCha8Rng::seed_from_u64(123);
        let tree = IsolationTree::fit(&create_test_samples(), TreeConfig { max_depth: 5 }, &mut rng)
            .unwrap();

        assert!(tree.node_count() > 0);
        assert!(tree.depth() <= 5);
        assert!(tree.is_well_formed(3));
    }

    #[test]
    fn test_path_length() {
        let samples = create_test_samples();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tree = IsolationTree::fit(&samples, TreeConfig::default(), &mut rng).unwrap();

        for sample in &samples {
            let path = tree.path_length(sample);
            assert!(path > 0.0);
            assert!(path.is_finite());
        }
    }

    #[test]
    fn identical_samples_make_a_single_leaf() {
        let samples = vec![[1.0, 2.0]; 8];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let tree = IsolationTree::fit(&samples, TreeConfig::default(), &mut rng).unwrap();

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.nodes()[0], Node::external(8, 0));
    }

    #[test]
    fn max_depth_zero_is_a_root_leaf() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let tree =
            IsolationTree::fit(&create_test_samples(), TreeConfig { max_depth: 0 }, &mut rng).unwrap();
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn rejects_bad_samples() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let empty: Vec<Vec<f64>> = Vec::new();
        assert_eq!(
            IsolationTree::fit(&empty, TreeConfig::default(), &mut rng),
            Err(MLError::InsufficientData)
        );

        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert_eq!(
            IsolationTree::fit(&ragged, TreeConfig::default(), &mut rng),
            Err(MLError::InvalidFeature)
        );

        let nan = vec![vec![1.0], vec![f64::NAN]];
        assert_eq!(
            IsolationTree::fit(&nan, TreeConfig::default(), &mut rng),
            Err(MLError::InvalidFeature)
        );
    }

    #[test]
    fn overflowing_span_is_not_split_on() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let wide = vec![vec![-1e308], vec![1e308], vec![0.0]];
        let tree = IsolationTree::fit(&wide, TreeConfig::default(), &mut rng).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.nodes()[0].is_leaf());

        // The second feature still splits
        let mixed = vec![vec![-1e308, 1.0], vec![1e308, 2.0], vec![0.0, 3.0]];
        let tree = IsolationTree::fit(&mixed, TreeConfig::default(), &mut rng).unwrap();
        assert!(tree.node_count() > 1);
        assert!(tree.nodes().iter().all(|node| match node.node_type {
            NodeType::Internal { feature, .. } => feature == 1,
            NodeType::External { .. } => true,
        }));
    }

    #[test]
    fn malformed_indices_are_detected() {
        let tree = IsolationTree {
            nodes: vec![Node::internal(0, 1.0, 0, 5, 0)],
        };
        assert!(!tree.is_well_formed(1));
        assert!(!IsolationTree { nodes: Vec::new() }.is_well_formed(1));
    }
}

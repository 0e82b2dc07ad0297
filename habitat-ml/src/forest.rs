//! Isolation Forest implementation
//!
//! Combines many isolation trees, each grown on its own random subsample, and
//! averages their path lengths into one anomaly score.

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{
    calculate_anomaly_score, AnomalyScore, IsolationTree, MLError, MLResult, TreeConfig,
    DEFAULT_NUM_TREES, DEFAULT_SAMPLE_SIZE, DEFAULT_TRAINING_SEED,
};

/// Configuration for Isolation Forest
#[derive(Debug, Clone, PartialEq)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub num_trees: usize,
    /// Upper bound on each tree's subsample
    pub sample_size: usize,
    /// Maximum tree depth; `None` uses `ceil(log2(subsample))`
    pub max_depth: Option<usize>,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            num_trees: DEFAULT_NUM_TREES,
            sample_size: DEFAULT_SAMPLE_SIZE,
            max_depth: None,
            seed: DEFAULT_TRAINING_SEED,
        }
    }
}

/// Trained Isolation Forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    /// Subsample size each tree was grown on (ψ)
    sample_size: usize,
    /// Features per sample
    num_features: usize,
    /// Individual trees
    trees: Vec<IsolationTree>,
}

impl IsolationForest {
    /// Train a forest on `samples`
    ///
    /// Each tree is grown on `min(sample_size, samples.len())` rows drawn
    /// without replacement. The same seed and data always give the same
    /// forest.
    pub fn fit<S: AsRef<[f64]>>(samples: &[S], config: &ForestConfig) -> MLResult<Self> {
        if config.num_trees == 0 {
            return Err(MLError::InvalidConfig("num_trees must be at least 1"));
        }
        if config.sample_size == 0 {
            return Err(MLError::InvalidConfig("sample_size must be at least 1"));
        }
        if samples.is_empty() {
            return Err(MLError::InsufficientData);
        }

        let num_features = samples[0].as_ref().len();
        if num_features == 0 || samples.iter().any(|s| s.as_ref().len() != num_features) {
            return Err(MLError::InvalidFeature);
        }
        let sample_size = config.sample_size.min(samples.len());
        let tree_config = TreeConfig {
            max_depth: config.max_depth.unwrap_or_else(|| default_max_depth(sample_size)),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut trees = Vec::with_capacity(config.num_trees);
        for _ in 0..config.num_trees {
            let subset: Vec<&[f64]> = index::sample(&mut rng, samples.len(), sample_size)
                .into_iter()
                .map(|i| samples[i].as_ref())
                .collect();
            trees.push(IsolationTree::fit(&subset, tree_config, &mut rng)?);
        }

        Ok(Self {
            sample_size,
            num_features,
            trees,
        })
    }

    /// Calculate anomaly score for a sample
    pub fn anomaly_score(&self, sample: &[f64]) -> AnomalyScore {
        if self.trees.is_empty() {
            return AnomalyScore::new(0.5, 0.0, 0);
        }

        let total_path_length: f64 = self.trees.iter().map(|tree| tree.path_length(sample)).sum();
        let avg_path_length = total_path_length / self.trees.len() as f64;
        let score = calculate_anomaly_score(avg_path_length, self.sample_size);

        AnomalyScore::new(score, avg_path_length, self.trees.len())
    }

    /// Score many samples at once
    pub fn score_samples<S: AsRef<[f64]>>(&self, samples: &[S]) -> Vec<f64> {
        samples
            .iter()
            .map(|sample| self.anomaly_score(sample.as_ref()).score)
            .collect()
    }

    /// Subsample size each tree was grown on
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Features per training sample
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Individual trees
    pub fn trees(&self) -> &[IsolationTree] {
        &self.trees
    }

    /// True when the forest has trees and all of them are internally consistent
    pub fn is_well_formed(&self) -> bool {
        self.sample_size > 0
            && !self.trees.is_empty()
            && self.trees.iter().all(|t| t.is_well_formed(self.num_features))
    }

    /// Get forest statistics
    pub fn stats(&self) -> ForestStats {
        ForestStats {
            num_trees: self.trees.len(),
            total_nodes: self.trees.iter().map(|t| t.node_count()).sum(),
            max_depth: self.trees.iter().map(|t| t.depth()).max().unwrap_or(0),
            sample_size: self.sample_size,
        }
    }
}

fn default_max_depth(sample_size: usize) -> usize {
    (sample_size.max(2) as f64).log2().ceil() as usize
}

/// Forest statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestStats {
    /// Number of trees
    pub num_trees: usize,
    /// Total nodes across all trees
    pub total_nodes: usize,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Per-tree subsample size
    pub sample_size: usize,
}

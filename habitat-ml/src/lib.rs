//! Anomaly Detection for E-Habitat Telemetry
//!
//! ## Overview
//!
//! This crate turns the 12-feature vectors produced by the simulation core
//! into anomaly predictions. It covers the whole model lifecycle:
//!
//! ```text
//! generate_baseline ──▶ BaselineSet ──▶ train ──▶ AnomalyModel ──▶ artifact (JSON)
//!                                                       │
//!                        VirtualNode ◀── model_artifact ┘
//! ```
//!
//! ## Algorithm Overview
//!
//! Isolation Forest isolates points by random axis-aligned partitioning:
//! ```text
//! Normal points: need many partitions to isolate
//! Anomalies:     isolated with few partitions
//!
//! s(x) = 2^(-E[h(x)] / c(ψ))
//! ```
//! where `h(x)` is the path length of `x` in one tree, `ψ` the per-tree
//! subsample size and `c(n)` the average path length of an unsuccessful
//! binary-search-tree lookup over `n` points.
//!
//! ### Threshold and decision
//!
//! Training fixes a threshold `t`: the `(1 - contamination)` quantile of the
//! training scores. The model then reports
//! ```text
//! decision(x) = t - s(x)      (higher = more normal)
//! is_anomaly  = decision(x) < 0
//! ```
//!
//! ## Performance Characteristics
//!
//! | Operation       | Time       | Memory |
//! |-----------------|------------|--------|
//! | Train tree      | O(ψ log ψ) | O(ψ)   |
//! | Score sample    | O(T log ψ) | O(1)   |
//! | Load artifact   | O(nodes)   | O(nodes) |
//!
//! ## Example
//!
//! ```rust
//! use habitat_core::NodeConfig;
//! use habitat_ml::{generate_baseline, train, TrainingConfig};
//!
//! let baseline = generate_baseline(&NodeConfig::default(), 300).unwrap();
//! let model = train(&baseline, &TrainingConfig { num_trees: 20, ..Default::default() }).unwrap();
//!
//! let prediction = model.predict(&baseline.rows[0]);
//! assert!(prediction.score.is_finite());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

use habitat_core::SimulationError;
use thiserror_no_std::Error;

pub mod baseline;
pub mod forest;
pub mod model;
pub mod node;
pub mod scoring;
pub mod tree;
pub mod training;

pub use baseline::{generate_baseline, BaselineSet};
pub use forest::{ForestConfig, ForestStats, IsolationForest};
pub use model::{node_from_config, AnomalyModel, ModelArtifactExt, ARTIFACT_FORMAT_VERSION};
pub use node::{Node, NodeType};
pub use scoring::{calculate_anomaly_score, contamination_threshold, AnomalyScore};
pub use training::{train, TrainingConfig};
pub use tree::{IsolationTree, TreeConfig};

/// Default number of trees in a forest
pub const DEFAULT_NUM_TREES: usize = 100;

/// Default per-tree subsample size
pub const DEFAULT_SAMPLE_SIZE: usize = 256;

/// Default expected share of outliers in training data
pub const DEFAULT_CONTAMINATION: f64 = 0.01;

/// Default training seed
pub const DEFAULT_TRAINING_SEED: u64 = 42;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Result type for ML operations
pub type MLResult<T> = Result<T, MLError>;

/// ML-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MLError {
    /// Not enough data to train
    #[error("Insufficient data for training")]
    InsufficientData,

    /// Sample is empty, ragged or contains non-finite values
    #[error("Invalid feature data")]
    InvalidFeature,

    /// Configuration out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// No artifact at the given path
    #[error("Model artifact not found: {path}")]
    ArtifactNotFound {
        /// Path that was looked up
        path: String,
    },

    /// Artifact exists but cannot be used
    #[error("Model artifact is corrupt: {0}")]
    ArtifactCorrupt(String),

    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(String),

    /// Vector length differs from what the model was trained on
    #[error("Feature count mismatch: expected {expected}, found {found}")]
    FeatureCountMismatch {
        /// Features the model expects
        expected: usize,
        /// Features supplied
        found: usize,
    },

    /// Node configuration rejected by the simulation core
    #[error("Simulation error: {0}")]
    Simulation(SimulationError),
}

impl From<SimulationError> for MLError {
    fn from(err: SimulationError) -> Self {
        MLError::Simulation(err)
    }
}

/// Average path length of an unsuccessful search in a BST of `n` points
///
/// `c(n) = 2H(n-1) - 2(n-1)/n`, with `H(i) ≈ ln(i) + γ`. Used both to
/// normalise scores and to credit the unexpanded points in a leaf.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

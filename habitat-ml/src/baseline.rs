//! Baseline feature generation
//!
//! Runs a detector-less node under normal conditions and records one feature
//! vector per step once the window is full. The result is the training set
//! for `train`, persisted as JSON:
//!
//! ```text
//! {
//!   "window_size": 10,
//!   "feature_names": ["temp_mean", "temp_var", ...],
//!   "rows": [[21.0, 0.0001, ...], ...]
//! }
//! ```

use std::io::ErrorKind;
use std::path::Path;

use habitat_core::{
    FeatureVector, NodeConfig, SimulatedTime, SlidingWindowFeatureExtractor, FEATURE_NAMES,
};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{MLError, MLResult};

/// Steps in a default baseline run (48 h at one step per second)
pub const DEFAULT_BASELINE_STEPS: usize = 172_800;

/// Identifier of the node used for baseline runs
pub const BASELINE_NODE_ID: &str = "baseline-node";

const PROGRESS_INTERVAL: usize = 10_000;

/// Feature rows collected over a baseline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineSet {
    /// Window size the rows were extracted with
    pub window_size: usize,
    /// Column names, in feature-vector order
    pub feature_names: Vec<String>,
    /// One feature vector per step after the window filled
    pub rows: Vec<FeatureVector>,
}

impl BaselineSet {
    /// Empty set for the given window size
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no rows were collected
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Load a baseline file
    pub fn load(path: impl AsRef<Path>) -> MLResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MLError::ArtifactNotFound {
                path: path.display().to_string(),
            },
            _ => MLError::Io(format!("{}: {}", path.display(), e)),
        })?;
        let set: Self =
            serde_json::from_str(&text).map_err(|e| MLError::ArtifactCorrupt(e.to_string()))?;

        if set.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
            return Err(MLError::ArtifactCorrupt(
                "feature columns do not match the current layout".to_string(),
            ));
        }
        Ok(set)
    }

    /// Write the set as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> MLResult<()> {
        let path = path.as_ref();
        let text = serde_json::to_string(self).map_err(|e| MLError::Io(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| MLError::Io(format!("{}: {}", path.display(), e)))
    }
}

/// Simulate `steps` steps of normal operation and collect feature rows
///
/// The node is built from `config` without a detector; timestamps come from
/// a simulated clock. With `w = config.window_size` the set holds
/// `steps - w + 1` rows (none if `steps < w`).
pub fn generate_baseline(config: &NodeConfig, steps: usize) -> MLResult<BaselineSet> {
    config.validate()?;
    let mut node = config
        .node_builder()
        .time_source(Box::new(SimulatedTime::from_epoch()))
        .build()?;
    let mut extractor = SlidingWindowFeatureExtractor::new(config.window_size)?;
    let mut set = BaselineSet::new(config.window_size);
    set.rows.reserve(steps.saturating_sub(config.window_size) + 1);

    info!("generating baseline data for {} steps", steps);
    for i in 0..steps {
        let record = node.step();
        extractor.add_point(&record);
        if extractor.is_window_ready() {
            set.rows.push(extractor.extract_features()?);
        }

        if (i + 1) % PROGRESS_INTERVAL == 0 {
            info!("baseline progress: {}/{} steps", i + 1, steps);
        }
    }

    info!(
        "baseline complete: {} rows x {} features",
        set.rows.len(),
        set.feature_names.len()
    );
    Ok(set)
}

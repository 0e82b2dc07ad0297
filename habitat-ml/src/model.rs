//! Trained anomaly model and its on-disk artifact
//!
//! An `AnomalyModel` is an isolation forest plus the threshold chosen at
//! training time. It is persisted as one JSON document:
//!
//! ```text
//! {
//!   "format_version": 1,
//!   "feature_count": 12,
//!   "contamination": 0.01,
//!   "threshold": 0.57,
//!   "forest": { "sample_size": 256, "num_features": 12, "trees": [...] }
//! }
//! ```
//!
//! Loading never panics: a missing file is `ArtifactNotFound`, anything
//! unparsable or inconsistent is `ArtifactCorrupt`. A node that cannot load
//! its artifact simply runs without detection.

use std::io::ErrorKind;
use std::path::Path;

use habitat_core::{
    AnomalyDetector, FeatureVector, NodeBuilder, NodeConfig, Prediction, VirtualNode,
    FEATURE_COUNT,
};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{IsolationForest, MLError, MLResult};

/// Artifact layout version written by `save`
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Isolation forest with a fixed decision threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyModel {
    format_version: u32,
    feature_count: usize,
    contamination: f64,
    threshold: f64,
    forest: IsolationForest,
}

impl AnomalyModel {
    /// Wrap a trained forest
    pub fn new(forest: IsolationForest, contamination: f64, threshold: f64) -> MLResult<Self> {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_count: forest.num_features(),
            contamination,
            threshold,
            forest,
        }
        .validated()
        .map_err(|_| MLError::InvalidConfig("forest does not match the 12-feature layout"))
    }

    /// Load an artifact from disk
    pub fn load(path: impl AsRef<Path>) -> MLResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MLError::ArtifactNotFound {
                path: path.display().to_string(),
            },
            _ => MLError::Io(format!("{}: {}", path.display(), e)),
        })?;
        Self::from_json(&text)
    }

    /// Parse an artifact from its JSON text
    pub fn from_json(text: &str) -> MLResult<Self> {
        let model: Self =
            serde_json::from_str(text).map_err(|e| MLError::ArtifactCorrupt(e.to_string()))?;
        model.validated()
    }

    /// Render the artifact as JSON
    pub fn to_json(&self) -> MLResult<String> {
        serde_json::to_string(self).map_err(|e| MLError::Io(e.to_string()))
    }

    /// Write the artifact to disk
    pub fn save(&self, path: impl AsRef<Path>) -> MLResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .map_err(|e| MLError::Io(format!("{}: {}", path.display(), e)))
    }

    /// Raw isolation score `s(x)` in `(0, 1]`; higher is more anomalous
    pub fn raw_score(&self, features: &FeatureVector) -> f64 {
        self.forest.anomaly_score(features).score
    }

    /// Signed distance to the threshold; higher is more normal, negative is an outlier
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        self.threshold - self.raw_score(features)
    }

    /// Score and classify one feature vector
    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        let score = self.decision_function(features);
        Prediction {
            score,
            is_anomaly: score < 0.0,
        }
    }

    /// Score a vector of unchecked length
    pub fn predict_slice(&self, features: &[f64]) -> MLResult<Prediction> {
        let vector: &FeatureVector = features.try_into().map_err(|_| MLError::FeatureCountMismatch {
            expected: FEATURE_COUNT,
            found: features.len(),
        })?;
        Ok(self.predict(vector))
    }

    /// Raw-score threshold fixed at training time
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Expected outlier share the threshold was chosen for
    pub fn contamination(&self) -> f64 {
        self.contamination
    }

    /// Underlying forest
    pub fn forest(&self) -> &IsolationForest {
        &self.forest
    }

    fn validated(self) -> MLResult<Self> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(MLError::ArtifactCorrupt(format!(
                "unsupported format version {}",
                self.format_version
            )));
        }
        if self.feature_count != FEATURE_COUNT || self.forest.num_features() != FEATURE_COUNT {
            return Err(MLError::ArtifactCorrupt(format!(
                "expected {} features, artifact has {}",
                FEATURE_COUNT, self.feature_count
            )));
        }
        if !self.threshold.is_finite() || !self.forest.is_well_formed() {
            return Err(MLError::ArtifactCorrupt("inconsistent forest".to_string()));
        }
        Ok(self)
    }
}

impl AnomalyDetector for AnomalyModel {
    fn predict(&self, features: &FeatureVector) -> Prediction {
        AnomalyModel::predict(self, features)
    }
}

/// Attach a model artifact to a node under construction
pub trait ModelArtifactExt: Sized {
    /// Load `path` and attach it as the node's detector
    ///
    /// A missing or corrupt artifact is logged and the node is built without
    /// detection.
    fn model_artifact(self, path: impl AsRef<Path>) -> Self;
}

impl ModelArtifactExt for NodeBuilder {
    fn model_artifact(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match AnomalyModel::load(path) {
            Ok(model) => self.detector(Box::new(model)),
            Err(e) => {
                warn!(
                    "anomaly detection disabled: cannot load {}: {}",
                    path.display(),
                    e
                );
                self
            }
        }
    }
}

/// Build the node a configuration describes, attaching its model if one is set
pub fn node_from_config(config: &NodeConfig) -> MLResult<VirtualNode> {
    let mut builder = config.node_builder();
    if let Some(path) = &config.model_path {
        builder = builder.model_artifact(path);
    }
    Ok(builder.build()?)
}

//! Model training from a baseline set

use log::info;

use crate::{
    contamination_threshold, AnomalyModel, BaselineSet, ForestConfig, IsolationForest, MLError,
    MLResult, DEFAULT_CONTAMINATION, DEFAULT_NUM_TREES, DEFAULT_SAMPLE_SIZE,
    DEFAULT_TRAINING_SEED,
};

/// Training parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    /// Trees in the forest
    pub num_trees: usize,
    /// Upper bound on each tree's subsample
    pub max_samples: usize,
    /// Expected share of outliers in the baseline, in `(0, 0.5]`
    pub contamination: f64,
    /// Seed for subsampling and splits
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_trees: DEFAULT_NUM_TREES,
            max_samples: DEFAULT_SAMPLE_SIZE,
            contamination: DEFAULT_CONTAMINATION,
            seed: DEFAULT_TRAINING_SEED,
        }
    }
}

/// Fit an anomaly model to a baseline
///
/// The threshold is set so that about `contamination` of the baseline rows
/// fall on the anomalous side.
pub fn train(baseline: &BaselineSet, config: &TrainingConfig) -> MLResult<AnomalyModel> {
    if !(config.contamination > 0.0 && config.contamination <= 0.5) {
        return Err(MLError::InvalidConfig("contamination must be in (0, 0.5]"));
    }
    if baseline.is_empty() {
        return Err(MLError::InsufficientData);
    }

    info!(
        "training isolation forest on {} samples ({} trees)",
        baseline.len(),
        config.num_trees
    );
    let forest = IsolationForest::fit(
        &baseline.rows,
        &ForestConfig {
            num_trees: config.num_trees,
            sample_size: config.max_samples,
            max_depth: None,
            seed: config.seed,
        },
    )?;

    let scores = forest.score_samples(&baseline.rows);
    let threshold =
        contamination_threshold(&scores, config.contamination).ok_or(MLError::InsufficientData)?;
    info!(
        "model trained: samples={} contamination={} trees={} threshold={:.4}",
        baseline.len(),
        config.contamination,
        config.num_trees,
        threshold
    );

    AnomalyModel::new(forest, config.contamination, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_baseline;
    use habitat_core::NodeConfig;

    fn quick() -> TrainingConfig {
        TrainingConfig {
            num_trees: 25,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn empty_baseline_is_insufficient() {
        assert_eq!(
            train(&BaselineSet::new(10), &quick()),
            Err(MLError::InsufficientData)
        );
    }

    #[test]
    fn contamination_out_of_range_is_rejected() {
        let baseline = generate_baseline(&NodeConfig::default(), 40).unwrap();
        for contamination in [0.0, -0.1, 0.6, f64::NAN] {
            let config = TrainingConfig {
                contamination,
                ..quick()
            };
            assert!(matches!(
                train(&baseline, &config),
                Err(MLError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn about_contamination_share_is_flagged() {
        let baseline = generate_baseline(&NodeConfig::default(), 600).unwrap();
        let config = TrainingConfig {
            contamination: 0.05,
            ..quick()
        };
        let model = train(&baseline, &config).unwrap();

        let flagged = baseline
            .rows
            .iter()
            .filter(|row| model.predict(row).is_anomaly)
            .count();
        let share = flagged as f64 / baseline.len() as f64;
        assert!(share <= 0.06, "flagged share {share}");
        assert_eq!(model.contamination(), 0.05);
    }

    #[test]
    fn training_is_deterministic() {
        let baseline = generate_baseline(&NodeConfig::default(), 200).unwrap();
        let a = train(&baseline, &quick()).unwrap();
        let b = train(&baseline, &quick()).unwrap();
        assert_eq!(a, b);
    }
}

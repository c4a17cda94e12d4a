//! Synthetic accuracy evaluation on the three coordinate planes.
//!
//! For every configured noise level, each iteration draws a fresh sample from
//! its own [`ReplayToken`], prices triples with [`PlaneCost::for_noise`], runs
//! the selected driver and scores the labels against the ground truth.

use anyhow::{bail, Context, Result};
use cubic::planes::{evaluate, sample_planes, PlaneCost, ReplayToken, SampleCfg, Vec3};
use cubic::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Parameters of one evaluation run, read from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    pub iterations: usize,
    pub stddev_values: Vec<f64>,
    pub points_per_plane: usize,
}

impl EvalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            bail!("iterations must be positive");
        }
        if self.stddev_values.is_empty() {
            bail!("stddev_values must not be empty");
        }
        if let Some(s) = self
            .stddev_values
            .iter()
            .find(|s| !(s.is_finite() && **s > 0.0))
        {
            bail!("stddev_values must be finite and positive, got {s}");
        }
        if self.points_per_plane == 0 {
            bail!("points_per_plane must be positive");
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing evaluation config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("invalid evaluation config {}", path.display()))?;
        Ok(cfg)
    }
}

/// Scores for one noise level, one entry per iteration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccuracyResult {
    pub stddev: f64,
    pub accuracies: Vec<f64>,
    pub planes_errors: Vec<f64>,
    /// Wall time over all iterations, in milliseconds.
    pub millis: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub algorithm: String,
    pub seed: u64,
    pub config: EvalConfig,
    pub results: Vec<AccuracyResult>,
}

/// The planes every evaluation samples from.
pub fn axis_planes() -> [Vec3; 3] {
    [Vec3::x(), Vec3::y(), Vec3::z()]
}

pub fn run_evaluation(cfg: &EvalConfig, algorithm: Algorithm, seed: u64) -> Result<EvalReport> {
    cfg.validate()?;
    let planes = axis_planes();
    let total = cfg.stddev_values.len();
    let mut results = Vec::with_capacity(total);
    for (level, &stddev) in cfg.stddev_values.iter().enumerate() {
        let start = Instant::now();
        let cost = PlaneCost::for_noise(stddev);
        let sample_cfg = SampleCfg {
            points_per_plane: cfg.points_per_plane,
            stddev,
        };
        let mut accuracies = Vec::with_capacity(cfg.iterations);
        let mut planes_errors = Vec::with_capacity(cfg.iterations);
        for it in 0..cfg.iterations {
            let token = ReplayToken {
                seed,
                index: (level * cfg.iterations + it) as u64,
            };
            let mut rng = token.to_std_rng();
            let sample = sample_planes(&planes, sample_cfg, &mut rng)?;
            let labels = algorithm.run(&sample.points, &cost, None)?;
            let eval = evaluate(&labels, &sample)
                .with_context(|| format!("scoring iteration {it} at stddev {stddev}"))?;
            tracing::debug!(stddev, it, accuracy = eval.accuracy, "iteration");
            accuracies.push(eval.accuracy);
            planes_errors.push(eval.planes_error);
        }
        let millis = start.elapsed().as_millis() as u64;
        let mean = accuracies.iter().sum::<f64>() / accuracies.len() as f64;
        info!(
            level = level + 1,
            of = total,
            stddev,
            mean_accuracy = mean,
            millis,
            "stddev level done"
        );
        results.push(AccuracyResult {
            stddev,
            accuracies,
            planes_errors,
            millis,
        });
    }
    Ok(EvalReport {
        algorithm: algorithm.name().to_string(),
        seed,
        config: cfg.clone(),
        results,
    })
}

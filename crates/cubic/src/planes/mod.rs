//! Planes through the origin: the motivating application.
//!
//! Purpose
//! - Price a triple of 3D points by how badly they fit a common plane through
//!   the origin, so that the local-search drivers group points by plane.
//! - Generate noisy synthetic data on known planes and score a partitioning
//!   against the ground truth.
//!
//! Why this design
//! - The least-squares normal is the singular vector of `AᵀA` with the
//!   smallest singular value; `AᵀA` is 3×3 regardless of the point count, so
//!   the SVD is cheap and the triple oracle stays allocation-free.
//!
//! Code cross-refs: `triple::TripleCost`, `algorithm::Algorithm`.

pub mod eval;
pub mod sample;

pub use eval::{evaluate, Evaluation};
pub use sample::{
    sample_near_plane, sample_on_plane, sample_planes, sample_random_planes, PlaneSample,
    ReplayToken, SampleCfg, SampleError,
};

use nalgebra::{Matrix3, Vector3, SVD};
use std::fmt;

use crate::triple::TripleCost;

pub type Vec3 = Vector3<f64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitError {
    /// No points to fit.
    NoPoints,
    /// A coordinate is NaN or infinite.
    NonFinite,
    /// The decomposition did not produce singular vectors.
    Degenerate,
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::NoPoints => write!(f, "cannot fit a plane to zero points"),
            FitError::NonFinite => write!(f, "point coordinates must be finite"),
            FitError::Degenerate => write!(f, "singular value decomposition failed"),
        }
    }
}

impl std::error::Error for FitError {}

/// Unit normal of the plane through the origin minimizing the summed squared
/// distances to `points`.
pub fn fit_plane(points: &[Vec3]) -> Result<Vec3, FitError> {
    if points.is_empty() {
        return Err(FitError::NoPoints);
    }
    let mut m = Matrix3::<f64>::zeros();
    for p in points {
        m += p * p.transpose();
    }
    if !m.iter().all(|v| v.is_finite()) {
        return Err(FitError::NonFinite);
    }
    let svd = SVD::new(m, true, false);
    let u = svd.u.ok_or(FitError::Degenerate)?;
    let idx = svd.singular_values.imin();
    let n = u.column(idx).into_owned();
    let len = n.norm();
    if len == 0.0 || !len.is_finite() {
        return Err(FitError::Degenerate);
    }
    Ok(n / len)
}

/// Distance of `p` from the plane through the origin with unit normal `normal`.
#[inline]
pub fn dist_from_plane(normal: &Vec3, p: &Vec3) -> f64 {
    normal.dot(p).abs()
}

/// Triple oracle: `amplification · (max distance to the fitted plane − threshold)`.
///
/// Negative when all three points lie within `threshold` of a common plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneCost {
    pub threshold: f64,
    pub amplification: f64,
}

impl Default for PlaneCost {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            amplification: 1.0,
        }
    }
}

impl PlaneCost {
    /// Calibration used for synthetic data with Gaussian noise of `stddev`:
    /// threshold `3σ`, amplification `1/σ`.
    pub fn for_noise(stddev: f64) -> Self {
        Self {
            threshold: 3.0 * stddev,
            amplification: 1.0 / stddev,
        }
    }
}

impl TripleCost<Vec3> for PlaneCost {
    fn triple_cost(&self, a: &Vec3, b: &Vec3, c: &Vec3) -> f64 {
        // Three points on a line through the origin fit every plane.
        let max_dist = fit_plane(&[*a, *b, *c]).map_or(0.0, |n| {
            dist_from_plane(&n, a)
                .max(dist_from_plane(&n, b))
                .max(dist_from_plane(&n, c))
        });
        self.amplification * (max_dist - self.threshold)
    }
}

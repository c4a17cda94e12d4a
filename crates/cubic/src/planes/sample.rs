//! Synthetic points on and near planes through the origin.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use std::fmt;

use super::Vec3;

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// How many points to draw per plane and how far they stray from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleCfg {
    pub points_per_plane: usize,
    /// Standard deviation of the signed distance to the plane; `0` keeps
    /// every point on its plane.
    pub stddev: f64,
}

impl Default for SampleCfg {
    fn default() -> Self {
        Self {
            points_per_plane: 10,
            stddev: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleError {
    /// Standard deviation is negative or not finite.
    InvalidStddev(f64),
    /// A plane normal has zero (or non-finite) length.
    ZeroNormal { plane: usize },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::InvalidStddev(s) => {
                write!(f, "standard deviation must be finite and non-negative, got {s}")
            }
            SampleError::ZeroNormal { plane } => {
                write!(f, "normal of plane {plane} has no usable length")
            }
        }
    }
}

impl std::error::Error for SampleError {}

/// Points drawn plane by plane, with the plane index of each point.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneSample {
    pub planes: Vec<Vec3>,
    pub points: Vec<Vec3>,
    pub truth: Vec<usize>,
}

/// Uniform random unit vector.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let len = v.norm();
        if len > 1e-9 && len <= 1.0 {
            return v / len;
        }
    }
}

/// Point of the unit cube projected onto the plane with normal `normal`.
pub fn sample_on_plane<R: Rng + ?Sized>(normal: &Vec3, rng: &mut R) -> Vec3 {
    let p = Vec3::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-1.0..=1.0),
    );
    p - normal * (normal.dot(&p) / normal.norm_squared())
}

/// Like [`sample_on_plane`], then shifted along the normal by a Gaussian
/// distance with standard deviation `stddev`.
pub fn sample_near_plane<R: Rng + ?Sized>(normal: &Vec3, stddev: f64, rng: &mut R) -> Vec3 {
    let p = sample_on_plane(normal, rng);
    if stddev == 0.0 {
        return p;
    }
    let z: f64 = StandardNormal.sample(rng);
    let d = stddev * z;
    p + normal * (d / normal.norm())
}

/// Draw `cfg.points_per_plane` points near each of `planes`, in plane order.
pub fn sample_planes<R: Rng + ?Sized>(
    planes: &[Vec3],
    cfg: SampleCfg,
    rng: &mut R,
) -> Result<PlaneSample, SampleError> {
    if !(cfg.stddev.is_finite() && cfg.stddev >= 0.0) {
        return Err(SampleError::InvalidStddev(cfg.stddev));
    }
    for (plane, n) in planes.iter().enumerate() {
        let len = n.norm();
        if !(len.is_finite() && len > 0.0) {
            return Err(SampleError::ZeroNormal { plane });
        }
    }
    let total = planes.len() * cfg.points_per_plane;
    let mut points = Vec::with_capacity(total);
    let mut truth = Vec::with_capacity(total);
    for (idx, n) in planes.iter().enumerate() {
        for _ in 0..cfg.points_per_plane {
            points.push(sample_near_plane(n, cfg.stddev, rng));
            truth.push(idx);
        }
    }
    Ok(PlaneSample {
        planes: planes.to_vec(),
        points,
        truth,
    })
}

/// Draw `count` random planes, then sample points near them.
pub fn sample_random_planes<R: Rng + ?Sized>(
    count: usize,
    cfg: SampleCfg,
    rng: &mut R,
) -> Result<PlaneSample, SampleError> {
    let planes: Vec<Vec3> = (0..count).map(|_| random_unit_vector(rng)).collect();
    sample_planes(&planes, cfg, rng)
}

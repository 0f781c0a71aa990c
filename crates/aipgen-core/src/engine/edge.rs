use super::config::EdgeConfig;
use crate::core::surface::Surface;
use crate::core::utils::spatial::SpatialIndex;
use nalgebra::Point3;
use std::f64::consts::PI;
use tracing::trace;

const MIN_PERCENTILE: f64 = 0.1;

/// Drops the sparse fringe of an atom's surface patch.
///
/// Each point's sparsity is `π·r² / n`, where `n` counts the patch points
/// (itself included) within `r`. Points at or below the configured sparsity
/// percentile are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector {
    percentile: f64,
    neighbor_radius: f64,
}

impl EdgeDetector {
    pub fn new(percentile: f64, neighbor_radius: f64) -> Self {
        let percentile = if percentile.is_nan() || percentile <= 0.0 {
            MIN_PERCENTILE
        } else {
            percentile.min(100.0)
        };
        Self {
            percentile,
            neighbor_radius,
        }
    }

    pub fn from_config(config: &EdgeConfig) -> Self {
        Self::new(config.percentile, config.neighbor_radius)
    }

    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Returns the interior of `subset` (sample indices into `surface`), in input order.
    pub fn interior(&self, surface: &Surface, subset: &[usize]) -> Vec<usize> {
        if subset.len() < 2 {
            return subset.to_vec();
        }
        let positions: Vec<Point3<f64>> = subset
            .iter()
            .filter_map(|&i| surface.sample(i).map(|s| s.position))
            .collect();
        let index = SpatialIndex::new(&positions);
        let disc = PI * self.neighbor_radius * self.neighbor_radius;

        let sparsity: Vec<f64> = positions
            .iter()
            .map(|p| disc / index.count_within(p, self.neighbor_radius).max(1) as f64)
            .collect();

        let threshold = percentile(&sparsity, self.percentile);
        let kept: Vec<usize> = subset
            .iter()
            .zip(&sparsity)
            .filter(|&(_, s)| *s <= threshold)
            .map(|(&i, _)| i)
            .collect();
        trace!(
            input = subset.len(),
            kept = kept.len(),
            threshold,
            "Edge detection finished."
        );
        kept
    }
}

/// Percentile with linear interpolation between closest ranks.
fn percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

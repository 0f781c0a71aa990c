use crate::core::surface::Surface;
use crate::core::utils::geometry::centroid;
use crate::core::utils::hull::hull_area;
use itertools::Itertools;
use nalgebra::Point3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

const AREA_EPS: f64 = 1e-9;

/// How the two initial medoids are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStrategy {
    /// The two mutually most distant points.
    FarthestPair,
    /// The first point and the point farthest from it.
    FirstAndFarthest,
    /// Two distinct points drawn from a seeded generator.
    Random(u64),
}

impl SeedStrategy {
    fn seeds(self, points: &[Point3<f64>]) -> Option<(usize, usize)> {
        if points.len() < 2 {
            return None;
        }
        let dist = |a: usize, b: usize| (points[a] - points[b]).norm();
        let pair = match self {
            SeedStrategy::FarthestPair => (0..points.len())
                .tuple_combinations()
                .max_by(|&(a, b), &(c, d)| dist(a, b).total_cmp(&dist(c, d)))?,
            SeedStrategy::FirstAndFarthest => {
                let far = (1..points.len())
                    .max_by(|&a, &b| dist(0, a).total_cmp(&dist(0, b)))?;
                (0, far)
            }
            SeedStrategy::Random(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                let picked = rand::seq::index::sample(&mut rng, points.len(), 2);
                (picked.index(0), picked.index(1))
            }
        };
        (dist(pair.0, pair.1) > 0.0).then_some(pair)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSettings {
    pub max_iterations: usize,
    /// Minimum accepted distance between the two cluster centroids (Å).
    pub separation_floor: f64,
    pub max_area_ratio: f64,
    pub random_seed: u64,
}

/// Iterative 2-medoid clustering. Returns the member lists (indices into
/// `points`) of the two clusters, or `None` if one of them ends up empty.
pub fn two_medoids(
    points: &[Point3<f64>],
    seeds: (usize, usize),
    max_iterations: usize,
) -> Option<[Vec<usize>; 2]> {
    let mut medoids = [seeds.0, seeds.1];
    let mut clusters: [Vec<usize>; 2] = [Vec::new(), Vec::new()];

    for iteration in 0..max_iterations {
        clusters = [Vec::new(), Vec::new()];
        for (i, p) in points.iter().enumerate() {
            let d0 = (p - points[medoids[0]]).norm();
            let d1 = (p - points[medoids[1]]).norm();
            clusters[usize::from(d1 < d0)].push(i);
        }
        if clusters.iter().any(Vec::is_empty) {
            return None;
        }

        let updated = [medoid(points, &clusters[0])?, medoid(points, &clusters[1])?];
        if updated == medoids {
            trace!(iteration, "Medoids converged.");
            break;
        }
        medoids = updated;
    }

    Some(clusters)
}

/// Member minimizing the summed distance to all other members.
pub fn medoid(points: &[Point3<f64>], members: &[usize]) -> Option<usize> {
    let cost = |m: usize| -> f64 { members.iter().map(|&o| (points[m] - points[o]).norm()).sum() };
    members
        .iter()
        .copied()
        .min_by(|&a, &b| cost(a).total_cmp(&cost(b)))
}

fn is_acceptable(
    points: &[Point3<f64>],
    clusters: &[Vec<usize>; 2],
    settings: &ClusterSettings,
) -> bool {
    let members =
        |c: &Vec<usize>| -> Vec<Point3<f64>> { c.iter().map(|&i| points[i]).collect() };
    let (a, b) = (members(&clusters[0]), members(&clusters[1]));

    let separation = match (centroid(&a), centroid(&b)) {
        (Some(ca), Some(cb)) => (ca - cb).norm(),
        _ => return false,
    };
    if separation < settings.separation_floor {
        debug!(separation, floor = settings.separation_floor, "Clusters too close.");
        return false;
    }

    let (area_a, area_b) = (hull_area(&a), hull_area(&b));
    let flat_a = area_a <= AREA_EPS;
    let flat_b = area_b <= AREA_EPS;
    match (flat_a, flat_b) {
        (true, true) => true,
        (true, false) | (false, true) => {
            debug!(area_a, area_b, "One cluster has no hull area.");
            false
        }
        (false, false) => {
            let ratio = area_a.max(area_b) / area_a.min(area_b);
            if ratio > settings.max_area_ratio {
                debug!(ratio, "Cluster hull areas too unbalanced.");
            }
            ratio <= settings.max_area_ratio
        }
    }
}

/// Splits `points` into two validated clusters, trying each seeding strategy
/// in turn, or collapses everything into one cluster.
pub fn split(points: &[Point3<f64>], settings: &ClusterSettings) -> Vec<Vec<usize>> {
    let strategies = [
        SeedStrategy::FarthestPair,
        SeedStrategy::FirstAndFarthest,
        SeedStrategy::Random(settings.random_seed),
    ];

    for strategy in strategies {
        let Some(seeds) = strategy.seeds(points) else {
            continue;
        };
        if let Some(clusters) = two_medoids(points, seeds, settings.max_iterations) {
            if is_acceptable(points, &clusters, settings) {
                trace!(?strategy, "Accepted two-cluster split.");
                let [a, b] = clusters;
                return vec![a, b];
            }
        }
    }

    debug!(points = points.len(), "Collapsing to a single cluster.");
    vec![(0..points.len()).collect()]
}

/// Sign of the majority of a cluster's potentials; zero counts as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

/// Extremum of one cluster on a surface, with an optional opposite-sign partner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterExtremum {
    pub polarity: Polarity,
    pub sample_index: usize,
    pub potential: f64,
    pub minority: Option<(usize, f64)>,
}

fn extreme_of<I: Iterator<Item = usize>>(
    surface: &Surface,
    indices: I,
    polarity: Polarity,
) -> Option<(usize, f64)> {
    let candidates = indices.filter_map(|i| surface.sample(i).map(|s| (i, s.potential)));
    match polarity {
        Polarity::Positive => candidates.max_by(|a, b| a.1.total_cmp(&b.1)),
        Polarity::Negative => candidates.min_by(|a, b| a.1.total_cmp(&b.1)),
    }
}

/// Majority-sign extremum of `members` (sample indices into `surface`).
///
/// When `dual_fraction` is given and the minority sign makes up at least that
/// share of the cluster, the minority-sign extremum is reported too.
pub fn cluster_extremum(
    surface: &Surface,
    members: &[usize],
    dual_fraction: Option<f64>,
) -> Option<ClusterExtremum> {
    if members.is_empty() {
        return None;
    }
    let is_negative = |i: usize| surface.sample(i).is_some_and(|s| s.potential < 0.0);
    let negatives = members.iter().filter(|&&i| is_negative(i)).count();
    let polarity = if negatives * 2 > members.len() {
        Polarity::Negative
    } else {
        Polarity::Positive
    };
    let (sample_index, potential) = extreme_of(surface, members.iter().copied(), polarity)?;

    let (minority_count, opposite) = match polarity {
        Polarity::Negative => (members.len() - negatives, Polarity::Positive),
        Polarity::Positive => (negatives, Polarity::Negative),
    };
    let minority = dual_fraction.and_then(|threshold| {
        let fraction = minority_count as f64 / members.len() as f64;
        if minority_count == 0 || fraction < threshold {
            return None;
        }
        let want_negative = opposite == Polarity::Negative;
        let minority_members = members
            .iter()
            .copied()
            .filter(|&i| is_negative(i) == want_negative);
        extreme_of(surface, minority_members, opposite)
    });

    Some(ClusterExtremum {
        polarity,
        sample_index,
        potential,
        minority,
    })
}

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use nalgebra::Point3;

/// Kd-tree over a fixed point set, answering queries in terms of the indices
/// the points had in the slice it was built from.
///
/// Surface grids put many samples on the same plane, so the tree is the
/// immutable variant, which balances its leaves over coordinate ties instead of
/// overflowing a bucket.
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, 3>>,
    len: usize,
}

impl SpatialIndex {
    pub fn new(points: &[Point3<f64>]) -> Self {
        let coords: Vec<[f64; 3]> = points.iter().map(|p| [p.x, p.y, p.z]).collect();
        let tree = (!coords.is_empty()).then(|| ImmutableKdTree::new_from_slice(&coords));
        Self {
            tree,
            len: points.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nearest indexed point and its Euclidean distance.
    pub fn nearest(&self, query: &Point3<f64>) -> Option<(usize, f64)> {
        let nn = self
            .tree
            .as_ref()?
            .nearest_one::<SquaredEuclidean>(&[query.x, query.y, query.z]);
        Some((nn.item as usize, nn.distance.sqrt()))
    }

    /// Indices of all points within `radius` of `query`, in ascending index order.
    pub fn within(&self, query: &Point3<f64>, radius: f64) -> Vec<usize> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        let mut hits: Vec<usize> = tree
            .within_unsorted::<SquaredEuclidean>(&[query.x, query.y, query.z], radius * radius)
            .into_iter()
            .map(|nn| nn.item as usize)
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn count_within(&self, query: &Point3<f64>, radius: f64) -> usize {
        self.tree.as_ref().map_or(0, |tree| {
            tree.within_unsorted::<SquaredEuclidean>(&[query.x, query.y, query.z], radius * radius)
                .len()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Vec<Point3<f64>> {
        (0..10).map(|i| Point3::new(i as f64 * 0.5, 0.0, 0.0)).collect()
    }

    #[test]
    fn nearest_returns_index_and_distance() {
        let index = SpatialIndex::new(&line());
        let (i, d) = index.nearest(&Point3::new(1.1, 0.0, 0.0)).unwrap();
        assert_eq!(i, 2);
        assert!((d - 0.1).abs() < 1e-9);
    }

    #[test]
    fn within_is_sorted_and_inclusive_of_self() {
        let index = SpatialIndex::new(&line());
        assert_eq!(index.within(&Point3::new(2.0, 0.0, 0.0), 0.6), vec![3, 4, 5]);
        assert_eq!(index.count_within(&Point3::new(0.0, 0.0, 0.0), 0.4), 1);
    }

    #[test]
    fn empty_index_answers_nothing() {
        let index = SpatialIndex::new(&[]);
        assert!(index.is_empty());
        assert!(index.nearest(&Point3::origin()).is_none());
        assert!(index.within(&Point3::origin(), 10.0).is_empty());
        assert_eq!(index.count_within(&Point3::origin(), 10.0), 0);
    }

    /// Two stacked square grids: every coordinate value is shared by dozens of points.
    fn stacked_grids(side: usize) -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for z in [0.0, 1.0] {
            for i in 0..side {
                for j in 0..side {
                    points.push(Point3::new(i as f64 * 0.25, j as f64 * 0.25, z));
                }
            }
        }
        points
    }

    #[test]
    fn coplanar_grids_build_and_query() {
        let points = stacked_grids(12);
        let index = SpatialIndex::new(&points);
        assert_eq!(index.len(), 288);

        let (i, d) = index.nearest(&Point3::new(0.26, 0.49, 0.9)).unwrap();
        assert_eq!(points[i], Point3::new(0.25, 0.5, 1.0));
        assert!((d - (0.0001f64 + 0.0001 + 0.01).sqrt()).abs() < 1e-9);

        // Centre of the lower plane: itself plus its four grid neighbours.
        let centre = 5 * 12 + 5;
        assert_eq!(index.count_within(&points[centre], 0.26), 5);
        let hits = index.within(&points[centre], 0.26);
        assert_eq!(hits, vec![centre - 12, centre - 1, centre, centre + 1, centre + 12]);
    }
}

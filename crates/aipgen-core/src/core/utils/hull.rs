use nalgebra::{Point3, Vector3};
use std::collections::BTreeMap;

const HULL_EPS: f64 = 1e-9;

/// Surface area and enclosed volume of a 3D convex hull.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HullMeasure {
    pub area: f64,
    pub volume: f64,
}

#[derive(Debug, Clone)]
struct Face {
    verts: [usize; 3],
    normal: Vector3<f64>,
    offset: f64,
}

impl Face {
    /// Builds a face oriented so that `interior` lies on its negative side.
    fn oriented(verts: [usize; 3], points: &[Point3<f64>], interior: &Point3<f64>) -> Option<Self> {
        let mut face = Self::new(verts, points)?;
        if face.signed_distance(interior) > 0.0 {
            face = Self::new([verts[1], verts[0], verts[2]], points)?;
        }
        Some(face)
    }

    fn new(verts: [usize; 3], points: &[Point3<f64>]) -> Option<Self> {
        let a = points[verts[0]];
        let n = (points[verts[1]] - a).cross(&(points[verts[2]] - a));
        let norm = n.norm();
        if norm <= HULL_EPS {
            return None;
        }
        let normal = n / norm;
        Some(Self {
            verts,
            normal,
            offset: -normal.dot(&a.coords),
        })
    }

    fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) + self.offset
    }
}

fn extreme_pair_along_x(points: &[Point3<f64>]) -> (usize, usize) {
    let mut lo = 0;
    let mut hi = 0;
    for (i, p) in points.iter().enumerate() {
        if p.x < points[lo].x {
            lo = i;
        }
        if p.x > points[hi].x {
            hi = i;
        }
    }
    (lo, hi)
}

fn farthest_from_line(points: &[Point3<f64>], a: usize, b: usize) -> Option<usize> {
    let dir = points[b] - points[a];
    let len = dir.norm();
    if len <= HULL_EPS {
        return None;
    }
    let dir = dir / len;
    let (idx, dist) = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let v = p - points[a];
            (i, (v - dir * v.dot(&dir)).norm())
        })
        .fold((0, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    (dist > HULL_EPS).then_some(idx)
}

fn farthest_from_plane(points: &[Point3<f64>], a: usize, b: usize, c: usize) -> Option<usize> {
    let n = (points[b] - points[a]).cross(&(points[c] - points[a]));
    let norm = n.norm();
    if norm <= HULL_EPS {
        return None;
    }
    let n = n / norm;
    let (idx, dist) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, (p - points[a]).dot(&n).abs()))
        .fold((0, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    (dist > HULL_EPS).then_some(idx)
}

/// Computes the convex hull of `points` by incremental QuickHull.
///
/// Returns `None` for fewer than four points or for coplanar input, where the
/// hull has no interior.
pub fn convex_hull(points: &[Point3<f64>]) -> Option<HullMeasure> {
    if points.len() < 4 {
        return None;
    }
    let (p0, p1) = extreme_pair_along_x(points);
    let (p0, p1) = if p0 == p1 || (points[p1] - points[p0]).norm() <= HULL_EPS {
        // All x equal: fall back to the farthest point from the first one.
        let far = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (p - points[0]).norm()))
            .fold((0, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        (0, far.0)
    } else {
        (p0, p1)
    };
    let p2 = farthest_from_line(points, p0, p1)?;
    let p3 = farthest_from_plane(points, p0, p1, p2)?;
    let seed = [p0, p1, p2, p3];

    let interior = Point3::from(
        (points[p0].coords + points[p1].coords + points[p2].coords + points[p3].coords) / 4.0,
    );

    let mut faces: Vec<Face> = [[p0, p1, p2], [p0, p1, p3], [p0, p2, p3], [p1, p2, p3]]
        .into_iter()
        .filter_map(|v| Face::oriented(v, points, &interior))
        .collect();
    if faces.len() != 4 {
        return None;
    }

    for (idx, p) in points.iter().enumerate() {
        if seed.contains(&idx) {
            continue;
        }
        let visible: Vec<bool> = faces
            .iter()
            .map(|f| f.signed_distance(p) > HULL_EPS)
            .collect();
        if !visible.iter().any(|v| *v) {
            continue;
        }

        let mut edge_count: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        for (face, _) in faces.iter().zip(&visible).filter(|(_, v)| **v) {
            let [a, b, c] = face.verts;
            for (u, w) in [(a, b), (b, c), (c, a)] {
                *edge_count.entry((u.min(w), u.max(w))).or_default() += 1;
            }
        }

        let mut kept: Vec<Face> = faces
            .into_iter()
            .zip(visible)
            .filter(|(_, v)| !*v)
            .map(|(f, _)| f)
            .collect();
        for ((a, b), count) in edge_count {
            if count == 1 {
                if let Some(face) = Face::oriented([a, b, idx], points, &interior) {
                    kept.push(face);
                }
            }
        }
        faces = kept;
    }

    let mut measure = HullMeasure::default();
    for f in &faces {
        let a = points[f.verts[0]] - interior;
        let b = points[f.verts[1]] - interior;
        let c = points[f.verts[2]] - interior;
        let cross = (b - a).cross(&(c - a));
        measure.area += 0.5 * cross.norm();
        measure.volume += a.dot(&b.cross(&c)).abs() / 6.0;
    }
    Some(measure)
}

/// Hull area, treating degenerate sets as having no area.
pub fn hull_area(points: &[Point3<f64>]) -> f64 {
    convex_hull(points).map_or(0.0, |m| m.area)
}

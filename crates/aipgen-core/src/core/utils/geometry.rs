use nalgebra::{Point3, Rotation3, Unit, Vector3};

const DEGENERATE_EPS: f64 = 1e-9;

pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle_degrees: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle_degrees.to_radians())
}

/// Rotates `point` by `angle_degrees` about the line through `origin` along `axis`.
pub fn rotate_about_axis(
    point: &Point3<f64>,
    origin: &Point3<f64>,
    axis: &Vector3<f64>,
    angle_degrees: f64,
) -> Point3<f64> {
    let rotation = rotation_from_axis_angle(axis, angle_degrees);
    origin + rotation * (point - origin)
}

/// Distance from `point` to the infinite line through `origin` along `direction`.
pub fn perpendicular_distance(
    point: &Point3<f64>,
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
) -> f64 {
    let norm = direction.norm();
    if norm < DEGENERATE_EPS {
        return (point - origin).norm();
    }
    let d = direction / norm;
    let v = point - origin;
    (v - d * v.dot(&d)).norm()
}

/// Signed projection of `point - origin` onto the unit vector of `direction`.
pub fn axial_offset(point: &Point3<f64>, origin: &Point3<f64>, direction: &Vector3<f64>) -> f64 {
    let norm = direction.norm();
    if norm < DEGENERATE_EPS {
        return 0.0;
    }
    (point - origin).dot(direction) / norm
}

pub fn centroid<'a, I>(points: I) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = &'a Point3<f64>>,
{
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Mean angle, in degrees, between the bonds of a three-coordinate centre and
/// the plane through its three neighbours.
///
/// A planar centre gives 0; an ideal sp3 centre with one lone pair gives about 22.
/// Returns `None` when the neighbours are collinear or a bond has zero length.
pub fn pyramidalization_angle(center: &Point3<f64>, neighbors: &[Point3<f64>; 3]) -> Option<f64> {
    let normal = (neighbors[1] - neighbors[0]).cross(&(neighbors[2] - neighbors[0]));
    let normal_norm = normal.norm();
    if normal_norm < DEGENERATE_EPS {
        return None;
    }
    let normal = normal / normal_norm;
    let mut total = 0.0;
    for n in neighbors {
        let bond = n - center;
        let len = bond.norm();
        if len < DEGENERATE_EPS {
            return None;
        }
        total += (bond.dot(&normal).abs() / len).clamp(0.0, 1.0).asin().to_degrees();
    }
    Some(total / 3.0)
}

//! Coordinate geometry: distances, bond angles, dihedrals.
//!
//! Every trigonometric computation in the workspace goes through these three
//! functions. Angles are returned in degrees.

use crate::types::Point3D;

/// Euclidean distance between two points.
pub fn distance(p1: &Point3D, p2: &Point3D) -> f64 {
    p1.distance_to(p2)
}

/// Bond angle in degrees at the central point `p2`, in `[0, 180]`.
pub fn angle(p1: &Point3D, p2: &Point3D, p3: &Point3D) -> f64 {
    let v1 = p1.sub(p2);
    let v2 = p3.sub(p2);
    let cos_angle = v1.dot(&v2) / (v1.norm() * v2.norm());
    // Clamp for numerical safety
    cos_angle.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Dihedral (torsion) angle in degrees about the `p2`–`p3` axis, in `(-180, 180]`.
///
/// Positive when, looking from `p2` towards `p3`, the `p1` bond must turn
/// clockwise to eclipse the `p4` bond.
pub fn dihedral(p1: &Point3D, p2: &Point3D, p3: &Point3D, p4: &Point3D) -> f64 {
    let b1 = p2.sub(p1);
    let b2 = p3.sub(p2);
    let b3 = p4.sub(p3);

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let m1 = n1.cross(&b2.normalize());

    let x = n1.dot(&n2);
    let y = m1.dot(&n2);

    let degrees = (-y).atan2(x).to_degrees();
    if degrees <= -180.0 {
        180.0
    } else {
        degrees
    }
}

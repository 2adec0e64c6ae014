//! Scalar and vector aliases plus the spherical-earth helpers.
//!
//! Station angles are derived from a fixed-radius sphere rather than the
//! geodetic ellipsoid. They only orient the local Up/East/North frame used
//! for residual display, where the approximation is well below the residual
//! magnitudes of interest.

use nalgebra::{Point3, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 3D point with [`Real`] coordinates (geocentric Cartesian, metres).
pub type Pt3 = Point3<Real>;

/// Radius of the reference sphere in metres.
pub const EARTH_RADIUS: Real = 6_371_000.0;

/// Spherical angle in the equatorial plane, `atan2(Y, X)`, in radians.
///
/// Used as φ in the Up/East/North decomposition.
pub fn spherical_latitude(p: &Pt3) -> Real {
    p.y.atan2(p.x)
}

/// Spherical angle out of the equatorial plane, `asin(Z / R)`, in radians.
///
/// Used as λ in the Up/East/North decomposition. The ratio is clamped to
/// `[-1, 1]` so points slightly outside the reference sphere stay finite.
pub fn spherical_longitude(p: &Pt3) -> Real {
    (p.z / EARTH_RADIUS).clamp(-1.0, 1.0).asin()
}

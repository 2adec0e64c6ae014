//! Decomposition of Cartesian position differences into Up/East/North.
//!
//! With the reference station's spherical angles φ = atan2(Y, X) and
//! λ = asin(Z / R):
//!
//! ```text
//! dU = cosφ·cosλ·dX + cosφ·sinλ·dY + sinφ·dZ
//! dE = sinλ·dX      − cosλ·dY
//! dN = sinφ·cosλ·dX + sinφ·sinλ·dY − cosφ·dZ
//! ```

use helmert_core::{Real, Station, StationFrame, StationPair, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Residual components in the local topocentric frame, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Uen {
    pub up: Real,
    pub east: Real,
    pub north: Real,
}

/// Residual of one station: Cartesian difference and its U/E/N split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationResidual {
    pub id: String,
    /// `a − b` in geocentric Cartesian coordinates.
    pub delta: Vec3,
    pub uen: Uen,
}

/// Split `delta` into Up/East/North at spherical angles `(φ, λ)`.
pub fn decompose_uen(delta: &Vec3, latitude: Real, longitude: Real) -> Uen {
    let (sin_phi, cos_phi) = latitude.sin_cos();
    let (sin_lam, cos_lam) = longitude.sin_cos();
    let (dx, dy, dz) = (delta.x, delta.y, delta.z);

    Uen {
        up: cos_phi * cos_lam * dx + cos_phi * sin_lam * dy + sin_phi * dz,
        east: sin_lam * dx - cos_lam * dy,
        north: sin_phi * cos_lam * dx + sin_phi * sin_lam * dy - cos_phi * dz,
    }
}

/// Residual of `a` relative to the reference station `reference`.
pub fn station_residual(a: &Station, reference: &Station) -> StationResidual {
    let delta = a.position - reference.position;
    StationResidual {
        id: a.id.clone(),
        delta,
        uen: decompose_uen(&delta, reference.latitude(), reference.longitude()),
    }
}

/// Residuals `a − b` for every station of `a` that also appears in `b`,
/// in the order of `a`. Angles are taken from the stations of `b`.
pub fn frame_residuals(a: &StationFrame, b: &StationFrame) -> Vec<StationResidual> {
    let mut reference: HashMap<&str, &Station> = HashMap::with_capacity(b.len());
    for s in b.iter() {
        reference.entry(s.id.as_str()).or_insert(s);
    }
    a.iter()
        .filter_map(|s| reference.get(s.id.as_str()).map(|r| station_residual(s, r)))
        .collect()
}

/// Residuals `from − to` of station pairs, referenced to the "to" station.
pub fn pair_residuals<'a, I>(pairs: I) -> Vec<StationResidual>
where
    I: IntoIterator<Item = &'a StationPair>,
{
    pairs
        .into_iter()
        .map(|p| station_residual(&p.from, &p.to))
        .collect()
}

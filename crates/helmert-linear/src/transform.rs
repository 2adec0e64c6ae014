//! Application of a Helmert parameter set to station coordinates.
//!
//! Uses the infinitesimal similarity transform
//!
//! ```text
//! X' = X + C + S ⊙ X + Ω × X
//! ```
//!
//! with translation `C`, per-axis scale perturbation `S` (elementwise) and
//! rotation vector `Ω`. The linearisation is only valid for sub-arcsecond
//! rotations and scale perturbations of a few parts per million; it is not a
//! rigid rotation.

use helmert_core::{ParameterSet, Pt3, Station, StationFrame};

/// Transform a single point.
pub fn apply_helmert(params: &ParameterSet, p: &Pt3) -> Pt3 {
    let x = p.coords;
    let delta =
        params.translation() + params.scale().component_mul(&x) + params.rotation().cross(&x);
    Pt3::from(x + delta)
}

/// Transform a station, keeping its identifier and sigma.
pub fn transform_station(params: &ParameterSet, station: &Station) -> Station {
    Station::new(
        station.id.clone(),
        apply_helmert(params, &station.position),
        station.sigma,
    )
}

/// Transform every station of a frame.
///
/// Spherical angles are derived from positions, so they follow the new
/// coordinates automatically.
pub fn transform_frame(params: &ParameterSet, frame: &StationFrame) -> StationFrame {
    frame.iter().map(|s| transform_station(params, s)).collect()
}

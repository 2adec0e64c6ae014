//! Synthetic station networks on the reference sphere.

use super::noise::unit_interval;
use crate::{Pt3, Real, Station, StationFrame, Vec3, EARTH_RADIUS};

/// Globally distributed network of `n` stations (rounded up to even).
///
/// Half of the stations lie on a Fibonacci spiral over the sphere, the other
/// half are their antipodes, so the network centroid is the geocentre. Each
/// station gets a deterministic height in `[0, 3000)` m and an isotropic
/// per-axis sigma of `sigma` metres. Identifiers are `S000`, `S001`, ...
pub fn global_network(n: usize, sigma: Real) -> StationFrame {
    let half = n.div_ceil(2).max(1);
    let golden = std::f64::consts::PI * (3.0 - (5.0 as Real).sqrt());

    let mut upper = Vec::with_capacity(half);
    for i in 0..half {
        let z = 1.0 - (2.0 * i as Real + 1.0) / half as Real;
        let r = (1.0 - z * z).sqrt();
        let theta = golden * i as Real;
        let height = 3000.0 * unit_interval(i as u64);
        let dir = Vec3::new(r * theta.cos(), r * theta.sin(), z);
        upper.push(dir * (EARTH_RADIUS + height));
    }

    upper
        .iter()
        .copied()
        .chain(upper.iter().map(|p| -p))
        .enumerate()
        .map(|(i, p)| Station::new(format!("S{i:03}"), Pt3::from(p), Vec3::repeat(sigma)))
        .collect()
}

/// Network of `n` stations clustered within `extent_rad` radians around the
/// point at spherical angles `(lat, lon)`.
pub fn regional_network(n: usize, lat: Real, lon: Real, extent_rad: Real, sigma: Real) -> StationFrame {
    (0..n)
        .map(|i| {
            let d_lat = (unit_interval(2 * i as u64) - 0.5) * extent_rad;
            let d_lon = (unit_interval(2 * i as u64 + 1) - 0.5) * extent_rad;
            let (phi, lam) = (lat + d_lat, lon + d_lon);
            let p = Pt3::new(
                EARTH_RADIUS * lam.cos() * phi.cos(),
                EARTH_RADIUS * lam.cos() * phi.sin(),
                EARTH_RADIUS * lam.sin(),
            );
            Station::new(format!("R{i:03}"), p, Vec3::repeat(sigma))
        })
        .collect()
}

/// Copy of `frame` with every station shifted by `offset`.
pub fn offset_frame(frame: &StationFrame, offset: Vec3) -> StationFrame {
    frame
        .iter()
        .map(|s| Station::new(s.id.clone(), s.position + offset, s.sigma))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_network_is_centred() {
        let frame = global_network(24, 0.01);
        assert_eq!(frame.len(), 24);

        let centroid = frame
            .iter()
            .fold(Vec3::zeros(), |acc, s| acc + s.position.coords)
            / frame.len() as Real;
        assert!(centroid.norm() < 1e-6, "centroid {centroid:?}");

        for s in frame.iter() {
            let r = s.position.coords.norm();
            assert!(r >= EARTH_RADIUS && r < EARTH_RADIUS + 3000.0);
        }
    }

    #[test]
    fn regional_network_angles_stay_near_centre() {
        let frame = regional_network(10, 0.3, 0.8, 0.02, 0.01);
        for s in frame.iter() {
            assert!((s.latitude() - 0.3).abs() <= 0.01 + 1e-12);
            assert!((s.longitude() - 0.8).abs() <= 0.01 + 1e-12);
        }
    }
}

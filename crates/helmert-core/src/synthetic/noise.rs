//! Deterministic noise helpers for synthetic station frames.
//!
//! The functions here avoid any RNG crate and do not depend on the internal
//! algorithm of a generator. This keeps synthetic datasets stable across
//! versions and platforms.

use crate::{Real, StationFrame, Vec3};

/// Deterministic uniform position noise in `[-max_abs, +max_abs]` per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformPositionNoise {
    /// Base seed controlling the pseudo-random sequence.
    pub seed: u64,
    /// Maximum absolute per-axis noise (metres).
    pub max_abs: Real,
}

impl Default for UniformPositionNoise {
    fn default() -> Self {
        Self {
            seed: 0,
            max_abs: 0.0,
        }
    }
}

impl UniformPositionNoise {
    /// Sample a deterministic 3D noise vector for a station index.
    #[inline]
    pub fn sample(&self, station_idx: usize) -> Vec3 {
        let max_abs = self.max_abs.abs();
        if max_abs == 0.0 {
            return Vec3::zeros();
        }

        let key = mix_key(self.seed, station_idx);
        let u = unit_interval(key);
        let v = unit_interval(key ^ 0x94D0_49BB_1331_11EB);
        let w = unit_interval(key ^ 0xBF58_476D_1CE4_E5B9);

        // Map [0, 1) -> [-max_abs, +max_abs].
        Vec3::new(u - 0.5, v - 0.5, w - 0.5) * (2.0 * max_abs)
    }

    /// Copy of `frame` with noise added to every station position.
    pub fn apply_frame(&self, frame: &StationFrame) -> StationFrame {
        frame
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let mut s = s.clone();
                s.position += self.sample(i);
                s
            })
            .collect()
    }
}

/// Deterministic value in `[0, 1)` derived from `key`.
#[inline]
pub fn unit_interval(key: u64) -> Real {
    u64_to_unit_f64(splitmix64(key))
}

#[inline]
fn mix_key(seed: u64, station_idx: usize) -> u64 {
    seed ^ (station_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
fn u64_to_unit_f64(x: u64) -> Real {
    // Top 53 bits as a double in [0, 1).
    let mantissa = x >> 11;
    (mantissa as Real) * (1.0 / ((1u64 << 53) as Real))
}

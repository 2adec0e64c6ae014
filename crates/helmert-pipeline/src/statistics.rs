//! Summary numbers of a fit.

use helmert_core::{Real, StationPair};
use helmert_linear::StationResidual;
use serde::{Deserialize, Serialize};

/// Residual statistics over the stations used in a fit, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FitStatistics {
    pub num_stations: usize,
    /// RMS of the 3D position differences before the transform.
    pub rms_before: Real,
    /// RMS of the 3D position differences after the transform.
    pub rms_after: Real,
    /// `sqrt(Σ|r|²/v / Σ 1/v)` with `v` the combined variance of each pair.
    /// Only reported for weighted fits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_rms_after: Option<Real>,
}

impl FitStatistics {
    /// `before` and `after` must be aligned with `pairs`.
    pub fn compute(
        pairs: &[&StationPair],
        before: &[StationResidual],
        after: &[StationResidual],
        weighted: bool,
    ) -> Self {
        Self {
            num_stations: pairs.len(),
            rms_before: rms(before),
            rms_after: rms(after),
            weighted_rms_after: weighted.then(|| weighted_rms(pairs, after)),
        }
    }
}

/// Root mean square of residual vector norms; zero for an empty slice.
pub fn rms(residuals: &[StationResidual]) -> Real {
    if residuals.is_empty() {
        return 0.0;
    }
    let sum: Real = residuals.iter().map(|r| r.delta.norm_squared()).sum();
    (sum / residuals.len() as Real).sqrt()
}

fn weighted_rms(pairs: &[&StationPair], residuals: &[StationResidual]) -> Real {
    let (num, den) = pairs
        .iter()
        .zip(residuals)
        .fold((0.0, 0.0), |(num, den), (p, r)| {
            let w = 1.0 / p.combined_variance();
            (num + w * r.delta.norm_squared(), den + w)
        });
    if den > 0.0 {
        (num / den).sqrt()
    } else {
        0.0
    }
}

use helmert_core::{HelmertError, ParameterConfig, Real, Result, TransformType};
use helmert_linear::{EstimationSettings, LeastSquaresOptions};
use serde::{Deserialize, Serialize};

/// Configuration of a single Helmert run.
///
/// Every field has a default, so `{}` is a valid JSON configuration: a
/// 7-parameter unweighted fit with all parameters estimated and no
/// screening.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HelmertConfig {
    pub transform_type: TransformType,
    /// Weight each station by the inverse of its combined variance.
    pub weighted: bool,
    /// Fixed or estimated state of each of the nine parameters.
    pub parameters: ParameterConfig,
    /// Reject pairs whose post-fit residual exceeds this many combined
    /// sigmas, then refit once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigma_threshold: Option<Real>,
    pub solver: LeastSquaresOptions,
}

impl HelmertConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.sigma_threshold {
            if !(t > 0.0 && t.is_finite()) {
                return Err(HelmertError::InvalidSigmaThreshold(t));
            }
        }
        Ok(())
    }

    pub fn estimation_settings(&self) -> EstimationSettings {
        EstimationSettings {
            transform_type: self.transform_type,
            parameters: self.parameters,
            solver: self.solver,
        }
    }
}

use crate::statistics::FitStatistics;
use helmert_core::{ParameterSet, StationFrame, TransformType};
use helmert_linear::StationResidual;
use serde::{Deserialize, Serialize};

/// Result of one Helmert run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelmertReport {
    /// Fixed and estimated values of all nine parameters.
    pub parameters: ParameterSet,
    pub transform_type: TransformType,
    pub weighted: bool,
    /// Identifiers of the pairs the final fit used, in selection order.
    pub used_stations: Vec<String>,
    /// Identifiers removed by sigma screening.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected_stations: Vec<String>,
    /// The used "from" stations after applying [`HelmertReport::parameters`].
    pub transformed: StationFrame,
    /// `from − to` for each used station.
    pub residuals_before: Vec<StationResidual>,
    /// `transformed − to` for each used station.
    pub residuals_after: Vec<StationResidual>,
    pub statistics: FitStatistics,
}

impl HelmertReport {
    pub fn residual_after(&self, id: &str) -> Option<&StationResidual> {
        self.residuals_after.iter().find(|r| r.id == id)
    }
}

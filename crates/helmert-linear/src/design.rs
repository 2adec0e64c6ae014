//! Design columns and observation vectors for Helmert estimation.
//!
//! For `N` stations every vector has length `3N`, stacked as
//! `[X equations; Y equations; Z equations]`. Each column is the derivative
//! of the infinitesimal similarity transform
//!
//! ```text
//! X' = X + C + S ⊙ X + Ω × X
//! ```
//!
//! with respect to one of the nine parameters:
//!
//! | parameter     | X block | Y block | Z block |
//! |---------------|---------|---------|---------|
//! | translation_x | 1       | 0       | 0       |
//! | translation_y | 0       | 1       | 0       |
//! | translation_z | 0       | 0       | 1       |
//! | scale_x       | X       | 0       | 0       |
//! | scale_y       | 0       | Y       | 0       |
//! | scale_z       | 0       | 0       | Z       |
//! | rotation_x    | 0       | −Z      | Y       |
//! | rotation_y    | Z       | 0       | −X      |
//! | rotation_z    | −Y      | X       | 0       |

use helmert_core::{HelmertError, ParameterName, Pt3, Real, Result};
use nalgebra::{DMatrix, DVector};

/// The nine canonical design columns of a station set, in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignColumns {
    num_stations: usize,
    columns: [DVector<Real>; 9],
}

impl DesignColumns {
    /// Build all nine columns from the "from" station positions.
    pub fn from_points(points: &[Pt3]) -> Self {
        let n = points.len();
        let columns = ParameterName::ALL.map(|name| {
            let mut col = DVector::<Real>::zeros(3 * n);
            for (i, p) in points.iter().enumerate() {
                let [x, y, z] = coefficients(name, p);
                col[i] = x;
                col[n + i] = y;
                col[2 * n + i] = z;
            }
            col
        });
        Self {
            num_stations: n,
            columns,
        }
    }

    pub fn num_stations(&self) -> usize {
        self.num_stations
    }

    /// Number of equations, `3N`.
    pub fn num_rows(&self) -> usize {
        3 * self.num_stations
    }

    pub fn get(&self, name: ParameterName) -> &DVector<Real> {
        &self.columns[name.index()]
    }

    /// `(name, column)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterName, &DVector<Real>)> + '_ {
        ParameterName::ALL
            .into_iter()
            .zip(self.columns.iter())
    }

    /// Full `3N × 9` design matrix.
    pub fn to_matrix(&self) -> DMatrix<Real> {
        DMatrix::from_columns(&self.columns)
    }
}

/// Coefficients of one parameter in the X, Y and Z equation of a station.
fn coefficients(name: ParameterName, p: &Pt3) -> [Real; 3] {
    let (x, y, z) = (p.x, p.y, p.z);
    match name {
        ParameterName::TranslationX => [1.0, 0.0, 0.0],
        ParameterName::TranslationY => [0.0, 1.0, 0.0],
        ParameterName::TranslationZ => [0.0, 0.0, 1.0],
        ParameterName::ScaleX => [x, 0.0, 0.0],
        ParameterName::ScaleY => [0.0, y, 0.0],
        ParameterName::ScaleZ => [0.0, 0.0, z],
        ParameterName::RotationX => [0.0, -z, y],
        ParameterName::RotationY => [z, 0.0, -x],
        ParameterName::RotationZ => [-y, x, 0.0],
    }
}

/// Stacked coordinate differences `to − from`, length `3N`.
pub fn observation_vector(from: &[Pt3], to: &[Pt3]) -> Result<DVector<Real>> {
    if from.len() != to.len() {
        return Err(HelmertError::LengthMismatch {
            what: "station positions",
            expected: from.len(),
            got: to.len(),
        });
    }
    let n = from.len();
    let mut b = DVector::<Real>::zeros(3 * n);
    for (i, (f, t)) in from.iter().zip(to).enumerate() {
        let d = t - f;
        b[i] = d.x;
        b[n + i] = d.y;
        b[2 * n + i] = d.z;
    }
    Ok(b)
}

/// Per-observation variances: each station's variance repeated for its X,
/// Y and Z equation, length `3N`.
pub fn tiled_variances(station_variances: &[Real]) -> DVector<Real> {
    let n = station_variances.len();
    DVector::from_fn(3 * n, |row, _| station_variances[row % n])
}

//! Elimination of fixed parameters and collapsing of scale columns.
//!
//! Fixing a parameter to `v` moves `v · column` to the observation side:
//!
//! ```text
//! b' = b − Σ v_i · a_i      (over fixed parameters i)
//! ```
//!
//! and removes its column. The remaining scale columns are then merged
//! according to the [`TransformType`]: all free scales for type 7, the free
//! X and Y scales for type 8, nothing for type 9. Merging only touches
//! columns still present after fixing.

use crate::design::DesignColumns;
use helmert_core::{HelmertError, ParameterConfig, ParameterName, Real, Result, TransformType};
use log::debug;
use nalgebra::{DMatrix, DVector};

/// One unknown of the reduced system.
///
/// A plain parameter has itself as the only member. A collapsed scale column
/// lists every scale axis sharing its value and is reported under the first
/// of them in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeParameter {
    pub name: ParameterName,
    pub members: Vec<ParameterName>,
}

impl FreeParameter {
    fn single(name: ParameterName) -> Self {
        Self {
            name,
            members: vec![name],
        }
    }
}

/// Reduced linear system `A x ≈ b` over the free parameters only.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedSystem {
    /// Unknowns in column order.
    pub unknowns: Vec<FreeParameter>,
    /// `3N × k` design matrix.
    pub design: DMatrix<Real>,
    /// Observation vector with fixed contributions removed.
    pub observations: DVector<Real>,
}

impl ReducedSystem {
    pub fn num_unknowns(&self) -> usize {
        self.unknowns.len()
    }

    pub fn num_equations(&self) -> usize {
        self.observations.len()
    }

    /// `true` when every parameter is fixed and there is nothing to solve.
    pub fn is_fully_constrained(&self) -> bool {
        self.unknowns.is_empty()
    }
}

/// Scale axes merged into a single unknown for each transform type.
pub fn scale_groups(transform_type: TransformType) -> &'static [&'static [ParameterName]] {
    const XYZ: &[ParameterName] = &[
        ParameterName::ScaleX,
        ParameterName::ScaleY,
        ParameterName::ScaleZ,
    ];
    const XY: &[ParameterName] = &[ParameterName::ScaleX, ParameterName::ScaleY];
    match transform_type {
        TransformType::Seven => &[XYZ],
        TransformType::Eight => &[XY],
        TransformType::Nine => &[],
    }
}

/// Apply the parameter configuration and transform type to the full system.
pub fn resolve_constraints(
    columns: &DesignColumns,
    observations: &DVector<Real>,
    config: &ParameterConfig,
    transform_type: TransformType,
) -> Result<ReducedSystem> {
    if observations.len() != columns.num_rows() {
        return Err(HelmertError::LengthMismatch {
            what: "observation vector",
            expected: columns.num_rows(),
            got: observations.len(),
        });
    }

    // Fix first, then collapse.
    let mut b = observations.clone();
    let mut active: Vec<(FreeParameter, DVector<Real>)> = Vec::with_capacity(9);
    for (name, column) in columns.iter() {
        match config.get(name).fixed_value() {
            Some(value) => b.axpy(-value, column, 1.0),
            None => active.push((FreeParameter::single(name), column.clone())),
        }
    }

    for group in scale_groups(transform_type) {
        collapse_group(&mut active, group);
    }

    debug!(
        "reduced system: {} unknowns, {} equations, {} fixed",
        active.len(),
        b.len(),
        config.fixed_count()
    );

    let design = if active.is_empty() {
        DMatrix::zeros(b.len(), 0)
    } else {
        let cols: Vec<DVector<Real>> = active.iter().map(|(_, c)| c.clone()).collect();
        DMatrix::from_columns(&cols)
    };
    let unknowns = active.into_iter().map(|(p, _)| p).collect();

    Ok(ReducedSystem {
        unknowns,
        design,
        observations: b,
    })
}

/// Sum the columns of every present member of `group` into the first one.
fn collapse_group(active: &mut Vec<(FreeParameter, DVector<Real>)>, group: &[ParameterName]) {
    let present: Vec<usize> = active
        .iter()
        .enumerate()
        .filter(|(_, (p, _))| group.contains(&p.name))
        .map(|(i, _)| i)
        .collect();
    let Some((&head, rest)) = present.split_first() else {
        return;
    };
    if rest.is_empty() {
        return;
    }

    // Remove from the back so earlier indices stay valid.
    for &idx in rest.iter().rev() {
        let (param, column) = active.remove(idx);
        let (merged, sum) = &mut active[head];
        *sum += column;
        merged.members.extend(param.members);
    }
    active[head].0.members.sort();
}

//! Helmert parameter estimation from two sets of corresponding positions.
//!
//! Chains the design columns, constraint resolution and the least-squares
//! solve, then expands the solution back to all nine parameters.

use crate::constraints::{resolve_constraints, ReducedSystem};
use crate::design::{observation_vector, tiled_variances, DesignColumns};
use crate::lsq::{solve_ordinary, solve_weighted, LeastSquaresOptions, LeastSquaresSolution};
use helmert_core::{
    HelmertError, Parameter, ParameterConfig, ParameterSet, Pt3, Real, Result, StationPair,
    TransformType,
};
use log::debug;

/// Inputs describing how the parameters are estimated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EstimationSettings {
    pub transform_type: TransformType,
    pub parameters: ParameterConfig,
    pub solver: LeastSquaresOptions,
}

/// Estimate the Helmert parameters mapping `from` onto `to`.
///
/// With `station_variances` the solve is weighted by the inverse of each
/// station's variance (applied to its X, Y and Z equation) and estimated
/// parameters carry an uncertainty; without it the solve is ordinary least
/// squares.
pub fn estimate_parameters(
    from: &[Pt3],
    to: &[Pt3],
    station_variances: Option<&[Real]>,
    settings: &EstimationSettings,
) -> Result<ParameterSet> {
    if from.is_empty() {
        return Err(HelmertError::EmptyStationSet);
    }
    let observations = observation_vector(from, to)?;
    let columns = DesignColumns::from_points(from);
    let system = resolve_constraints(
        &columns,
        &observations,
        &settings.parameters,
        settings.transform_type,
    )?;

    if system.is_fully_constrained() {
        debug!("all parameters fixed, skipping least squares");
        return Ok(ParameterSet::from_config(&settings.parameters));
    }

    let solution = match station_variances {
        Some(variances) => {
            if variances.len() != from.len() {
                return Err(HelmertError::LengthMismatch {
                    what: "station variances",
                    expected: from.len(),
                    got: variances.len(),
                });
            }
            solve_weighted(
                &system.design,
                &system.observations,
                &tiled_variances(variances),
                &settings.solver,
            )?
        }
        None => solve_ordinary(&system.design, &system.observations, &settings.solver)?,
    };

    Ok(assemble_parameters(&settings.parameters, &system, &solution))
}

/// Estimate from station pairs, weighting by combined variance if `weighted`.
pub fn estimate_from_pairs(
    pairs: &[&StationPair],
    weighted: bool,
    settings: &EstimationSettings,
) -> Result<ParameterSet> {
    let from: Vec<Pt3> = pairs.iter().map(|p| p.from.position).collect();
    let to: Vec<Pt3> = pairs.iter().map(|p| p.to.position).collect();
    let variances: Option<Vec<Real>> =
        weighted.then(|| pairs.iter().map(|p| p.combined_variance()).collect());
    estimate_parameters(&from, &to, variances.as_deref(), settings)
}

/// Merge fixed values with a least-squares solution into a full set.
///
/// A collapsed scale unknown is copied to every axis it stands for.
pub fn assemble_parameters(
    config: &ParameterConfig,
    system: &ReducedSystem,
    solution: &LeastSquaresSolution,
) -> ParameterSet {
    let mut set = ParameterSet::from_config(config);
    for (j, unknown) in system.unknowns.iter().enumerate() {
        let value = solution.values[j];
        let sigma = solution.sigmas.as_ref().map(|s| s[j]);
        for &member in &unknown.members {
            *set.get_mut(member) = Parameter::estimated(value, sigma);
        }
    }
    set
}

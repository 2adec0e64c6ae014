//! Single-pass rejection of stations with large post-fit residuals.

use helmert_core::{HelmertError, PairSelection, ParameterSet, Real, Result};
use helmert_linear::apply_helmert;
use log::{debug, warn};

/// Deselect every selected pair whose post-fit residual norm exceeds
/// `threshold` times its combined sigma.
///
/// Pairs with a zero combined sigma cannot be judged and stay selected.
/// Returns the rejected identifiers in selection order; an empty selection
/// afterwards is an error.
pub fn screen_by_sigma(
    selection: &mut PairSelection,
    params: &ParameterSet,
    threshold: Real,
) -> Result<Vec<String>> {
    let mut rejected = Vec::new();
    for pair in selection.selected() {
        let sigma = pair.combined_sigma();
        if sigma <= 0.0 {
            debug!("station {} has zero sigma, not screened", pair.id());
            continue;
        }
        let residual = (apply_helmert(params, &pair.from.position) - pair.to.position).norm();
        let ratio = residual / sigma;
        if ratio > threshold {
            warn!(
                "rejecting station {}: residual {:.4} m is {:.1} sigma",
                pair.id(),
                residual,
                ratio
            );
            rejected.push(pair.id().to_string());
        }
    }

    for id in &rejected {
        selection.set_selected(id, false);
    }
    if selection.selected_count() == 0 {
        return Err(HelmertError::EmptyStationSet);
    }
    Ok(rejected)
}

use crate::config::HelmertConfig;
use crate::report::HelmertReport;
use crate::screening::screen_by_sigma;
use crate::statistics::FitStatistics;
use helmert_core::{HelmertError, PairSelection, Result, StationFrame};
use helmert_linear::{estimate_from_pairs, pair_residuals, station_residual, transform_station};
use log::{debug, info};

/// Estimate, apply and evaluate a Helmert transform on the selected pairs.
///
/// With a sigma threshold configured, pairs failing the screen after the
/// first fit are deselected and the fit is repeated once.
pub fn run_helmert(selection: &PairSelection, config: &HelmertConfig) -> Result<HelmertReport> {
    config.validate()?;
    if selection.selected_count() == 0 {
        return Err(HelmertError::EmptyStationSet);
    }
    let settings = config.estimation_settings();
    let mut selection = selection.clone();

    debug!(
        "type {} fit on {} of {} pairs (weighted: {})",
        config.transform_type,
        selection.selected_count(),
        selection.len(),
        config.weighted
    );
    let mut parameters = estimate_from_pairs(&selection.selected(), config.weighted, &settings)?;

    let mut rejected = Vec::new();
    if let Some(threshold) = config.sigma_threshold {
        rejected = screen_by_sigma(&mut selection, &parameters, threshold)?;
        if !rejected.is_empty() {
            info!(
                "sigma screening rejected {} stations, refitting on {}",
                rejected.len(),
                selection.selected_count()
            );
            parameters = estimate_from_pairs(&selection.selected(), config.weighted, &settings)?;
        }
    }

    let pairs = selection.selected();
    let transformed: StationFrame = pairs
        .iter()
        .map(|p| transform_station(&parameters, &p.from))
        .collect();
    let residuals_before = pair_residuals(pairs.iter().copied());
    let residuals_after: Vec<_> = transformed
        .iter()
        .zip(&pairs)
        .map(|(t, p)| station_residual(t, &p.to))
        .collect();
    let statistics =
        FitStatistics::compute(&pairs, &residuals_before, &residuals_after, config.weighted);

    info!(
        "{} stations, rms {:.4} m -> {:.4} m",
        statistics.num_stations, statistics.rms_before, statistics.rms_after
    );

    Ok(HelmertReport {
        parameters,
        transform_type: config.transform_type,
        weighted: config.weighted,
        used_stations: pairs.iter().map(|p| p.id().to_string()).collect(),
        rejected_stations: rejected,
        transformed,
        residuals_before,
        residuals_after,
        statistics,
    })
}

/// Pair two frames, drop the `excluded` identifiers and run.
pub fn run_helmert_frames<'a, I>(
    from: &StationFrame,
    to: &StationFrame,
    excluded: I,
    config: &HelmertConfig,
) -> Result<HelmertReport>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut selection = PairSelection::from_frames(from, to)?;
    selection.exclude(excluded);
    run_helmert(&selection, config)
}

/// Run every candidate "from" frame against the shared `to` frame.
///
/// Runs are independent; each entry holds the outcome of one candidate.
pub fn run_helmert_batch(
    froms: &[StationFrame],
    to: &StationFrame,
    config: &HelmertConfig,
) -> Vec<Result<HelmertReport>> {
    froms
        .iter()
        .enumerate()
        .map(|(i, from)| {
            let report = run_helmert_frames(from, to, [], config);
            if let Err(e) = &report {
                debug!("candidate frame {i} failed: {e}");
            }
            report
        })
        .collect()
}

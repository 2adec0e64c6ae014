use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use helmert_core::{Real, TransformType};
use helmert_pipeline::{run_helmert_batch, run_helmert_frames, HelmertConfig, HelmertReport};
use log::info;

mod load;
mod units;

use load::{load_frame, load_json_file};

/// Estimate the Helmert transform between two station tables.
#[derive(Debug, Parser)]
#[command(author, version, about = "Helmert similarity transform between reference frames")]
struct Args {
    /// Station table(s) to transform (JSON, .sta or .ssc). Repeat for a
    /// batch run against the same target.
    #[arg(long, required = true)]
    from: Vec<PathBuf>,

    /// Target station table.
    #[arg(long)]
    to: PathBuf,

    /// Optional path to a JSON HelmertConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Transform type: 7, 8 or 9 parameters.
    #[arg(long = "type")]
    transform_type: Option<TransformType>,

    /// Weight stations by their combined position variance.
    #[arg(long)]
    weighted: bool,

    /// Reject stations whose residual exceeds this many sigmas, then refit.
    #[arg(long)]
    sigma_threshold: Option<Real>,

    /// Station identifiers to leave out of the fit.
    #[arg(long)]
    exclude: Vec<String>,

    /// Print a text table instead of JSON.
    #[arg(long)]
    table: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<HelmertConfig> {
        let mut config = match &self.config {
            Some(path) => load_json_file::<HelmertConfig>(path)?,
            None => HelmertConfig::default(),
        };
        if let Some(t) = self.transform_type {
            config.transform_type = t;
        }
        if self.weighted {
            config.weighted = true;
        }
        if self.sigma_threshold.is_some() {
            config.sigma_threshold = self.sigma_threshold;
        }
        Ok(config)
    }
}

fn render(reports: &[HelmertReport], table: bool) -> Result<String> {
    if table {
        return Ok(reports
            .iter()
            .map(units::render_table)
            .collect::<Vec<_>>()
            .join("\n"));
    }
    let json = match reports {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    Ok(json)
}

fn run_from_files(args: &Args) -> Result<String> {
    let config = args.resolve_config()?;
    let to = load_frame(&args.to)?;
    let froms = args
        .from
        .iter()
        .map(|p| load_frame(p))
        .collect::<Result<Vec<_>>>()?;

    let results = if froms.len() > 1 && args.exclude.is_empty() {
        run_helmert_batch(&froms, &to, &config)
    } else {
        froms
            .iter()
            .map(|from| {
                let excluded = args.exclude.iter().map(String::as_str);
                run_helmert_frames(from, &to, excluded, &config)
            })
            .collect()
    };
    let reports = results
        .into_iter()
        .zip(&args.from)
        .map(|(r, path)| r.with_context(|| format!("fit of {} failed", path.display())))
        .collect::<Result<Vec<_>>>()?;

    info!("{} report(s) computed", reports.len());
    render(&reports, args.table)
}

fn main() {
    env_logger::init();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let output = run_from_files(&args)?;
    println!("{}", output);
    Ok(())
}

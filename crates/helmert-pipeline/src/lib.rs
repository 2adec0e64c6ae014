//! Configuration-driven Helmert runs.
//!
//! A run takes a [`PairSelection`](helmert_core::PairSelection) and a
//! [`HelmertConfig`], estimates the parameters (optionally screening
//! outliers and refitting once), applies them to the "from" stations and
//! reports Up/East/North residuals and fit statistics before and after.
//!
//! ```no_run
//! use helmert_core::StationFrame;
//! use helmert_pipeline::{run_helmert_frames, HelmertConfig};
//!
//! # fn load(_: &str) -> StationFrame { StationFrame::default() }
//! let (from, to) = (load("from.json"), load("to.json"));
//! let report = run_helmert_frames(&from, &to, ["BRUS"], &HelmertConfig::default())?;
//! println!("{:?}", report.parameters.translation());
//! # Ok::<(), helmert_core::HelmertError>(())
//! ```

mod config;
mod report;
mod run;
pub mod screening;
pub mod statistics;

pub use config::HelmertConfig;
pub use report::HelmertReport;
pub use run::{run_helmert, run_helmert_batch, run_helmert_frames};
pub use statistics::FitStatistics;

//! Display units and the plain-text report table.

use helmert_core::{ParameterName, ParameterStatus, Real};
use helmert_pipeline::HelmertReport;
use std::f64::consts::PI;
use std::fmt::Write;

/// A unit a value in SI (metres, radians, unitless) is multiplied into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayUnit {
    pub symbol: &'static str,
    pub factor: Real,
}

pub const MILLIMETRE: DisplayUnit = DisplayUnit {
    symbol: "mm",
    factor: 1e3,
};

pub const PARTS_PER_BILLION: DisplayUnit = DisplayUnit {
    symbol: "ppb",
    factor: 1e9,
};

/// Milliarcseconds per radian.
pub const MILLIARCSECOND: DisplayUnit = DisplayUnit {
    symbol: "mas",
    factor: 180.0 / PI * 3600.0 * 1e3,
};

/// Microseconds of time per radian (24 h = 2π).
pub const MICRO_TIME_SECOND: DisplayUnit = DisplayUnit {
    symbol: "µts",
    factor: 12.0 / PI * 3600.0 * 1e6,
};

impl DisplayUnit {
    pub fn convert(self, value: Real) -> Real {
        value * self.factor
    }
}

/// Unit each parameter is shown in.
pub fn parameter_unit(name: ParameterName) -> DisplayUnit {
    match name {
        ParameterName::TranslationX | ParameterName::TranslationY | ParameterName::TranslationZ => {
            MILLIMETRE
        }
        ParameterName::ScaleX | ParameterName::ScaleY | ParameterName::ScaleZ => PARTS_PER_BILLION,
        ParameterName::RotationX | ParameterName::RotationY => MILLIARCSECOND,
        ParameterName::RotationZ => MICRO_TIME_SECOND,
    }
}

/// Human-readable summary: parameters, statistics and per-station residuals.
pub fn render_table(report: &HelmertReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_table(&mut out, report);
    out
}

fn write_table(out: &mut String, report: &HelmertReport) -> std::fmt::Result {
    writeln!(
        out,
        "Helmert transform, type {} ({}), {} stations",
        report.transform_type,
        if report.weighted { "weighted" } else { "unweighted" },
        report.statistics.num_stations
    )?;
    if !report.rejected_stations.is_empty() {
        writeln!(out, "rejected: {}", report.rejected_stations.join(", "))?;
    }
    writeln!(out)?;

    writeln!(out, "{:<14} {:>12} {:>10}  {:<5} status", "parameter", "value", "sigma", "unit")?;
    for (name, p) in report.parameters.iter() {
        let unit = parameter_unit(name);
        let sigma = p
            .sigma
            .map(|s| format!("{:10.4}", unit.convert(s)))
            .unwrap_or_else(|| format!("{:>10}", "-"));
        let status = match p.status {
            ParameterStatus::Fixed => "fixed",
            ParameterStatus::Estimated => "estimated",
        };
        writeln!(
            out,
            "{:<14} {:12.4} {}  {:<5} {}",
            name.as_str(),
            unit.convert(p.value),
            sigma,
            unit.symbol,
            status
        )?;
    }
    writeln!(out)?;

    let stats = &report.statistics;
    writeln!(out, "rms before  {:10.3} mm", MILLIMETRE.convert(stats.rms_before))?;
    writeln!(out, "rms after   {:10.3} mm", MILLIMETRE.convert(stats.rms_after))?;
    if let Some(w) = stats.weighted_rms_after {
        writeln!(out, "wrms after  {:10.3} mm", MILLIMETRE.convert(w))?;
    }
    writeln!(out)?;

    writeln!(out, "{:<10} {:>10} {:>10} {:>10}   [mm, after]", "station", "up", "east", "north")?;
    for r in &report.residuals_after {
        writeln!(
            out,
            "{:<10} {:10.3} {:10.3} {:10.3}",
            r.id,
            MILLIMETRE.convert(r.uen.up),
            MILLIMETRE.convert(r.uen.east),
            MILLIMETRE.convert(r.uen.north)
        )?;
    }
    Ok(())
}

//! Station table readers: JSON frames, `.sta` and `.ssc` fixed-column files.

use anyhow::{bail, Context, Result};
use helmert_core::{Pt3, Real, Station, StationFrame, Vec3};
use log::debug;
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

/// On-disk layout of a station table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Json,
    Sta,
    Ssc(SscLayout),
}

/// Column layout of a `.ssc` file; the ITRF releases differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SscLayout {
    Itrf2008,
    #[default]
    Itrf2014,
}

struct SscColumns {
    position: [(usize, usize); 3],
    sigma: [(usize, usize); 3],
}

impl SscLayout {
    fn columns(self) -> SscColumns {
        match self {
            SscLayout::Itrf2008 => SscColumns {
                position: [(36, 49), (49, 62), (62, 75)],
                sigma: [(75, 81), (81, 87), (87, 93)],
            },
            SscLayout::Itrf2014 => SscColumns {
                position: [(36, 50), (50, 64), (64, 78)],
                sigma: [(78, 85), (85, 92), (92, 99)],
            },
        }
    }
}

impl FrameFormat {
    /// Guess the format from the file name; anything unknown is JSON.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("sta") => FrameFormat::Sta,
            Some("ssc") => {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                if name.contains("2008") {
                    FrameFormat::Ssc(SscLayout::Itrf2008)
                } else {
                    FrameFormat::Ssc(SscLayout::Itrf2014)
                }
            }
            _ => FrameFormat::Json,
        }
    }
}

pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = read_text(path)?;
    serde_json::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))
}

/// Read a station frame, picking the parser from the file name.
pub fn load_frame(path: &Path) -> Result<StationFrame> {
    let format = FrameFormat::from_path(path);
    let frame = match format {
        FrameFormat::Json => load_json_file(path),
        FrameFormat::Sta => parse_sta(&read_text(path)?),
        FrameFormat::Ssc(layout) => parse_ssc(&read_text(path)?, layout),
    }
    .with_context(|| format!("invalid station table {}", path.display()))?;
    debug!("{}: {} stations ({format:?})", path.display(), frame.len());
    Ok(frame)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parse a `.sta` table.
///
/// Only `STA_GCX` rows are read. Positions and sigmas are stored in
/// millimetres and returned in metres; underscores are dropped from names.
pub fn parse_sta(text: &str) -> Result<StationFrame> {
    const MM: Real = 1e-3;
    let mut stations = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if column(line, 0, 7) != "STA_GCX" {
            continue;
        }
        let lineno = idx + 1;
        let name = column(line, 10, 19).replace('_', "");
        if name.is_empty() {
            bail!("line {lineno}: missing station name");
        }
        let x = number(line, (31, 45), "X", lineno)?;
        let sx = number(line, (52, 59), "X sigma", lineno)?;
        let y = number(line, (65, 79), "Y", lineno)?;
        let sy = number(line, (87, 93), "Y sigma", lineno)?;
        let z = number(line, (99, 113), "Z", lineno)?;
        let sz = number(line, (120, 127), "Z sigma", lineno)?;
        stations.push(Station::new(
            name,
            Pt3::new(x * MM, y * MM, z * MM),
            Vec3::new(sx, sy, sz) * MM,
        ));
    }
    Ok(StationFrame::new(stations))
}

/// Parse a `.ssc` solution file.
///
/// The first seven lines are header. Station rows carry a name; the
/// velocity row that follows each has a blank name and is skipped. Stations
/// are identified by their DOMES number.
pub fn parse_ssc(text: &str, layout: SscLayout) -> Result<StationFrame> {
    let cols = layout.columns();
    let mut stations = Vec::new();
    for (idx, line) in text.lines().enumerate().skip(7) {
        if line.trim().is_empty() || column(line, 9, 25).is_empty() {
            continue;
        }
        let lineno = idx + 1;
        let domes = column(line, 0, 9);
        if domes.is_empty() {
            bail!("line {lineno}: missing DOMES number");
        }
        let [x, y, z] = read_triplet(line, cols.position, "position", lineno)?;
        let [sx, sy, sz] = read_triplet(line, cols.sigma, "sigma", lineno)?;
        stations.push(Station::new(
            domes,
            Pt3::new(x, y, z),
            Vec3::new(sx, sy, sz),
        ));
    }
    Ok(StationFrame::new(stations))
}

fn read_triplet(
    line: &str,
    ranges: [(usize, usize); 3],
    what: &str,
    lineno: usize,
) -> Result<[Real; 3]> {
    let mut out = [0.0; 3];
    for ((slot, range), axis) in out.iter_mut().zip(ranges).zip(["X", "Y", "Z"]) {
        *slot = number(line, range, &format!("{axis} {what}"), lineno)?;
    }
    Ok(out)
}

/// Trimmed text of columns `start..end`, empty past the end of the line.
fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("").trim()
}

fn number(line: &str, (start, end): (usize, usize), what: &str, lineno: usize) -> Result<Real> {
    let field = column(line, start, end);
    field
        .parse::<Real>()
        .with_context(|| format!("line {lineno}: cannot read {what} from {field:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Place `fields` at their start columns in an otherwise blank line.
    fn fixed_line(fields: &[(usize, &str)]) -> String {
        let mut line = String::new();
        for &(col, text) in fields {
            if line.len() < col {
                line.push_str(&" ".repeat(col - line.len()));
            }
            line.push_str(text);
        }
        line
    }

    fn sta_row(kind: &str, name: &str, xyz: [&str; 3], sigma: [&str; 3]) -> String {
        fixed_line(&[
            (0, kind),
            (10, name),
            (19, "200101"),
            (31, xyz[0]),
            (52, sigma[0]),
            (65, xyz[1]),
            (87, sigma[1]),
            (99, xyz[2]),
            (120, sigma[2]),
        ])
    }

    #[test]
    fn sta_reads_gcx_rows_in_metres() {
        let text = [
            "* header line".to_string(),
            sta_row(
                "STA_GCX",
                "WETT_ZELL",
                ["4075539851.0", "931735253.0", "4801629358.0"],
                ["1.5", "2.0", "2.5"],
            ),
            sta_row("STA_VEL", "WETTZELL", ["1.0", "2.0", "3.0"], ["0.1", "0.1", "0.1"]),
        ]
        .join("\n");

        let frame = parse_sta(&text).unwrap();
        assert_eq!(frame.len(), 1);
        let s = &frame.stations[0];
        assert_eq!(s.id, "WETTZELL");
        assert!((s.position.x - 4_075_539.851).abs() < 1e-6);
        assert!((s.position.z - 4_801_629.358).abs() < 1e-6);
        assert!((s.sigma - Vec3::new(0.0015, 0.002, 0.0025)).norm() < 1e-12);
    }

    #[test]
    fn sta_reports_bad_numbers_with_line() {
        let text = sta_row("STA_GCX", "ONSALA60", ["abc", "1.0", "1.0"], ["1", "1", "1"]);
        let err = parse_sta(&text).unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");
    }

    fn ssc_header() -> String {
        (0..7).map(|i| format!("header {i}\n")).collect()
    }

    #[test]
    fn ssc_skips_header_and_velocity_rows() {
        let station = fixed_line(&[
            (0, "10402S002"),
            (10, "ONSALA60"),
            (26, "VLBI"),
            (32, "7213"),
            (36, "3370605.7806"),
            (50, "711917.7300"),
            (64, "5349830.9025"),
            (78, "0.0001"),
            (85, "0.0002"),
            (92, "0.0003"),
            (100, "1"),
        ]);
        let velocity = fixed_line(&[
            (0, "10402S002"),
            (43, "-0.0140"),
            (56, "0.0144"),
            (70, "0.0106"),
            (78, "0.0000"),
        ]);
        let text = format!("{}{station}\n{velocity}\n", ssc_header());

        let frame = parse_ssc(&text, SscLayout::Itrf2014).unwrap();
        assert_eq!(frame.len(), 1);
        let s = &frame.stations[0];
        assert_eq!(s.id, "10402S002");
        assert!((s.position.y - 711_917.73).abs() < 1e-9);
        assert!((s.sigma.z - 0.0003).abs() < 1e-12);
    }

    #[test]
    fn format_follows_file_name() {
        assert_eq!(FrameFormat::from_path(Path::new("a/b.STA")), FrameFormat::Sta);
        assert_eq!(
            FrameFormat::from_path(Path::new("ITRF2008_VLBI.SSC")),
            FrameFormat::Ssc(SscLayout::Itrf2008)
        );
        assert_eq!(
            FrameFormat::from_path(Path::new("itrf2014.ssc")),
            FrameFormat::Ssc(SscLayout::Itrf2014)
        );
        assert_eq!(FrameFormat::from_path(Path::new("frame.json")), FrameFormat::Json);
    }

    #[test]
    fn short_lines_give_empty_columns() {
        assert_eq!(column("STA", 0, 7), "STA");
        assert_eq!(column("STA", 10, 19), "");
    }
}

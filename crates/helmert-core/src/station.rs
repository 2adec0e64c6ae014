//! Station tables and the pairing of two frames.

use crate::{spherical_latitude, spherical_longitude, HelmertError, Pt3, Real, Result, Vec3};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single station of a terrestrial reference frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station identifier used to match stations across frames.
    pub id: String,
    /// Geocentric Cartesian position in metres.
    pub position: Pt3,
    /// Per-axis one-sigma position uncertainty in metres.
    #[serde(default = "zero_sigma")]
    pub sigma: Vec3,
}

fn zero_sigma() -> Vec3 {
    Vec3::zeros()
}

impl Station {
    pub fn new(id: impl Into<String>, position: Pt3, sigma: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
            sigma,
        }
    }

    /// Spherical angle φ = atan2(Y, X) in radians.
    pub fn latitude(&self) -> Real {
        spherical_latitude(&self.position)
    }

    /// Spherical angle λ = asin(Z / R) in radians.
    pub fn longitude(&self) -> Real {
        spherical_longitude(&self.position)
    }

    fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|v| v.is_finite())
            && self.sigma.iter().all(|v| v.is_finite())
    }
}

/// An ordered set of stations, as loaded from one reference frame solution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationFrame {
    pub stations: Vec<Station>,
}

impl StationFrame {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    /// Look up a station by identifier (first occurrence).
    pub fn get(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn positions(&self) -> Vec<Pt3> {
        self.stations.iter().map(|s| s.position).collect()
    }

    /// Map from identifier to index, keeping the first occurrence of duplicates.
    fn index_by_id(&self) -> HashMap<&str, usize> {
        let mut index = HashMap::with_capacity(self.stations.len());
        for (i, station) in self.stations.iter().enumerate() {
            if index.contains_key(station.id.as_str()) {
                warn!("duplicate station {} ignored", station.id);
                continue;
            }
            index.insert(station.id.as_str(), i);
        }
        index
    }
}

impl FromIterator<Station> for StationFrame {
    fn from_iter<I: IntoIterator<Item = Station>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The same station seen in the "from" and the "to" frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPair {
    pub from: Station,
    pub to: Station,
}

impl StationPair {
    pub fn id(&self) -> &str {
        &self.from.id
    }

    /// Sum of the six squared per-axis sigmas of both stations.
    pub fn combined_variance(&self) -> Real {
        self.from.sigma.norm_squared() + self.to.sigma.norm_squared()
    }

    pub fn combined_sigma(&self) -> Real {
        self.combined_variance().sqrt()
    }

    /// Position difference `to - from` in metres.
    pub fn difference(&self) -> Vec3 {
        self.to.position - self.from.position
    }
}

/// Pair stations present in both frames, in the order of the `from` frame.
///
/// Duplicate identifiers keep their first occurrence. Non-finite
/// coordinates or sigmas are rejected.
pub fn pair_stations(from: &StationFrame, to: &StationFrame) -> Result<Vec<StationPair>> {
    let to_index = to.index_by_id();
    let from_index = from.index_by_id();

    let mut pairs = Vec::with_capacity(from.len().min(to.len()));
    for (i, station) in from.stations.iter().enumerate() {
        if from_index.get(station.id.as_str()) != Some(&i) {
            continue;
        }
        let Some(&j) = to_index.get(station.id.as_str()) else {
            continue;
        };
        let other = &to.stations[j];
        if !station.is_finite() || !other.is_finite() {
            return Err(HelmertError::NonFiniteCoordinate(station.id.clone()));
        }
        pairs.push(StationPair {
            from: station.clone(),
            to: other.clone(),
        });
    }
    Ok(pairs)
}

/// Station pairs together with a per-pair selection flag.
///
/// Estimation only ever sees the selected pairs; the others are kept so a
/// caller can toggle them back on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairSelection {
    pairs: Vec<StationPair>,
    selected: Vec<bool>,
}

impl PairSelection {
    /// All pairs selected.
    pub fn new(pairs: Vec<StationPair>) -> Self {
        let selected = vec![true; pairs.len()];
        Self { pairs, selected }
    }

    /// Pair two frames and select every common station.
    pub fn from_frames(from: &StationFrame, to: &StationFrame) -> Result<Self> {
        Ok(Self::new(pair_stations(from, to)?))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[StationPair] {
        &self.pairs
    }

    pub fn mask(&self) -> &[bool] {
        &self.selected
    }

    /// Replace the whole selection mask.
    pub fn apply_mask(&mut self, mask: &[bool]) -> Result<()> {
        if mask.len() != self.pairs.len() {
            return Err(HelmertError::SelectionMismatch {
                expected: self.pairs.len(),
                got: mask.len(),
            });
        }
        self.selected.copy_from_slice(mask);
        Ok(())
    }

    /// Select or deselect a station by identifier. Returns `false` when the
    /// identifier is not among the pairs.
    pub fn set_selected(&mut self, id: &str, selected: bool) -> bool {
        match self.pairs.iter().position(|p| p.id() == id) {
            Some(i) => {
                self.selected[i] = selected;
                true
            }
            None => false,
        }
    }

    /// Deselect every listed identifier; unknown identifiers are logged.
    pub fn exclude<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            if !self.set_selected(id, false) {
                warn!("cannot exclude station {id}: not present in both frames");
            }
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.pairs
            .iter()
            .zip(&self.selected)
            .any(|(p, &sel)| sel && p.id() == id)
    }

    /// Selected pairs in their current order.
    pub fn selected(&self) -> Vec<&StationPair> {
        self.pairs
            .iter()
            .zip(&self.selected)
            .filter_map(|(p, &sel)| sel.then_some(p))
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }

    pub fn sort_by_name(&mut self) {
        self.sort_by_key_fn(|a, b| a.id().cmp(b.id()));
    }

    /// Sort by ascending combined sigma.
    pub fn sort_by_sigma(&mut self) {
        self.sort_by_key_fn(|a, b| a.combined_sigma().total_cmp(&b.combined_sigma()));
    }

    fn sort_by_key_fn<F>(&mut self, mut cmp: F)
    where
        F: FnMut(&StationPair, &StationPair) -> std::cmp::Ordering,
    {
        let mut rows: Vec<(StationPair, bool)> = self
            .pairs
            .drain(..)
            .zip(self.selected.drain(..))
            .collect();
        rows.sort_by(|a, b| cmp(&a.0, &b.0));
        (self.pairs, self.selected) = rows.into_iter().unzip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, x: Real, sigma: Real) -> Station {
        Station::new(id, Pt3::new(x, 0.0, 0.0), Vec3::repeat(sigma))
    }

    #[test]
    fn pairing_keeps_from_order_and_common_ids() {
        let from = StationFrame::new(vec![
            station("C", 3.0, 0.1),
            station("A", 1.0, 0.1),
            station("X", 9.0, 0.1),
        ]);
        let to = StationFrame::new(vec![station("A", 1.5, 0.2), station("C", 3.5, 0.2)]);

        let pairs = pair_stations(&from, &to).unwrap();
        let ids: Vec<&str> = pairs.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["C", "A"]);
        assert_eq!(pairs[1].difference(), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let from = StationFrame::new(vec![station("A", 1.0, 0.1), station("A", 2.0, 0.1)]);
        let to = StationFrame::new(vec![station("A", 5.0, 0.1), station("A", 7.0, 0.1)]);
        let pairs = pair_stations(&from, &to).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].from.position.x, 1.0);
        assert_eq!(pairs[0].to.position.x, 5.0);
    }

    #[test]
    fn non_finite_station_is_rejected() {
        let from = StationFrame::new(vec![station("A", Real::NAN, 0.1)]);
        let to = StationFrame::new(vec![station("A", 1.0, 0.1)]);
        assert_eq!(
            pair_stations(&from, &to).unwrap_err(),
            HelmertError::NonFiniteCoordinate("A".into())
        );
    }

    #[test]
    fn combined_sigma_uses_all_six_components() {
        let pair = StationPair {
            from: Station::new("A", Pt3::origin(), Vec3::new(1.0, 2.0, 2.0)),
            to: Station::new("A", Pt3::origin(), Vec3::new(0.0, 0.0, 4.0)),
        };
        assert!((pair.combined_variance() - 25.0).abs() < 1e-12);
        assert!((pair.combined_sigma() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn selection_mask_and_sorting() {
        let from = StationFrame::new(vec![
            station("B", 1.0, 0.3),
            station("A", 2.0, 0.1),
            station("C", 3.0, 0.2),
        ]);
        let mut selection = PairSelection::from_frames(&from, &from).unwrap();
        assert_eq!(selection.selected_count(), 3);

        selection.exclude(["A", "unknown"]);
        assert!(!selection.is_selected("A"));
        assert_eq!(selection.selected_count(), 2);

        selection.sort_by_sigma();
        let ids: Vec<&str> = selection.pairs().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["A", "C", "B"]);
        assert_eq!(selection.mask(), &[false, true, true]);

        selection.sort_by_name();
        let ids: Vec<&str> = selection.selected().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["B", "C"]);

        assert!(matches!(
            selection.apply_mask(&[true]),
            Err(HelmertError::SelectionMismatch {
                expected: 3,
                got: 1
            })
        ));
        selection.apply_mask(&[true, true, true]).unwrap();
        assert_eq!(selection.selected_count(), 3);
    }
}

//! Helmert parameter names, configuration and results.
//!
//! The nine parameters are always addressed through [`ParameterName`], whose
//! declaration order is the canonical order used for design columns, solver
//! output and display.

use crate::{HelmertError, Real, Result, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the nine Helmert parameters, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterName {
    TranslationX,
    TranslationY,
    TranslationZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    RotationX,
    RotationY,
    RotationZ,
}

impl ParameterName {
    /// All parameters in canonical order.
    pub const ALL: [ParameterName; 9] = [
        ParameterName::TranslationX,
        ParameterName::TranslationY,
        ParameterName::TranslationZ,
        ParameterName::ScaleX,
        ParameterName::ScaleY,
        ParameterName::ScaleZ,
        ParameterName::RotationX,
        ParameterName::RotationY,
        ParameterName::RotationZ,
    ];

    /// The three scale parameters in axis order.
    pub const SCALES: [ParameterName; 3] = [
        ParameterName::ScaleX,
        ParameterName::ScaleY,
        ParameterName::ScaleZ,
    ];

    /// Position in [`ParameterName::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParameterName::TranslationX => "translation_x",
            ParameterName::TranslationY => "translation_y",
            ParameterName::TranslationZ => "translation_z",
            ParameterName::ScaleX => "scale_x",
            ParameterName::ScaleY => "scale_y",
            ParameterName::ScaleZ => "scale_z",
            ParameterName::RotationX => "rotation_x",
            ParameterName::RotationY => "rotation_y",
            ParameterName::RotationZ => "rotation_z",
        }
    }

    pub fn is_scale(self) -> bool {
        matches!(
            self,
            ParameterName::ScaleX | ParameterName::ScaleY | ParameterName::ScaleZ
        )
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterName {
    type Err = HelmertError;

    fn from_str(s: &str) -> Result<Self> {
        ParameterName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| HelmertError::UnknownParameter(s.to_string()))
    }
}

/// Number of independent scale components in the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransformType {
    /// One scale shared by all three axes.
    #[default]
    #[serde(rename = "7")]
    Seven,
    /// One scale shared by X and Y, an independent Z scale.
    #[serde(rename = "8")]
    Eight,
    /// Three independent scales.
    #[serde(rename = "9")]
    Nine,
}

impl TransformType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransformType::Seven => "7",
            TransformType::Eight => "8",
            TransformType::Nine => "9",
        }
    }
}

impl fmt::Display for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformType {
    type Err = HelmertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "7" => Ok(TransformType::Seven),
            "8" => Ok(TransformType::Eight),
            "9" => Ok(TransformType::Nine),
            other => Err(HelmertError::UnsupportedTransformType(other.to_string())),
        }
    }
}

/// How a single parameter enters the estimation.
///
/// Serialized as the string `"estimate"` or as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "SpecRepr", into = "SpecRepr")]
pub enum ParameterSpec {
    #[default]
    Estimated,
    Fixed(Real),
}

const ESTIMATE_MARKER: &str = "estimate";

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SpecRepr {
    Fixed(Real),
    Marker(String),
}

impl TryFrom<SpecRepr> for ParameterSpec {
    type Error = HelmertError;

    fn try_from(repr: SpecRepr) -> Result<Self> {
        match repr {
            SpecRepr::Fixed(v) => Ok(ParameterSpec::Fixed(v)),
            SpecRepr::Marker(s) if s == ESTIMATE_MARKER => Ok(ParameterSpec::Estimated),
            SpecRepr::Marker(s) => Err(HelmertError::InvalidEstimateMarker(s)),
        }
    }
}

impl From<ParameterSpec> for SpecRepr {
    fn from(spec: ParameterSpec) -> Self {
        match spec {
            ParameterSpec::Estimated => SpecRepr::Marker(ESTIMATE_MARKER.to_string()),
            ParameterSpec::Fixed(v) => SpecRepr::Fixed(v),
        }
    }
}

impl ParameterSpec {
    pub fn fixed_value(self) -> Option<Real> {
        match self {
            ParameterSpec::Fixed(v) => Some(v),
            ParameterSpec::Estimated => None,
        }
    }

    pub fn is_fixed(self) -> bool {
        matches!(self, ParameterSpec::Fixed(_))
    }
}

/// Per-parameter estimation configuration covering exactly the nine names.
///
/// Serialized as a map keyed by parameter name. Deserialization fails with a
/// configuration error when the key set differs from the canonical nine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, ParameterSpec>",
    into = "BTreeMap<String, ParameterSpec>"
)]
pub struct ParameterConfig {
    specs: [ParameterSpec; 9],
}

impl ParameterConfig {
    /// Estimate every parameter.
    pub fn all_estimated() -> Self {
        Self::default()
    }

    /// Fix every parameter to the given values, indexed in canonical order.
    pub fn all_fixed(values: [Real; 9]) -> Self {
        Self {
            specs: values.map(ParameterSpec::Fixed),
        }
    }

    /// Build from `(name, spec)` entries; all nine names must appear once.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, ParameterSpec)>,
    {
        let mut specs: [Option<ParameterSpec>; 9] = [None; 9];
        for (key, spec) in entries {
            let name: ParameterName = key.parse()?;
            let slot = &mut specs[name.index()];
            if slot.is_some() {
                return Err(HelmertError::DuplicateParameter(name.as_str()));
            }
            *slot = Some(spec);
        }

        let mut out = [ParameterSpec::Estimated; 9];
        for name in ParameterName::ALL {
            out[name.index()] =
                specs[name.index()].ok_or(HelmertError::MissingParameter(name.as_str()))?;
        }
        Ok(Self { specs: out })
    }

    pub fn get(&self, name: ParameterName) -> ParameterSpec {
        self.specs[name.index()]
    }

    pub fn set(&mut self, name: ParameterName, spec: ParameterSpec) {
        self.specs[name.index()] = spec;
    }

    /// Builder-style variant of [`ParameterConfig::set`].
    pub fn with(mut self, name: ParameterName, spec: ParameterSpec) -> Self {
        self.set(name, spec);
        self
    }

    /// `(name, spec)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterName, ParameterSpec)> + '_ {
        ParameterName::ALL
            .into_iter()
            .map(move |name| (name, self.get(name)))
    }

    pub fn fixed_count(&self) -> usize {
        self.specs.iter().filter(|s| s.is_fixed()).count()
    }

    pub fn all_fixed_values(&self) -> bool {
        self.fixed_count() == ParameterName::ALL.len()
    }
}

impl TryFrom<BTreeMap<String, ParameterSpec>> for ParameterConfig {
    type Error = HelmertError;

    fn try_from(map: BTreeMap<String, ParameterSpec>) -> Result<Self> {
        Self::from_entries(map.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

impl From<ParameterConfig> for BTreeMap<String, ParameterSpec> {
    fn from(config: ParameterConfig) -> Self {
        config
            .iter()
            .map(|(name, spec)| (name.as_str().to_string(), spec))
            .collect()
    }
}

/// Whether a parameter value was supplied or solved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterStatus {
    Fixed,
    #[default]
    Estimated,
}

/// A single parameter value with its optional one-sigma uncertainty.
///
/// `sigma` is only present for parameters solved by weighted least squares.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameter {
    pub value: Real,
    pub sigma: Option<Real>,
    pub status: ParameterStatus,
}

impl Parameter {
    pub fn fixed(value: Real) -> Self {
        Self {
            value,
            sigma: None,
            status: ParameterStatus::Fixed,
        }
    }

    pub fn estimated(value: Real, sigma: Option<Real>) -> Self {
        Self {
            value,
            sigma,
            status: ParameterStatus::Estimated,
        }
    }
}

/// Complete set of nine Helmert parameters.
///
/// Translations are in metres, scales are dimensionless perturbations and
/// rotations are small angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSet {
    pub translation_x: Parameter,
    pub translation_y: Parameter,
    pub translation_z: Parameter,
    pub scale_x: Parameter,
    pub scale_y: Parameter,
    pub scale_z: Parameter,
    pub rotation_x: Parameter,
    pub rotation_y: Parameter,
    pub rotation_z: Parameter,
}

impl ParameterSet {
    /// Parameter set made only of fixed values, indexed in canonical order.
    pub fn from_values(values: [Real; 9]) -> Self {
        let mut set = Self::default();
        for name in ParameterName::ALL {
            *set.get_mut(name) = Parameter::fixed(values[name.index()]);
        }
        set
    }

    /// Parameter set holding the fixed values of `config`.
    ///
    /// Estimated entries are left at zero with [`ParameterStatus::Estimated`]
    /// so a solver can fill them in.
    pub fn from_config(config: &ParameterConfig) -> Self {
        let mut set = Self::default();
        for (name, spec) in config.iter() {
            *set.get_mut(name) = match spec {
                ParameterSpec::Fixed(v) => Parameter::fixed(v),
                ParameterSpec::Estimated => Parameter::estimated(0.0, None),
            };
        }
        set
    }

    pub fn get(&self, name: ParameterName) -> &Parameter {
        match name {
            ParameterName::TranslationX => &self.translation_x,
            ParameterName::TranslationY => &self.translation_y,
            ParameterName::TranslationZ => &self.translation_z,
            ParameterName::ScaleX => &self.scale_x,
            ParameterName::ScaleY => &self.scale_y,
            ParameterName::ScaleZ => &self.scale_z,
            ParameterName::RotationX => &self.rotation_x,
            ParameterName::RotationY => &self.rotation_y,
            ParameterName::RotationZ => &self.rotation_z,
        }
    }

    pub fn get_mut(&mut self, name: ParameterName) -> &mut Parameter {
        match name {
            ParameterName::TranslationX => &mut self.translation_x,
            ParameterName::TranslationY => &mut self.translation_y,
            ParameterName::TranslationZ => &mut self.translation_z,
            ParameterName::ScaleX => &mut self.scale_x,
            ParameterName::ScaleY => &mut self.scale_y,
            ParameterName::ScaleZ => &mut self.scale_z,
            ParameterName::RotationX => &mut self.rotation_x,
            ParameterName::RotationY => &mut self.rotation_y,
            ParameterName::RotationZ => &mut self.rotation_z,
        }
    }

    pub fn value(&self, name: ParameterName) -> Real {
        self.get(name).value
    }

    /// Values in canonical order.
    pub fn values(&self) -> [Real; 9] {
        ParameterName::ALL.map(|name| self.value(name))
    }

    /// `(name, parameter)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterName, &Parameter)> + '_ {
        ParameterName::ALL
            .into_iter()
            .map(move |name| (name, self.get(name)))
    }

    /// Translation vector `C` in metres.
    pub fn translation(&self) -> Vec3 {
        Vec3::new(
            self.translation_x.value,
            self.translation_y.value,
            self.translation_z.value,
        )
    }

    /// Per-axis scale perturbation `S`.
    pub fn scale(&self) -> Vec3 {
        Vec3::new(self.scale_x.value, self.scale_y.value, self.scale_z.value)
    }

    /// Infinitesimal rotation vector `Ω` in radians.
    pub fn rotation(&self) -> Vec3 {
        Vec3::new(
            self.rotation_x.value,
            self.rotation_y.value,
            self.rotation_z.value,
        )
    }
}

//! Core types for `helmert-rs`.
//!
//! This crate contains:
//! - scalar and vector aliases (`Real`, `Vec3`, `Pt3`) and the spherical-earth
//!   angle helpers,
//! - station tables, station pairing and pair selection,
//! - the nine Helmert parameters: names, per-parameter configuration
//!   (fixed or estimated), transform types and result sets,
//! - the error type shared by all crates of the workspace.
//!
//! Transform model (infinitesimal similarity):
//! `X' = X + C + S ⊙ X + Ω × X`

/// Error type and classification.
pub mod error;
/// Scalar aliases and spherical-earth helpers.
pub mod math;
/// Parameter names, configuration and result sets.
pub mod params;
/// Stations, frames, pairing and selection.
pub mod station;
/// Deterministic synthetic networks for tests and demos.
pub mod synthetic;

pub use error::*;
pub use math::*;
pub use params::*;
pub use station::*;

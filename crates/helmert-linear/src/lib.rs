//! Linear estimation and application of Helmert transforms.
//!
//! Pipeline, leaf first:
//! - [`design`]: nine canonical design columns and the observation vector,
//! - [`constraints`]: fixed-parameter elimination and scale collapsing,
//! - [`lsq`]: ordinary and weighted least squares on the normal equations,
//! - [`estimate`]: the three steps above, expanded back to nine parameters,
//! - [`transform`]: the infinitesimal similarity transform,
//! - [`residuals`]: Up/East/North decomposition of position differences.

pub mod constraints;
pub mod design;
pub mod estimate;
pub mod lsq;
pub mod residuals;
pub mod transform;

pub use constraints::*;
pub use design::*;
pub use estimate::*;
pub use lsq::*;
pub use residuals::*;
pub use transform::*;

//! Deterministic synthetic station networks.
//!
//! Small building blocks for tests and demos:
//! - globally distributed networks with antipodal symmetry,
//! - rigid offsets of a whole frame,
//! - deterministic pseudo-random position noise.
//!
//! Everything here is seeded explicitly and keeps a stable station order.
//!
//! # Example
//!
//! ```
//! use helmert_core::synthetic::{network, noise::UniformPositionNoise};
//! use helmert_core::Vec3;
//!
//! let to = network::global_network(20, 0.005);
//! let from = network::offset_frame(&to, Vec3::new(0.01, 0.01, 0.01));
//! let noisy = UniformPositionNoise { seed: 7, max_abs: 0.002 }.apply_frame(&from);
//! assert_eq!(noisy.len(), 20);
//! ```

pub mod network;
pub mod noise;

//! # Shared Types Crate
//!
//! Cross-subsystem domain entities for Territory-Chain.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a subsystem boundary
//!   (geo primitives, territories, chain identifiers) is defined here.
//! - **Data only**: no geodesy math and no policy thresholds live in this
//!   crate; the subsystem crates own their algorithms and configuration.

pub mod entities;
pub mod geo;

pub use entities::*;
pub use geo::*;

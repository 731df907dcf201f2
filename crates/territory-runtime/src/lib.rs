//! # Territory Runtime
//!
//! Wires the subsystem graph and exposes the single facade outer layers talk
//! to.
//!
//! ## Component graph
//!
//! ```text
//! RunSession ──finalize──→ tc-01 (spatial key) ──→ tc-02 (eligibility)
//!                                                        │
//!                                                        ↓
//!                         tc-03 (claim state machine) ──mint──→ tc-04 (registry)
//!                                  │                                 ↑
//!                          ContractGateway                   tc-05 (remote apply)
//! ```
//!
//! Construction order follows the dependencies: registry first, then the
//! claim service and the remote handler over it. The whole graph is built
//! once in `TerritoryCore::new` and never rewired.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;

pub use config::{ConfigError, RuntimeConfig};
pub use core::{RuntimeError, TerritoryCore};

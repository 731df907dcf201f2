//! # TC-04 Territory Registry
//!
//! Local authoritative cache of territory entities, their ownership and
//! defense status.
//!
//! **Subsystem ID:** 04
//!
//! ## Purpose
//!
//! - Sole owner of `Territory` records; everything else reads through it
//! - `recompute_status` is the only path that changes a territory's status
//! - Cache, not source of truth: a conflicting on-chain read overwrites local
//!   state and appends to the cross-chain history, never merges
//!
//! ## Module Structure
//!
//! ```text
//! tc-04-registry/
//! ├── registry.rs      # the cache and its invariant-guarding mutators
//! ├── store.rs         # opaque KV persistence port + in-memory adapter
//! └── thresholds.rs    # ordered activity-point status thresholds
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod registry;
pub mod store;
pub mod thresholds;

pub use registry::{ChainTruth, RegistryError, TerritoryRegistry};
pub use store::{InMemoryTerritoryStore, StoreError, TerritoryStore};
pub use thresholds::{StatusThresholds, ThresholdOrderingError};

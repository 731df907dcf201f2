//! # TC-02 Run Eligibility
//!
//! Decides whether a finished activity qualifies for a territory claim and
//! computes its deterministic metadata.
//!
//! **Subsystem ID:** 02
//!
//! ## Purpose
//!
//! - `RunSession`: append-only point track, immutable once finalized
//! - `evaluate`: distance / loop-closure / degeneracy gates with reason codes
//! - Deterministic difficulty, rarity, and reward derivation
//!
//! Ineligible runs always carry a reason (`TooShort`, `NotClosedLoop`,
//! `DegeneratePath`) so callers can surface specific guidance; there are no
//! silent nulls.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod evaluator;
pub mod session;

pub use evaluator::{
    activity_points_for, evaluate, EligibilityConfig, EligibilityResult, IneligibleReason,
};
pub use session::{RunSession, RunStats, SessionError};

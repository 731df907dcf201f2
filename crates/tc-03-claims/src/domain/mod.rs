//! Domain layer: claim states, intents, and errors.

pub mod entities;
pub mod errors;

pub use entities::{ClaimState, FailureReason, TerritoryIntent};
pub use errors::ClaimError;

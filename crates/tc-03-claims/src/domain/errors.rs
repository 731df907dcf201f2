//! Claim errors.
//!
//! Conflict and validation errors are returned synchronously from
//! `begin_claim`/`cancel` for immediate caller feedback. Gateway failures
//! after submission are NOT errors; they land in the terminal `Failed` state
//! with a `FailureReason`.

use super::entities::ClaimState;
use shared_types::Geohash;
use thiserror::Error;
use uuid::Uuid;

/// Claim orchestration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimError {
    /// Another claim for the same geohash is Pending or Submitted.
    #[error("Territory {0} already has a claim in flight")]
    ClaimInFlight(Geohash),

    /// The geohash is already claimed on-chain.
    #[error("Territory {0} is already claimed")]
    AlreadyClaimed(Geohash),

    /// No previewed intent exists for the geohash.
    #[error("No claim intent previewed for territory {0}")]
    NoIntent(Geohash),

    /// The referenced intent does not exist (destroyed or never created).
    #[error("Unknown claim intent: {0}")]
    UnknownIntent(Uuid),

    /// The intent outlived its TTL before reaching the chain.
    #[error("Claim intent {intent_id} expired at {expires_at}")]
    IntentExpired {
        /// The expired intent.
        intent_id: Uuid,
        /// Unix seconds it expired at.
        expires_at: u64,
    },

    /// Operation not valid for the intent's current state.
    #[error("Invalid claim transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Current state.
        from: ClaimState,
        /// Attempted state.
        to: ClaimState,
    },

    /// Cancellation requested after broadcast.
    #[error("Cannot cancel a submitted claim; wait for a terminal state")]
    CancelAfterSubmit,

    /// The gateway could not be reached during a synchronous pre-flight read.
    #[error("Network error: {0}")]
    Network(String),

    /// Gas buffer below the required safety minimum.
    #[error("Gas buffer {got}% is below the {min}% safety minimum")]
    GasBufferTooSmall {
        /// Configured buffer.
        got: u64,
        /// Required minimum.
        min: u64,
    },
}

impl ClaimError {
    /// Whether this is a conflict (already claimed or already locked).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ClaimError::ClaimInFlight(_) | ClaimError::AlreadyClaimed(_)
        )
    }
}

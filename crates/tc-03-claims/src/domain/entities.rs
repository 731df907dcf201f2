//! Claim states and the territory intent entity.

use super::errors::ClaimError;
use serde::{Deserialize, Serialize};
use shared_types::{Address, GeoBounds, Geohash, TerritoryMetadata};
use uuid::Uuid;

/// Claim attempt state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimState {
    /// Eligibility detected; nothing committed yet.
    #[default]
    Previewed,
    /// Caller intends to claim; the geohash lock is held.
    Pending,
    /// Transaction broadcast; awaiting receipt.
    Submitted,
    /// Receipt confirmed; territory minted.
    Confirmed,
    /// Terminal failure with a preserved reason.
    Failed,
}

impl ClaimState {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, next: ClaimState) -> bool {
        matches!(
            (self, next),
            (Self::Previewed, Self::Pending)
                | (Self::Pending, Self::Submitted)
                | (Self::Pending, Self::Failed)
                | (Self::Submitted, Self::Confirmed)
                | (Self::Submitted, Self::Failed)
        )
    }

    /// Check if terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    /// Whether local cancellation is still permitted.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Previewed | Self::Pending)
    }
}

/// Why a claim attempt failed.
///
/// `user_message` is deliberately distinct from the raw transport detail so
/// callers can show specific guidance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The geohash was already claimed on-chain.
    AlreadyClaimed,
    /// The transaction reverted.
    Reverted(String),
    /// The bounded receipt wait elapsed without resolution.
    Timeout,
    /// The gateway was unreachable or the RPC failed.
    NetworkError(String),
}

impl FailureReason {
    /// Human-readable guidance for the end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureReason::AlreadyClaimed => "Territory already claimed",
            FailureReason::Reverted(_) => "Claim transaction failed on-chain",
            FailureReason::Timeout => "Network timeout, please retry",
            FailureReason::NetworkError(_) => "Network unavailable, please retry",
        }
    }
}

/// Ephemeral record of one claim attempt.
///
/// Created the instant eligibility is detected; destroyed on terminal state,
/// explicit cancel, or TTL expiry. At most one live intent per geohash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerritoryIntent {
    /// Intent identifier.
    pub id: Uuid,
    /// Spatial key being claimed.
    pub geohash: Geohash,
    /// Candidate bounds from the originating run.
    pub bounds: GeoBounds,
    /// Estimated metadata from the originating run.
    pub metadata: TerritoryMetadata,
    /// Originating run session.
    pub run_id: Uuid,
    /// Claiming account.
    pub owner: Address,
    /// Activity value of the originating run, stamped on the territory at
    /// mint.
    pub activity_points: u64,
    /// Current state.
    pub state: ClaimState,
    /// Failure reason, set on `Failed`.
    pub failure: Option<FailureReason>,
    /// Unix seconds created.
    pub created_at: u64,
    /// Unix seconds after which the intent is dead.
    pub expires_at: u64,
}

impl TerritoryIntent {
    /// Whether the TTL has elapsed.
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at
    }

    /// Transition to a new state.
    pub fn transition_to(&mut self, next: ClaimState) -> Result<(), ClaimError> {
        if !self.state.can_transition_to(next) {
            return Err(ClaimError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Enter the terminal `Failed` state, preserving the reason.
    pub fn fail(&mut self, reason: FailureReason) -> Result<(), ClaimError> {
        self.transition_to(ClaimState::Failed)?;
        self.failure = Some(reason);
        Ok(())
    }
}

//! Applies incoming envelopes to local state, at most once per message id.

use crate::dedup::SeenMessageCache;
use crate::envelope::{decode, CodecError, CrossChainEnvelope, CrossChainPayload};
use parking_lot::Mutex;
use shared_types::{Address, ChainTransfer, Territory};
use std::collections::HashMap;
use std::sync::Arc;
use tc_04_registry::TerritoryRegistry;

/// What happened to a delivered envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteApplyOutcome {
    /// Payload decoded and applied; the id is now in the seen window.
    Applied,
    /// Message id already applied; no second mutation.
    Duplicate,
    /// Payload kind outside the closed set; skipped, session continues.
    UnknownType,
    /// Envelope could not be applied; the id is NOT recorded, so a redelivery
    /// is retried from scratch.
    Rejected(String),
}

/// Inbound side of the cross-chain boundary.
///
/// Dedup happens here, before decode: a duplicate id never touches the
/// registry regardless of payload content.
pub struct RemoteMessageHandler {
    registry: Arc<TerritoryRegistry>,
    seen: Mutex<SeenMessageCache>,
    /// Rewards acknowledged but not yet paid out, per player.
    pending_rewards: Mutex<HashMap<Address, u64>>,
}

impl RemoteMessageHandler {
    /// Handler over the local registry with the given dedup window size.
    pub fn new(registry: Arc<TerritoryRegistry>, seen_capacity: usize) -> Self {
        Self {
            registry,
            seen: Mutex::new(SeenMessageCache::new(seen_capacity)),
            pending_rewards: Mutex::new(HashMap::new()),
        }
    }

    /// Process one delivered envelope.
    pub fn on_remote_message(&self, envelope: &CrossChainEnvelope) -> RemoteApplyOutcome {
        if self.seen.lock().contains(&envelope.message_id) {
            tracing::debug!(
                message_id = %envelope.message_id,
                "[tc-05] Duplicate message ignored"
            );
            return RemoteApplyOutcome::Duplicate;
        }

        let payload = match decode(envelope) {
            Ok(payload) => payload,
            Err(CodecError::UnknownType(kind)) => {
                tracing::warn!(
                    message_id = %envelope.message_id,
                    kind,
                    "[tc-05] Unknown payload kind skipped"
                );
                return RemoteApplyOutcome::UnknownType;
            }
            Err(e) => {
                tracing::warn!(
                    message_id = %envelope.message_id,
                    error = %e,
                    "[tc-05] Envelope rejected"
                );
                return RemoteApplyOutcome::Rejected(e.to_string());
            }
        };

        if let Err(reason) = self.apply(envelope, payload) {
            tracing::warn!(
                message_id = %envelope.message_id,
                reason,
                "[tc-05] Payload rejected"
            );
            return RemoteApplyOutcome::Rejected(reason);
        }

        self.seen.lock().record(&envelope.message_id);
        tracing::info!(
            message_id = %envelope.message_id,
            kind = %envelope.payload_kind,
            source = ?envelope.source_chain,
            "[tc-05] Message applied"
        );
        RemoteApplyOutcome::Applied
    }

    /// Pending reward balance for a player.
    pub fn pending_reward(&self, player: &Address) -> u64 {
        self.pending_rewards.lock().get(player).copied().unwrap_or(0)
    }

    /// Drain a player's pending balance, returning what was owed.
    pub fn settle_reward(&self, player: &Address) -> u64 {
        self.pending_rewards.lock().remove(player).unwrap_or(0)
    }

    fn apply(
        &self,
        envelope: &CrossChainEnvelope,
        payload: CrossChainPayload,
    ) -> Result<(), String> {
        match payload {
            CrossChainPayload::TerritoryClaim {
                geohash,
                owner,
                token_id,
                metadata,
                bounds,
                claimed_at,
            } => {
                let mut territory = Territory::minted(
                    geohash,
                    bounds,
                    metadata,
                    owner,
                    envelope.source_chain,
                    claimed_at,
                );
                territory.token_id = Some(token_id);
                territory.cross_chain_history.push(ChainTransfer {
                    from_chain: envelope.source_chain,
                    to_chain: envelope.target_chain,
                    message_id: envelope.message_id.clone(),
                    timestamp: envelope.timestamp,
                });
                self.registry.upsert(territory);
                Ok(())
            }
            CrossChainPayload::StatsUpdate {
                geohash,
                activity_points_delta,
            } => {
                let current = self
                    .registry
                    .get(&geohash)
                    .ok_or_else(|| format!("stats update for unknown territory {geohash}"))?
                    .activity_points;
                self.registry
                    .recompute_status(&geohash, current.saturating_add(activity_points_delta))
                    .map_err(|e| e.to_string())?;
                Ok(())
            }
            CrossChainPayload::RewardClaim { player, amount } => {
                let mut rewards = self.pending_rewards.lock();
                let balance = rewards.entry(player).or_insert(0);
                *balance = balance.saturating_add(amount);
                Ok(())
            }
        }
    }
}

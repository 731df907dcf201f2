//! Claim orchestration service.
//!
//! Owns the lifecycle of every `TerritoryIntent` and the per-geohash lock
//! map. Per geohash, claim-state transitions are strictly sequential; across
//! geohashes, attempts proceed concurrently with no ordering guarantee.

use crate::domain::{ClaimError, ClaimState, FailureReason, TerritoryIntent};
use crate::ports::outbound::{ClaimCall, ContractGateway, GatewayError};
use parking_lot::Mutex;
use shared_types::{Address, ChainId, GeoBounds, Geohash, Territory, TerritoryMetadata, TokenId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tc_04_registry::TerritoryRegistry;
use uuid::Uuid;

/// Required minimum gas safety buffer.
pub const MIN_GAS_BUFFER_PERCENT: u64 = 20;

/// Claim policy parameters.
#[derive(Clone, Debug)]
pub struct ClaimConfig {
    /// Intent time-to-live in seconds.
    pub intent_ttl_secs: u64,
    /// Gas safety buffer applied over the estimate, percent.
    pub gas_buffer_percent: u64,
    /// Bounded wait for a receipt after broadcast.
    pub receipt_timeout: Duration,
    /// Chain new territories mint on.
    pub origin_chain: ChainId,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            intent_ttl_secs: 600,
            gas_buffer_percent: MIN_GAS_BUFFER_PERCENT,
            receipt_timeout: Duration::from_secs(90),
            origin_chain: ChainId::Hub,
        }
    }
}

impl ClaimConfig {
    /// Reject configurations below the safety minimums.
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.gas_buffer_percent < MIN_GAS_BUFFER_PERCENT {
            return Err(ClaimError::GasBufferTooSmall {
                got: self.gas_buffer_percent,
                min: MIN_GAS_BUFFER_PERCENT,
            });
        }
        Ok(())
    }

    /// Bounded receipt wait, scaled by the origin chain's confirmation depth.
    pub fn receipt_deadline(&self) -> Duration {
        self.receipt_timeout * self.origin_chain.required_confirmations() as u32
    }
}

/// Terminal result of an advanced claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimOutcome {
    /// Terminal state reached (`Confirmed` or `Failed`).
    pub state: ClaimState,
    /// Failure reason, present iff `Failed`.
    pub failure: Option<FailureReason>,
    /// Minted token id, present iff `Confirmed`.
    pub token_id: Option<TokenId>,
}

impl ClaimOutcome {
    fn confirmed(token_id: TokenId) -> Self {
        Self {
            state: ClaimState::Confirmed,
            failure: None,
            token_id: Some(token_id),
        }
    }

    fn failed(reason: FailureReason) -> Self {
        Self {
            state: ClaimState::Failed,
            failure: Some(reason),
            token_id: None,
        }
    }
}

/// Orchestrates claim attempts against the contract gateway.
pub struct ClaimService<G> {
    gateway: Arc<G>,
    registry: Arc<TerritoryRegistry>,
    config: ClaimConfig,
    intents: Mutex<HashMap<Uuid, TerritoryIntent>>,
    /// Geohashes with a Pending or Submitted attempt.
    locks: Mutex<HashSet<String>>,
    /// Geohashes whose last attempt timed out; a fresh chain read is required
    /// before they can be locked again.
    unreconciled: Mutex<HashSet<String>>,
}

impl<G: ContractGateway> ClaimService<G> {
    /// Build a service over a gateway and the territory registry.
    pub fn new(
        gateway: Arc<G>,
        registry: Arc<TerritoryRegistry>,
        config: ClaimConfig,
    ) -> Result<Self, ClaimError> {
        config.validate()?;
        Ok(Self {
            gateway,
            registry,
            config,
            intents: Mutex::new(HashMap::new()),
            locks: Mutex::new(HashSet::new()),
            unreconciled: Mutex::new(HashSet::new()),
        })
    }

    /// Record a previewed intent the moment eligibility is detected.
    ///
    /// At most one live intent may exist per geohash; expired leftovers are
    /// evicted first.
    pub fn preview(
        &self,
        geohash: Geohash,
        bounds: GeoBounds,
        metadata: TerritoryMetadata,
        run_id: Uuid,
        owner: Address,
        activity_points: u64,
    ) -> Result<TerritoryIntent, ClaimError> {
        let now = now_secs();
        self.evict_expired(now);

        let mut intents = self.intents.lock();
        if intents.values().any(|i| i.geohash == geohash) {
            return Err(ClaimError::ClaimInFlight(geohash));
        }

        let intent = TerritoryIntent {
            id: Uuid::new_v4(),
            geohash,
            bounds,
            metadata,
            run_id,
            owner,
            activity_points,
            state: ClaimState::Previewed,
            failure: None,
            created_at: now,
            expires_at: now + self.config.intent_ttl_secs,
        };

        tracing::info!(
            intent_id = %intent.id,
            geohash = %intent.geohash,
            "[tc-03] Claim previewed"
        );
        intents.insert(intent.id, intent.clone());
        Ok(intent)
    }

    /// Move a previewed intent to `Pending`, taking the per-geohash lock.
    ///
    /// If the previous attempt on this geohash timed out, a reconciliation
    /// read against the gateway happens here before the lock is granted.
    pub async fn begin_claim(&self, geohash: &Geohash) -> Result<TerritoryIntent, ClaimError> {
        let now = now_secs();

        let intent = {
            let intents = self.intents.lock();
            match intents.values().find(|i| &i.geohash == geohash) {
                Some(intent) => intent.clone(),
                None => return Err(ClaimError::NoIntent(geohash.clone())),
            }
        };
        if intent.is_expired(now) {
            // Eviction must release the geohash lock too if the expired
            // attempt was already Pending.
            self.destroy(&intent);
            return Err(ClaimError::IntentExpired {
                intent_id: intent.id,
                expires_at: intent.expires_at,
            });
        }
        if intent.state != ClaimState::Previewed {
            return Err(ClaimError::ClaimInFlight(geohash.clone()));
        }
        let intent_id = intent.id;

        if self.needs_reconciliation(geohash) {
            let claimed = self
                .gateway
                .is_claimed(geohash)
                .await
                .map_err(|e| ClaimError::Network(e.to_string()))?;
            self.unreconciled.lock().remove(geohash.as_str());
            if claimed {
                self.intents.lock().remove(&intent_id);
                return Err(ClaimError::AlreadyClaimed(geohash.clone()));
            }
        }

        {
            let mut locks = self.locks.lock();
            if locks.contains(geohash.as_str()) {
                return Err(ClaimError::ClaimInFlight(geohash.clone()));
            }
            locks.insert(geohash.as_str().to_string());
        }

        let mut intents = self.intents.lock();
        let intent = intents
            .get_mut(&intent_id)
            .ok_or(ClaimError::UnknownIntent(intent_id))?;
        intent.transition_to(ClaimState::Pending)?;

        tracing::info!(intent_id = %intent.id, geohash = %geohash, "[tc-03] Claim pending");
        Ok(intent.clone())
    }

    /// Drive a pending intent to its terminal state.
    ///
    /// Gateway failures are captured into `Failed` with a reason and returned
    /// as a normal outcome; `Err` is reserved for caller mistakes (unknown
    /// intent, wrong state, expired TTL).
    pub async fn advance_claim(&self, intent_id: Uuid) -> Result<ClaimOutcome, ClaimError> {
        let intent = self
            .intents
            .lock()
            .get(&intent_id)
            .cloned()
            .ok_or(ClaimError::UnknownIntent(intent_id))?;

        if intent.state != ClaimState::Pending {
            return Err(ClaimError::InvalidTransition {
                from: intent.state,
                to: ClaimState::Submitted,
            });
        }
        if intent.is_expired(now_secs()) {
            self.destroy(&intent);
            return Err(ClaimError::IntentExpired {
                intent_id,
                expires_at: intent.expires_at,
            });
        }

        // Existence check first: never pay for gas estimation on a geohash
        // that is already claimed.
        match self.gateway.is_claimed(&intent.geohash).await {
            Ok(true) => return Ok(self.finish_failed(&intent, FailureReason::AlreadyClaimed)),
            Ok(false) => {}
            Err(e) => {
                return Ok(self.finish_failed(&intent, FailureReason::NetworkError(e.to_string())))
            }
        }

        let mut call = ClaimCall {
            geohash: intent.geohash.clone(),
            owner: intent.owner,
            metadata: intent.metadata.clone(),
            bounds: intent.bounds,
            gas_limit: None,
        };

        let estimate = match self.gateway.estimate_gas(&call).await {
            Ok(estimate) => estimate,
            Err(e) => {
                return Ok(self.finish_failed(&intent, FailureReason::NetworkError(e.to_string())))
            }
        };
        call.gas_limit = Some(estimate + estimate * self.config.gas_buffer_percent / 100);

        // Commit point: from here the transaction may land even if we lose
        // contact, so the intent is marked Submitted before the broadcast.
        self.mark_submitted(intent_id)?;

        let handle = match self.gateway.submit(&call).await {
            Ok(handle) => handle,
            Err(e) => {
                return Ok(self.finish_failed(&intent, FailureReason::NetworkError(e.to_string())))
            }
        };

        // The deadline is enforced locally as well as handed to the gateway;
        // an adapter that ignores its bound cannot wedge the claim.
        let deadline = self.config.receipt_deadline();
        let waited =
            tokio::time::timeout(deadline, self.gateway.await_receipt(&handle, deadline)).await;

        let receipt = match waited {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(GatewayError::ReceiptTimeout(_))) | Err(_) => {
                // The transaction may still land; require a chain read before
                // any retry on this geohash.
                self.unreconciled
                    .lock()
                    .insert(intent.geohash.as_str().to_string());
                return Ok(self.finish_failed(&intent, FailureReason::Timeout));
            }
            Ok(Err(e)) => {
                return Ok(self.finish_failed(&intent, FailureReason::NetworkError(e.to_string())))
            }
        };

        if !receipt.success {
            return Ok(self.finish_failed(
                &intent,
                FailureReason::Reverted("execution reverted".to_string()),
            ));
        }

        let Some(token_id) = receipt.minted_token_id() else {
            return Ok(self.finish_failed(
                &intent,
                FailureReason::Reverted("mint event missing from receipt".to_string()),
            ));
        };

        let claimed_at = now_secs();
        let mut territory = Territory::minted(
            intent.geohash.clone(),
            intent.bounds,
            intent.metadata.clone(),
            intent.owner,
            self.config.origin_chain,
            claimed_at,
        );
        territory.token_id = Some(token_id);
        // The run's activity value is stamped at mint; status stays Claimed
        // until the first recompute bands it.
        territory.activity_points = intent.activity_points;
        self.registry.upsert(territory);

        tracing::info!(
            intent_id = %intent.id,
            geohash = %intent.geohash,
            token_id,
            "[tc-03] Claim confirmed"
        );
        self.destroy(&intent);
        Ok(ClaimOutcome::confirmed(token_id))
    }

    /// Cancel a claim attempt. Permitted only before submission.
    pub fn cancel(&self, intent_id: Uuid) -> Result<(), ClaimError> {
        let mut intents = self.intents.lock();
        let intent = intents
            .get(&intent_id)
            .ok_or(ClaimError::UnknownIntent(intent_id))?;

        if !intent.state.is_cancellable() {
            return Err(ClaimError::CancelAfterSubmit);
        }

        let geohash = intent.geohash.clone();
        intents.remove(&intent_id);
        self.locks.lock().remove(geohash.as_str());
        tracing::info!(%intent_id, %geohash, "[tc-03] Claim cancelled");
        Ok(())
    }

    /// Look up a live intent.
    pub fn intent(&self, intent_id: Uuid) -> Option<TerritoryIntent> {
        self.intents.lock().get(&intent_id).cloned()
    }

    /// Whether a claim is currently in flight for the geohash.
    pub fn is_locked(&self, geohash: &Geohash) -> bool {
        self.locks.lock().contains(geohash.as_str())
    }

    /// Whether a retry on this geohash must re-read the chain first.
    pub fn needs_reconciliation(&self, geohash: &Geohash) -> bool {
        self.unreconciled.lock().contains(geohash.as_str())
    }

    fn mark_submitted(&self, intent_id: Uuid) -> Result<(), ClaimError> {
        let mut intents = self.intents.lock();
        let intent = intents
            .get_mut(&intent_id)
            .ok_or(ClaimError::UnknownIntent(intent_id))?;
        intent.transition_to(ClaimState::Submitted)
    }

    /// Terminal failure: preserve the reason, release the lock, destroy the
    /// intent.
    fn finish_failed(&self, intent: &TerritoryIntent, reason: FailureReason) -> ClaimOutcome {
        tracing::warn!(
            intent_id = %intent.id,
            geohash = %intent.geohash,
            reason = ?reason,
            user_message = reason.user_message(),
            "[tc-03] Claim failed"
        );
        self.destroy(intent);
        ClaimOutcome::failed(reason)
    }

    /// Drop every intent past its TTL, releasing any locks they hold.
    fn evict_expired(&self, now: u64) {
        let expired: Vec<TerritoryIntent> = self
            .intents
            .lock()
            .values()
            .filter(|intent| intent.is_expired(now))
            .cloned()
            .collect();
        for intent in &expired {
            tracing::debug!(
                intent_id = %intent.id,
                geohash = %intent.geohash,
                "[tc-03] Expired intent evicted"
            );
            self.destroy(intent);
        }
    }

    fn destroy(&self, intent: &TerritoryIntent) {
        self.intents.lock().remove(&intent.id);
        self.locks.lock().remove(intent.geohash.as_str());
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

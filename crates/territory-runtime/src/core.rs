//! The wired component graph and its facade.
//!
//! `TerritoryCore` constructs every subsystem once, in dependency order, and
//! is the only surface outer layers (mobile bridge, CLI, tests) talk to.
//! Nothing inside the graph is reachable mutably from outside.

use crate::config::{ConfigError, RuntimeConfig};
use shared_types::{Address, Geohash, Territory, TokenId};
use std::sync::Arc;
use tc_02_eligibility::{
    activity_points_for, evaluate, EligibilityResult, IneligibleReason, RunSession, SessionError,
};
use tc_03_claims::{
    ClaimError, ClaimOutcome, ClaimService, ContractGateway, GatewayError, PlayerStats,
    TerritoryInfo, TerritoryIntent,
};
use tc_04_registry::{RegistryError, TerritoryRegistry, TerritoryStore};
use tc_05_cross_chain::{CrossChainEnvelope, RemoteApplyOutcome, RemoteMessageHandler};
use thiserror::Error;
use uuid::Uuid;

/// Errors crossing the facade boundary.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration failed validation at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Run session lifecycle violation.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Claim orchestration failure.
    #[error(transparent)]
    Claim(#[from] ClaimError),

    /// Registry or persistence failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A direct chain read through the gateway failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The run does not qualify for a territory claim.
    #[error("Run {run_id} is not claim-eligible: {reason}")]
    Ineligible {
        /// The evaluated session.
        run_id: Uuid,
        /// The failed gate.
        reason: IneligibleReason,
    },

    /// A cross-component invariant broke.
    #[error("Internal invariant violated: {0}")]
    Internal(String),
}

/// One fully-wired instance of the territory core.
pub struct TerritoryCore<G> {
    config: RuntimeConfig,
    gateway: Arc<G>,
    registry: Arc<TerritoryRegistry>,
    claims: ClaimService<G>,
    remote: RemoteMessageHandler,
}

impl<G: ContractGateway> TerritoryCore<G> {
    /// Wire the component graph over a contract gateway.
    pub fn new(gateway: Arc<G>, config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;

        let registry = Arc::new(TerritoryRegistry::new(config.thresholds)?);
        let claims = ClaimService::new(gateway.clone(), registry.clone(), config.claims.clone())?;
        let remote = RemoteMessageHandler::new(registry.clone(), config.message_window);

        tracing::info!(
            geohash_precision = config.geo.geohash_precision,
            message_window = config.message_window,
            "Territory core wired"
        );
        Ok(Self {
            config,
            gateway,
            registry,
            claims,
            remote,
        })
    }

    /// The configuration this instance runs with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Finalize a run and evaluate it for claim eligibility.
    ///
    /// A track with no points is reported as ineligible, not as a lifecycle
    /// error.
    pub fn evaluate_run(&self, session: &mut RunSession) -> Result<EligibilityResult, RuntimeError> {
        if !session.is_finalized() && !session.points().is_empty() {
            session.finalize(&self.config.geo)?;
        }
        Ok(evaluate(session, &self.config.eligibility)?)
    }

    /// Record a claim intent for an eligible finalized run.
    pub fn preview_claim(
        &self,
        session: &RunSession,
        owner: Address,
    ) -> Result<TerritoryIntent, RuntimeError> {
        let result = evaluate(session, &self.config.eligibility)?;
        if let Some(reason) = result.reason {
            return Err(RuntimeError::Ineligible {
                run_id: session.id,
                reason,
            });
        }
        let metadata = result
            .metadata
            .ok_or_else(|| RuntimeError::Internal("eligible run without metadata".to_string()))?;

        let stats = session.stats()?;
        let activity_points = activity_points_for(stats, &metadata);
        let spatial = stats.spatial.clone();
        Ok(self.claims.preview(
            spatial.geohash,
            spatial.bounds,
            metadata,
            session.id,
            owner,
            activity_points,
        )?)
    }

    /// Take the per-geohash lock and move the intent to Pending.
    pub async fn begin_claim(&self, geohash: &Geohash) -> Result<TerritoryIntent, RuntimeError> {
        Ok(self.claims.begin_claim(geohash).await?)
    }

    /// Drive a pending claim to Confirmed or Failed.
    pub async fn advance_claim(&self, intent_id: Uuid) -> Result<ClaimOutcome, RuntimeError> {
        Ok(self.claims.advance_claim(intent_id).await?)
    }

    /// Abort a claim attempt that has not been broadcast.
    pub fn cancel_claim(&self, intent_id: Uuid) -> Result<(), RuntimeError> {
        Ok(self.claims.cancel(intent_id)?)
    }

    /// Apply an envelope delivered from another chain.
    pub fn on_remote_message(&self, envelope: &CrossChainEnvelope) -> RemoteApplyOutcome {
        self.remote.on_remote_message(envelope)
    }

    /// Territory record for a geohash, if any.
    pub fn query_territory(&self, geohash: &Geohash) -> Option<Territory> {
        self.registry.get(geohash)
    }

    /// All territories held by an owner.
    pub fn query_owned_territories(&self, owner: &Address) -> Vec<Territory> {
        self.registry.list_by_owner(owner)
    }

    /// Pending cross-chain reward balance for a player.
    pub fn pending_reward(&self, player: &Address) -> u64 {
        self.remote.pending_reward(player)
    }

    /// On-chain aggregate stats for a player, read through the gateway.
    pub async fn query_player_stats(&self, player: &Address) -> Result<PlayerStats, RuntimeError> {
        Ok(self.gateway.query_player_stats(player).await?)
    }

    /// On-chain view of a minted territory, read through the gateway.
    pub async fn query_territory_info(
        &self,
        token_id: TokenId,
    ) -> Result<Option<TerritoryInfo>, RuntimeError> {
        Ok(self.gateway.query_territory_info(token_id).await?)
    }

    /// Persist the registry to a store.
    pub fn snapshot(&self, store: &dyn TerritoryStore) -> Result<usize, RuntimeError> {
        Ok(self.registry.snapshot_to(store)?)
    }

    /// Replace the registry contents from a store.
    pub fn restore(&self, store: &dyn TerritoryStore) -> Result<usize, RuntimeError> {
        Ok(self.registry.load_from(store)?)
    }
}

//! # Outbound Ports
//!
//! The `ContractGateway` trait is the only surface through which the claim
//! core touches a chain: existence checks, mint submission, receipts, and
//! player/territory queries. The gateway is an external collaborator; this
//! crate never sees contract bytecode or ABI.

use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainId, GeoBounds, Geohash, TerritoryMetadata, TokenId, TxHash};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a gateway implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// RPC unreachable or transport failure.
    #[error("Gateway network error: {0}")]
    Network(String),

    /// The call reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// The receipt wait hit its bound without resolution.
    #[error("No receipt within {0:?}")]
    ReceiptTimeout(Duration),
}

/// A mint call to the territory contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimCall {
    /// Spatial key to claim.
    pub geohash: Geohash,
    /// Claiming account.
    pub owner: Address,
    /// Run-derived metadata to record on-chain.
    pub metadata: TerritoryMetadata,
    /// Candidate bounds.
    pub bounds: GeoBounds,
    /// Gas limit including the safety buffer; `None` before estimation.
    pub gas_limit: Option<u64>,
}

/// Handle to a broadcast transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxHandle(pub TxHash);

/// One event log entry from a receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptLog {
    /// Emitting event name.
    pub event: String,
    /// Token id carried by mint events.
    pub token_id: Option<TokenId>,
}

/// Transaction receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Whether the transaction succeeded.
    pub success: bool,
    /// Event log, in emission order.
    pub logs: Vec<ReceiptLog>,
}

impl TxReceipt {
    /// Token id from the first mint event, if any.
    pub fn minted_token_id(&self) -> Option<TokenId> {
        self.logs
            .iter()
            .find(|log| log.event == "TerritoryMinted")
            .and_then(|log| log.token_id)
    }
}

/// On-chain player aggregate stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Lifetime recorded distance in meters.
    pub total_distance_m: u64,
    /// Territories currently owned.
    pub territories_owned: u64,
    /// Lifetime rewards in base units.
    pub total_rewards: u64,
}

/// On-chain view of a minted territory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerritoryInfo {
    /// Token id.
    pub token_id: TokenId,
    /// Spatial key.
    pub geohash: Geohash,
    /// Current on-chain owner.
    pub owner: Address,
    /// Chain the token lives on.
    pub chain: ChainId,
}

/// Chain-read/write boundary - outbound port.
#[async_trait::async_trait]
pub trait ContractGateway: Send + Sync {
    /// Whether the geohash is already claimed on-chain.
    async fn is_claimed(&self, geohash: &Geohash) -> Result<bool, GatewayError>;

    /// Estimate gas for a mint call.
    async fn estimate_gas(&self, call: &ClaimCall) -> Result<u64, GatewayError>;

    /// Broadcast a mint call.
    async fn submit(&self, call: &ClaimCall) -> Result<TxHandle, GatewayError>;

    /// Wait (bounded) for the receipt of a broadcast transaction.
    async fn await_receipt(
        &self,
        handle: &TxHandle,
        timeout: Duration,
    ) -> Result<TxReceipt, GatewayError>;

    /// Aggregate stats for a player account.
    async fn query_player_stats(&self, player: &Address) -> Result<PlayerStats, GatewayError>;

    /// On-chain view of a minted territory.
    async fn query_territory_info(
        &self,
        token_id: TokenId,
    ) -> Result<Option<TerritoryInfo>, GatewayError>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Mock gateway for tests.
///
/// Call counters let tests assert which chain reads happened (e.g. that no
/// gas estimation runs when the geohash is already claimed).
#[derive(Default)]
pub struct MockContractGateway {
    /// Geohashes already claimed on-chain.
    pub claimed: RwLock<HashSet<String>>,
    /// Fail every call with a network error.
    pub fail_network: RwLock<bool>,
    /// Receipts report a revert.
    pub revert_receipts: RwLock<bool>,
    /// `await_receipt` never resolves in time.
    pub hang_receipts: RwLock<bool>,
    /// `await_receipt` ignores its deadline entirely.
    pub stall_receipts: RwLock<bool>,
    /// Token id handed to the next successful mint.
    pub next_token_id: AtomicU64,
    /// Number of `estimate_gas` calls observed.
    pub estimate_gas_calls: AtomicU64,
    /// Number of `submit` calls observed.
    pub submit_calls: AtomicU64,
    /// The most recent call handed to `submit`.
    pub last_submit: RwLock<Option<ClaimCall>>,
    /// Player stats served by `query_player_stats`.
    pub player_stats: RwLock<HashMap<Address, PlayerStats>>,
}

impl MockContractGateway {
    /// Empty mock with token ids starting at 1.
    pub fn new() -> Self {
        let gateway = Self::default();
        gateway.next_token_id.store(1, Ordering::SeqCst);
        gateway
    }

    /// Mark a geohash as already claimed on-chain.
    pub fn set_claimed(&self, geohash: &str) {
        self.claimed.write().insert(geohash.to_string());
    }
}

#[async_trait::async_trait]
impl ContractGateway for MockContractGateway {
    async fn is_claimed(&self, geohash: &Geohash) -> Result<bool, GatewayError> {
        if *self.fail_network.read() {
            return Err(GatewayError::Network("mock: unreachable".to_string()));
        }
        Ok(self.claimed.read().contains(geohash.as_str()))
    }

    async fn estimate_gas(&self, _call: &ClaimCall) -> Result<u64, GatewayError> {
        self.estimate_gas_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_network.read() {
            return Err(GatewayError::Network("mock: unreachable".to_string()));
        }
        Ok(210_000)
    }

    async fn submit(&self, call: &ClaimCall) -> Result<TxHandle, GatewayError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_network.read() {
            return Err(GatewayError::Network("mock: unreachable".to_string()));
        }
        *self.last_submit.write() = Some(call.clone());

        let mut tx_hash = [0u8; 32];
        let key = call.geohash.as_str().as_bytes();
        tx_hash[..key.len().min(32)].copy_from_slice(&key[..key.len().min(32)]);
        Ok(TxHandle(tx_hash))
    }

    async fn await_receipt(
        &self,
        handle: &TxHandle,
        timeout: Duration,
    ) -> Result<TxReceipt, GatewayError> {
        if *self.stall_receipts.read() {
            tokio::time::sleep(Duration::from_secs(3_600)).await;
        }
        if *self.hang_receipts.read() {
            tokio::time::sleep(timeout).await;
            return Err(GatewayError::ReceiptTimeout(timeout));
        }
        if *self.revert_receipts.read() {
            return Ok(TxReceipt {
                tx_hash: handle.0,
                success: false,
                logs: Vec::new(),
            });
        }

        let token_id = self.next_token_id.fetch_add(1, Ordering::SeqCst);
        Ok(TxReceipt {
            tx_hash: handle.0,
            success: true,
            logs: vec![ReceiptLog {
                event: "TerritoryMinted".to_string(),
                token_id: Some(token_id),
            }],
        })
    }

    async fn query_player_stats(&self, player: &Address) -> Result<PlayerStats, GatewayError> {
        if *self.fail_network.read() {
            return Err(GatewayError::Network("mock: unreachable".to_string()));
        }
        Ok(self
            .player_stats
            .read()
            .get(player)
            .copied()
            .unwrap_or_default())
    }

    async fn query_territory_info(
        &self,
        token_id: TokenId,
    ) -> Result<Option<TerritoryInfo>, GatewayError> {
        if *self.fail_network.read() {
            return Err(GatewayError::Network("mock: unreachable".to_string()));
        }
        let _ = token_id;
        Ok(None)
    }
}

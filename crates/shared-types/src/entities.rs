//! Core entities shared across subsystems.
//!
//! The `Territory` record defined here is owned exclusively by the registry
//! (`tc-04-registry`); all other subsystems read territories through it.

use crate::geo::{GeoBounds, Geohash};
use serde::{Deserialize, Serialize};

/// 20-byte account address.
pub type Address = [u8; 20];

/// 32-byte transaction hash.
pub type TxHash = [u8; 32];

/// On-chain token identifier for a minted territory.
pub type TokenId = u64;

/// Networks a territory can live on.
///
/// `Hub` is the origin network where territories mint; the others are
/// destinations a territory can be relayed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainId {
    /// Origin network where territories are minted.
    Hub,
    /// Ethereum mainnet.
    Ethereum,
    /// Polygon PoS.
    Polygon,
    /// Arbitrum L2.
    Arbitrum,
    /// Base L2.
    Base,
}

impl ChainId {
    /// EIP-155 style numeric chain identifier.
    pub fn numeric_id(&self) -> u64 {
        match self {
            ChainId::Hub => 7000,
            ChainId::Ethereum => 1,
            ChainId::Polygon => 137,
            ChainId::Arbitrum => 42161,
            ChainId::Base => 8453,
        }
    }

    /// Confirmations before a receipt on this chain is trusted.
    pub fn required_confirmations(&self) -> u64 {
        match self {
            ChainId::Hub => 1,
            ChainId::Ethereum => 12,
            ChainId::Polygon => 128,
            ChainId::Arbitrum => 1,
            ChainId::Base => 1,
        }
    }
}

/// Rarity bands for territory metadata, ordered lowest to highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    /// Short, easy loops.
    Common,
    /// Above-average distance or difficulty.
    Uncommon,
    /// Long or hard runs.
    Rare,
    /// Very long and hard runs.
    Epic,
    /// The top band.
    Legendary,
}

/// Defense status of a territory.
///
/// Derived solely from accrued activity points via the registry's threshold
/// function; never set directly by callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerritoryStatus {
    /// Below every defense threshold; open to challenge.
    #[default]
    Claimable,
    /// Minimal defense accrued.
    Vulnerable,
    /// Moderate defense accrued.
    Moderate,
    /// Fully defended.
    Strong,
    /// Freshly minted, no recompute has run yet.
    Claimed,
}

/// Deterministic metadata computed from the originating run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerritoryMetadata {
    /// Display name derived from the geohash cell.
    pub name: String,
    /// Rarity band.
    pub rarity: Rarity,
    /// Difficulty score, clamped to 0..=100.
    pub difficulty: u8,
    /// Estimated reward in base units.
    pub estimated_reward: u64,
}

/// A cross-chain movement recorded against a territory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTransfer {
    /// Chain the effect originated on.
    pub from_chain: ChainId,
    /// Chain the effect was applied on.
    pub to_chain: ChainId,
    /// Message id that carried the effect (hex-encoded content hash).
    pub message_id: String,
    /// Unix seconds when the transfer was applied locally.
    pub timestamp: u64,
}

/// A claimed spatial asset.
///
/// Geohash is unique across all territories. Records are never silently
/// deleted; ownership transfer overwrites `owner`, not the record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    /// On-chain token id (set once the mint receipt is seen).
    pub token_id: Option<TokenId>,
    /// Spatial deduplication key.
    pub geohash: Geohash,
    /// Margin-expanded bounding box of the originating run.
    pub bounds: GeoBounds,
    /// Deterministic run-derived metadata.
    pub metadata: TerritoryMetadata,
    /// Current owner.
    pub owner: Address,
    /// Defense status, derived from `activity_points`.
    pub status: TerritoryStatus,
    /// Accrued activity points.
    pub activity_points: u64,
    /// Unix seconds of the confirming claim.
    pub claimed_at: u64,
    /// Chain the territory was minted on.
    pub origin_chain: ChainId,
    /// Cross-chain movements, oldest first.
    pub cross_chain_history: Vec<ChainTransfer>,
}

impl Territory {
    /// Create a freshly minted territory.
    ///
    /// Status starts at `Claimed`; the registry's first `recompute_status`
    /// replaces it with a threshold-derived band.
    pub fn minted(
        geohash: Geohash,
        bounds: GeoBounds,
        metadata: TerritoryMetadata,
        owner: Address,
        origin_chain: ChainId,
        claimed_at: u64,
    ) -> Self {
        Self {
            token_id: None,
            geohash,
            bounds,
            metadata,
            owner,
            status: TerritoryStatus::Claimed,
            activity_points: 0,
            claimed_at,
            origin_chain,
            cross_chain_history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    fn test_territory() -> Territory {
        Territory::minted(
            Geohash::from("u4pruydqqvj"),
            GeoBounds::around(&GeoPoint::new(57.64, 10.40, 0)),
            TerritoryMetadata {
                name: "Territory u4pru".to_string(),
                rarity: Rarity::Uncommon,
                difficulty: 42,
                estimated_reward: 1200,
            },
            [7u8; 20],
            ChainId::Hub,
            1_700_000_000,
        )
    }

    #[test]
    fn test_minted_territory_defaults() {
        let territory = test_territory();
        assert_eq!(territory.status, TerritoryStatus::Claimed);
        assert_eq!(territory.activity_points, 0);
        assert!(territory.token_id.is_none());
        assert!(territory.cross_chain_history.is_empty());
    }

    #[test]
    fn test_chain_id_numeric_ids() {
        assert_eq!(ChainId::Ethereum.numeric_id(), 1);
        assert_eq!(ChainId::Polygon.numeric_id(), 137);
        assert_eq!(ChainId::Hub.numeric_id(), 7000);
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Epic < Rarity::Legendary);
    }

    #[test]
    fn test_territory_json_round_trip() {
        let territory = test_territory();
        let json = serde_json::to_string(&territory).unwrap();
        let back: Territory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, territory);
    }
}

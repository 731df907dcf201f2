//! The territory cache and its invariant-guarding mutators.

use crate::store::{StoreError, TerritoryStore};
use crate::thresholds::{StatusThresholds, ThresholdOrderingError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainId, ChainTransfer, Geohash, Territory, TerritoryStatus, TokenId};
use std::collections::HashMap;
use thiserror::Error;

/// Registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Operation referenced a geohash with no territory record.
    #[error("Unknown territory: {0}")]
    UnknownTerritory(Geohash),

    /// Threshold configuration is not strictly ordered.
    #[error(transparent)]
    Thresholds(#[from] ThresholdOrderingError),

    /// Persistence backend failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored record could not be parsed.
    #[error("Corrupt territory record for key {key}: {source}")]
    CorruptRecord {
        /// Store key of the bad record.
        key: String,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
}

/// On-chain truth observed through the contract gateway.
///
/// Used for reconciliation when a gateway read disagrees with the cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTruth {
    /// Owner recorded on-chain.
    pub owner: Address,
    /// Token id recorded on-chain.
    pub token_id: TokenId,
    /// Chain the read came from.
    pub chain: ChainId,
    /// Unix seconds of the observation.
    pub observed_at: u64,
}

/// Local authoritative cache of territories, keyed by geohash.
///
/// Geohash uniqueness is structural: the map key IS the geohash. Records are
/// never deleted; ownership changes overwrite `owner` in place.
pub struct TerritoryRegistry {
    territories: RwLock<HashMap<String, Territory>>,
    thresholds: StatusThresholds,
}

impl TerritoryRegistry {
    /// Create an empty registry with validated thresholds.
    pub fn new(thresholds: StatusThresholds) -> Result<Self, RegistryError> {
        thresholds.validate()?;
        Ok(Self {
            territories: RwLock::new(HashMap::new()),
            thresholds,
        })
    }

    /// Number of cached territories.
    pub fn len(&self) -> usize {
        self.territories.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.territories.read().is_empty()
    }

    /// Insert or overwrite a territory record.
    pub fn upsert(&self, territory: Territory) {
        tracing::debug!(
            geohash = %territory.geohash,
            owner = ?territory.owner,
            "[tc-04] Upserting territory"
        );
        self.territories
            .write()
            .insert(territory.geohash.as_str().to_string(), territory);
    }

    /// Look up a territory by geohash.
    pub fn get(&self, geohash: &Geohash) -> Option<Territory> {
        self.territories.read().get(geohash.as_str()).cloned()
    }

    /// All territories held by `owner`.
    pub fn list_by_owner(&self, owner: &Address) -> Vec<Territory> {
        self.territories
            .read()
            .values()
            .filter(|t| &t.owner == owner)
            .cloned()
            .collect()
    }

    /// Set a territory's activity points and re-derive its status.
    ///
    /// This is the ONLY path that changes `status`.
    pub fn recompute_status(
        &self,
        geohash: &Geohash,
        activity_points: u64,
    ) -> Result<TerritoryStatus, RegistryError> {
        let mut territories = self.territories.write();
        let territory = territories
            .get_mut(geohash.as_str())
            .ok_or_else(|| RegistryError::UnknownTerritory(geohash.clone()))?;

        territory.activity_points = activity_points;
        territory.status = self.thresholds.status_for(activity_points);

        tracing::debug!(
            geohash = %geohash,
            activity_points,
            status = ?territory.status,
            "[tc-04] Status recomputed"
        );
        Ok(territory.status)
    }

    /// Overwrite local state with on-chain truth.
    ///
    /// Cache rule: conflicting gateway reads win. The divergence is recorded
    /// as a cross-chain history entry; nothing is merged and nothing is
    /// deleted.
    pub fn reconcile(
        &self,
        geohash: &Geohash,
        truth: ChainTruth,
        message_id: &str,
    ) -> Result<(), RegistryError> {
        let mut territories = self.territories.write();
        let territory = territories
            .get_mut(geohash.as_str())
            .ok_or_else(|| RegistryError::UnknownTerritory(geohash.clone()))?;

        if territory.owner == truth.owner && territory.token_id == Some(truth.token_id) {
            return Ok(());
        }

        tracing::warn!(
            geohash = %geohash,
            cached_owner = ?territory.owner,
            chain_owner = ?truth.owner,
            "[tc-04] Cache diverged from chain; overwriting local state"
        );

        let from_chain = territory
            .cross_chain_history
            .last()
            .map(|t| t.to_chain)
            .unwrap_or(territory.origin_chain);

        territory.owner = truth.owner;
        territory.token_id = Some(truth.token_id);
        territory.cross_chain_history.push(ChainTransfer {
            from_chain,
            to_chain: truth.chain,
            message_id: message_id.to_string(),
            timestamp: truth.observed_at,
        });

        Ok(())
    }

    /// Write every territory to the store, one JSON record per geohash.
    pub fn snapshot_to(&self, store: &dyn TerritoryStore) -> Result<usize, RegistryError> {
        let territories = self.territories.read();
        for (geohash, territory) in territories.iter() {
            let json = serde_json::to_string(territory).map_err(|source| {
                RegistryError::CorruptRecord {
                    key: geohash.clone(),
                    source,
                }
            })?;
            store.put(geohash, json)?;
        }
        Ok(territories.len())
    }

    /// Load every record from the store, overwriting the cache.
    pub fn load_from(&self, store: &dyn TerritoryStore) -> Result<usize, RegistryError> {
        let mut loaded = HashMap::new();
        for key in store.keys()? {
            let Some(json) = store.get(&key)? else {
                continue;
            };
            let territory: Territory =
                serde_json::from_str(&json).map_err(|source| RegistryError::CorruptRecord {
                    key: key.clone(),
                    source,
                })?;
            loaded.insert(key, territory);
        }

        let count = loaded.len();
        *self.territories.write() = loaded;
        tracing::info!(count, "[tc-04] Registry loaded from store");
        Ok(count)
    }
}

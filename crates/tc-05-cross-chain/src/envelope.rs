//! Versioned cross-chain envelope and the closed payload set.
//!
//! The envelope keeps `payload_kind` as a plain string so an envelope carrying
//! a kind this build does not know still deserializes; the unknown kind is
//! surfaced by `decode`, not by a parse failure.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{Address, ChainId, GeoBounds, Geohash, TerritoryMetadata, TokenId};
use thiserror::Error;

/// Current envelope wire version.
pub const ENVELOPE_VERSION: u16 = 1;

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The envelope's version is not supported by this build.
    #[error("Unsupported envelope version {got} (supported: {supported})")]
    UnsupportedVersion {
        /// Version carried by the envelope.
        got: u16,
        /// Version this build speaks.
        supported: u16,
    },

    /// The payload kind is outside the closed set.
    #[error("Unknown payload kind: {0}")]
    UnknownType(String),

    /// The payload body does not parse as its declared kind.
    #[error("Malformed {kind} payload: {source}")]
    Malformed {
        /// Declared payload kind.
        kind: String,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
}

/// The closed set of payloads that cross chains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CrossChainPayload {
    /// A territory minted on another chain.
    TerritoryClaim {
        /// Spatial key of the territory.
        geohash: Geohash,
        /// Owning account.
        owner: Address,
        /// Token id on the source chain.
        token_id: TokenId,
        /// Run-derived metadata.
        metadata: TerritoryMetadata,
        /// Territory bounds.
        bounds: GeoBounds,
        /// Unix seconds the territory was claimed.
        claimed_at: u64,
    },
    /// Activity accrued against a territory.
    StatsUpdate {
        /// Spatial key of the territory.
        geohash: Geohash,
        /// Points to accrue on top of the current total.
        activity_points_delta: u64,
    },
    /// A reward owed to a player.
    RewardClaim {
        /// Receiving account.
        player: Address,
        /// Reward amount in base units.
        amount: u64,
    },
}

impl CrossChainPayload {
    /// Wire name of this payload's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CrossChainPayload::TerritoryClaim { .. } => "territoryClaim",
            CrossChainPayload::StatsUpdate { .. } => "statsUpdate",
            CrossChainPayload::RewardClaim { .. } => "rewardClaim",
        }
    }
}

/// A self-describing message between chains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossChainEnvelope {
    /// Wire version.
    pub version: u16,
    /// Content hash of the message, hex-encoded.
    pub message_id: String,
    /// Originating chain.
    pub source_chain: ChainId,
    /// Destination chain.
    pub target_chain: ChainId,
    /// Sending account on the source chain.
    pub sender: Address,
    /// Receiving account on the target chain.
    pub receiver: Address,
    /// Payload kind, kept as a string so unknown kinds still decode.
    pub payload_kind: String,
    /// Payload body.
    pub payload: serde_json::Value,
    /// Unix seconds the message was created.
    pub timestamp: u64,
}

/// Build an envelope around a payload.
///
/// Deterministic: the same inputs always produce the same `message_id`. The
/// id is a SHA-256 over version, chain pair, kind, the payload body, and the
/// timestamp.
pub fn encode(
    source_chain: ChainId,
    target_chain: ChainId,
    sender: Address,
    receiver: Address,
    payload: &CrossChainPayload,
    timestamp: u64,
) -> Result<CrossChainEnvelope, CodecError> {
    let kind = payload.kind();
    let body = serde_json::to_value(payload).map_err(|source| CodecError::Malformed {
        kind: kind.to_string(),
        source,
    })?;
    let body_bytes = body.to_string();

    let mut hasher = Sha256::new();
    hasher.update(ENVELOPE_VERSION.to_be_bytes());
    hasher.update(source_chain.numeric_id().to_be_bytes());
    hasher.update(target_chain.numeric_id().to_be_bytes());
    hasher.update(kind.as_bytes());
    hasher.update(body_bytes.as_bytes());
    hasher.update(timestamp.to_be_bytes());
    let message_id = hex::encode(hasher.finalize());

    Ok(CrossChainEnvelope {
        version: ENVELOPE_VERSION,
        message_id,
        source_chain,
        target_chain,
        sender,
        receiver,
        payload_kind: kind.to_string(),
        payload: body,
        timestamp,
    })
}

/// Decode an envelope's payload against the closed set.
pub fn decode(envelope: &CrossChainEnvelope) -> Result<CrossChainPayload, CodecError> {
    if envelope.version != ENVELOPE_VERSION {
        return Err(CodecError::UnsupportedVersion {
            got: envelope.version,
            supported: ENVELOPE_VERSION,
        });
    }

    match envelope.payload_kind.as_str() {
        "territoryClaim" | "statsUpdate" | "rewardClaim" => {
            serde_json::from_value(envelope.payload.clone()).map_err(|source| {
                CodecError::Malformed {
                    kind: envelope.payload_kind.clone(),
                    source,
                }
            })
        }
        other => Err(CodecError::UnknownType(other.to_string())),
    }
}

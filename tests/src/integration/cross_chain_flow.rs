//! Cross-chain envelopes applied through the runtime facade.
//!
//! Covers codec round-trips over a JSON wire hop, at-most-once application,
//! and the registry effects of each payload kind.

#[cfg(test)]
mod tests {
    use shared_types::{ChainId, GeoBounds, GeoPoint, Geohash, Rarity, TerritoryMetadata, TerritoryStatus};
    use std::sync::Arc;
    use tc_03_claims::MockContractGateway;
    use tc_05_cross_chain::{decode, encode, CrossChainEnvelope, CrossChainPayload, RemoteApplyOutcome};
    use territory_runtime::{RuntimeConfig, TerritoryCore};

    fn core() -> TerritoryCore<MockContractGateway> {
        TerritoryCore::new(Arc::new(MockContractGateway::new()), RuntimeConfig::default()).unwrap()
    }

    fn claim_envelope() -> CrossChainEnvelope {
        encode(
            ChainId::Polygon,
            ChainId::Hub,
            [1u8; 20],
            [2u8; 20],
            &CrossChainPayload::TerritoryClaim {
                geohash: Geohash::from("u4pruydqqvj"),
                owner: [1u8; 20],
                token_id: 42,
                metadata: TerritoryMetadata {
                    name: "Territory u4pruyd".to_string(),
                    rarity: Rarity::Rare,
                    difficulty: 55,
                    estimated_reward: 1800,
                },
                bounds: GeoBounds::around(&GeoPoint::new(57.64, 10.40, 0)),
                claimed_at: 1_700_000_000,
            },
            1_700_000_000,
        )
        .unwrap()
    }

    fn stats_envelope(delta: u64, timestamp: u64) -> CrossChainEnvelope {
        encode(
            ChainId::Polygon,
            ChainId::Hub,
            [1u8; 20],
            [2u8; 20],
            &CrossChainPayload::StatsUpdate {
                geohash: Geohash::from("u4pruydqqvj"),
                activity_points_delta: delta,
            },
            timestamp,
        )
        .unwrap()
    }

    /// Serialize to JSON and back, as a relay between chains would.
    fn over_the_wire(envelope: &CrossChainEnvelope) -> CrossChainEnvelope {
        let json = serde_json::to_string(envelope).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_envelope_survives_wire_round_trip() {
        let envelope = claim_envelope();
        let received = over_the_wire(&envelope);

        assert_eq!(received, envelope);
        assert_eq!(decode(&received).unwrap(), decode(&envelope).unwrap());
    }

    #[test]
    fn test_remote_claim_lands_in_registry() {
        let core = core();
        let envelope = over_the_wire(&claim_envelope());

        assert_eq!(core.on_remote_message(&envelope), RemoteApplyOutcome::Applied);

        let territory = core.query_territory(&Geohash::from("u4pruydqqvj")).unwrap();
        assert_eq!(territory.owner, [1u8; 20]);
        assert_eq!(territory.token_id, Some(42));
        assert_eq!(territory.origin_chain, ChainId::Polygon);
        assert_eq!(territory.cross_chain_history.len(), 1);
    }

    #[test]
    fn test_redelivered_message_applies_exactly_once() {
        let core = core();
        core.on_remote_message(&claim_envelope());

        // Accrue points, then redeliver the same stats message twice.
        let stats = stats_envelope(550, 1_700_000_100);
        assert_eq!(core.on_remote_message(&stats), RemoteApplyOutcome::Applied);
        assert_eq!(core.on_remote_message(&stats), RemoteApplyOutcome::Duplicate);
        assert_eq!(
            core.on_remote_message(&over_the_wire(&stats)),
            RemoteApplyOutcome::Duplicate
        );

        let territory = core.query_territory(&Geohash::from("u4pruydqqvj")).unwrap();
        assert_eq!(territory.activity_points, 550);
        assert_eq!(territory.status, TerritoryStatus::Moderate);
    }

    #[test]
    fn test_distinct_stats_messages_accrue() {
        let core = core();
        core.on_remote_message(&claim_envelope());

        core.on_remote_message(&stats_envelope(300, 1_700_000_100));
        core.on_remote_message(&stats_envelope(300, 1_700_000_200));

        let territory = core.query_territory(&Geohash::from("u4pruydqqvj")).unwrap();
        assert_eq!(territory.activity_points, 600);
        assert_eq!(territory.status, TerritoryStatus::Moderate);

        core.on_remote_message(&stats_envelope(300, 1_700_000_300));
        let territory = core.query_territory(&Geohash::from("u4pruydqqvj")).unwrap();
        assert_eq!(territory.status, TerritoryStatus::Strong);
    }

    #[test]
    fn test_reward_claims_accrue_per_player() {
        let core = core();
        let reward = |player: [u8; 20], amount, ts| {
            encode(
                ChainId::Arbitrum,
                ChainId::Hub,
                player,
                player,
                &CrossChainPayload::RewardClaim { player, amount },
                ts,
            )
            .unwrap()
        };

        core.on_remote_message(&reward([3u8; 20], 1_000, 1_700_000_000));
        core.on_remote_message(&reward([3u8; 20], 500, 1_700_000_060));
        core.on_remote_message(&reward([4u8; 20], 200, 1_700_000_120));

        assert_eq!(core.pending_reward(&[3u8; 20]), 1_500);
        assert_eq!(core.pending_reward(&[4u8; 20]), 200);
    }

    #[test]
    fn test_unknown_kind_does_not_poison_the_session() {
        let core = core();
        let mut unknown = claim_envelope();
        unknown.payload_kind = "guildInvite".to_string();

        assert_eq!(
            core.on_remote_message(&over_the_wire(&unknown)),
            RemoteApplyOutcome::UnknownType
        );
        // The next well-formed message still applies.
        assert_eq!(
            core.on_remote_message(&claim_envelope()),
            RemoteApplyOutcome::Applied
        );
    }

    #[test]
    fn test_rejected_delivery_can_be_retried() {
        let core = core();
        let stats = stats_envelope(550, 1_700_000_100);

        // Stats for a territory the registry has never seen.
        assert!(matches!(
            core.on_remote_message(&stats),
            RemoteApplyOutcome::Rejected(_)
        ));

        core.on_remote_message(&claim_envelope());
        assert_eq!(core.on_remote_message(&stats), RemoteApplyOutcome::Applied);
    }
}

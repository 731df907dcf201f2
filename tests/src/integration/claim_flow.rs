//! Full claim lifecycle through the runtime facade against the mock gateway.
//!
//! Covers the concurrency and failure properties of the claim core: one
//! in-flight claim per geohash, the existence check before gas estimation,
//! and reconciliation after a receipt timeout.

#[cfg(test)]
mod tests {
    use shared_types::{Address, GeoPoint, TerritoryStatus};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;
    use tc_02_eligibility::{activity_points_for, RunSession};
    use tc_03_claims::{ClaimConfig, ClaimState, FailureReason, MockContractGateway};
    use tc_04_registry::InMemoryTerritoryStore;
    use territory_runtime::{RuntimeConfig, RuntimeError, TerritoryCore};

    fn test_config() -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.claims = ClaimConfig {
            receipt_timeout: Duration::from_millis(20),
            ..ClaimConfig::default()
        };
        config
    }

    fn core() -> (TerritoryCore<MockContractGateway>, Arc<MockContractGateway>) {
        let gateway = Arc::new(MockContractGateway::new());
        let core = TerritoryCore::new(gateway.clone(), test_config()).unwrap();
        (core, gateway)
    }

    fn random_owner() -> Address {
        rand::random()
    }

    /// Finalized ~1200 m loop starting in cell "u4pruydqqvj".
    fn finalized_run(core: &TerritoryCore<MockContractGateway>) -> RunSession {
        let track = [
            (57.64911, 10.40744),
            (57.65181, 10.40744),
            (57.65181, 10.41247),
            (57.64911, 10.41247),
            (57.64916, 10.40749),
        ];
        let mut session = RunSession::start();
        for (i, (lat, lon)) in track.iter().enumerate() {
            session
                .append_point(GeoPoint::new(*lat, *lon, i as u64 * 30_000))
                .unwrap();
        }
        let result = core.evaluate_run(&mut session).unwrap();
        assert!(result.eligible);
        session
    }

    #[tokio::test]
    async fn test_claim_confirms_and_registry_reflects_mint() {
        let (core, _) = core();
        let owner = random_owner();
        let session = finalized_run(&core);

        let intent = core.preview_claim(&session, owner).unwrap();
        assert_eq!(intent.state, ClaimState::Previewed);

        core.begin_claim(&intent.geohash).await.unwrap();
        let outcome = core.advance_claim(intent.id).await.unwrap();

        assert_eq!(outcome.state, ClaimState::Confirmed);
        let territory = core.query_territory(&intent.geohash).unwrap();
        assert_eq!(territory.owner, owner);
        assert_eq!(territory.token_id, outcome.token_id);
        assert_eq!(territory.status, TerritoryStatus::Claimed);
        assert_eq!(territory.metadata, intent.metadata);

        // The minted record carries the run's activity value.
        let expected_points = activity_points_for(session.stats().unwrap(), &intent.metadata);
        assert!(expected_points > 0);
        assert_eq!(territory.activity_points, expected_points);
    }

    #[tokio::test]
    async fn test_second_begin_claim_is_a_conflict() {
        let (core, _) = core();
        let session = finalized_run(&core);
        let intent = core.preview_claim(&session, random_owner()).unwrap();

        core.begin_claim(&intent.geohash).await.unwrap();
        let second = core.begin_claim(&intent.geohash).await;

        match second {
            Err(RuntimeError::Claim(e)) => assert!(e.is_conflict()),
            other => panic!("expected a conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_already_claimed_short_circuits_before_gas() {
        let (core, gateway) = core();
        let session = finalized_run(&core);
        let intent = core.preview_claim(&session, random_owner()).unwrap();
        gateway.set_claimed(intent.geohash.as_str());

        core.begin_claim(&intent.geohash).await.unwrap();
        let outcome = core.advance_claim(intent.id).await.unwrap();

        assert_eq!(outcome.state, ClaimState::Failed);
        assert_eq!(outcome.failure, Some(FailureReason::AlreadyClaimed));
        assert_eq!(gateway.estimate_gas_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.submit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submitted_call_carries_gas_buffer() {
        let (core, gateway) = core();
        let session = finalized_run(&core);
        let intent = core.preview_claim(&session, random_owner()).unwrap();

        core.begin_claim(&intent.geohash).await.unwrap();
        core.advance_claim(intent.id).await.unwrap();

        let call = gateway.last_submit.read().clone().unwrap();
        // Mock estimates 210k; the default 20% buffer lands at 252k.
        assert_eq!(call.gas_limit, Some(252_000));
    }

    #[tokio::test]
    async fn test_timeout_then_reconciled_retry_succeeds() {
        let (core, gateway) = core();
        let session = finalized_run(&core);
        let owner = random_owner();

        *gateway.hang_receipts.write() = true;
        let intent = core.preview_claim(&session, owner).unwrap();
        core.begin_claim(&intent.geohash).await.unwrap();
        let outcome = core.advance_claim(intent.id).await.unwrap();
        assert_eq!(outcome.failure, Some(FailureReason::Timeout));

        // The retry forces a fresh chain read; the transaction never landed,
        // so the second attempt goes through.
        *gateway.hang_receipts.write() = false;
        let retry = core.preview_claim(&session, owner).unwrap();
        core.begin_claim(&retry.geohash).await.unwrap();
        let outcome = core.advance_claim(retry.id).await.unwrap();
        assert_eq!(outcome.state, ClaimState::Confirmed);
    }

    #[tokio::test]
    async fn test_timeout_then_landed_transaction_is_detected() {
        let (core, gateway) = core();
        let session = finalized_run(&core);
        let owner = random_owner();

        *gateway.hang_receipts.write() = true;
        let intent = core.preview_claim(&session, owner).unwrap();
        core.begin_claim(&intent.geohash).await.unwrap();
        core.advance_claim(intent.id).await.unwrap();

        // The timed-out transaction actually landed on-chain.
        *gateway.hang_receipts.write() = false;
        gateway.set_claimed(intent.geohash.as_str());

        let retry = core.preview_claim(&session, owner).unwrap();
        let result = core.begin_claim(&retry.geohash).await;
        match result {
            Err(RuntimeError::Claim(e)) => assert!(e.is_conflict()),
            other => panic!("expected AlreadyClaimed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_before_submit_frees_the_geohash() {
        let (core, _) = core();
        let session = finalized_run(&core);
        let owner = random_owner();

        let intent = core.preview_claim(&session, owner).unwrap();
        core.begin_claim(&intent.geohash).await.unwrap();
        core.cancel_claim(intent.id).unwrap();

        let retry = core.preview_claim(&session, owner).unwrap();
        core.begin_claim(&retry.geohash).await.unwrap();
        let outcome = core.advance_claim(retry.id).await.unwrap();
        assert_eq!(outcome.state, ClaimState::Confirmed);
    }

    #[tokio::test]
    async fn test_snapshot_restore_survives_restart() {
        let (original, _) = core();
        let session = finalized_run(&original);
        let owner = random_owner();

        let intent = original.preview_claim(&session, owner).unwrap();
        original.begin_claim(&intent.geohash).await.unwrap();
        original.advance_claim(intent.id).await.unwrap();

        let store = InMemoryTerritoryStore::new();
        assert_eq!(original.snapshot(&store).unwrap(), 1);

        let (fresh, _) = core();
        assert_eq!(fresh.restore(&store).unwrap(), 1);
        assert_eq!(fresh.query_territory(&intent.geohash).unwrap().owner, owner);
    }
}

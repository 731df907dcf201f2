//! Demo entry point: runs one recorded loop through the full claim flow
//! against the mock gateway.
//!
//! Useful for eyeballing log output and the end-to-end wiring without a
//! chain endpoint: `TG_LOG_LEVEL=debug cargo run -p territory-runtime`.

use anyhow::Context;
use shared_types::GeoPoint;
use std::sync::Arc;
use tc_02_eligibility::RunSession;
use tc_03_claims::MockContractGateway;
use territory_runtime::{RuntimeConfig, TerritoryCore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    territory_telemetry::init_from_env().context("telemetry setup failed")?;

    let gateway = Arc::new(MockContractGateway::new());
    let core = TerritoryCore::new(gateway, RuntimeConfig::default())
        .context("failed to wire territory core")?;

    // A ~1200 m square loop recorded at 30 s per sample.
    let track = [
        (57.64911, 10.40744),
        (57.65181, 10.40744),
        (57.65181, 10.41247),
        (57.64911, 10.41247),
        (57.64916, 10.40749),
    ];
    let mut session = RunSession::start();
    for (i, (lat, lon)) in track.iter().enumerate() {
        session.append_point(GeoPoint::new(*lat, *lon, i as u64 * 30_000))?;
    }

    let result = core.evaluate_run(&mut session)?;
    tracing::info!(eligible = result.eligible, "Run evaluated");

    let owner = [1u8; 20];
    let intent = core.preview_claim(&session, owner)?;
    core.begin_claim(&intent.geohash).await?;
    let outcome = core.advance_claim(intent.id).await?;
    tracing::info!(state = ?outcome.state, token_id = ?outcome.token_id, "Claim finished");

    for territory in core.query_owned_territories(&owner) {
        tracing::info!(
            geohash = %territory.geohash,
            status = ?territory.status,
            reward = territory.metadata.estimated_reward,
            "Territory held"
        );
    }
    Ok(())
}

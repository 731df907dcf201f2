//! # TC-03 Territory Claims
//!
//! Orchestrates a single claim attempt from eligibility to on-chain
//! confirmation.
//!
//! **Subsystem ID:** 03
//!
//! ## State Machine
//!
//! ```text
//! Previewed ──> Pending ──> Submitted ──> Confirmed
//!     │            │            │
//!     │ cancel     │ cancel     └────────> Failed(AlreadyClaimed | Reverted
//!     └────────────┴─ (destroyed)                | Timeout | NetworkError)
//! ```
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | One in-flight claim per geohash | per-geohash lock map in `ClaimService` |
//! | No submit when already claimed | existence check before gas estimation |
//! | Gas safety buffer >= 20% | `ClaimConfig::validate` |
//! | Retry after timeout needs a chain read | unreconciled-geohash set |
//!
//! Gateway failures after submission land in the terminal `Failed` state with
//! a reason; they are never surfaced as panics or opaque errors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{ClaimError, ClaimState, FailureReason, TerritoryIntent};
pub use ports::{
    ClaimCall, ContractGateway, GatewayError, MockContractGateway, PlayerStats, ReceiptLog,
    TerritoryInfo, TxHandle, TxReceipt,
};
pub use service::{ClaimConfig, ClaimOutcome, ClaimService};

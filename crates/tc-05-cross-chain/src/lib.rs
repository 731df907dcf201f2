//! # Cross-Chain Messaging (tc-05)
//!
//! Moves territory state between chains as self-describing envelopes and
//! applies incoming envelopes to the local registry at most once.
//!
//! ## Architecture
//!
//! | Module     | Responsibility                                        |
//! |------------|-------------------------------------------------------|
//! | `envelope` | Versioned envelope, payload set, encode/decode        |
//! | `dedup`    | Bounded FIFO window of applied message ids            |
//! | `handler`  | Applies decoded payloads to the registry, exactly once|
//!
//! ## Invariants
//!
//! - `message_id` is a content hash: identical content yields an identical id.
//! - A message id is applied at most once; duplicates are reported, never
//!   re-applied.
//! - Unknown payload kinds decode at the envelope level and are skipped
//!   without failing the session.
//! - Ids enter the seen window only after a successful apply, so a rejected
//!   delivery can be retried.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dedup;
pub mod envelope;
pub mod handler;

pub use dedup::SeenMessageCache;
pub use envelope::{
    decode, encode, CodecError, CrossChainEnvelope, CrossChainPayload, ENVELOPE_VERSION,
};
pub use handler::{RemoteApplyOutcome, RemoteMessageHandler};

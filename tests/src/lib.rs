//! # Territory-Chain Test Suite
//!
//! Unified test crate for cross-subsystem flows. Per-subsystem behavior is
//! covered by `#[cfg(test)]` modules inside each crate; everything here
//! exercises two or more subsystems through the `territory-runtime` facade.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── eligibility_flow.rs   # GPS track -> spatial key -> eligibility verdict
//!     ├── claim_flow.rs         # preview -> begin -> advance against the mock gateway
//!     └── cross_chain_flow.rs   # envelope codec, dedup window, registry effects
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tc-tests
//! cargo test -p tc-tests integration::claim_flow
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;

//! Cross-subsystem integration flows.

pub mod claim_flow;
pub mod cross_chain_flow;
pub mod eligibility_flow;

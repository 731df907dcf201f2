//! Ports: the chain-read/write boundary.

pub mod outbound;

pub use outbound::{
    ClaimCall, ContractGateway, GatewayError, MockContractGateway, PlayerStats, ReceiptLog,
    TerritoryInfo, TxHandle, TxReceipt,
};

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Terms used when a contract request leaves them out.
pub const DEFAULT_CONTRACT_TERMS: &str =
    "Payment upon delivery. Quality check to be performed by a neutral third party.";

/// Unique identifier for a recorded contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractId(pub Ulid);

/// A farmer's request to record a contract with a buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRequest {
    pub buyer_name: String,
    pub crop_name: String,
    /// Quantity in quintals, as entered.
    pub quantity: String,
    /// Agreed price, as entered.
    pub price: String,
    #[serde(default = "default_terms")]
    pub contract_terms: String,
}

fn default_terms() -> String {
    DEFAULT_CONTRACT_TERMS.to_owned()
}

/// A recorded contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: ContractId,
    /// Simulated ledger transaction hash, `0x` followed by 40 hex digits.
    pub transaction_hash: String,
    pub buyer_name: String,
    pub crop_name: String,
    pub quantity: String,
    pub price: String,
    pub contract_terms: String,
    pub created_at: jiff::Timestamp,
}

use std::sync::Arc;
use std::time::Duration;

use agrisage_core::{Contract, ContractId, ContractRequest};
use rand::Rng;
use tokio::sync::Mutex;
use tracing::info;
use ulid::Ulid;

use crate::validation::{ValidationError, min_len};

/// Number of hex digits in a simulated transaction hash.
const HASH_DIGITS: usize = 40;

/// Check a contract request against the form's rules.
pub fn validate(request: &ContractRequest) -> Result<(), ValidationError> {
    min_len("buyerName", &request.buyer_name, 2, "Buyer name is required.")?;
    min_len("cropName", &request.crop_name, 2, "Crop name is required.")?;
    min_len("quantity", &request.quantity, 1, "Quantity is required.")?;
    min_len("price", &request.price, 1, "Price is required.")?;
    min_len(
        "contractTerms",
        &request.contract_terms,
        10,
        "Please specify contract terms.",
    )
}

/// A fake ledger transaction hash: `0x` and 40 lowercase hex digits.
pub fn transaction_hash<R: Rng + ?Sized>(rng: &mut R) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut hash = String::with_capacity(2 + HASH_DIGITS);
    hash.push_str("0x");
    for _ in 0..HASH_DIGITS {
        hash.push(HEX[rng.random_range(0..HEX.len())] as char);
    }
    hash
}

/// In-memory record of simulated contracts.
#[derive(Clone)]
pub struct ContractLedger {
    contracts: Arc<Mutex<Vec<Contract>>>,
    settle_delay: Duration,
}

impl ContractLedger {
    /// `settle_delay` imitates the time a ledger takes to confirm a
    /// transaction.
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            contracts: Arc::new(Mutex::new(Vec::new())),
            settle_delay,
        }
    }

    /// Validate and record a contract.
    pub async fn create(&self, request: ContractRequest) -> Result<Contract, ValidationError> {
        validate(&request)?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        let contract = Contract {
            id: ContractId(Ulid::new()),
            transaction_hash: transaction_hash(&mut rand::rng()),
            buyer_name: request.buyer_name,
            crop_name: request.crop_name,
            quantity: request.quantity,
            price: request.price,
            contract_terms: request.contract_terms,
            created_at: jiff::Timestamp::now(),
        };

        info!(
            contract_id = ?contract.id,
            transaction_hash = %contract.transaction_hash,
            buyer = %contract.buyer_name,
            "Recorded contract"
        );

        self.contracts.lock().await.push(contract.clone());
        Ok(contract)
    }

    /// All recorded contracts, newest first.
    pub async fn list(&self) -> Vec<Contract> {
        let contracts = self.contracts.lock().await;
        contracts.iter().rev().cloned().collect()
    }
}

impl Default for ContractLedger {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

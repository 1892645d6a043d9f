//! Environment-driven configuration.

use crate::infra::{LedgerError, Result};

/// Chain-side settings for attestation store implementations.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Address of the attestation contract.
    pub contract_address: String,
    /// Chain the contract is deployed on. Sepolia by default.
    pub expected_chain_id: u64,
}

impl ChainConfig {
    /// Load from `CHRONOS_CONTRACT_ADDRESS` / `CHRONOS_CHAIN_ID`.
    pub fn from_env() -> Result<Self> {
        let contract_address = std::env::var("CHRONOS_CONTRACT_ADDRESS")
            .unwrap_or_else(|_| "0x7De200c52a1cbd8156CDbebb6b322e036D3d5838".to_string());
        let expected_chain_id = match std::env::var("CHRONOS_CHAIN_ID") {
            Ok(raw) => raw.parse().map_err(|_| {
                LedgerError::Configuration(format!("CHRONOS_CHAIN_ID is not a chain id: {raw:?}"))
            })?,
            Err(_) => 11_155_111,
        };
        Ok(Self { contract_address, expected_chain_id })
    }

    /// Guard for attestation store implementations: reject a provider that
    /// is connected to the wrong network before any submission.
    pub fn ensure_network(&self, actual_chain_id: u64) -> Result<()> {
        if actual_chain_id != self.expected_chain_id {
            return Err(LedgerError::WrongNetwork {
                expected: self.expected_chain_id,
                actual: actual_chain_id,
            });
        }
        Ok(())
    }
}

/// Off-chain record store settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: String,
}

impl StoreConfig {
    /// Load from `DATABASE_URL`, defaulting to an in-memory database.
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
        Self { database_url }
    }
}

/// Full registry configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub chain: ChainConfig,
    pub store: StoreConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self { chain: ChainConfig::from_env()?, store: StoreConfig::from_env() })
    }
}

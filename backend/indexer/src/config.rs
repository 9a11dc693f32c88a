//! Runtime configuration, loaded from environment variables.

use std::str::FromStr;

use crate::errors::{IndexerError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint (e.g. https://soroban-testnet.stellar.org)
    pub rpc_url: String,
    /// The Q&A board contract address (Strkey format)
    pub contract_id: String,
    /// SQLite database URL
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Seconds between RPC polls
    pub poll_interval_secs: u64,
    /// Maximum events per `getEvents` page
    pub events_per_page: u32,
    /// Ledger to start scanning from when no cursor exists. 0 (the default)
    /// lets the RPC begin at the oldest ledger it retains; an explicit value
    /// outside the retention window would be rejected by `getEvents`.
    pub start_ledger: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let contract_id = std::env::var("CONTRACT_ID").map_err(|_| {
            IndexerError::Config("CONTRACT_ID environment variable is required".to_string())
        })?;

        Ok(Config {
            rpc_url: string_var("RPC_URL", "https://soroban-testnet.stellar.org"),
            contract_id,
            database_url: string_var("DATABASE_URL", "sqlite:./qa_board_events.db"),
            api_port: parsed_var("API_PORT", 3001)?,
            poll_interval_secs: parsed_var("POLL_INTERVAL_SECS", 5)?,
            events_per_page: parsed_var("EVENTS_PER_PAGE", 100)?,
            start_ledger: parsed_var("START_LEDGER", 0)?,
        })
    }
}

fn string_var(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_var<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|_| IndexerError::Config(format!("invalid value for {key}: {raw}"))),
    }
}

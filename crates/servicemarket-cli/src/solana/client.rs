use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use servicemarket_client::config::validate_config;
use servicemarket_client::{
    default_program_id, Commitment, EndpointConfig, MarketplaceClient, RpcEndpoint,
};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair};
use thiserror::Error;

use crate::args::Cli;
use crate::io::input;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid program id `{0}`")]
    ProgramId(String),
    #[error("cannot load keypair {path}: {reason}")]
    Keypair { path: String, reason: String },
    #[error("no keypair given and HOME is not set")]
    NoHome,
}

/// Everything a command needs to reach the ledger, resolved from the config
/// file, environment, and flags (in increasing precedence).
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: EndpointConfig,
    pub program_id: Pubkey,
    keypair_path: Option<String>,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut endpoint = match &cli.config {
            Some(path) => {
                let raw = input::read_json_file(path)?;
                serde_json::from_value::<EndpointConfig>(raw)
                    .map_err(|e| anyhow!("invalid endpoint config {path}: {e}"))?
            }
            None => EndpointConfig::default(),
        };

        if let Some(url) = &cli.url {
            endpoint.rpc_url = url.clone();
        }
        if let Some(c) = &cli.commitment {
            endpoint.commitment = Commitment::parse(c)?;
        }
        if let Some(secs) = cli.timeout_secs {
            endpoint.timeout = Duration::from_secs(secs);
        }
        validate_config(&endpoint)?;

        let program_id = match &cli.program_id {
            Some(s) => s.parse().map_err(|_| SettingsError::ProgramId(s.clone()))?,
            None => default_program_id(),
        };

        Ok(Self { endpoint, program_id, keypair_path: cli.keypair.clone() })
    }

    pub fn keypair_path(&self) -> Result<PathBuf> {
        if let Some(p) = &self.keypair_path {
            return Ok(PathBuf::from(p));
        }
        let home = std::env::var_os("HOME").ok_or(SettingsError::NoHome)?;
        Ok(PathBuf::from(home).join(".config").join("solana").join("id.json"))
    }

    pub fn load_keypair(&self) -> Result<Keypair> {
        let path = self.keypair_path()?;
        let keypair = read_keypair_file(&path).map_err(|e| SettingsError::Keypair {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(keypair)
    }

    pub fn rpc_endpoint(&self) -> Result<RpcEndpoint> {
        RpcEndpoint::new(&self.endpoint).context("cannot create rpc endpoint")
    }

    /// Marketplace client bound to the configured endpoint.
    pub fn client(&self, seed: &str) -> Result<MarketplaceClient<RpcEndpoint>> {
        Ok(MarketplaceClient::with_endpoint(self.program_id, self.rpc_endpoint()?, self.endpoint.clone())
            .with_marketplace_seed(seed))
    }
}

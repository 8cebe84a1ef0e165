//! Ledger endpoint abstraction.
//!
//! `LedgerEndpoint` is the seam between submission logic and the network so
//! that submission can be exercised against in-memory endpoints. `RpcEndpoint`
//! is the JSON-RPC implementation used in production.

use async_trait::async_trait;
use solana_client::client_error::{ClientError as RpcClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_client::rpc_request::{RpcError, RpcResponseErrorData};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use thiserror::Error;
use tracing::debug;

use crate::config::{validate_config, EndpointConfig};
use crate::errors::ClientResult;

/// Status of a sent transaction as reported by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// Not yet observed at the requested commitment.
    Pending,
    Confirmed,
    /// Included, but execution failed. Carries the ledger's reason.
    Failed(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// The request may not have reached the ledger, or the reply was lost.
    #[error("transport: {0}")]
    Transport(String),
    /// The endpoint refused the transaction; it will not be applied.
    #[error("{0}")]
    Rejected(String),
}

#[async_trait]
pub trait LedgerEndpoint: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash, EndpointError>;

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, EndpointError>;

    async fn signature_status(&self, signature: &Signature) -> Result<TxStatus, EndpointError>;
}

pub struct RpcEndpoint {
    rpc: RpcClient,
    commitment: CommitmentConfig,
    send_config: RpcSendTransactionConfig,
}

impl RpcEndpoint {
    pub fn new(cfg: &EndpointConfig) -> ClientResult<Self> {
        validate_config(cfg)?;
        let commitment = cfg.commitment.to_config();
        Ok(Self {
            rpc: RpcClient::new_with_timeout_and_commitment(cfg.rpc_url.clone(), cfg.timeout, commitment),
            commitment,
            send_config: RpcSendTransactionConfig {
                skip_preflight: cfg.skip_preflight,
                preflight_commitment: Some(commitment.commitment),
                max_retries: cfg.max_retries,
                ..RpcSendTransactionConfig::default()
            },
        })
    }

    pub fn url(&self) -> String {
        self.rpc.url()
    }

    /// Node software version, used as a reachability probe.
    pub async fn version(&self) -> Result<String, EndpointError> {
        let v = self.rpc.get_version().await.map_err(map_rpc_error)?;
        Ok(v.solana_core)
    }

    pub async fn balance(&self, pubkey: &solana_program::pubkey::Pubkey) -> Result<u64, EndpointError> {
        self.rpc.get_balance(pubkey).await.map_err(map_rpc_error)
    }
}

#[async_trait]
impl LedgerEndpoint for RpcEndpoint {
    async fn latest_blockhash(&self) -> Result<Hash, EndpointError> {
        self.rpc.get_latest_blockhash().await.map_err(map_rpc_error)
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, EndpointError> {
        self.rpc
            .send_transaction_with_config(tx, self.send_config)
            .await
            .map_err(map_rpc_error)
    }

    async fn signature_status(&self, signature: &Signature) -> Result<TxStatus, EndpointError> {
        let status = self
            .rpc
            .get_signature_status_with_commitment(signature, self.commitment)
            .await
            .map_err(map_rpc_error)?;
        debug!(%signature, ?status, "signature status");
        Ok(match status {
            None => TxStatus::Pending,
            Some(Ok(())) => TxStatus::Confirmed,
            Some(Err(e)) => TxStatus::Failed(e.to_string()),
        })
    }
}

/// Preflight and transaction errors are definitive; everything else is transport.
fn map_rpc_error(err: RpcClientError) -> EndpointError {
    match err.kind() {
        ClientErrorKind::TransactionError(e) => EndpointError::Rejected(e.to_string()),
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            message,
            data: RpcResponseErrorData::SendTransactionPreflightFailure(_),
            ..
        }) => EndpointError::Rejected(message.clone()),
        _ => EndpointError::Transport(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::transaction::TransactionError;

    #[test]
    fn transaction_errors_map_to_rejected() {
        let err = RpcClientError::from(TransactionError::AccountNotFound);
        assert!(matches!(map_rpc_error(err), EndpointError::Rejected(_)));
    }

    #[test]
    fn io_errors_map_to_transport() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = RpcClientError::from(io);
        assert!(matches!(map_rpc_error(err), EndpointError::Transport(_)));
    }

    #[test]
    fn rpc_endpoint_rejects_invalid_config() {
        let cfg = EndpointConfig { rpc_url: "nope".into(), ..EndpointConfig::default() };
        assert!(RpcEndpoint::new(&cfg).is_err());
    }
}

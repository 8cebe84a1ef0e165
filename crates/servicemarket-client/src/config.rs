//! Endpoint configuration.
//!
//! The client never reads environment variables itself. Callers (the CLI,
//! tests) build an `EndpointConfig` explicitly and pass it to every
//! submission.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use url::Url;

use crate::errors::{ClientError, ClientResult};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";

/// Upper bound on a submission deadline.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Network location and transport parameters of a ledger endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub rpc_url: String,
    pub commitment: Commitment,
    /// Overall deadline for one submission, from blockhash fetch to confirmation.
    #[serde(with = "duration_ms")]
    pub timeout: Duration,
    /// Delay between signature status polls.
    #[serde(with = "duration_ms")]
    pub poll_interval: Duration,
    /// Transport-level resend attempts performed by the RPC node.
    pub max_retries: Option<usize>,
    pub skip_preflight: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            commitment: Commitment::Confirmed,
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
            max_retries: None,
            skip_preflight: false,
        }
    }
}

/// Confirmation level the client waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn parse(s: &str) -> ClientResult<Self> {
        match s {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            _ => Err(ClientError::invalid_config(format!("unsupported commitment: {s}"))),
        }
    }

    pub fn to_config(self) -> CommitmentConfig {
        match self {
            Self::Processed => CommitmentConfig::processed(),
            Self::Confirmed => CommitmentConfig::confirmed(),
            Self::Finalized => CommitmentConfig::finalized(),
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &EndpointConfig) -> ClientResult<()> {
    let url = Url::parse(&cfg.rpc_url)
        .map_err(|e| ClientError::invalid_config(format!("rpc_url: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::invalid_config("rpc_url must be http or https"));
    }

    if cfg.timeout.is_zero() {
        return Err(ClientError::invalid_config("timeout must be greater than zero"));
    }
    if cfg.timeout > MAX_TIMEOUT {
        return Err(ClientError::invalid_config(format!(
            "timeout must not exceed {}s",
            MAX_TIMEOUT.as_secs()
        )));
    }

    if cfg.poll_interval.is_zero() || cfg.poll_interval >= cfg.timeout {
        return Err(ClientError::invalid_config(
            "poll_interval must be non-zero and shorter than timeout",
        ));
    }

    Ok(())
}

mod duration_ms {
    use std::time::Duration;

    use serde::{ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(d.as_millis()).map_err(ser::Error::custom)?;
        s.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

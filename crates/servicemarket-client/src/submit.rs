//! Transaction submission.
//!
//! One submission walks `Built -> Signed -> Sent -> {Confirmed | Rejected |
//! TimedOut}`. Nothing is retried here: a resend of a transaction whose first
//! copy may still land is a double-submission risk, so the caller decides
//! based on `ClientError::outcome`.

use std::fmt;
use std::future::{self, Future};

use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

use crate::builder::TransactionRequest;
use crate::config::{validate_config, EndpointConfig};
use crate::endpoint::{EndpointError, LedgerEndpoint, TxStatus};
use crate::errors::{ClientError, ClientResult};
use crate::wire;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Built,
    Signed,
    Sent,
    Confirmed,
    Rejected,
    TimedOut,
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Signed => "signed",
            Self::Sent => "sent",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub signature: Signature,
    pub state: SubmissionState,
}

/// A signed transaction that has not been sent.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub wire: Vec<u8>,
}

impl SignedTransaction {
    pub fn signature(&self) -> Signature {
        self.transaction.signatures.first().copied().unwrap_or_default()
    }
}

pub struct SubmissionClient<'a, E: LedgerEndpoint> {
    endpoint: &'a E,
    config: &'a EndpointConfig,
}

impl<E: LedgerEndpoint> std::fmt::Debug for SubmissionClient<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionClient")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, E: LedgerEndpoint> SubmissionClient<'a, E> {
    pub fn new(endpoint: &'a E, config: &'a EndpointConfig) -> ClientResult<Self> {
        validate_config(config)?;
        Ok(Self { endpoint, config })
    }

    /// Sign `request` and send it, waiting for confirmation until the
    /// configured deadline.
    pub async fn submit(
        &self,
        request: TransactionRequest,
        signers: &[&dyn Signer],
    ) -> ClientResult<Receipt> {
        self.submit_until(request, signers, future::pending()).await
    }

    /// As [`submit`](Self::submit), but also gives up when `cancel` resolves.
    ///
    /// Giving up before confirmation is always `TimedOut`: the transaction may
    /// still be included later.
    #[instrument(skip_all, fields(ix = request.name(), program = %request.program_id()))]
    pub async fn submit_until<C>(
        &self,
        request: TransactionRequest,
        signers: &[&dyn Signer],
        cancel: C,
    ) -> ClientResult<Receipt>
    where
        C: Future<Output = ()>,
    {
        let deadline = Instant::now()
            .checked_add(self.config.timeout)
            .ok_or_else(|| ClientError::invalid_config("timeout does not fit a deadline"))?;
        let mut sent: Option<Signature> = None;

        let result = {
            let run = self.drive(request, signers, &mut sent);
            tokio::pin!(run);
            tokio::pin!(cancel);

            tokio::select! {
                r = timeout_at(deadline, &mut run) => match r {
                    Ok(r) => r,
                    Err(_) => {
                        warn!(state = %SubmissionState::TimedOut, "deadline elapsed before confirmation");
                        Err(ClientError::TimedOut { signature: None })
                    }
                },
                _ = &mut cancel => {
                    warn!(state = %SubmissionState::TimedOut, "submission cancelled before confirmation");
                    Err(ClientError::TimedOut { signature: None })
                }
            }
        };

        // Attach the signature once the transaction left the client.
        result.map_err(|e| match e {
            ClientError::TimedOut { signature: None } => ClientError::TimedOut { signature: sent },
            ClientError::Network { signature: None, reason } => {
                ClientError::Network { signature: sent, reason }
            }
            other => other,
        })
    }

    /// Fetch a blockhash, sign, and encode without sending.
    pub async fn sign(
        &self,
        request: &TransactionRequest,
        signers: &[&dyn Signer],
    ) -> ClientResult<SignedTransaction> {
        let payer = signers
            .first()
            .ok_or(ClientError::SigningFailed(solana_sdk::signer::SignerError::NotEnoughSigners))?
            .try_pubkey()?;
        let message = request.to_message(&payer);
        debug!(state = %SubmissionState::Built, accounts = request.accounts().len(), "message compiled");

        let blockhash = self
            .endpoint
            .latest_blockhash()
            .await
            .map_err(|e| endpoint_failure(e, None))?;

        let mut transaction = Transaction::new_unsigned(message);
        transaction.try_sign(signers, blockhash)?;
        let wire = wire::encode_transaction(&transaction)?;
        debug!(state = %SubmissionState::Signed, bytes = wire.len(), "transaction signed");

        Ok(SignedTransaction { transaction, wire })
    }

    async fn drive(
        &self,
        request: TransactionRequest,
        signers: &[&dyn Signer],
        sent: &mut Option<Signature>,
    ) -> ClientResult<Receipt> {
        let signed = self.sign(&request, signers).await?;

        let signature = self
            .endpoint
            .send_transaction(&signed.transaction)
            .await
            .map_err(|e| endpoint_failure(e, Some(signed.signature())))?;
        *sent = Some(signature);
        info!(state = %SubmissionState::Sent, %signature, "transaction sent");

        loop {
            match self.endpoint.signature_status(&signature).await {
                Ok(TxStatus::Confirmed) => {
                    info!(state = %SubmissionState::Confirmed, %signature, "transaction confirmed");
                    return Ok(Receipt { signature, state: SubmissionState::Confirmed });
                }
                Ok(TxStatus::Failed(reason)) => {
                    warn!(state = %SubmissionState::Rejected, %signature, %reason, "transaction failed");
                    return Err(ClientError::Rejected { signature: Some(signature), reason });
                }
                Ok(TxStatus::Pending) => {}
                Err(e) => warn!(%signature, error = %e, "status poll failed, retrying"),
            }
            sleep(self.config.poll_interval).await;
        }
    }
}

fn endpoint_failure(err: EndpointError, signature: Option<Signature>) -> ClientError {
    match err {
        EndpointError::Rejected(reason) => {
            warn!(state = %SubmissionState::Rejected, %reason, "endpoint rejected transaction");
            ClientError::Rejected { signature, reason }
        }
        EndpointError::Transport(reason) => ClientError::Network { signature, reason },
    }
}

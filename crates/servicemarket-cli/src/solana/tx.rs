use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use servicemarket_client::wire::encode_transaction_base58;
use servicemarket_client::{
    ClientError, MarketplaceClient, Receipt, RpcEndpoint, TransactionRequest,
};
use solana_sdk::signature::Keypair;
use tracing::info;

use crate::args::SubmitOpts;
use crate::output::Output;

/// Printable view of a built request.
#[derive(Debug, Clone, Serialize)]
pub struct TxPlan {
    pub instruction: String,
    pub program_id: String,
    pub signers: Vec<String>,
    pub accounts: Vec<PlanAccount>,
    pub data_hex: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanAccount {
    pub address: String,
    pub writable: bool,
    pub signer: bool,
}

impl TxPlan {
    pub fn from_request(req: &TransactionRequest) -> Self {
        Self {
            instruction: req.name().to_string(),
            program_id: req.program_id().to_string(),
            signers: req.required_signers().iter().map(|k| k.to_string()).collect(),
            accounts: req
                .accounts()
                .iter()
                .map(|m| PlanAccount {
                    address: m.pubkey.to_string(),
                    writable: m.is_writable,
                    signer: m.is_signer,
                })
                .collect(),
            data_hex: hex::encode(req.data()),
        }
    }

    pub fn describe(&self) -> String {
        format!("{} with {} account(s)", self.instruction, self.accounts.len())
    }
}

#[derive(Debug, Serialize)]
pub struct TxOut {
    pub ok: bool,
    pub instruction: String,
    pub signature: String,
    pub state: String,
}

impl TxOut {
    pub fn confirmed(instruction: &str, receipt: &Receipt) -> Self {
        Self {
            ok: true,
            instruction: instruction.to_string(),
            signature: receipt.signature.to_string(),
            state: receipt.state.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignedOut {
    pub instruction: String,
    pub signature: String,
    pub bytes: usize,
    pub transaction_base58: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub ok: bool,
    pub kind: String,
    pub outcome: Option<String>,
    pub signature: Option<String>,
    pub error: String,
}

impl ErrorOut {
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let client = err.downcast_ref::<ClientError>();
        Self {
            ok: false,
            kind: client.map(|e| e.kind()).unwrap_or("usage").to_string(),
            outcome: client.map(|e| e.outcome().as_str().to_string()),
            signature: client.and_then(|e| e.signature()).map(|s| s.to_string()),
            error: format!("{err:#}"),
        }
    }
}

/// Run a built request according to the submit options: print it, sign it,
/// or send it and wait for confirmation. Ctrl-C gives up on the wait.
pub async fn execute(
    out: Output,
    client: &MarketplaceClient<RpcEndpoint>,
    request: TransactionRequest,
    payer: &Keypair,
    opts: &SubmitOpts,
) -> Result<Option<Receipt>> {
    let plan = TxPlan::from_request(&request);
    info!(plan = %plan.describe(), "request built");

    if opts.dry_run {
        out.print(&plan)?;
        return Ok(None);
    }

    if opts.sign_only {
        let signed = client.sign_only(&request, &[payer]).await?;
        out.print(&SignedOut {
            instruction: plan.instruction,
            signature: signed.signature().to_string(),
            bytes: signed.wire.len(),
            transaction_base58: encode_transaction_base58(&signed.transaction)?,
        })?;
        return Ok(None);
    }

    let pb = if out.is_json() { ProgressBar::hidden() } else { ProgressBar::new_spinner() };
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(format!("submitting {}", plan.instruction));

    let res = client.send_until(request, &[payer], interrupted()).await;
    pb.finish_and_clear();

    let receipt = res?;
    out.print(&TxOut::confirmed(&plan.instruction, &receipt))?;
    Ok(Some(receipt))
}

async fn interrupted() {
    // Without a signal handler there is nothing to wait for.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servicemarket_client::instructions::{initialize_marketplace, InitializeMarketplaceAccounts};
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn plan_lists_accounts_in_order() {
        let user = Pubkey::new_unique();
        let marketplace = Pubkey::new_unique();
        let req = initialize_marketplace(
            Pubkey::new_unique(),
            &InitializeMarketplaceAccounts { user, marketplace },
        )
        .unwrap();
        let plan = TxPlan::from_request(&req);
        assert_eq!(plan.accounts[0].address, user.to_string());
        assert!(plan.accounts[0].signer);
        assert_eq!(plan.signers, vec![user.to_string()]);
        assert_eq!(plan.data_hex, "2f51400060386907");
        assert_eq!(plan.describe(), "initialize_marketplace with 4 account(s)");
    }

    #[test]
    fn error_out_classifies_client_errors() {
        let err = anyhow::Error::new(ClientError::TimedOut { signature: None });
        let out = ErrorOut::from_anyhow(&err);
        assert_eq!(out.kind, "timed_out");
        assert_eq!(out.outcome.as_deref(), Some("unknown"));

        let usage = ErrorOut::from_anyhow(&anyhow::anyhow!("bad flag"));
        assert_eq!(usage.kind, "usage");
        assert!(usage.outcome.is_none());
    }
}

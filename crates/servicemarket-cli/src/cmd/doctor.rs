use anyhow::Result;
use serde::Serialize;
use solana_sdk::native_token::lamports_to_sol;
use solana_sdk::signature::Signer;

use crate::output::Output;
use crate::solana::client::Settings;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

impl Check {
    fn new(name: &str, ok: bool, detail: impl Into<String>) -> Self {
        Self { name: name.to_string(), ok, detail: detail.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub rpc_url: String,
    pub program_id: String,
    pub checks: Vec<Check>,
}

pub async fn run(out: Output, settings: &Settings) -> Result<()> {
    let mut checks = Vec::new();

    let keypair = match settings.load_keypair() {
        Ok(kp) => {
            checks.push(Check::new("keypair", true, kp.pubkey().to_string()));
            Some(kp)
        }
        Err(e) => {
            checks.push(Check::new("keypair", false, e.to_string()));
            None
        }
    };

    let endpoint = settings.rpc_endpoint()?;
    let reachable = match endpoint.version().await {
        Ok(v) => {
            checks.push(Check::new("endpoint", true, format!("solana-core {v}")));
            true
        }
        Err(e) => {
            checks.push(Check::new("endpoint", false, e.to_string()));
            false
        }
    };

    if let (true, Some(kp)) = (reachable, &keypair) {
        match endpoint.balance(&kp.pubkey()).await {
            Ok(lamports) => checks.push(Check::new(
                "balance",
                lamports > 0,
                format!("{} SOL", lamports_to_sol(lamports)),
            )),
            Err(e) => checks.push(Check::new("balance", false, e.to_string())),
        }
    }

    // Solana tooling is optional.
    checks.push(Check::new(
        "solana",
        which_ok("solana"),
        "optional (local validator and airdrops)",
    ));

    let ok = checks.iter().all(|c| c.ok || c.name == "solana");
    out.print(&DoctorOut {
        ok,
        rpc_url: endpoint.url(),
        program_id: settings.program_id.to_string(),
        checks,
    })
}

fn which_ok(cmd: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|p| {
                p.join(cmd).exists() || (cfg!(windows) && p.join(format!("{cmd}.exe")).exists())
            })
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_binary_is_not_found() {
        assert!(!which_ok("definitely-not-a-real-binary-name"));
    }
}

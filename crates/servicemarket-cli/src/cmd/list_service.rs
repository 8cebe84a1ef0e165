use anyhow::{anyhow, Result};
use servicemarket_client::instructions::ServiceNft;
use solana_sdk::signature::Signer;

use crate::args::{SubmitOpts, TradeAccounts};
use crate::io::input;
use crate::output::Output;
use crate::solana::client::Settings;
use crate::solana::tx;

/// Service description given inline on the command line.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    pub name: Option<String>,
    pub description: String,
    pub symbol: Option<String>,
    pub uri: Option<String>,
    pub price: Option<u64>,
    pub duration: u64,
    pub soulbound: bool,
    pub terms: String,
}

impl Fields {
    fn into_service(self) -> Result<ServiceNft> {
        Ok(ServiceNft {
            name: self.name.ok_or_else(|| missing("name"))?,
            description: self.description,
            symbol: self.symbol.ok_or_else(|| missing("symbol"))?,
            uri: self.uri.ok_or_else(|| missing("uri"))?,
            soulbound: self.soulbound,
            duration: self.duration,
            terms_of_service: self.terms,
            price: self.price.ok_or_else(|| missing("price"))?,
        })
    }
}

fn missing(flag: &str) -> anyhow::Error {
    anyhow!("--{flag} is required unless --metadata is given")
}

pub async fn run(
    out: Output,
    settings: &Settings,
    metadata: Option<&str>,
    fields: Fields,
    accounts: &TradeAccounts,
    opts: &SubmitOpts,
) -> Result<()> {
    let service = match metadata {
        Some(path) => input::read_typed::<ServiceNft, _>(path)?,
        None => fields.into_service()?,
    };

    let payer = settings.load_keypair()?;
    let client = settings.client(&opts.seed)?;
    let request = client.ix_list_service(payer.pubkey(), &accounts.resolve()?, service)?;

    if let Some(receipt) = tx::execute(out, &client, request, &payer, opts).await? {
        out.headline(&format!("Service listed. Transaction: {}", receipt.signature));
    }
    Ok(())
}

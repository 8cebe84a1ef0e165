use anyhow::Result;
use solana_sdk::signature::Signer;

use crate::args::SubmitOpts;
use crate::output::Output;
use crate::solana::client::Settings;
use crate::solana::tx;

pub async fn run(out: Output, settings: &Settings, opts: &SubmitOpts) -> Result<()> {
    let payer = settings.load_keypair()?;
    let client = settings.client(&opts.seed)?;
    let request = client.ix_initialize_marketplace(payer.pubkey())?;

    if let Some(receipt) = tx::execute(out, &client, request, &payer, opts).await? {
        out.headline(&format!("Marketplace initialized. Transaction: {}", receipt.signature));
    }
    Ok(())
}

use anyhow::Result;
use solana_sdk::signature::Signer;

use crate::args::{Side, SubmitOpts, TradeAccounts};
use crate::output::Output;
use crate::solana::client::Settings;
use crate::solana::tx;

pub async fn run(
    out: Output,
    settings: &Settings,
    from: Side,
    token_amount: u64,
    nft_amount: u64,
    accounts: &TradeAccounts,
    opts: &SubmitOpts,
) -> Result<()> {
    let payer = settings.load_keypair()?;
    let client = settings.client(&opts.seed)?;
    let request = client.ix_purchase(from.into(), payer.pubkey(), &accounts.resolve()?, token_amount, nft_amount)?;

    if let Some(receipt) = tx::execute(out, &client, request, &payer, opts).await? {
        out.headline(&format!("Service purchased. Transaction: {}", receipt.signature));
    }
    Ok(())
}

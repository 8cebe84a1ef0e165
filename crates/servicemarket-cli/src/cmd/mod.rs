use anyhow::Result;

use crate::args::{Cli, Command};
use crate::output::Output;
use crate::solana::client::Settings;

mod derive;
mod doctor;
mod initialize;
mod list_service;
mod purchase;

pub async fn dispatch(cli: Cli, out: Output) -> Result<()> {
    let settings = Settings::resolve(&cli)?;
    match cli.command {
        Command::Derive { seeds, hex } => derive::run(out, &settings, &seeds, hex),
        Command::Initialize { submit } => initialize::run(out, &settings, &submit).await,
        Command::ListService {
            metadata,
            name,
            description,
            symbol,
            uri,
            price,
            duration,
            soulbound,
            terms,
            accounts,
            submit,
        } => {
            let fields = list_service::Fields {
                name,
                description,
                symbol,
                uri,
                price,
                duration,
                soulbound,
                terms,
            };
            list_service::run(out, &settings, metadata.as_deref(), fields, &accounts, &submit).await
        }
        Command::Purchase { from, token_amount, nft_amount, accounts, submit } => {
            purchase::run(out, &settings, from, token_amount, nft_amount, &accounts, &submit).await
        }
        Command::Doctor => doctor::run(out, &settings).await,
    }
}

use std::process::ExitCode;

use clap::Parser;
use servicemarket_client::{ClientError, Outcome};

mod args;
mod cmd;
mod io;
mod logging;
mod output;
mod solana;

use output::Output;
use solana::tx::ErrorOut;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = args::Cli::parse();
    logging::init(cli.verbose, cli.json);
    let out = Output::new(cli.json);

    match cmd::dispatch(cli, out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            out.error(&ErrorOut::from_anyhow(&err), &format!("{err:#}"));
            ExitCode::from(exit_code(&err))
        }
    }
}

/// 0 success, 1 usage or configuration, 2 not applied, 3 outcome unknown.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ClientError>() {
        Some(ClientError::InvalidConfig(_)) => 1,
        Some(e) => match e.outcome() {
            Outcome::NotApplied => 2,
            Outcome::Unknown => 3,
        },
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_outcome() {
        let timed_out = anyhow::Error::new(ClientError::TimedOut { signature: None });
        assert_eq!(exit_code(&timed_out), 3);

        let rejected = anyhow::Error::new(ClientError::DerivationExhausted);
        assert_eq!(exit_code(&rejected), 2);

        let config = anyhow::Error::new(ClientError::invalid_config("bad url"));
        assert_eq!(exit_code(&config), 1);

        assert_eq!(exit_code(&anyhow::anyhow!("missing flag")), 1);
    }
}

use anyhow::{anyhow, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use servicemarket_client::{PurchaseAccounts, PurchaseSide};
use solana_sdk::pubkey::Pubkey;

#[derive(Parser, Debug, Clone)]
#[command(name = "servicemarket", version, about = "Service marketplace CLI")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Endpoint config JSON file; flags below override its fields.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// RPC URL of the ledger endpoint.
    #[arg(long, global = true, env = "ANCHOR_PROVIDER_URL")]
    pub url: Option<String>,

    /// Keypair file of the paying signer (default: ~/.config/solana/id.json).
    #[arg(long, global = true, env = "ANCHOR_WALLET")]
    pub keypair: Option<String>,

    /// Marketplace program id (base58).
    #[arg(long, global = true, env = "SERVICEMARKET_PROGRAM_ID")]
    pub program_id: Option<String>,

    /// processed|confirmed|finalized
    #[arg(long, global = true)]
    pub commitment: Option<String>,

    /// Deadline for one submission, in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Derive a program address from seeds.
    Derive {
        /// Seeds, in order. UTF-8 unless --hex is given.
        #[arg(required = true)]
        seeds: Vec<String>,

        /// Interpret seeds as hex-encoded bytes.
        #[arg(long)]
        hex: bool,
    },

    /// Create the marketplace root account.
    Initialize {
        #[command(flatten)]
        submit: SubmitOpts,
    },

    /// List a service as an NFT.
    ListService {
        /// JSON file with the full service description.
        #[arg(long)]
        metadata: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        uri: Option<String>,
        #[arg(long)]
        price: Option<u64>,
        /// Service duration in days.
        #[arg(long, default_value_t = 0)]
        duration: u64,
        #[arg(long)]
        soulbound: bool,
        #[arg(long, default_value = "")]
        terms: String,

        #[command(flatten)]
        accounts: TradeAccounts,
        #[command(flatten)]
        submit: SubmitOpts,
    },

    /// Purchase a listed service.
    Purchase {
        /// Which side of the trade this purchase settles.
        #[arg(long, value_enum)]
        from: Side,
        #[arg(long)]
        token_amount: u64,
        #[arg(long, default_value_t = 1)]
        nft_amount: u64,

        #[command(flatten)]
        accounts: TradeAccounts,
        #[command(flatten)]
        submit: SubmitOpts,
    },

    /// Run environment checks.
    Doctor,
}

#[derive(Args, Debug, Clone)]
pub struct SubmitOpts {
    /// Seed of the marketplace root account.
    #[arg(long, default_value = "servicemarket")]
    pub seed: String,

    /// Print the built request without signing or sending.
    #[arg(long, conflicts_with = "sign_only")]
    pub dry_run: bool,

    /// Sign and print the wire transaction (base58) without sending.
    #[arg(long)]
    pub sign_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TradeAccounts {
    #[arg(long)]
    pub buyer_token_account: String,
    #[arg(long)]
    pub third_party_token_account: String,
    #[arg(long)]
    pub service_nft: String,
}

impl TradeAccounts {
    pub fn resolve(&self) -> Result<PurchaseAccounts> {
        Ok(PurchaseAccounts {
            buyer_token_account: parse_pubkey("buyer-token-account", &self.buyer_token_account)?,
            third_party_token_account: parse_pubkey(
                "third-party-token-account",
                &self.third_party_token_account,
            )?,
            service_nft: parse_pubkey("service-nft", &self.service_nft)?,
        })
    }
}

fn parse_pubkey(flag: &str, value: &str) -> Result<Pubkey> {
    value.parse().map_err(|_| anyhow!("--{flag}: `{value}` is not a base58 address"))
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Vendor,
    Buyer,
}

impl From<Side> for PurchaseSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Vendor => PurchaseSide::Vendor,
            Side::Buyer => PurchaseSide::Buyer,
        }
    }
}

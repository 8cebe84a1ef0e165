//! Constants shared between the on-chain marketplace program and clients.
//!
//! Keep these stable because they affect PDA derivation.

use solana_program::pubkey;
use solana_program::pubkey::Pubkey;

/// PDA seed for the marketplace root account.
pub const SEED_SERVICE_MARKET: &[u8] = b"servicemarket";

/// PDA seed for the royalty escrow vault.
pub const SEED_VAULT: &[u8] = b"vault";

/// PDA seed for the service NFT mint.
pub const SEED_MINT: &[u8] = b"mint";

/// Seeds used by the token-metadata program for metadata and edition accounts.
pub const SEED_METADATA: &[u8] = b"metadata";
pub const SEED_EDITION: &[u8] = b"edition";

/// Domain separation marker appended to every PDA hash input.
pub const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Maximum length of a single derivation seed.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds, including the bump seed.
pub const MAX_SEEDS: usize = 16;

/// Default program id of the deployed marketplace program.
pub const DEFAULT_PROGRAM_ID: &str = "F8YCVd2YFF6WLkqpdBZEpf9rfVhXXUAWUhPPaW3GNG2u";

pub fn default_program_id() -> Pubkey {
    DEFAULT_PROGRAM_ID.parse().unwrap_or_else(|_| Pubkey::default())
}

/// SPL token program.
pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// SPL associated token account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Metaplex token-metadata program.
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Namespace prefix for Anchor instruction discriminators.
pub const DISCRIMINATOR_NAMESPACE: &str = "global";

//! PDA derivation for the service marketplace program.
//!
//! Derivation is spelled out here rather than delegated to the SDK so that the
//! seed limits and exhaustion case surface as `ClientError`s. The result is
//! identical to `Pubkey::find_program_address`.

use sha2::{Digest, Sha256};
use solana_program::pubkey::Pubkey;

use crate::constants::{
    ASSOCIATED_TOKEN_PROGRAM_ID, MAX_SEEDS, MAX_SEED_LEN, PDA_MARKER, SEED_EDITION, SEED_METADATA,
    SEED_MINT, SEED_SERVICE_MARKET, SEED_VAULT, TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use crate::errors::{ClientError, ClientResult};

/// A program-owned address and the bump seed that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

impl From<DerivedAddress> for (Pubkey, u8) {
    fn from(d: DerivedAddress) -> Self {
        (d.address, d.bump)
    }
}

/// Find the highest-bump off-curve address for `seeds` under `program_id`.
pub fn derive(seeds: &[&[u8]], program_id: &Pubkey) -> ClientResult<DerivedAddress> {
    // The bump occupies one seed slot.
    check_seeds(seeds, MAX_SEEDS - 1)?;

    for bump in (0..=u8::MAX).rev() {
        let candidate = hash_candidate(seeds, Some(bump), program_id);
        if !candidate.is_on_curve() {
            return Ok(DerivedAddress { address: candidate, bump });
        }
    }
    Err(ClientError::DerivationExhausted)
}

/// Compute the address for seeds that already include their bump.
///
/// Returns `None` when the hash lands on the curve.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> ClientResult<Option<Pubkey>> {
    check_seeds(seeds, MAX_SEEDS)?;
    let candidate = hash_candidate(seeds, None, program_id);
    Ok((!candidate.is_on_curve()).then_some(candidate))
}

fn check_seeds(seeds: &[&[u8]], max: usize) -> ClientResult<()> {
    if seeds.len() > max {
        return Err(ClientError::TooManySeeds { count: seeds.len(), max });
    }
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(ClientError::MaxSeedLengthExceeded { len: seed.len(), max: MAX_SEED_LEN });
    }
    Ok(())
}

fn hash_candidate(seeds: &[&[u8]], bump: Option<u8>, program_id: &Pubkey) -> Pubkey {
    let mut h = Sha256::new();
    for seed in seeds {
        h.update(seed);
    }
    if let Some(bump) = bump {
        h.update([bump]);
    }
    h.update(program_id.as_ref());
    h.update(PDA_MARKER);
    Pubkey::new_from_array(h.finalize().into())
}

/// Derive the marketplace root PDA with the default seed.
pub fn derive_marketplace(program_id: &Pubkey) -> ClientResult<DerivedAddress> {
    derive(&[SEED_SERVICE_MARKET], program_id)
}

/// Derive the marketplace root PDA with a caller-chosen seed.
pub fn derive_marketplace_with_seed(program_id: &Pubkey, seed: &str) -> ClientResult<DerivedAddress> {
    derive(&[seed.as_bytes()], program_id)
}

/// Royalty escrow vault.
pub fn derive_vault(program_id: &Pubkey) -> ClientResult<DerivedAddress> {
    derive(&[SEED_VAULT], program_id)
}

/// Service NFT mint.
pub fn derive_mint(program_id: &Pubkey) -> ClientResult<DerivedAddress> {
    derive(&[SEED_MINT], program_id)
}

/// Metadata account of `mint`, owned by the token-metadata program.
pub fn derive_metadata(mint: &Pubkey) -> ClientResult<DerivedAddress> {
    derive(
        &[SEED_METADATA, TOKEN_METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &TOKEN_METADATA_PROGRAM_ID,
    )
}

/// Master edition account of `mint`, owned by the token-metadata program.
pub fn derive_master_edition(mint: &Pubkey) -> ClientResult<DerivedAddress> {
    derive(
        &[SEED_METADATA, TOKEN_METADATA_PROGRAM_ID.as_ref(), mint.as_ref(), SEED_EDITION],
        &TOKEN_METADATA_PROGRAM_ID,
    )
}

/// Associated token account of `wallet` for `mint`.
pub fn derive_associated_token_account(wallet: &Pubkey, mint: &Pubkey) -> ClientResult<DerivedAddress> {
    derive(
        &[wallet.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
}

/// Collect the PDAs used by the NFT listing and purchase flows.
#[derive(Debug, Clone)]
pub struct ServicePdas {
    pub mint: DerivedAddress,
    pub vault: DerivedAddress,
    pub metadata: DerivedAddress,
    pub master_edition: DerivedAddress,
}

pub fn pdas_for_service(program_id: &Pubkey) -> ClientResult<ServicePdas> {
    let mint = derive_mint(program_id)?;
    Ok(ServicePdas {
        vault: derive_vault(program_id)?,
        metadata: derive_metadata(&mint.address)?,
        master_edition: derive_master_edition(&mint.address)?,
        mint,
    })
}

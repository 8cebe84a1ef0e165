//! Marketplace program instruction encoding.
//!
//! Each instruction is a statically defined contract: an 8-byte discriminator
//! (`sha256("global:<name>")[..8]`), borsh-encoded arguments, and a fixed
//! account list in the order the program declares it.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use solana_program::instruction::AccountMeta;
use solana_program::pubkey::Pubkey;
use solana_program::{system_program, sysvar};

use crate::builder::{self, InstructionPayload, TransactionRequest};
use crate::constants::{
    ASSOCIATED_TOKEN_PROGRAM_ID, DISCRIMINATOR_NAMESPACE, TOKEN_METADATA_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
use crate::errors::{ClientError, ClientResult};

/// Off-chain description of a service listed as an NFT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ServiceNft {
    pub name: String,
    pub description: String,
    pub symbol: String,
    pub uri: String,
    #[serde(default)]
    pub soulbound: bool,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub terms_of_service: String,
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketplaceIx {
    InitializeMarketplace,
    ListService(ServiceNft),
    PurchaseServiceFromVendor { token_amount: u64, nft_amount: u64 },
    PurchaseServiceFromBuyer { token_amount: u64, nft_amount: u64 },
}

impl MarketplaceIx {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializeMarketplace => "initialize_marketplace",
            Self::ListService(_) => "list_service",
            Self::PurchaseServiceFromVendor { .. } => "purchase_service_from_vendor",
            Self::PurchaseServiceFromBuyer { .. } => "purchase_service_from_buyer",
        }
    }

    /// Number of accounts the program declares for this instruction.
    pub fn account_count(&self) -> usize {
        match self {
            Self::InitializeMarketplace => InitializeMarketplaceAccounts::LEN,
            _ => ServiceAccounts::LEN,
        }
    }

    pub fn data(&self) -> ClientResult<Vec<u8>> {
        let mut out = discriminator(self.name()).to_vec();
        match self {
            Self::InitializeMarketplace => {}
            Self::ListService(metadata) => {
                borsh::to_writer(&mut out, metadata).map_err(ClientError::serialization)?;
            }
            Self::PurchaseServiceFromVendor { token_amount, nft_amount }
            | Self::PurchaseServiceFromBuyer { token_amount, nft_amount } => {
                borsh::to_writer(&mut out, &(*token_amount, *nft_amount))
                    .map_err(ClientError::serialization)?;
            }
        }
        Ok(out)
    }

    pub fn payload(&self) -> ClientResult<InstructionPayload> {
        Ok(InstructionPayload::new(self.name(), self.data()?, self.account_count()))
    }
}

/// Anchor-style method discriminator.
pub fn discriminator(name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("{DISCRIMINATOR_NAMESPACE}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Accounts of `initialize_marketplace`.
#[derive(Debug, Clone)]
pub struct InitializeMarketplaceAccounts {
    pub user: Pubkey,
    pub marketplace: Pubkey,
}

impl InitializeMarketplaceAccounts {
    pub const LEN: usize = 4;

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.user, true),
            AccountMeta::new(self.marketplace, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ]
    }
}

/// Accounts shared by `list_service` and both purchase instructions.
#[derive(Debug, Clone)]
pub struct ServiceAccounts {
    pub signer: Pubkey,
    pub mint: Pubkey,
    pub associated_token_account: Pubkey,
    pub metadata_account: Pubkey,
    pub master_edition_account: Pubkey,
    pub buyer_token_account: Pubkey,
    pub third_party_token_account: Pubkey,
    pub escrow_token_account: Pubkey,
    pub service_nft: Pubkey,
    pub marketplace: Pubkey,
}

impl ServiceAccounts {
    pub const LEN: usize = 15;

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.signer, true),
            AccountMeta::new(self.mint, false),
            AccountMeta::new(self.associated_token_account, false),
            AccountMeta::new(self.metadata_account, false),
            AccountMeta::new(self.master_edition_account, false),
            AccountMeta::new(self.buyer_token_account, false),
            AccountMeta::new(self.third_party_token_account, false),
            AccountMeta::new(self.escrow_token_account, false),
            AccountMeta::new(self.service_nft, false),
            AccountMeta::new(self.marketplace, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ]
    }
}

pub fn initialize_marketplace(
    program_id: Pubkey,
    accounts: &InitializeMarketplaceAccounts,
) -> ClientResult<TransactionRequest> {
    let ix = MarketplaceIx::InitializeMarketplace;
    builder::build(program_id, ix.payload()?, accounts.to_account_metas())
}

pub fn list_service(
    program_id: Pubkey,
    accounts: &ServiceAccounts,
    metadata: ServiceNft,
) -> ClientResult<TransactionRequest> {
    let ix = MarketplaceIx::ListService(metadata);
    builder::build(program_id, ix.payload()?, accounts.to_account_metas())
}

pub fn purchase_service_from_vendor(
    program_id: Pubkey,
    accounts: &ServiceAccounts,
    token_amount: u64,
    nft_amount: u64,
) -> ClientResult<TransactionRequest> {
    let ix = MarketplaceIx::PurchaseServiceFromVendor { token_amount, nft_amount };
    builder::build(program_id, ix.payload()?, accounts.to_account_metas())
}

pub fn purchase_service_from_buyer(
    program_id: Pubkey,
    accounts: &ServiceAccounts,
    token_amount: u64,
    nft_amount: u64,
) -> ClientResult<TransactionRequest> {
    let ix = MarketplaceIx::PurchaseServiceFromBuyer { token_amount, nft_amount };
    builder::build(program_id, ix.payload()?, accounts.to_account_metas())
}

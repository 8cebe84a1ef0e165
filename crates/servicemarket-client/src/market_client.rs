//! Marketplace client for the service marketplace on-chain program.
//!
//! This client can:
//! - derive PDAs
//! - build instructions (initialize, list service, purchase)
//! - optionally submit transactions via RPC
//!
//! The on-chain program is deployed separately; this crate provides the
//! off-chain wiring for UIs/CLI/servers.

use solana_program::pubkey::Pubkey;
use solana_sdk::signer::Signer;

use crate::builder::TransactionRequest;
use crate::config::EndpointConfig;
use crate::endpoint::LedgerEndpoint;
use crate::errors::{ClientError, ClientResult};
use crate::instructions::{self, InitializeMarketplaceAccounts, ServiceAccounts, ServiceNft};
use crate::pda::{self, DerivedAddress};
use crate::submit::{Receipt, SignedTransaction, SubmissionClient};

/// Which side of a trade a purchase settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseSide {
    Vendor,
    Buyer,
}

/// Accounts a purchase needs beyond the derivable PDAs.
#[derive(Debug, Clone)]
pub struct PurchaseAccounts {
    pub buyer_token_account: Pubkey,
    pub third_party_token_account: Pubkey,
    pub service_nft: Pubkey,
}

#[derive(Debug, Clone)]
pub struct MarketplaceClient<E: LedgerEndpoint> {
    pub program_id: Pubkey,
    pub marketplace_seed: String,
    pub endpoint: Option<E>,
    pub config: EndpointConfig,
}

impl<E: LedgerEndpoint> MarketplaceClient<E> {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            marketplace_seed: String::from_utf8_lossy(crate::constants::SEED_SERVICE_MARKET).into_owned(),
            endpoint: None,
            config: EndpointConfig::default(),
        }
    }

    pub fn with_endpoint(program_id: Pubkey, endpoint: E, config: EndpointConfig) -> Self {
        Self { endpoint: Some(endpoint), config, ..Self::new(program_id) }
    }

    pub fn with_marketplace_seed(mut self, seed: impl Into<String>) -> Self {
        self.marketplace_seed = seed.into();
        self
    }

    pub fn derive_marketplace(&self) -> ClientResult<DerivedAddress> {
        pda::derive_marketplace_with_seed(&self.program_id, &self.marketplace_seed)
    }

    pub fn ix_initialize_marketplace(&self, user: Pubkey) -> ClientResult<TransactionRequest> {
        let marketplace = self.derive_marketplace()?.address;
        instructions::initialize_marketplace(
            self.program_id,
            &InitializeMarketplaceAccounts { user, marketplace },
        )
    }

    /// Fill the shared account list from PDAs plus caller-supplied accounts.
    pub fn service_accounts(&self, signer: Pubkey, extra: &PurchaseAccounts) -> ClientResult<ServiceAccounts> {
        let pdas = pda::pdas_for_service(&self.program_id)?;
        let ata = pda::derive_associated_token_account(&signer, &pdas.mint.address)?;
        Ok(ServiceAccounts {
            signer,
            mint: pdas.mint.address,
            associated_token_account: ata.address,
            metadata_account: pdas.metadata.address,
            master_edition_account: pdas.master_edition.address,
            buyer_token_account: extra.buyer_token_account,
            third_party_token_account: extra.third_party_token_account,
            escrow_token_account: pdas.vault.address,
            service_nft: extra.service_nft,
            marketplace: self.derive_marketplace()?.address,
        })
    }

    pub fn ix_list_service(
        &self,
        signer: Pubkey,
        extra: &PurchaseAccounts,
        metadata: ServiceNft,
    ) -> ClientResult<TransactionRequest> {
        let accounts = self.service_accounts(signer, extra)?;
        instructions::list_service(self.program_id, &accounts, metadata)
    }

    pub fn ix_purchase(
        &self,
        side: PurchaseSide,
        signer: Pubkey,
        extra: &PurchaseAccounts,
        token_amount: u64,
        nft_amount: u64,
    ) -> ClientResult<TransactionRequest> {
        let accounts = self.service_accounts(signer, extra)?;
        match side {
            PurchaseSide::Vendor => {
                instructions::purchase_service_from_vendor(self.program_id, &accounts, token_amount, nft_amount)
            }
            PurchaseSide::Buyer => {
                instructions::purchase_service_from_buyer(self.program_id, &accounts, token_amount, nft_amount)
            }
        }
    }

    fn submitter(&self) -> ClientResult<SubmissionClient<'_, E>> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or_else(|| ClientError::invalid_config("endpoint not configured"))?;
        SubmissionClient::new(endpoint, &self.config)
    }

    /// Submit a request. Requires the client to be constructed with an endpoint.
    pub async fn send(&self, request: TransactionRequest, signers: &[&dyn Signer]) -> ClientResult<Receipt> {
        self.send_until(request, signers, std::future::pending()).await
    }

    /// Submit a request, giving up early when `cancel` resolves.
    pub async fn send_until<C>(
        &self,
        request: TransactionRequest,
        signers: &[&dyn Signer],
        cancel: C,
    ) -> ClientResult<Receipt>
    where
        C: std::future::Future<Output = ()>,
    {
        self.submitter()?.submit_until(request, signers, cancel).await
    }

    /// Sign a request without sending it.
    pub async fn sign_only(
        &self,
        request: &TransactionRequest,
        signers: &[&dyn Signer],
    ) -> ClientResult<SignedTransaction> {
        self.submitter()?.sign(request, signers).await
    }

    pub async fn initialize_marketplace(&self, user: &dyn Signer) -> ClientResult<Receipt> {
        let request = self.ix_initialize_marketplace(user.try_pubkey()?)?;
        self.send(request, &[user]).await
    }
}

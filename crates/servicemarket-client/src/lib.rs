//! servicemarket-client
//!
//! This crate provides a small, focused Rust client for interacting with the
//! service marketplace on-chain program.
//!
//! It includes:
//! - PDA derivation with explicit seed limits and exhaustion reporting
//! - a request builder that rejects conflicting account flags up front
//! - static instruction encoders for every marketplace instruction
//! - a submission client that signs, sends, and waits for confirmation under a
//!   deadline, classifying failures as not-applied or outcome-unknown
//!
//! Note: The on-chain program id is expected to be provided by the consumer.
//! The default here is the id the program was deployed with.

pub mod builder;
pub mod config;
pub mod constants;
pub mod endpoint;
pub mod errors;
pub mod instructions;
pub mod market_client;
pub mod pda;
pub mod submit;
pub mod wire;

pub use builder::{build, InstructionPayload, TransactionRequest};
pub use config::{Commitment, EndpointConfig};
pub use constants::*;
pub use endpoint::{EndpointError, LedgerEndpoint, RpcEndpoint, TxStatus};
pub use errors::{ClientError, ClientResult, Outcome};
pub use market_client::*;
pub use pda::{derive, DerivedAddress};
pub use submit::{Receipt, SignedTransaction, SubmissionClient, SubmissionState};

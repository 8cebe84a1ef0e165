//! submission_flow.rs
//!
//! Black-box submission tests against in-memory endpoints:
//! derive -> build -> sign -> send -> confirm, plus every terminal failure.

mod common;

use std::time::Duration;

use common::{fast_config, Behavior, MockEndpoint, RefusingSigner};
use servicemarket_client::instructions::discriminator;
use servicemarket_client::pda::derive;
use servicemarket_client::{
    build, default_program_id, ClientError, EndpointConfig, InstructionPayload, MarketplaceClient, Outcome,
    SubmissionClient, SubmissionState, TransactionRequest, SEED_SERVICE_MARKET,
};
use solana_sdk::instruction::AccountMeta;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::system_program;

fn initialize_request(user: &Pubkey) -> TransactionRequest {
    let program_id = default_program_id();
    let marketplace = derive(&[SEED_SERVICE_MARKET], &program_id).unwrap();
    build(
        program_id,
        InstructionPayload::new(
            "initialize_marketplace",
            discriminator("initialize_marketplace").to_vec(),
            3,
        ),
        vec![
            AccountMeta::new(marketplace.address, false),
            AccountMeta::new(*user, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn initialize_marketplace_end_to_end() {
    let endpoint = MockEndpoint::new(Behavior::Confirm);
    let cfg = fast_config();
    let client = SubmissionClient::new(&endpoint, &cfg).unwrap();
    let user = Keypair::new();

    let receipt = client.submit(initialize_request(&user.pubkey()), &[&user]).await.unwrap();

    assert_eq!(receipt.state, SubmissionState::Confirmed);
    assert_eq!(receipt.signature, endpoint.signature);
    assert!(!receipt.signature.to_string().is_empty());

    let sent = endpoint.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let tx = &sent[0];
    assert!(tx.is_signed());
    assert_eq!(tx.message.account_keys[0], user.pubkey());
    assert_eq!(tx.message.instructions[0].data, discriminator("initialize_marketplace").to_vec());
}

#[tokio::test]
async fn marketplace_client_initialize_confirms() {
    let client = MarketplaceClient::with_endpoint(
        default_program_id(),
        MockEndpoint::new(Behavior::Confirm),
        fast_config(),
    );
    let user = Keypair::new();

    let receipt = client.initialize_marketplace(&user).await.unwrap();
    assert_eq!(receipt.state, SubmissionState::Confirmed);

    let endpoint = client.endpoint.as_ref().unwrap();
    let sent = endpoint.sent.lock().unwrap();
    let keys = &sent[0].message.account_keys;
    assert!(keys.contains(&client.derive_marketplace().unwrap().address));
}

#[tokio::test]
async fn unbounded_timeout_is_config_error_not_panic() {
    let endpoint = MockEndpoint::new(Behavior::Confirm);
    let cfg = EndpointConfig { timeout: Duration::from_secs(u64::MAX), ..fast_config() };
    assert_eq!(SubmissionClient::new(&endpoint, &cfg).unwrap_err().kind(), "invalid_config");

    let client = MarketplaceClient::with_endpoint(default_program_id(), endpoint, cfg);
    let user = Keypair::new();
    let err = client.initialize_marketplace(&user).await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidConfig(_)), "got {err:?}");
    assert_eq!(err.outcome(), Outcome::NotApplied);
    assert_eq!(client.endpoint.as_ref().unwrap().sent_count(), 0);
}

#[tokio::test]
async fn silent_endpoint_times_out_not_rejected() {
    let endpoint = MockEndpoint::new(Behavior::NeverRespond);
    let cfg = fast_config();
    let client = SubmissionClient::new(&endpoint, &cfg).unwrap();
    let user = Keypair::new();

    let err = client.submit(initialize_request(&user.pubkey()), &[&user]).await.unwrap_err();

    assert!(matches!(err, ClientError::TimedOut { .. }), "got {err:?}");
    assert_eq!(err.outcome(), Outcome::Unknown);
}

#[tokio::test]
async fn pending_forever_times_out_with_signature() {
    let endpoint = MockEndpoint::new(Behavior::StayPending);
    let cfg = fast_config();
    let client = SubmissionClient::new(&endpoint, &cfg).unwrap();
    let user = Keypair::new();

    let err = client.submit(initialize_request(&user.pubkey()), &[&user]).await.unwrap_err();

    assert!(matches!(err, ClientError::TimedOut { signature: Some(s) } if s == endpoint.signature));
}

#[tokio::test]
async fn cancellation_reports_timed_out() {
    let endpoint = MockEndpoint::new(Behavior::StayPending);
    let mut cfg = fast_config();
    cfg.timeout = Duration::from_secs(30);
    let client = SubmissionClient::new(&endpoint, &cfg).unwrap();
    let user = Keypair::new();

    let cancel = tokio::time::sleep(Duration::from_millis(20));
    let err = client
        .submit_until(initialize_request(&user.pubkey()), &[&user], cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::TimedOut { signature: Some(_) }));
    assert_eq!(err.outcome(), Outcome::Unknown);
}

#[tokio::test]
async fn endpoint_rejection_carries_reason() {
    let reason = "Transaction simulation failed: custom program error: 0x0";
    let endpoint = MockEndpoint::new(Behavior::RejectOnSend(reason.to_string()));
    let cfg = fast_config();
    let client = SubmissionClient::new(&endpoint, &cfg).unwrap();
    let user = Keypair::new();

    let err = client.submit(initialize_request(&user.pubkey()), &[&user]).await.unwrap_err();

    match err {
        ClientError::Rejected { reason: got, .. } => assert_eq!(got, reason),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn on_chain_failure_is_rejected() {
    let endpoint = MockEndpoint::new(Behavior::FailOnChain("InstructionError(0, Custom(6000))".into()));
    let cfg = fast_config();
    let client = SubmissionClient::new(&endpoint, &cfg).unwrap();
    let user = Keypair::new();

    let err = client.submit(initialize_request(&user.pubkey()), &[&user]).await.unwrap_err();

    assert_eq!(err.kind(), "rejected");
    assert_eq!(err.outcome(), Outcome::NotApplied);
    assert_eq!(err.signature(), Some(&endpoint.signature));
}

#[tokio::test]
async fn transport_failure_is_unknown_outcome() {
    let endpoint = MockEndpoint::new(Behavior::TransportErrorOnSend);
    let cfg = fast_config();
    let client = SubmissionClient::new(&endpoint, &cfg).unwrap();
    let user = Keypair::new();

    let err = client.submit(initialize_request(&user.pubkey()), &[&user]).await.unwrap_err();

    assert!(matches!(err, ClientError::Network { signature: Some(_), .. }));
    assert_eq!(err.outcome(), Outcome::Unknown);
}

#[tokio::test]
async fn refusing_signer_never_reaches_endpoint() {
    let endpoint = MockEndpoint::new(Behavior::Confirm);
    let cfg = fast_config();
    let client = SubmissionClient::new(&endpoint, &cfg).unwrap();
    let signer = RefusingSigner(Pubkey::new_unique());

    let err = client.submit(initialize_request(&signer.0), &[&signer]).await.unwrap_err();

    assert!(matches!(err, ClientError::SigningFailed(_)));
    assert_eq!(endpoint.sent_count(), 0);
}

#[tokio::test]
async fn conflicting_flags_fail_before_any_network_call() {
    let user = Keypair::new();
    let err = build(
        default_program_id(),
        InstructionPayload::new("initialize_marketplace", vec![], 2),
        vec![AccountMeta::new(user.pubkey(), true), AccountMeta::new(user.pubkey(), false)],
    )
    .unwrap_err();
    assert!(matches!(err, ClientError::ConflictingAccountFlags { .. }));
}

//! Transaction request assembly.
//!
//! A `TransactionRequest` is the validated, immutable form of one instruction:
//! target program, ordered account list, and encoded payload. Account order is
//! preserved exactly because the program indexes accounts by position.

use std::collections::HashMap;

use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;
use solana_sdk::message::Message;

use crate::errors::{ClientError, ClientResult};

/// Encoded method call plus the account count the target instruction expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPayload {
    pub name: &'static str,
    pub data: Vec<u8>,
    pub min_accounts: usize,
}

impl InstructionPayload {
    pub fn new(name: &'static str, data: Vec<u8>, min_accounts: usize) -> Self {
        Self { name, data, min_accounts }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    program_id: Pubkey,
    name: &'static str,
    accounts: Vec<AccountMeta>,
    data: Vec<u8>,
}

impl TransactionRequest {
    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn accounts(&self) -> &[AccountMeta] {
        &self.accounts
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Accounts that must sign, in list order, without duplicates.
    pub fn required_signers(&self) -> Vec<Pubkey> {
        let mut out: Vec<Pubkey> = Vec::new();
        for meta in self.accounts.iter().filter(|m| m.is_signer) {
            if !out.contains(&meta.pubkey) {
                out.push(meta.pubkey);
            }
        }
        out
    }

    pub fn to_instruction(&self) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: self.accounts.clone(),
            data: self.data.clone(),
        }
    }

    /// Compile into a ledger message paid for by `payer`.
    pub fn to_message(&self, payer: &Pubkey) -> Message {
        Message::new(&[self.to_instruction()], Some(payer))
    }
}

/// Validate `accounts` and capture them with `payload` for `program_id`.
pub fn build(
    program_id: Pubkey,
    payload: InstructionPayload,
    accounts: Vec<AccountMeta>,
) -> ClientResult<TransactionRequest> {
    if accounts.len() < payload.min_accounts {
        return Err(ClientError::MissingAccounts {
            instruction: payload.name,
            required: payload.min_accounts,
            supplied: accounts.len(),
        });
    }

    let mut seen: HashMap<Pubkey, (bool, bool)> = HashMap::with_capacity(accounts.len());
    for meta in &accounts {
        let flags = (meta.is_writable, meta.is_signer);
        match seen.get(&meta.pubkey) {
            Some(prev) if *prev != flags => {
                return Err(ClientError::ConflictingAccountFlags { address: meta.pubkey });
            }
            Some(_) => {}
            None => {
                seen.insert(meta.pubkey, flags);
            }
        }
    }

    Ok(TransactionRequest {
        program_id,
        name: payload.name,
        accounts,
        data: payload.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(min_accounts: usize) -> InstructionPayload {
        InstructionPayload::new("test", vec![1, 2, 3], min_accounts)
    }

    #[test]
    fn conflicting_writable_flags_rejected() {
        let program_id = Pubkey::new_unique();
        let dup = Pubkey::new_unique();
        let err = build(
            program_id,
            payload(1),
            vec![AccountMeta::new(dup, false), AccountMeta::new_readonly(dup, false)],
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::ConflictingAccountFlags { address } if address == dup));
    }

    #[test]
    fn conflicting_signer_flags_rejected() {
        let dup = Pubkey::new_unique();
        let err = build(
            Pubkey::new_unique(),
            payload(0),
            vec![AccountMeta::new(dup, true), AccountMeta::new(dup, false)],
        )
        .unwrap_err();
        assert_eq!(err.kind(), "conflicting_account_flags");
    }

    #[test]
    fn consistent_duplicates_keep_order() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let accounts = vec![
            AccountMeta::new(a, true),
            AccountMeta::new_readonly(b, false),
            AccountMeta::new(a, true),
        ];
        let req = build(Pubkey::new_unique(), payload(2), accounts.clone()).unwrap();
        assert_eq!(req.accounts(), accounts.as_slice());
        assert_eq!(req.required_signers(), vec![a]);
        assert_eq!(req.data(), &[1, 2, 3]);
    }

    #[test]
    fn missing_accounts_rejected() {
        let err = build(Pubkey::new_unique(), payload(3), vec![]).unwrap_err();
        assert!(matches!(
            err,
            ClientError::MissingAccounts { instruction: "test", required: 3, supplied: 0 }
        ));
    }

    #[test]
    fn message_places_payer_first() {
        let payer = Pubkey::new_unique();
        let pda = Pubkey::new_unique();
        let req = build(
            Pubkey::new_unique(),
            payload(2),
            vec![AccountMeta::new(pda, false), AccountMeta::new(payer, true)],
        )
        .unwrap();
        let msg = req.to_message(&payer);
        assert_eq!(msg.account_keys[0], payer);
        assert_eq!(msg.header.num_required_signatures, 1);
    }
}

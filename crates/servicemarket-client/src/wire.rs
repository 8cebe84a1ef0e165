//! Wire encoding for signed transactions.

use solana_sdk::packet::PACKET_DATA_SIZE;
use solana_sdk::transaction::Transaction;

use crate::errors::{ClientError, ClientResult};

/// Serialize a signed transaction exactly as the endpoint receives it.
pub fn encode_transaction(tx: &Transaction) -> ClientResult<Vec<u8>> {
    let bytes = bincode::serialize(tx).map_err(ClientError::serialization)?;
    if bytes.len() > PACKET_DATA_SIZE {
        return Err(ClientError::TransactionTooLarge { size: bytes.len(), limit: PACKET_DATA_SIZE });
    }
    Ok(bytes)
}

/// Base58 form of the wire bytes, as accepted by `sendTransaction`.
pub fn encode_transaction_base58(tx: &Transaction) -> ClientResult<String> {
    Ok(bs58::encode(encode_transaction(tx)?).into_string())
}

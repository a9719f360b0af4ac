//! Canonical ABI encoding of claim records.
//!
//! A record encodes exactly like Solidity's `abi.encode(address, uint256, uint256)`:
//! three 32-byte big-endian words, the address left-padded with 12 zero bytes.
//! Every field is fixed width, so there are no length prefixes or offsets.

use alloy_primitives::U256;

use crate::common::parse_address;
use crate::error::{Error, Result};

/// Size of one ABI word.
pub const WORD_SIZE: usize = 32;

/// Size of an EVM address.
pub const ADDRESS_SIZE: usize = 20;

/// Size of an encoded record.
pub const ENCODED_SIZE: usize = 3 * WORD_SIZE;

/// ABI type names of the record fields, in encoding order.
pub const RECORD_FORMAT: [&str; 3] = ["address", "uint256", "uint256"];

/// One claim record: who may claim, under which index, and how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Record {
    pub address: [u8; ADDRESS_SIZE],
    pub index: u64,
    pub amount: U256,
}

impl Record {
    pub fn new(address: [u8; ADDRESS_SIZE], index: u64, amount: U256) -> Self {
        Self {
            address,
            index,
            amount,
        }
    }

    /// Builds a record from a raw address slice, which must be exactly 20 bytes.
    pub fn from_parts(address: &[u8], index: u64, amount: U256) -> Result<Self> {
        let address: [u8; ADDRESS_SIZE] = address.try_into().map_err(|_| {
            Error::Encoding(format!(
                "address must be {} bytes, got {}",
                ADDRESS_SIZE,
                address.len()
            ))
        })?;
        Ok(Self::new(address, index, amount))
    }

    /// Parses a record from its textual fields: a `0x` address and two decimal integers.
    pub fn parse(address: &str, index: &str, amount: &str) -> Result<Self> {
        let address = parse_address(address)?;
        let index = parse_index(index)?;
        let amount = parse_amount(amount)?;
        Ok(Self::new(address, index, amount))
    }
}

/// Parses a decimal uint256 amount.
///
/// Values above `2^256 - 1`, signs and non-digit characters are rejected.
pub fn parse_amount(text: &str) -> Result<U256> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Encoding(format!(
            "amount must be a decimal unsigned integer, got '{text}'"
        )));
    }
    U256::from_str_radix(text, 10)
        .map_err(|e| Error::Encoding(format!("amount '{text}' does not fit uint256: {e}")))
}

/// Parses a decimal record index.
pub fn parse_index(text: &str) -> Result<u64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Encoding(format!(
            "index must be a decimal unsigned integer, got '{text}'"
        )));
    }
    text.parse::<u64>()
        .map_err(|e| Error::Encoding(format!("index '{text}' is out of range: {e}")))
}

/// Encodes a record into its 96-byte canonical form.
pub fn encode(record: &Record) -> [u8; ENCODED_SIZE] {
    let mut out = [0u8; ENCODED_SIZE];
    out[WORD_SIZE - ADDRESS_SIZE..WORD_SIZE].copy_from_slice(&record.address);
    out[2 * WORD_SIZE - 8..2 * WORD_SIZE].copy_from_slice(&record.index.to_be_bytes());
    out[2 * WORD_SIZE..].copy_from_slice(&record.amount.to_be_bytes::<WORD_SIZE>());
    out
}

/// Decodes a 96-byte canonical encoding back into a record.
///
/// Fails if the length is wrong or padding bytes are non-zero, which keeps
/// `encode` and `decode` a bijection over well-formed input.
pub fn decode(bytes: &[u8]) -> Result<Record> {
    if bytes.len() != ENCODED_SIZE {
        return Err(Error::Encoding(format!(
            "encoded record must be {} bytes, got {}",
            ENCODED_SIZE,
            bytes.len()
        )));
    }
    let (address_word, rest) = bytes.split_at(WORD_SIZE);
    let (index_word, amount_word) = rest.split_at(WORD_SIZE);

    if address_word[..WORD_SIZE - ADDRESS_SIZE].iter().any(|&b| b != 0) {
        return Err(Error::Encoding("address word has non-zero padding".into()));
    }
    if index_word[..WORD_SIZE - 8].iter().any(|&b| b != 0) {
        return Err(Error::Encoding("index does not fit in 64 bits".into()));
    }

    let mut index = [0u8; 8];
    index.copy_from_slice(&index_word[WORD_SIZE - 8..]);
    let amount = U256::from_be_slice(amount_word);

    Record::from_parts(
        &address_word[WORD_SIZE - ADDRESS_SIZE..],
        u64::from_be_bytes(index),
        amount,
    )
}

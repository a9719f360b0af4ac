use sha3::{Digest, Keccak256};

use crate::codec::{encode, Record};

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// Computes the Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Computes the leaf hash of a record: `keccak256(keccak256(abi.encode(record)))`.
///
/// Hashing twice keeps leaves out of the 64-byte internal-node domain, so an
/// internal node can never be presented as a leaf.
pub fn leaf_hash(record: &Record) -> Hash {
    keccak256(&keccak256(&encode(record)))
}

/// Hashes two child nodes into their parent.
///
/// The children are ordered by byte value before concatenation, so
/// `node_hash(a, b) == node_hash(b, a)` and proofs carry no direction bits.
pub fn node_hash(a: &Hash, b: &Hash) -> Hash {
    let (left, right) = if a <= b { (a, b) } else { (b, a) };
    Keccak256::new()
        .chain_update(left)
        .chain_update(right)
        .finalize()
        .into()
}

#![forbid(unsafe_code)]

pub mod claims;
pub mod codec;
pub mod common;
pub mod error;
pub mod hasher;
pub mod tree;

pub use claims::{export, Claim, ClaimLookup, ClaimsFile, Export, VerificationFile};
pub use codec::{decode, encode, Record};
pub use common::{hex_encode, load_records, parse_address, parse_hash, write_file_atomic};
pub use error::{Error, Result};
pub use hasher::{keccak256, leaf_hash, node_hash, Hash};
pub use tree::{build_layers, process_proof, verify, verify_leaf, MerkleTree};

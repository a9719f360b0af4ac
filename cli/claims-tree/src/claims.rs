//! Claim artifacts derived from a built tree.
//!
//! Two JSON documents are produced. The claims file carries the root and, per
//! address, the index, amount and proof a holder submits on chain. The
//! verification file carries the root and the raw values, enough for anyone to
//! rebuild the tree and confirm the root independently.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::{Record, RECORD_FORMAT};
use crate::common::{hex_encode, parse_address, parse_hash, write_file_atomic};
use crate::error::{Error, Result};
use crate::hasher::Hash;
use crate::tree::{verify, MerkleTree};

/// Default file name of the claims file.
pub const CLAIMS_FILE_NAME: &str = "merkle-tree-data.json";

/// Default file name of the verification file.
pub const VERIFICATION_FILE_NAME: &str = "merkle-tree-verification.json";

/// A single address's entry in the claims file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub index: u64,
    /// Decimal string; uint256 does not fit a JSON number.
    pub amount: String,
    pub proof: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsFile {
    pub merkle_root: String,
    /// Keyed by lowercase `0x` address.
    pub claims: BTreeMap<String, Claim>,
}

/// The result of looking up one address in a claims file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimLookup {
    pub address: String,
    pub index: u64,
    pub amount: String,
    pub proof: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFile {
    pub root: String,
    pub format: Vec<String>,
    /// `[address, index, amount]`, numbers as decimal strings.
    pub values: Vec<[String; 3]>,
}

/// Everything produced from one record set.
#[derive(Debug, Clone)]
pub struct Export {
    pub tree: MerkleTree,
    pub claims: ClaimsFile,
    pub verification: VerificationFile,
}

/// Builds the tree for `records` and derives both artifacts from it.
pub fn export(records: Vec<Record>) -> Result<Export> {
    let tree = MerkleTree::build(records)?;
    let claims = ClaimsFile::from_tree(&tree)?;
    let verification = VerificationFile::from_tree(&tree);
    Ok(Export {
        tree,
        claims,
        verification,
    })
}

fn address_key(address: &str) -> Result<String> {
    Ok(hex_encode(parse_address(address)?))
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_file_atomic(path, &json)
}

impl ClaimsFile {
    pub fn from_tree(tree: &MerkleTree) -> Result<Self> {
        let mut claims = BTreeMap::new();
        for (position, record) in tree.entries() {
            let proof = tree.proof(position)?;
            claims.insert(
                hex_encode(record.address),
                Claim {
                    index: record.index,
                    amount: record.amount.to_string(),
                    proof: proof.iter().map(hex_encode).collect(),
                },
            );
        }
        Ok(Self {
            merkle_root: hex_encode(tree.root()),
            claims,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(self, path)
    }

    pub fn root(&self) -> Result<Hash> {
        parse_hash(&self.merkle_root)
    }

    /// Looks up the claim for `address` (any hex case).
    ///
    /// # Errors
    /// * `Error::Encoding` if `address` is malformed
    /// * `Error::NotFound` if there is no claim for it
    pub fn lookup(&self, address: &str) -> Result<ClaimLookup> {
        let key = address_key(address)?;
        let claim = self
            .claims
            .get(&key)
            .ok_or_else(|| Error::NotFound(key.clone()))?;
        Ok(ClaimLookup {
            address: key,
            index: claim.index,
            amount: claim.amount.clone(),
            proof: claim.proof.clone(),
        })
    }

    /// Re-derives the leaf of `address`'s claim and folds its proof against the root.
    ///
    /// Malformed fields are errors; a well-formed claim that does not reach
    /// the root yields `Ok(false)`.
    pub fn verify_claim(&self, address: &str) -> Result<bool> {
        self.lookup(address)?.verify(&self.root()?)
    }
}

impl ClaimLookup {
    pub fn record(&self) -> Result<Record> {
        Record::parse(&self.address, &self.index.to_string(), &self.amount)
    }

    pub fn proof_hashes(&self) -> Result<Vec<Hash>> {
        self.proof.iter().map(|p| parse_hash(p)).collect()
    }

    pub fn verify(&self, root: &Hash) -> Result<bool> {
        Ok(verify(&self.record()?, &self.proof_hashes()?, root))
    }

    /// `proof-<first 8 chars of the address>.json`
    pub fn file_name(&self) -> String {
        let prefix: String = self.address.chars().take(8).collect();
        format!("proof-{prefix}.json")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(self, path)
    }
}

impl VerificationFile {
    pub fn from_tree(tree: &MerkleTree) -> Self {
        Self {
            root: hex_encode(tree.root()),
            format: RECORD_FORMAT.iter().map(|t| t.to_string()).collect(),
            values: tree
                .records()
                .iter()
                .map(|r| {
                    [
                        hex_encode(r.address),
                        r.index.to_string(),
                        r.amount.to_string(),
                    ]
                })
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_json(self, path)
    }

    /// Parses `values` back into records, in file order.
    pub fn records(&self) -> Result<Vec<Record>> {
        if self.format.len() != RECORD_FORMAT.len()
            || self.format.iter().zip(RECORD_FORMAT).any(|(a, b)| a != b)
        {
            return Err(Error::Encoding(format!(
                "unsupported format {:?}, expected {:?}",
                self.format, RECORD_FORMAT
            )));
        }
        self.values
            .iter()
            .map(|[address, index, amount]| Record::parse(address, index, amount))
            .collect()
    }

    /// Rebuilds the tree from `values` and checks it against `root`.
    ///
    /// # Errors
    /// Returns `Error::RootMismatch` if the rebuilt root differs
    pub fn replay(&self) -> Result<MerkleTree> {
        let expected = parse_hash(&self.root)?;
        let tree = MerkleTree::build(self.records()?)?;
        if tree.root() != expected {
            return Err(Error::RootMismatch {
                expected: hex_encode(expected),
                computed: hex_encode(tree.root()),
            });
        }
        Ok(tree)
    }
}

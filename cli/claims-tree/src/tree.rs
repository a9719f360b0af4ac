//! Sorted-pair Merkle tree over claim records.
//!
//! Leaves sit in insertion order of the input records; the `index` field of a
//! record is carried in the leaf but never used as a tree position. Adjacent
//! nodes are paired left to right. When a level has an odd number of nodes the
//! last one is carried up unchanged and contributes no proof element at that
//! level. Nothing is ever duplicated.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::codec::{Record, ADDRESS_SIZE};
use crate::common::hex_encode;
use crate::error::{Error, Result};
use crate::hasher::{leaf_hash, node_hash, Hash};

/// An immutable Merkle tree together with the records it commits to.
///
/// The tree is read-only after construction and can be shared across threads.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    records: Vec<Record>,
    /// All nodes stored level by level, bottom-up. `layers[0]` = leaves.
    layers: Vec<Vec<Hash>>,
    /// Derived lookup from address to leaf position.
    positions: HashMap<[u8; ADDRESS_SIZE], usize>,
}

/// Builds every level of the tree from the leaf hashes up to the root.
///
/// # Arguments
/// * `leaves` - Leaf hashes in tree order
///
/// # Returns
/// The levels bottom-up; the last level holds only the root
///
/// # Errors
/// Returns `Error::EmptyTree` if `leaves` is empty
pub fn build_layers(leaves: Vec<Hash>) -> Result<Vec<Vec<Hash>>> {
    if leaves.is_empty() {
        return Err(Error::EmptyTree);
    }

    let mut layers = vec![leaves];
    while let Some(level) = layers.last().filter(|level| level.len() > 1) {
        let next_level: Vec<Hash> = level
            .chunks(2)
            .map(|chunk| match chunk {
                [left, right] => node_hash(left, right),
                [carried] => *carried,
                _ => unreachable!("chunks(2) yields one or two nodes"),
            })
            .collect();
        layers.push(next_level);
    }

    Ok(layers)
}

impl MerkleTree {
    /// Builds the tree from records in the given order.
    ///
    /// # Errors
    /// * `Error::EmptyTree` if there are no records
    /// * `Error::DuplicateAddress` / `Error::DuplicateIndex` if a claim would be shadowed
    pub fn build(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyTree);
        }

        let mut positions = HashMap::with_capacity(records.len());
        let mut indices = HashSet::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if positions.insert(record.address, position).is_some() {
                return Err(Error::DuplicateAddress(hex_encode(record.address)));
            }
            if !indices.insert(record.index) {
                return Err(Error::DuplicateIndex(record.index));
            }
        }

        let leaves = records.iter().map(leaf_hash).collect();
        let layers = build_layers(leaves)?;

        debug!(
            leaves = records.len(),
            depth = layers.len() - 1,
            root = %hex_encode(layers[layers.len() - 1][0]),
            "built merkle tree"
        );

        Ok(Self {
            records,
            layers,
            positions,
        })
    }

    /// The root hash.
    pub fn root(&self) -> Hash {
        self.layers[self.layers.len() - 1][0]
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; a tree holds at least one leaf.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of levels above the leaves.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Records in leaf order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Leaf hash at `position`, if any.
    pub fn leaf(&self, position: usize) -> Option<Hash> {
        self.layers[0].get(position).copied()
    }

    /// Leaf position of the record claimed by `address`.
    pub fn position_of(&self, address: &[u8; ADDRESS_SIZE]) -> Option<usize> {
        self.positions.get(address).copied()
    }

    /// Iterates `(position, record)` pairs in leaf order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.records.iter().enumerate()
    }

    /// Generates the proof for the leaf at `position`.
    ///
    /// Sibling hashes are emitted bottom-up. A level where the node was carried
    /// up unpaired contributes nothing.
    ///
    /// # Errors
    /// Returns `Error::IndexOutOfRange` if `position` is not a leaf
    pub fn proof(&self, position: usize) -> Result<Vec<Hash>> {
        if position >= self.len() {
            return Err(Error::IndexOutOfRange {
                index: position,
                leaves: self.len(),
            });
        }

        let mut proof = Vec::with_capacity(self.depth());
        let mut current = position;
        for level in &self.layers[..self.layers.len() - 1] {
            if let Some(sibling) = level.get(current ^ 1) {
                proof.push(*sibling);
            }
            current /= 2;
        }

        Ok(proof)
    }

    /// Looks up the record for `address` and generates its proof.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if the address has no claim
    pub fn proof_for_address(
        &self,
        address: &[u8; ADDRESS_SIZE],
    ) -> Result<(&Record, Vec<Hash>)> {
        let position = self
            .position_of(address)
            .ok_or_else(|| Error::NotFound(hex_encode(address)))?;
        Ok((&self.records[position], self.proof(position)?))
    }
}

/// Folds `proof` into `leaf` and returns the root it implies.
pub fn process_proof(leaf: &Hash, proof: &[Hash]) -> Hash {
    proof
        .iter()
        .fold(*leaf, |current, sibling| node_hash(&current, sibling))
}

/// Checks that `leaf` and `proof` reproduce `root`.
pub fn verify_leaf(leaf: &Hash, proof: &[Hash], root: &Hash) -> bool {
    process_proof(leaf, proof) == *root
}

/// Checks that `record` is committed to by `root` via `proof`.
///
/// Pure and stateless; safe to call from any number of threads.
pub fn verify(record: &Record, proof: &[Hash], root: &Hash) -> bool {
    verify_leaf(&leaf_hash(record), proof, root)
}

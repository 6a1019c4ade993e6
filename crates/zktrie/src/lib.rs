//! Verification of zkTrie proofs.
//!
//! The zkTrie is a binary sparse Merkle trie hashed with domain separated Poseidon. A proof for
//! an account storage slot is the concatenation of two node lists, the path in the account trie
//! followed by the path in the storage trie of the account:
//!
//! `[n_a] account nodes... magic [n_s] storage nodes... magic`
//!
//! where each count includes the magic trailer.

use std::cell::Cell;

use alloy_primitives::{Address, B256, U256};
use scroll_poseidon::{HashScheme, Poseidon, PoseidonError};

pub use error::ZkTrieError;
mod error;

pub use node::{BranchNode, LeafNode, TrieKind, TrieNode};
use node::{take, ACCOUNT_STORAGE_ROOT_INDEX, KEY_PREIMAGE_LENGTH};
pub mod node;

/// The trailer of every node list of a proof.
pub const MAGIC_BYTES: &[u8; 45] = b"THIS IS SOME MAGIC BYTES FOR SMT m1rRXgP2xpDI";

/// The maximum depth of a leaf in the trie.
pub const MAX_TRIE_DEPTH: usize = 248;

/// The outcome of a successful proof verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZkTrieProofResult {
    /// The state root the proof commits to.
    pub state_root: B256,
    /// The value of the storage slot, zero if the slot or the account doesn't exist.
    pub storage_value: B256,
    /// The amount of Poseidon hashes computed during the verification.
    pub hash_count: u64,
}

/// Verifies account storage proofs against the zkTrie.
#[derive(Debug, Clone)]
pub struct ZkTrieVerifier<H = Poseidon> {
    hasher: H,
}

impl ZkTrieVerifier<Poseidon> {
    /// Returns a verifier using the Poseidon hash of the trie.
    pub fn poseidon() -> Result<Self, ZkTrieError> {
        Ok(Self::new(Poseidon::new()?))
    }
}

impl<H: HashScheme> ZkTrieVerifier<H> {
    /// Returns a new [`ZkTrieVerifier`] for the provided hasher.
    pub const fn new(hasher: H) -> Self {
        Self { hasher }
    }

    /// Verifies the proof of the storage slot `storage_key` of `account` and returns the state
    /// root and the value it proves.
    pub fn verify(
        &self,
        account: Address,
        storage_key: B256,
        proof: &[u8],
    ) -> Result<ZkTrieProofResult, ZkTrieError> {
        let hasher = CountingHasher::new(&self.hasher);
        let buf = &mut &*proof;

        let account_preimage = B256::right_padding_from(account.as_slice());
        let account_key = hasher.hash_word(account_preimage)?;
        let storage_key_hash = hasher.hash_word(storage_key)?;

        let (state_root, account_leaf) =
            walk_path(&hasher, buf, TrieKind::Account, account_key, account_preimage)?;
        let storage_root =
            account_leaf.values().get(ACCOUNT_STORAGE_ROOT_INDEX).copied().unwrap_or_default();

        let (proven_storage_root, storage_leaf) =
            walk_path(&hasher, buf, TrieKind::Storage, storage_key_hash, storage_key)?;
        if proven_storage_root != storage_root {
            return Err(ZkTrieError::InvalidAccountLeafNodeHash)
        }

        if !buf.is_empty() {
            return Err(ZkTrieError::ProofLengthMismatch)
        }

        let result = ZkTrieProofResult {
            state_root,
            storage_value: storage_leaf.values().first().copied().unwrap_or_default(),
            hash_count: hasher.count(),
        };
        tracing::debug!(
            target: "scroll::zktrie",
            ?account,
            ?storage_key,
            state_root = ?result.state_root,
            hash_count = result.hash_count,
            "verified proof"
        );

        Ok(result)
    }
}

/// Walks a node list from the root to the terminal node at `key`, returning the root of the trie
/// and the terminal node.
fn walk_path<H: HashScheme>(
    hasher: &H,
    buf: &mut &[u8],
    kind: TrieKind,
    key: B256,
    key_preimage: B256,
) -> Result<(B256, TrieNode), ZkTrieError> {
    let count = take(buf, 1)?[0] as usize;
    let nodes = count.checked_sub(1).ok_or(ZkTrieError::ProofLengthMismatch)?;
    let depth = nodes.saturating_sub(1);
    if depth > MAX_TRIE_DEPTH {
        return Err(ZkTrieError::InvalidNodeDepth(depth))
    }

    let path = U256::from_be_bytes(key.0);
    // the hash expected for the next node, none for the root.
    let mut expected: Option<B256> = None;
    let mut root = B256::ZERO;

    for level in 0..depth {
        let branch = BranchNode::try_from_buf(buf)?;
        let hash = branch.hash(hasher)?;
        match expected {
            None => root = hash,
            Some(expected) if expected != hash => return Err(ZkTrieError::BranchHashMismatch),
            Some(_) => {}
        }
        expected = Some(branch.child(path.bit(level)));
        tracing::trace!(target: "scroll::zktrie", ?kind, level, ?hash, "branch");
    }

    let terminal = if nodes == 0 {
        TrieNode::Empty
    } else {
        let terminal = TrieNode::terminal_from_buf(buf, kind)?;
        let check = LeafCheck { kind, key, key_preimage, expected };
        let hash = match &terminal {
            TrieNode::AccountLeaf(leaf) => check.run(hasher, leaf, leaf.value_hash(hasher)?)?,
            TrieNode::StorageLeaf(leaf) => check.run(hasher, leaf, leaf.value_hash(hasher)?)?,
            TrieNode::Empty => {
                if expected.is_some_and(|expected| !expected.is_zero()) {
                    return Err(kind.invalid_empty_node_hash())
                }
                B256::ZERO
            }
            TrieNode::Branch(branch) => return Err(kind.invalid_leaf_node_type(branch.node_type)),
        };
        if expected.is_none() {
            root = hash;
        }
        tracing::trace!(target: "scroll::zktrie", ?kind, depth, ?hash, "terminal");
        terminal
    };

    if take(buf, MAGIC_BYTES.len())? != MAGIC_BYTES {
        return Err(ZkTrieError::InvalidProofMagicBytes)
    }

    Ok((root, terminal))
}

/// The expectations on the terminal leaf of a path.
#[derive(Debug, Clone, Copy)]
struct LeafCheck {
    kind: TrieKind,
    key: B256,
    key_preimage: B256,
    /// The hash expected by the parent branch, none if the leaf is the root.
    expected: Option<B256>,
}

impl LeafCheck {
    /// Checks the leaf is the one of `key` and hashes to the expected hash, returning its hash.
    fn run<H: HashScheme, const N: usize>(
        &self,
        hasher: &H,
        leaf: &LeafNode<N>,
        value_hash: B256,
    ) -> Result<B256, ZkTrieError> {
        let kind = self.kind;
        if leaf.node_key != self.key {
            return Err(kind.key_mismatch())
        }
        if leaf.compressed_flags != kind.compressed_flags() {
            return Err(kind.invalid_compressed_flag())
        }

        let hash = leaf.hash(hasher, value_hash)?;
        if self.expected.is_some_and(|expected| expected != hash) {
            return Err(kind.invalid_leaf_node_hash())
        }

        let length = leaf.key_preimage.len();
        if length != KEY_PREIMAGE_LENGTH as usize {
            return Err(kind.invalid_key_preimage_length(length as u8))
        }
        if leaf.key_preimage.as_slice() != self.key_preimage.as_slice() {
            return Err(kind.invalid_key_preimage())
        }

        Ok(hash)
    }
}

/// A hasher counting the hashes it computes.
#[derive(Debug)]
struct CountingHasher<'a, H> {
    inner: &'a H,
    count: Cell<u64>,
}

impl<'a, H> CountingHasher<'a, H> {
    const fn new(inner: &'a H) -> Self {
        Self { inner, count: Cell::new(0) }
    }

    fn count(&self) -> u64 {
        self.count.get()
    }
}

impl<H: HashScheme> HashScheme for CountingHasher<'_, H> {
    fn hash(&self, left: B256, right: B256, domain: u64) -> Result<B256, PoseidonError> {
        self.count.set(self.count.get() + 1);
        self.inner.hash(left, right, domain)
    }
}

//! The nodes of a zkTrie proof.

use crate::ZkTrieError;

use alloy_primitives::B256;
use scroll_poseidon::{HashScheme, HASH_DOMAIN_ELEMS_BASE};

/// The node type of a leaf.
pub const LEAF_NODE_TYPE: u8 = 4;

/// The node type of an empty node.
pub const EMPTY_NODE_TYPE: u8 = 5;

/// The node types of a branch, covering the terminal and non terminal combinations of its
/// children.
pub const BRANCH_NODE_TYPES: std::ops::RangeInclusive<u8> = 6..=9;

/// The values count of an account leaf: nonce and code size, balance, storage root, keccak code
/// hash and poseidon code hash.
pub const ACCOUNT_VALUES_COUNT: usize = 5;

/// The position of the storage root in the account leaf values.
pub const ACCOUNT_STORAGE_ROOT_INDEX: usize = 2;

/// The values count of a storage leaf.
pub const STORAGE_VALUES_COUNT: usize = 1;

/// The length of the key preimage carried by the leaves.
pub const KEY_PREIMAGE_LENGTH: u8 = 32;

/// The trie a node list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieKind {
    /// The account trie, keyed by the account address.
    Account,
    /// The storage trie of an account, keyed by the storage slot.
    Storage,
}

impl TrieKind {
    /// Returns the compressed flags of the leaves of the trie.
    pub const fn compressed_flags(&self) -> [u8; 4] {
        match self {
            Self::Account => [5, 8, 0, 0],
            Self::Storage => [1, 1, 0, 0],
        }
    }

    pub(crate) const fn invalid_leaf_node_type(&self, node_type: u8) -> ZkTrieError {
        match self {
            Self::Account => ZkTrieError::InvalidAccountLeafNodeType(node_type),
            Self::Storage => ZkTrieError::InvalidStorageLeafNodeType(node_type),
        }
    }

    pub(crate) const fn key_mismatch(&self) -> ZkTrieError {
        match self {
            Self::Account => ZkTrieError::AccountKeyMismatch,
            Self::Storage => ZkTrieError::StorageKeyMismatch,
        }
    }

    pub(crate) const fn invalid_compressed_flag(&self) -> ZkTrieError {
        match self {
            Self::Account => ZkTrieError::InvalidAccountCompressedFlag,
            Self::Storage => ZkTrieError::InvalidStorageCompressedFlag,
        }
    }

    pub(crate) const fn invalid_leaf_node_hash(&self) -> ZkTrieError {
        match self {
            Self::Account => ZkTrieError::InvalidAccountLeafNodeHash,
            Self::Storage => ZkTrieError::InvalidStorageLeafNodeHash,
        }
    }

    pub(crate) const fn invalid_empty_node_hash(&self) -> ZkTrieError {
        match self {
            Self::Account => ZkTrieError::InvalidAccountLeafNodeHash,
            Self::Storage => ZkTrieError::InvalidStorageEmptyLeafNodeHash,
        }
    }

    pub(crate) const fn invalid_key_preimage_length(&self, length: u8) -> ZkTrieError {
        match self {
            Self::Account => ZkTrieError::InvalidAccountKeyPreimageLength(length),
            Self::Storage => ZkTrieError::InvalidStorageKeyPreimageLength(length),
        }
    }

    pub(crate) const fn invalid_key_preimage(&self) -> ZkTrieError {
        match self {
            Self::Account => ZkTrieError::InvalidAccountKeyPreimage,
            Self::Storage => ZkTrieError::InvalidStorageKeyPreimage,
        }
    }
}

/// A node of a zkTrie proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieNode {
    /// A branch on the path to the leaf.
    Branch(BranchNode),
    /// A leaf of the account trie.
    AccountLeaf(LeafNode<ACCOUNT_VALUES_COUNT>),
    /// A leaf of a storage trie.
    StorageLeaf(LeafNode<STORAGE_VALUES_COUNT>),
    /// An empty node, hashing to zero.
    Empty,
}

impl TrieNode {
    /// Tries to read the terminal node of a path in the provided trie.
    pub fn terminal_from_buf(buf: &mut &[u8], kind: TrieKind) -> Result<Self, ZkTrieError> {
        let node_type = *buf.first().ok_or(ZkTrieError::ProofLengthMismatch)?;
        match (node_type, kind) {
            (EMPTY_NODE_TYPE, _) => {
                take(buf, 1)?;
                Ok(Self::Empty)
            }
            (LEAF_NODE_TYPE, TrieKind::Account) => {
                Ok(Self::AccountLeaf(LeafNode::try_from_buf(buf)?))
            }
            (LEAF_NODE_TYPE, TrieKind::Storage) => {
                Ok(Self::StorageLeaf(LeafNode::try_from_buf(buf)?))
            }
            (t, kind) => Err(kind.invalid_leaf_node_type(t)),
        }
    }

    /// Returns the values of the node, empty for anything but a leaf.
    pub fn values(&self) -> &[B256] {
        match self {
            Self::AccountLeaf(leaf) => &leaf.values,
            Self::StorageLeaf(leaf) => &leaf.values,
            Self::Branch(_) | Self::Empty => &[],
        }
    }
}

/// A branch node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchNode {
    /// The node type, which is also the hashing domain of the node.
    pub node_type: u8,
    /// The hash of the left child.
    pub left: B256,
    /// The hash of the right child.
    pub right: B256,
}

impl BranchNode {
    /// The length of an encoded branch node.
    pub const BYTES_LENGTH: usize = 65;

    /// Tries to read a branch from the buffer.
    pub fn try_from_buf(buf: &mut &[u8]) -> Result<Self, ZkTrieError> {
        let node_type = *buf.first().ok_or(ZkTrieError::ProofLengthMismatch)?;
        if !BRANCH_NODE_TYPES.contains(&node_type) {
            return Err(ZkTrieError::InvalidBranchNodeType(node_type))
        }
        let bytes = take(buf, Self::BYTES_LENGTH)?;
        Ok(Self {
            node_type,
            left: B256::from_slice(&bytes[1..33]),
            right: B256::from_slice(&bytes[33..65]),
        })
    }

    /// Returns the hash of the branch.
    pub fn hash<H: HashScheme>(&self, hasher: &H) -> Result<B256, ZkTrieError> {
        Ok(hasher.hash(self.left, self.right, self.node_type as u64)?)
    }

    /// Returns the hash of the child on the provided side.
    pub const fn child(&self, right: bool) -> B256 {
        if right {
            self.right
        } else {
            self.left
        }
    }
}

/// A leaf node carrying `N` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode<const N: usize> {
    /// The key of the leaf, the hash of the key preimage.
    pub node_key: B256,
    /// The compressed flags of the values.
    pub compressed_flags: [u8; 4],
    /// The values of the leaf.
    pub values: [B256; N],
    /// The preimage of the node key.
    pub key_preimage: Vec<u8>,
}

impl<const N: usize> LeafNode<N> {
    /// Tries to read a leaf from the buffer, including its key preimage.
    pub fn try_from_buf(buf: &mut &[u8]) -> Result<Self, ZkTrieError> {
        take(buf, 1)?;
        let node_key = B256::from_slice(take(buf, 32)?);

        let mut compressed_flags = [0u8; 4];
        compressed_flags.copy_from_slice(take(buf, 4)?);

        let mut values = [B256::ZERO; N];
        for value in &mut values {
            *value = B256::from_slice(take(buf, 32)?);
        }

        let preimage_length = take(buf, 1)?[0] as usize;
        let key_preimage = take(buf, preimage_length)?.to_vec();

        Ok(Self { node_key, compressed_flags, values, key_preimage })
    }

    /// Returns the leaf hash for the provided hash of its values.
    pub fn hash<H: HashScheme>(&self, hasher: &H, value_hash: B256) -> Result<B256, ZkTrieError> {
        Ok(hasher.hash(self.node_key, value_hash, LEAF_NODE_TYPE as u64)?)
    }
}

impl LeafNode<ACCOUNT_VALUES_COUNT> {
    /// Returns the hash of the account values. The keccak code hash is hashed as a word as it
    /// doesn't fit the scalar field.
    pub fn value_hash<H: HashScheme>(&self, hasher: &H) -> Result<B256, ZkTrieError> {
        let domain = ACCOUNT_VALUES_COUNT as u64 * HASH_DOMAIN_ELEMS_BASE;
        let [nonce, balance, storage_root, code_hash, poseidon_code_hash] = self.values;

        let code_hash = hasher.hash_word(code_hash)?;
        let left = hasher.hash(
            hasher.hash(nonce, balance, domain)?,
            hasher.hash(storage_root, code_hash, domain)?,
            domain,
        )?;
        Ok(hasher.hash(left, poseidon_code_hash, domain)?)
    }
}

impl LeafNode<STORAGE_VALUES_COUNT> {
    /// Returns the hash of the storage value.
    pub fn value_hash<H: HashScheme>(&self, hasher: &H) -> Result<B256, ZkTrieError> {
        Ok(hasher.hash_word(self.values[0])?)
    }
}

/// Takes `len` bytes from the buffer.
pub(crate) fn take<'a>(buf: &mut &'a [u8], len: usize) -> Result<&'a [u8], ZkTrieError> {
    let (bytes, rest) = buf.split_at_checked(len).ok_or(ZkTrieError::ProofLengthMismatch)?;
    *buf = rest;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_decode_branch() -> eyre::Result<()> {
        let mut raw = vec![7u8];
        raw.extend_from_slice(&[1u8; 32]);
        raw.extend_from_slice(&[2u8; 32]);
        raw.push(0xff);

        let buf = &mut raw.as_slice();
        let branch = BranchNode::try_from_buf(buf)?;
        assert_eq!(branch.child(false), B256::repeat_byte(1));
        assert_eq!(branch.child(true), B256::repeat_byte(2));
        assert_eq!(*buf, &[0xff]);

        raw[0] = 4;
        assert!(matches!(
            BranchNode::try_from_buf(&mut raw.as_slice()),
            Err(ZkTrieError::InvalidBranchNodeType(4))
        ));
        assert!(matches!(
            BranchNode::try_from_buf(&mut &[6u8; 64][..]),
            Err(ZkTrieError::ProofLengthMismatch)
        ));

        Ok(())
    }

    #[test]
    fn test_should_decode_storage_leaf() -> eyre::Result<()> {
        let mut raw = vec![LEAF_NODE_TYPE];
        raw.extend_from_slice(&[3u8; 32]);
        raw.extend_from_slice(&TrieKind::Storage.compressed_flags());
        raw.extend_from_slice(&[4u8; 32]);
        raw.push(KEY_PREIMAGE_LENGTH);
        raw.extend_from_slice(&[5u8; 32]);

        let buf = &mut raw.as_slice();
        let node = TrieNode::terminal_from_buf(buf, TrieKind::Storage)?;
        assert!(buf.is_empty());
        assert_eq!(node.values(), &[B256::repeat_byte(4)]);

        let TrieNode::StorageLeaf(leaf) = node else { eyre::bail!("expected a storage leaf") };
        assert_eq!(leaf.node_key, B256::repeat_byte(3));
        assert_eq!(leaf.key_preimage, vec![5u8; 32]);

        // the same bytes are too short for an account leaf.
        assert!(matches!(
            TrieNode::terminal_from_buf(&mut raw.as_slice(), TrieKind::Account),
            Err(ZkTrieError::ProofLengthMismatch)
        ));

        Ok(())
    }

    #[test]
    fn test_should_reject_terminal_branch() {
        assert!(matches!(
            TrieNode::terminal_from_buf(&mut &[6u8][..], TrieKind::Account),
            Err(ZkTrieError::InvalidAccountLeafNodeType(6))
        ));
        assert!(matches!(
            TrieNode::terminal_from_buf(&mut &[6u8][..], TrieKind::Storage),
            Err(ZkTrieError::InvalidStorageLeafNodeType(6))
        ));
        assert!(matches!(
            TrieNode::terminal_from_buf(&mut &[EMPTY_NODE_TYPE][..], TrieKind::Storage),
            Ok(TrieNode::Empty)
        ));
    }
}

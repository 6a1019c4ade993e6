use scroll_poseidon::PoseidonError;

/// An error occurring while verifying a zkTrie proof.
#[derive(Debug, thiserror::Error)]
pub enum ZkTrieError {
    /// A node on the path to the leaf is not a branch.
    #[error("invalid branch node type {0}")]
    InvalidBranchNodeType(u8),
    /// A node doesn't hash to the child hash of its parent.
    #[error("branch hash mismatch")]
    BranchHashMismatch,
    /// The account trie terminates with a node that is neither a leaf nor empty.
    #[error("invalid account leaf node type {0}")]
    InvalidAccountLeafNodeType(u8),
    /// The account leaf is not keyed by the account.
    #[error("account key mismatch")]
    AccountKeyMismatch,
    /// The account leaf doesn't carry the account compressed flags.
    #[error("invalid account compressed flag")]
    InvalidAccountCompressedFlag,
    /// The account leaf doesn't hash to the expected hash, or doesn't commit to the storage trie.
    #[error("invalid account leaf node hash")]
    InvalidAccountLeafNodeHash,
    /// The account key preimage is not 32 bytes long.
    #[error("invalid account key preimage length {0}")]
    InvalidAccountKeyPreimageLength(u8),
    /// The account key preimage doesn't match the account.
    #[error("invalid account key preimage")]
    InvalidAccountKeyPreimage,
    /// The storage trie terminates with a node that is neither a leaf nor empty.
    #[error("invalid storage leaf node type {0}")]
    InvalidStorageLeafNodeType(u8),
    /// The storage leaf is not keyed by the storage key.
    #[error("storage key mismatch")]
    StorageKeyMismatch,
    /// The storage leaf doesn't carry the storage compressed flags.
    #[error("invalid storage compressed flag")]
    InvalidStorageCompressedFlag,
    /// The storage leaf doesn't hash to the expected hash.
    #[error("invalid storage leaf node hash")]
    InvalidStorageLeafNodeHash,
    /// The storage key preimage is not 32 bytes long.
    #[error("invalid storage key preimage length {0}")]
    InvalidStorageKeyPreimageLength(u8),
    /// The storage key preimage doesn't match the storage key.
    #[error("invalid storage key preimage")]
    InvalidStorageKeyPreimage,
    /// The storage trie terminates with an empty node where the parent expects a node.
    #[error("invalid storage empty leaf node hash")]
    InvalidStorageEmptyLeafNodeHash,
    /// The trailer of a node list is not the magic bytes.
    #[error("invalid proof magic bytes")]
    InvalidProofMagicBytes,
    /// The proof is truncated or followed by extra bytes.
    #[error("proof length mismatch")]
    ProofLengthMismatch,
    /// The path to the leaf is deeper than the trie allows.
    #[error("invalid node depth {0}")]
    InvalidNodeDepth(usize),
    /// A hashed value is not in the scalar field.
    #[error(transparent)]
    Poseidon(#[from] PoseidonError),
}

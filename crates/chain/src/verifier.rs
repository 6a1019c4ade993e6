use alloy_primitives::{bytes::BufMut, keccak256, B256};

/// Verifies the validity proofs of the batches.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait ProofVerifier {
    /// Returns true if `proof` is a valid proof of the batch at `batch_index` for the provided
    /// public input hash.
    fn verify_proof(&self, batch_index: u64, proof: &[u8], public_input_hash: B256) -> bool;
}

/// Computes the public input hash of a batch validity proof:
/// `keccak256(chain_id || prev_state_root || post_state_root || withdraw_root || data_hash)`,
/// with the chain id encoded as 8 bytes big endian.
pub fn compute_public_input_hash(
    chain_id: u64,
    prev_state_root: B256,
    post_state_root: B256,
    withdraw_root: B256,
    data_hash: B256,
) -> B256 {
    let mut buf = Vec::with_capacity(8 + 32 * 4);
    buf.put_u64(chain_id);
    buf.put_slice(prev_state_root.as_slice());
    buf.put_slice(post_state_root.as_slice());
    buf.put_slice(withdraw_root.as_slice());
    buf.put_slice(data_hash.as_slice());
    keccak256(buf)
}

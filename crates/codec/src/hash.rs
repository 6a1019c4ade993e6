use crate::{BlockContext, Chunk, Codec};

use alloy_primitives::{bytes::BufMut, keccak256, B256};

/// Computes the data hash for the batch from the hashes of its chunks.
pub fn compute_batch_data_hash(chunk_hashes: &[B256]) -> B256 {
    let mut buf = Vec::with_capacity(chunk_hashes.len() * 32);
    for hash in chunk_hashes {
        buf.put_slice(hash.as_slice());
    }
    keccak256(buf)
}

/// Compute the hash for the chunk.
///
/// `l1_message_hashes` holds, for each block of the chunk, the hashes of the L1 messages included
/// in the block. Skipped messages are not part of the hash. Missing entries are considered empty.
pub fn compute_chunk_data_hash(
    codec: Codec,
    chunk: &Chunk,
    l1_message_hashes: &[Vec<B256>],
) -> B256 {
    let mut capacity = chunk.blocks.len() * (BlockContext::BYTES_LENGTH - 2) +
        l1_message_hashes.iter().map(|h| h.len() * 32).sum::<usize>();
    if codec == Codec::V0 {
        capacity += chunk.blocks.iter().map(|b| b.transactions.len() * 32).sum::<usize>();
    }
    let mut buf = Vec::with_capacity(capacity);

    for context in chunk.contexts() {
        // we don't use the last 2 bytes.
        buf.put_slice(&context.to_be_bytes()[..BlockContext::BYTES_LENGTH - 2]);
    }

    for (i, block) in chunk.blocks.iter().enumerate() {
        for hash in l1_message_hashes.get(i).into_iter().flatten() {
            buf.put_slice(hash.as_slice());
        }

        // for v0, we add the l2 transaction hashes.
        if codec == Codec::V0 {
            for tx in &block.transactions {
                buf.put_slice(keccak256(tx).as_slice());
            }
        }
    }

    keccak256(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BatchHeaderV1, L2Block, SkipBitmap};

    use alloy_primitives::{b256, bytes, U256};

    fn chunk() -> Chunk {
        let context = |number: u64, transactions, l1_messages| BlockContext {
            number,
            timestamp: number + 1,
            base_fee: U256::from(number + 2),
            gas_limit: number + 3,
            num_transactions: transactions,
            num_l1_messages: l1_messages,
        };
        Chunk::new(vec![
            L2Block::new(vec![bytes!("01")], context(1, 2, 1)),
            L2Block::new(vec![bytes!("0203")], context(2, 1, 0)),
        ])
    }

    #[test]
    fn test_should_compute_chunk_data_hash() {
        let hashes = vec![vec![B256::repeat_byte(0x11)], vec![]];

        let v0 = compute_chunk_data_hash(Codec::V0, &chunk(), &hashes);
        assert_eq!(v0, b256!("ff46db37cca68959d86be3c4485e5a1081714d3c13dc4cf0682260962a7fc0c6"));

        let v1 = compute_chunk_data_hash(Codec::V1, &chunk(), &hashes);
        assert_eq!(v1, b256!("d1655a31a21b463847e50099869e1b18e3a2b9e38ea672ea7b6b9fcdd27af8c6"));

        assert_eq!(
            compute_batch_data_hash(&[v0, v1]),
            b256!("57176414042785d4956cf1a519898ca523ec13aafa8583c69d9349ec8aaa7e2a")
        );
    }

    #[test]
    fn test_should_hash_blob_batch_with_one_l1_message() -> eyre::Result<()> {
        // one block with one transaction, which is the first L1 message of the queue.
        let mut raw_chunk = [0u8; 1 + BlockContext::BYTES_LENGTH];
        raw_chunk[0] = 1;
        raw_chunk[58] = 1;
        raw_chunk[60] = 1;
        let chunk = Codec::V1.decode_chunk(&raw_chunk)?;
        assert_eq!(chunk, Chunk::new(vec![L2Block::new(vec![], BlockContext::with_counts(1, 1))]));

        let message_hash =
            b256!("24411d21c906219f9e13068d4d6f61a9d71396c6b17a08a84cd1852d5edaa9db");
        let chunk_hash = compute_chunk_data_hash(Codec::V1, &chunk, &[vec![message_hash]]);
        assert_eq!(
            chunk_hash,
            b256!("e71abc791ac90b3076b2ac3114c786854d5c48c40d088617a3346c166e85c0a2")
        );

        let data_hash = compute_batch_data_hash(&[chunk_hash]);
        assert_eq!(
            data_hash,
            b256!("19cb48b9e81b1cc64417751760e24c7034cc3c3563f4102409704ed890860d27")
        );

        let header = BatchHeaderV1::new(
            1,
            1,
            1,
            1,
            data_hash,
            B256::ZERO,
            b256!("99a2f6e2bca66d5eb3c178157b8be43b719f5c34150300bd6aea2e3c95954542"),
            SkipBitmap::from_skipped(1, []),
        );
        assert_eq!(
            header.hash_slow(),
            b256!("c317384d9595643daac2fc8be2aa35030f539ad9269b33cb511b7b1001f3da9d")
        );

        Ok(())
    }

    #[test]
    fn test_should_interleave_l1_messages_per_block() {
        let first = compute_chunk_data_hash(
            Codec::V0,
            &chunk(),
            &[vec![B256::repeat_byte(0x11)], vec![]],
        );
        let second = compute_chunk_data_hash(
            Codec::V0,
            &chunk(),
            &[vec![], vec![B256::repeat_byte(0x11)]],
        );
        assert_ne!(first, second);
    }
}

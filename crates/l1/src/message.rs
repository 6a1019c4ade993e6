//! Hashing and addressing of the cross domain messages sent from L1 to L2.

use crate::{L1_MESSAGE_TRANSACTION_TYPE, L1_TO_L2_ALIAS_OFFSET};

use alloy_primitives::{bytes::BufMut, keccak256, Address, B256, U160, U256};
use alloy_rlp::{Encodable, Header};
use rollup_node_primitives::L1Message;

/// Computes the hash of a L1 message, which is the hash of the L1 message transaction included
/// on L2: `keccak256(0x7E || rlp([nonce, gas_limit, target, value, data, sender]))`.
pub fn compute_message_hash(
    sender: Address,
    nonce: U256,
    value: U256,
    target: Address,
    gas_limit: U256,
    data: &[u8],
) -> B256 {
    let payload_length = nonce.length() +
        gas_limit.length() +
        target.length() +
        value.length() +
        data.length() +
        sender.length();
    let header = Header { list: true, payload_length };

    let mut buf = Vec::with_capacity(1 + header.length() + payload_length);
    buf.put_u8(L1_MESSAGE_TRANSACTION_TYPE);
    header.encode(&mut buf);
    nonce.encode(&mut buf);
    gas_limit.encode(&mut buf);
    target.encode(&mut buf);
    value.encode(&mut buf);
    data.encode(&mut buf);
    sender.encode(&mut buf);

    keccak256(buf)
}

/// Extension trait for [`L1Message`].
pub trait L1MessageExt {
    /// Returns the hash identifying the message.
    fn hash_slow(&self) -> B256;
}

impl L1MessageExt for L1Message {
    fn hash_slow(&self) -> B256 {
        compute_message_hash(
            self.sender,
            U256::from(self.queue_index),
            self.value,
            self.target,
            self.gas_limit,
            &self.data,
        )
    }
}

/// Returns the L2 alias of a L1 contract address.
pub fn apply_l1_to_l2_alias(address: Address) -> Address {
    let aliased = to_u160(address).wrapping_add(to_u160(L1_TO_L2_ALIAS_OFFSET));
    Address::from(aliased.to_be_bytes::<20>())
}

/// Returns the L1 address behind an aliased L2 address.
pub fn undo_l1_to_l2_alias(address: Address) -> Address {
    let original = to_u160(address).wrapping_sub(to_u160(L1_TO_L2_ALIAS_OFFSET));
    Address::from(original.to_be_bytes::<20>())
}

fn to_u160(address: Address) -> U160 {
    U160::from_be_bytes(address.0 .0)
}

use alloy_primitives::{Address, Bytes, U256};

/// A message appended to the L1 message queue, to be included in L2 by a later batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct L1Message {
    /// The index of the message in the queue.
    pub queue_index: u64,
    /// The L2 sender of the message, aliased when the L1 sender is a contract.
    pub sender: Address,
    /// The target of the message on L2.
    pub target: Address,
    /// The value transferred with the message.
    pub value: U256,
    /// The gas limit of the message on L2.
    pub gas_limit: U256,
    /// The calldata of the message.
    pub data: Bytes,
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for L1Message {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        Ok(Self {
            queue_index: u.arbitrary::<u32>()? as u64,
            sender: u.arbitrary()?,
            target: u.arbitrary()?,
            value: u.arbitrary()?,
            gas_limit: U256::from(u.arbitrary::<u32>()?),
            data: u.arbitrary()?,
        })
    }
}

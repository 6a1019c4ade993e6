use alloy_primitives::Log;
use alloy_sol_types::{sol, SolEvent};
use rollup_node_primitives::L1Message;

sol! {
    #[cfg_attr(feature = "test-utils", derive(arbitrary::Arbitrary))]
    #[derive(Debug, PartialEq, Eq)]
    event QueueTransaction(
        address indexed sender,
        address indexed target,
        uint256 value,
        uint64 queueIndex,
        uint256 gasLimit,
        bytes data
    );

    #[cfg_attr(feature = "test-utils", derive(arbitrary::Arbitrary))]
    #[derive(Debug, PartialEq, Eq)]
    event DequeueTransaction(uint256 startIndex, uint256 count, uint256 skippedBitmap);

    #[cfg_attr(feature = "test-utils", derive(arbitrary::Arbitrary))]
    #[derive(Debug, PartialEq, Eq)]
    event DropTransaction(uint256 index);

    #[cfg_attr(feature = "test-utils", derive(arbitrary::Arbitrary))]
    #[derive(Debug, PartialEq, Eq)]
    event CommitBatch(uint256 indexed batchIndex, bytes32 indexed batchHash);

    #[cfg_attr(feature = "test-utils", derive(arbitrary::Arbitrary))]
    #[derive(Debug, PartialEq, Eq)]
    event RevertBatch(uint256 indexed batchIndex, bytes32 indexed batchHash);

    #[cfg_attr(feature = "test-utils", derive(arbitrary::Arbitrary))]
    #[derive(Debug, PartialEq, Eq)]
    event FinalizeBatch(
        uint256 indexed batchIndex,
        bytes32 indexed batchHash,
        bytes32 stateRoot,
        bytes32 withdrawRoot
    );
}

/// Tries to decode the provided log into the type T.
pub fn try_decode_log<T: SolEvent>(log: &Log) -> Option<Log<T>> {
    T::decode_log(log).ok()
}

impl From<QueueTransaction> for L1Message {
    fn from(value: QueueTransaction) -> Self {
        Self {
            queue_index: value.queueIndex,
            sender: value.sender,
            target: value.target,
            value: value.value,
            gas_limit: value.gasLimit,
            data: value.data,
        }
    }
}

impl From<&L1Message> for QueueTransaction {
    fn from(value: &L1Message) -> Self {
        Self {
            sender: value.sender,
            target: value.target,
            value: value.value,
            queueIndex: value.queue_index,
            gasLimit: value.gas_limit,
            data: value.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes, Address, LogData, U256};

    #[test]
    fn test_should_decode_queue_transaction_log() -> eyre::Result<()> {
        let message = L1Message {
            queue_index: 3,
            sender: address!("7885BcBd5CeCEf1336b5300fb5186A12DDD8c478"),
            target: address!("781e90f1c8Fc4611c9b7497C3B47F99Ef6969CbC"),
            value: U256::from(10),
            gas_limit: U256::from(168000),
            data: bytes!("8ef1332e"),
        };
        let event = QueueTransaction::from(&message);
        let log = Log { address: Address::ZERO, data: event.encode_log_data() };

        let decoded =
            try_decode_log::<QueueTransaction>(&log).ok_or(eyre::eyre!("decoding failed"))?;
        assert_eq!(L1Message::from(decoded.data), message);

        Ok(())
    }

    #[test]
    fn test_should_not_decode_mismatched_log() {
        let log = Log { address: Address::ZERO, data: LogData::default() };
        assert!(try_decode_log::<CommitBatch>(&log).is_none());
    }
}

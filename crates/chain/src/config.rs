use std::{fmt, str::FromStr};

use scroll_codec::{Codec, DecodingError};

/// The chain id of the Scroll mainnet.
pub const SCROLL_MAINNET_CHAIN_ID: u64 = 534352;

/// The default maximum number of transactions, L1 messages included, in a chunk.
pub const DEFAULT_MAX_NUM_TX_IN_CHUNK: u64 = 100;

/// The default maximum gas limit of a L1 message.
pub const DEFAULT_MAX_GAS_LIMIT: u64 = 10_000_000;

/// Configuration for the [`crate::ScrollChain`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChainConfig {
    /// The chain id of the rollup, bound in the public input of the validity proofs.
    pub layer2_chain_id: u64,
    /// The maximum number of transactions in a chunk.
    pub max_num_tx_in_chunk: u64,
    /// The batch versions activation schedule.
    pub version_schedule: VersionSchedule,
    /// The L1 message queue configuration.
    pub queue: QueueConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            layer2_chain_id: SCROLL_MAINNET_CHAIN_ID,
            max_num_tx_in_chunk: DEFAULT_MAX_NUM_TX_IN_CHUNK,
            version_schedule: VersionSchedule::default(),
            queue: QueueConfig::default(),
        }
    }
}

/// Configuration for the [`crate::L1MessageQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueConfig {
    /// The maximum gas limit of an appended message.
    pub max_gas_limit: u64,
    /// The base intrinsic gas of a message.
    pub tx_gas: u64,
    /// The intrinsic gas of a zero byte of calldata.
    pub zero_gas: u64,
    /// The intrinsic gas of a non zero byte of calldata.
    pub non_zero_gas: u64,
}

impl QueueConfig {
    /// Returns the intrinsic gas of a message carrying the provided calldata.
    pub fn intrinsic_gas(&self, data: &[u8]) -> u64 {
        data.iter().fold(self.tx_gas, |gas, byte| {
            gas.saturating_add(if *byte == 0 { self.zero_gas } else { self.non_zero_gas })
        })
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { max_gas_limit: DEFAULT_MAX_GAS_LIMIT, tx_gas: 21_000, zero_gas: 4, non_zero_gas: 16 }
    }
}

/// A supported batch version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BatchVersion {
    /// Chunks carry the L2 transactions.
    V0,
    /// Chunks carry the block contexts, the L2 transactions are committed in a blob.
    V1,
}

impl BatchVersion {
    /// Returns the codec of the version.
    pub const fn codec(&self) -> Codec {
        match self {
            Self::V0 => Codec::V0,
            Self::V1 => Codec::V1,
        }
    }
}

impl TryFrom<u8> for BatchVersion {
    type Error = DecodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match Codec::try_from_version(value)? {
            Codec::V0 => Self::V0,
            Codec::V1 => Self::V1,
        })
    }
}

impl From<BatchVersion> for u8 {
    fn from(value: BatchVersion) -> Self {
        value.codec().version()
    }
}

impl FromStr for BatchVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(['v', 'V']).unwrap_or(s);
        let version =
            digits.parse::<u8>().map_err(|_| format!("Expected 'v{{number}}', got '{s}'"))?;
        Self::try_from(version).map_err(|err| err.to_string())
    }
}

impl fmt::Display for BatchVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", u8::from(*self))
    }
}

/// The activation of a batch version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionActivation {
    /// The activated version.
    pub version: BatchVersion,
    /// The first batch index using the version.
    pub from_batch_index: u64,
}

/// The batch versions schedule. Each activation holds until the next one, in batch index order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<VersionActivation>", into = "Vec<VersionActivation>")]
pub struct VersionSchedule(Vec<VersionActivation>);

impl VersionSchedule {
    /// Returns a new schedule from the provided activations.
    pub fn new(activations: impl IntoIterator<Item = VersionActivation>) -> Self {
        let mut activations: Vec<_> = activations.into_iter().collect();
        activations.sort_by_key(|activation| activation.from_batch_index);
        Self(activations)
    }

    /// Returns a schedule using the provided version for every batch.
    pub fn fixed(version: BatchVersion) -> Self {
        Self(vec![VersionActivation { version, from_batch_index: 0 }])
    }

    /// Returns the version expected for the batch at the provided index, if any.
    pub fn version_at(&self, batch_index: u64) -> Option<BatchVersion> {
        self.0
            .iter()
            .rev()
            .find(|activation| activation.from_batch_index <= batch_index)
            .map(|activation| activation.version)
    }

    /// Returns the activations of the schedule.
    pub fn activations(&self) -> &[VersionActivation] {
        &self.0
    }
}

impl Default for VersionSchedule {
    fn default() -> Self {
        Self::fixed(BatchVersion::V0)
    }
}

impl From<Vec<VersionActivation>> for VersionSchedule {
    fn from(value: Vec<VersionActivation>) -> Self {
        Self::new(value)
    }
}

impl From<VersionSchedule> for Vec<VersionActivation> {
    fn from(value: VersionSchedule) -> Self {
        value.0
    }
}

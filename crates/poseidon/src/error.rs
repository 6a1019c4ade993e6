use alloy_primitives::B256;

/// An error occurring while hashing with Poseidon.
#[derive(Debug, thiserror::Error)]
pub enum PoseidonError {
    /// The provided value is not lower than the scalar field modulus.
    #[error("value {0} is not in the scalar field")]
    NotInField(B256),
    /// The permutation parameters could not be loaded.
    #[error(transparent)]
    Parameters(#[from] light_poseidon::PoseidonError),
}

use crate::PoseidonError;

use alloy_primitives::{uint, B256, U256};
use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};

/// The modulus of the BN254 scalar field.
pub const FIELD_MODULUS: U256 =
    uint!(0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001_U256);

/// Converts the big endian value into a field element. Values greater or equal to the modulus
/// are rejected instead of being reduced.
pub fn fr_from_b256(value: &B256) -> Result<Fr, PoseidonError> {
    if U256::from_be_bytes(value.0) >= FIELD_MODULUS {
        return Err(PoseidonError::NotInField(*value))
    }
    Ok(Fr::from_be_bytes_mod_order(value.as_slice()))
}

/// Converts the field element into its 32 bytes big endian representation.
pub fn fr_to_b256(value: Fr) -> B256 {
    B256::left_padding_from(&value.into_bigint().to_bytes_be())
}

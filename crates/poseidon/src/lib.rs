//! Poseidon hashing over the BN254 scalar field.
//!
//! The permutation uses the circom parameter set for a state width of three. The first state
//! element carries a domain tag, so `hash(left, right, 0)` equals circom's two input Poseidon
//! while non-zero domains separate otherwise identical hash computations.

pub use error::PoseidonError;
mod error;

pub use field::{fr_from_b256, fr_to_b256, FIELD_MODULUS};
mod field;

pub use hasher::{HashScheme, Poseidon};
mod hasher;

/// Base of the element count domains: hashing `n` elements uses `n * HASH_DOMAIN_ELEMS_BASE`.
pub const HASH_DOMAIN_ELEMS_BASE: u64 = 256;

/// Domain used to hash a 32 bytes word split into two 128 bits limbs.
pub const HASH_DOMAIN_BYTE32: u64 = 2 * HASH_DOMAIN_ELEMS_BASE;

use crate::{fr_from_b256, fr_to_b256, PoseidonError, HASH_DOMAIN_BYTE32};

use alloy_primitives::B256;
use ark_bn254::Fr;
use ark_ff::{Field, Zero};
use light_poseidon::{parameters::bn254_x5::get_poseidon_parameters, PoseidonParameters};
use std::fmt;

/// The state width: the domain element followed by the two inputs.
const WIDTH: usize = 3;

/// A two to one hash over field elements, separated by a domain tag.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait HashScheme {
    /// Hashes `left` and `right` under the provided domain. Both inputs must be field elements.
    fn hash(&self, left: B256, right: B256, domain: u64) -> Result<B256, PoseidonError>;

    /// Hashes a 32 bytes word, which does not need to fit in the field, by splitting it into its
    /// high and low 128 bits limbs.
    fn hash_word(&self, word: B256) -> Result<B256, PoseidonError> {
        let (high, low) = split_word(&word);
        self.hash(high, low, HASH_DOMAIN_BYTE32)
    }
}

/// The Poseidon permutation with the circom round constants and MDS matrix for a width of three.
pub struct Poseidon {
    params: PoseidonParameters<Fr>,
}

impl fmt::Debug for Poseidon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poseidon")
            .field("width", &self.params.width)
            .field("full_rounds", &self.params.full_rounds)
            .field("partial_rounds", &self.params.partial_rounds)
            .finish_non_exhaustive()
    }
}

impl Poseidon {
    /// Returns a new [`Poseidon`] instance loaded with the circom parameters.
    pub fn new() -> Result<Self, PoseidonError> {
        let params = get_poseidon_parameters::<Fr>(WIDTH as u8)?;
        Ok(Self { params })
    }

    /// Hashes the field elements under the `domain` element and returns the first element of the
    /// permuted state.
    pub fn hash_fr(&self, left: Fr, right: Fr, domain: Fr) -> Fr {
        let mut state = [domain, left, right];
        self.permute(&mut state);
        state[0]
    }

    /// Applies the full permutation to the state: half of the full rounds, the partial rounds
    /// and the remaining full rounds.
    fn permute(&self, state: &mut [Fr; WIDTH]) {
        let half_full_rounds = self.params.full_rounds / 2;
        let partial_rounds_end = half_full_rounds + self.params.partial_rounds;
        let rounds = self.params.full_rounds + self.params.partial_rounds;

        for round in 0..rounds {
            self.add_round_constants(state, round);
            if round < half_full_rounds || round >= partial_rounds_end {
                for element in state.iter_mut() {
                    *element = element.pow([self.params.alpha]);
                }
            } else {
                state[0] = state[0].pow([self.params.alpha]);
            }
            self.mix(state);
        }
    }

    fn add_round_constants(&self, state: &mut [Fr; WIDTH], round: usize) {
        for (i, element) in state.iter_mut().enumerate() {
            *element += self.params.ark[round * self.params.width + i];
        }
    }

    fn mix(&self, state: &mut [Fr; WIDTH]) {
        let mut mixed = [Fr::zero(); WIDTH];
        for (out, row) in mixed.iter_mut().zip(self.params.mds.iter()) {
            *out = row.iter().zip(state.iter()).fold(Fr::zero(), |acc, (m, s)| acc + *m * *s);
        }
        *state = mixed;
    }
}

impl HashScheme for Poseidon {
    fn hash(&self, left: B256, right: B256, domain: u64) -> Result<B256, PoseidonError> {
        let left = fr_from_b256(&left)?;
        let right = fr_from_b256(&right)?;
        Ok(fr_to_b256(self.hash_fr(left, right, Fr::from(domain))))
    }
}

/// Splits the word into its high and low 128 bits limbs, each left padded to 32 bytes.
fn split_word(word: &B256) -> (B256, B256) {
    let mut high = B256::ZERO;
    let mut low = B256::ZERO;
    high.0[16..].copy_from_slice(&word[..16]);
    low.0[16..].copy_from_slice(&word[16..]);
    (high, low)
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::backend::{BackendError, HomomorphicBackend};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Cannot encode {len} values into {slots} slots")]
    TooManyValues { len: usize, slots: usize },

    #[error("Value {value} is not below the plaintext modulus {modulus}")]
    ValueOutOfRange { value: u64, modulus: u64 },

    #[error("Value {value} exceeds the profile maximum {max_value}")]
    ExceedsMaxValue { value: u64, max_value: u64 },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Packs integers into the SIMD slots of a batched plaintext.
///
/// `values[i]` lands in slot `i` and every remaining slot is zero.
pub struct SlotEncoder<'a, B: HomomorphicBackend> {
    backend: &'a B,
}

impl<'a, B: HomomorphicBackend> SlotEncoder<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub fn slot_count(&self) -> usize {
        self.backend.slot_count()
    }

    pub fn encode(&self, values: &[u64]) -> Result<B::Plaintext, EncodingError> {
        let slots = self.slot_count();
        if values.len() > slots {
            return Err(EncodingError::TooManyValues {
                len: values.len(),
                slots,
            });
        }
        let modulus = self.backend.plaintext_modulus();
        if let Some(value) = values.iter().copied().find(|v| *v >= modulus) {
            return Err(EncodingError::ValueOutOfRange { value, modulus });
        }

        let mut padded = vec![0u64; slots];
        padded[..values.len()].copy_from_slice(values);
        Ok(self.backend.encode(&padded)?)
    }

    /// Plaintext carrying `value` in slot 0.
    pub fn encode_single(&self, value: u64) -> Result<B::Plaintext, EncodingError> {
        self.encode(&[value])
    }

    /// Every slot of `plaintext`; callers truncate.
    pub fn decode(&self, plaintext: &B::Plaintext) -> Result<Vec<u64>, EncodingError> {
        Ok(self.backend.decode(plaintext)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bfv::BfvBackend;
    use anonset_fhe_params::ParameterProfile;
    use proptest::prelude::*;
    use std::sync::OnceLock;

    fn backend() -> &'static BfvBackend {
        static BACKEND: OnceLock<BfvBackend> = OnceLock::new();
        BACKEND.get_or_init(|| {
            let profile = ParameterProfile::derive(8, 1000).unwrap();
            BfvBackend::from_profile(&profile).unwrap()
        })
    }

    #[test]
    fn rejects_more_values_than_slots() {
        let encoder = SlotEncoder::new(backend());
        let values = vec![1u64; encoder.slot_count() + 1];
        assert_eq!(
            encoder.encode(&values).err(),
            Some(EncodingError::TooManyValues {
                len: 4097,
                slots: 4096
            })
        );
    }

    #[test]
    fn rejects_values_at_the_modulus() {
        let encoder = SlotEncoder::new(backend());
        assert_eq!(
            encoder.encode_single(65537).err(),
            Some(EncodingError::ValueOutOfRange {
                value: 65537,
                modulus: 65537
            })
        );
        assert!(encoder.encode_single(65536).is_ok());
    }

    #[test]
    fn empty_input_decodes_to_zeros() {
        let encoder = SlotEncoder::new(backend());
        let decoded = encoder.decode(&encoder.encode(&[]).unwrap()).unwrap();
        assert_eq!(decoded, vec![0u64; 4096]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn round_trip_pads_with_zeros(values in prop::collection::vec(0u64..65537, 0..64)) {
            let encoder = SlotEncoder::new(backend());
            let decoded = encoder.decode(&encoder.encode(&values).unwrap()).unwrap();
            prop_assert_eq!(decoded.len(), encoder.slot_count());
            prop_assert_eq!(&decoded[..values.len()], values.as_slice());
            prop_assert!(decoded[values.len()..].iter().all(|v| *v == 0));
        }
    }
}

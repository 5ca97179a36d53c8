// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anonset_fhe::{BackendError, HomomorphicBackend};
use anonset_fhe_params::{ParameterError, ParameterProfile};
use rand::{CryptoRng, RngCore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Ciphertext of the [`MockBackend`]: the slots in the clear plus the key it
/// was produced under and the number of fresh ciphertexts folded into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCiphertext {
    pub key_id: u64,
    pub slots: Vec<u64>,
    pub fresh_count: usize,
}

/// Transparent backend doing slot-wise arithmetic mod t.
///
/// Nothing is hidden, which lets tests inspect every intermediate value and
/// count how many contributions reached an aggregate.
#[derive(Debug, Clone)]
pub struct MockBackend {
    profile: ParameterProfile,
}

impl MockBackend {
    pub fn new(profile: ParameterProfile) -> Self {
        Self { profile }
    }

    fn check_len(&self, slots: &[u64]) -> Result<(), BackendError> {
        if slots.len() != self.slot_count() {
            return Err(BackendError::Scheme(format!(
                "expected {} slots, got {}",
                self.slot_count(),
                slots.len()
            )));
        }
        Ok(())
    }
}

impl HomomorphicBackend for MockBackend {
    type PublicKey = u64;
    type SecretKey = u64;
    type Plaintext = Vec<u64>;
    type Ciphertext = MockCiphertext;

    const NAME: &'static str = "mock";

    fn from_profile(profile: &ParameterProfile) -> Result<Self, ParameterError> {
        Ok(Self::new(profile.clone()))
    }

    fn profile(&self) -> &ParameterProfile {
        &self.profile
    }

    fn generate_keys<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(u64, u64), BackendError> {
        let id = rng.next_u64();
        Ok((id, id))
    }

    fn encode(&self, slots: &[u64]) -> Result<Vec<u64>, BackendError> {
        self.check_len(slots)?;
        let t = self.plaintext_modulus();
        Ok(slots.iter().map(|v| v % t).collect())
    }

    fn decode(&self, plaintext: &Vec<u64>) -> Result<Vec<u64>, BackendError> {
        Ok(plaintext.clone())
    }

    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        public_key: &u64,
        plaintext: &Vec<u64>,
        _rng: &mut R,
    ) -> Result<MockCiphertext, BackendError> {
        self.check_len(plaintext)?;
        Ok(MockCiphertext {
            key_id: *public_key,
            slots: plaintext.clone(),
            fresh_count: 1,
        })
    }

    fn add(
        &self,
        lhs: &MockCiphertext,
        rhs: &MockCiphertext,
    ) -> Result<MockCiphertext, BackendError> {
        if lhs.key_id != rhs.key_id {
            return Err(BackendError::Scheme(
                "ciphertexts were encrypted under different keys".to_string(),
            ));
        }
        let t = self.plaintext_modulus();
        Ok(MockCiphertext {
            key_id: lhs.key_id,
            slots: lhs
                .slots
                .iter()
                .zip(&rhs.slots)
                .map(|(a, b)| ((*a as u128 + *b as u128) % t as u128) as u64)
                .collect(),
            fresh_count: lhs.fresh_count + rhs.fresh_count,
        })
    }

    fn decrypt(
        &self,
        secret_key: &u64,
        ciphertext: &MockCiphertext,
    ) -> Result<Vec<u64>, BackendError> {
        if *secret_key != ciphertext.key_id {
            return Err(BackendError::Scheme("wrong secret key".to_string()));
        }
        Ok(ciphertext.slots.clone())
    }
}

/// Backend whose startup probe always fails.
#[derive(Debug, Clone)]
pub struct UnavailableBackend(MockBackend);

impl HomomorphicBackend for UnavailableBackend {
    type PublicKey = u64;
    type SecretKey = u64;
    type Plaintext = Vec<u64>;
    type Ciphertext = MockCiphertext;

    const NAME: &'static str = "unavailable";

    fn probe() -> Result<(), BackendError> {
        Err(BackendError::DependencyUnavailable {
            reason: "library not linked".to_string(),
            guidance: "install the backend".to_string(),
        })
    }

    fn from_profile(profile: &ParameterProfile) -> Result<Self, ParameterError> {
        Ok(Self(MockBackend::new(profile.clone())))
    }

    fn profile(&self) -> &ParameterProfile {
        self.0.profile()
    }

    fn generate_keys<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(u64, u64), BackendError> {
        self.0.generate_keys(rng)
    }

    fn encode(&self, slots: &[u64]) -> Result<Vec<u64>, BackendError> {
        self.0.encode(slots)
    }

    fn decode(&self, plaintext: &Vec<u64>) -> Result<Vec<u64>, BackendError> {
        self.0.decode(plaintext)
    }

    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        public_key: &u64,
        plaintext: &Vec<u64>,
        rng: &mut R,
    ) -> Result<MockCiphertext, BackendError> {
        self.0.encrypt(public_key, plaintext, rng)
    }

    fn add(
        &self,
        lhs: &MockCiphertext,
        rhs: &MockCiphertext,
    ) -> Result<MockCiphertext, BackendError> {
        self.0.add(lhs, rhs)
    }

    fn decrypt(
        &self,
        secret_key: &u64,
        ciphertext: &MockCiphertext,
    ) -> Result<Vec<u64>, BackendError> {
        self.0.decrypt(secret_key, ciphertext)
    }
}

/// Backend whose first decryption on every instance comes back with slot 0
/// off by one. The harness builds one instance per size, so exactly one trial
/// of each size produces a wrong aggregate whatever the scheduling.
#[derive(Debug, Clone)]
pub struct FaultyBackend {
    inner: MockBackend,
    decryptions: Arc<AtomicUsize>,
}

impl HomomorphicBackend for FaultyBackend {
    type PublicKey = u64;
    type SecretKey = u64;
    type Plaintext = Vec<u64>;
    type Ciphertext = MockCiphertext;

    const NAME: &'static str = "faulty";

    fn from_profile(profile: &ParameterProfile) -> Result<Self, ParameterError> {
        Ok(Self {
            inner: MockBackend::new(profile.clone()),
            decryptions: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn profile(&self) -> &ParameterProfile {
        self.inner.profile()
    }

    fn generate_keys<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(u64, u64), BackendError> {
        self.inner.generate_keys(rng)
    }

    fn encode(&self, slots: &[u64]) -> Result<Vec<u64>, BackendError> {
        self.inner.encode(slots)
    }

    fn decode(&self, plaintext: &Vec<u64>) -> Result<Vec<u64>, BackendError> {
        self.inner.decode(plaintext)
    }

    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        public_key: &u64,
        plaintext: &Vec<u64>,
        rng: &mut R,
    ) -> Result<MockCiphertext, BackendError> {
        self.inner.encrypt(public_key, plaintext, rng)
    }

    fn add(
        &self,
        lhs: &MockCiphertext,
        rhs: &MockCiphertext,
    ) -> Result<MockCiphertext, BackendError> {
        self.inner.add(lhs, rhs)
    }

    fn decrypt(
        &self,
        secret_key: &u64,
        ciphertext: &MockCiphertext,
    ) -> Result<Vec<u64>, BackendError> {
        let mut slots = self.inner.decrypt(secret_key, ciphertext)?;
        if self.decryptions.fetch_add(1, Ordering::SeqCst) == 0 {
            if let Some(first) = slots.first_mut() {
                *first = (*first + 1) % self.plaintext_modulus();
            }
        }
        Ok(slots)
    }
}

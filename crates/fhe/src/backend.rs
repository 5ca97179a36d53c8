// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anonset_fhe_params::{ParameterError, ParameterProfile};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The cryptographic backend cannot be used at all
    #[error("Homomorphic backend unavailable: {reason}. {guidance}")]
    DependencyUnavailable { reason: String, guidance: String },

    /// A scheme operation (keygen, encode, encrypt, add, decrypt) failed
    #[error("Scheme operation failed: {0}")]
    Scheme(String),

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

impl BackendError {
    pub fn scheme(err: impl std::fmt::Display) -> Self {
        BackendError::Scheme(err.to_string())
    }
}

/// The capabilities the aggregation core needs from a lattice cryptography
/// library.
///
/// A value of an implementing type is the explicitly constructed setup
/// context for one [`ParameterProfile`]. It is read-only after construction
/// and may be shared between concurrent trials; key material is not part of
/// it.
pub trait HomomorphicBackend: Sized + Send + Sync {
    type PublicKey;
    type SecretKey;
    type Plaintext;
    type Ciphertext: Clone;

    /// Human readable backend name used in logs.
    const NAME: &'static str;

    /// Startup self-check. Fails with [`BackendError::DependencyUnavailable`]
    /// when the backend cannot complete a round trip.
    fn probe() -> Result<(), BackendError> {
        Ok(())
    }

    /// Build the setup context for a profile.
    fn from_profile(profile: &ParameterProfile) -> Result<Self, ParameterError>;

    fn profile(&self) -> &ParameterProfile;

    fn slot_count(&self) -> usize {
        self.profile().slot_count()
    }

    fn plaintext_modulus(&self) -> u64 {
        self.profile().plaintext_modulus()
    }

    fn generate_keys<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(Self::PublicKey, Self::SecretKey), BackendError>;

    /// Batch-encode exactly [`HomomorphicBackend::slot_count`] slot values.
    fn encode(&self, slots: &[u64]) -> Result<Self::Plaintext, BackendError>;

    fn decode(&self, plaintext: &Self::Plaintext) -> Result<Vec<u64>, BackendError>;

    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        public_key: &Self::PublicKey,
        plaintext: &Self::Plaintext,
        rng: &mut R,
    ) -> Result<Self::Ciphertext, BackendError>;

    /// Slot-wise homomorphic addition. Returns a new ciphertext and leaves
    /// both operands untouched.
    fn add(
        &self,
        lhs: &Self::Ciphertext,
        rhs: &Self::Ciphertext,
    ) -> Result<Self::Ciphertext, BackendError>;

    fn decrypt(
        &self,
        secret_key: &Self::SecretKey,
        ciphertext: &Self::Ciphertext,
    ) -> Result<Self::Plaintext, BackendError>;
}

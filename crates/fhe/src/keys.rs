// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::backend::{BackendError, HomomorphicBackend};
use anonset_fhe_params::ParameterError;
use rand::{CryptoRng, RngCore};

/// A key pair bound to the backend context it was generated under.
///
/// The secret key never leaves this value: decryption happens through
/// [`KeyMaterial::decrypt`] and no accessor hands the key out. Key material
/// is created fresh per trial and dropped with it.
pub struct KeyMaterial<'a, B: HomomorphicBackend> {
    backend: &'a B,
    public_key: B::PublicKey,
    secret_key: B::SecretKey,
}

impl<'a, B: HomomorphicBackend> KeyMaterial<'a, B> {
    pub fn generate<R: RngCore + CryptoRng>(
        backend: &'a B,
        rng: &mut R,
    ) -> Result<Self, ParameterError> {
        let (public_key, secret_key) = backend.generate_keys(rng).map_err(|e| match e {
            BackendError::Parameter(e) => e,
            other => ParameterError::invalid_modulus(other.to_string()),
        })?;
        Ok(Self {
            backend,
            public_key,
            secret_key,
        })
    }

    pub fn backend(&self) -> &'a B {
        self.backend
    }

    pub fn public_key(&self) -> &B::PublicKey {
        &self.public_key
    }

    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        plaintext: &B::Plaintext,
        rng: &mut R,
    ) -> Result<B::Ciphertext, BackendError> {
        self.backend.encrypt(&self.public_key, plaintext, rng)
    }

    pub fn decrypt(&self, ciphertext: &B::Ciphertext) -> Result<B::Plaintext, BackendError> {
        self.backend.decrypt(&self.secret_key, ciphertext)
    }
}

impl<B: HomomorphicBackend> std::fmt::Debug for KeyMaterial<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("backend", &B::NAME)
            .field("secret_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bfv::BfvBackend;
    use anonset_fhe_params::ParameterProfile;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn debug_output_redacts_the_secret() {
        let profile = ParameterProfile::derive(1, 1).unwrap();
        let backend = BfvBackend::from_profile(&profile).unwrap();
        let keys = KeyMaterial::generate(&backend, &mut ChaCha20Rng::seed_from_u64(1)).unwrap();
        let shown = format!("{keys:?}");
        assert!(shown.contains("<redacted>"));
        assert!(shown.contains("bfv"));
    }

    #[test]
    fn separate_key_pairs_do_not_decrypt_each_other() {
        let profile = ParameterProfile::derive(1, 1).unwrap();
        let backend = BfvBackend::from_profile(&profile).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let alice = KeyMaterial::generate(&backend, &mut rng).unwrap();
        let bob = KeyMaterial::generate(&backend, &mut rng).unwrap();

        let mut slots = vec![0u64; backend.slot_count()];
        slots[0] = 1;
        let ct = alice
            .encrypt(&backend.encode(&slots).unwrap(), &mut rng)
            .unwrap();

        let own = backend.decode(&alice.decrypt(&ct).unwrap()).unwrap();
        let other = backend.decode(&bob.decrypt(&ct).unwrap()).unwrap();
        assert_eq!(own, slots);
        assert_ne!(other, slots);
    }
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::backend::{BackendError, HomomorphicBackend};
use anonset_fhe_params::{ParameterError, ParameterProfile};
use fhe::bfv::{
    BfvParameters, BfvParametersBuilder, Ciphertext, Encoding, Plaintext, PublicKey, SecretKey,
};
use fhe_traits::{FheDecoder, FheDecrypter, FheEncoder, FheEncrypter};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;
use tracing::trace;

const PROBE_DEGREE: usize = 1024;
const PROBE_PLAINTEXT_MODULUS: u64 = 65537;
const PROBE_MODULI_SIZES: [usize; 1] = [50];
const GUIDANCE: &str = "check that the fhe crate was built for this target and that its BFV \
                        implementation supports batched encoding";

/// BFV adaptor over the fhe.rs library.
#[derive(Clone)]
pub struct BfvBackend {
    profile: ParameterProfile,
    params: Arc<BfvParameters>,
}

impl std::fmt::Debug for BfvBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BfvBackend")
            .field("degree", &self.profile.degree())
            .field("plaintext_modulus", &self.profile.plaintext_modulus())
            .field("moduli", &self.profile.moduli().len())
            .finish()
    }
}

impl BfvBackend {
    pub fn params(&self) -> &Arc<BfvParameters> {
        &self.params
    }
}

fn build_params(
    degree: usize,
    plaintext_modulus: u64,
    moduli: &[u64],
) -> Result<Arc<BfvParameters>, fhe::Error> {
    BfvParametersBuilder::new()
        .set_degree(degree)
        .set_plaintext_modulus(plaintext_modulus)
        .set_moduli(moduli)
        .build_arc()
}

/// Encrypt, add and decrypt a short vector with throwaway parameters.
fn self_test() -> Result<(), String> {
    let params = BfvParametersBuilder::new()
        .set_degree(PROBE_DEGREE)
        .set_plaintext_modulus(PROBE_PLAINTEXT_MODULUS)
        .set_moduli_sizes(&PROBE_MODULI_SIZES)
        .build_arc()
        .map_err(|e| format!("could not build probe parameters: {e}"))?;

    let mut rng = ChaCha20Rng::seed_from_u64(0);
    let sk = SecretKey::random(&params, &mut rng);
    let pk = PublicKey::new(&sk, &mut rng);

    let input: &[u64] = &[1, 2, 3];
    let pt = Plaintext::try_encode(input, Encoding::simd(), &params)
        .map_err(|e| format!("encoding failed: {e}"))?;
    let ct: Ciphertext = pk
        .try_encrypt(&pt, &mut rng)
        .map_err(|e| format!("encryption failed: {e}"))?;
    let sum = &ct + &ct;
    let decrypted = sk
        .try_decrypt(&sum)
        .map_err(|e| format!("decryption failed: {e}"))?;
    let values = Vec::<u64>::try_decode(&decrypted, Encoding::simd())
        .map_err(|e| format!("decoding failed: {e}"))?;

    if values.get(..3) != Some(&[2u64, 4, 6][..]) {
        return Err(format!(
            "round trip returned {:?} instead of [2, 4, 6]",
            values.iter().take(3).collect::<Vec<_>>()
        ));
    }
    Ok(())
}

impl HomomorphicBackend for BfvBackend {
    type PublicKey = PublicKey;
    type SecretKey = SecretKey;
    type Plaintext = Plaintext;
    type Ciphertext = Ciphertext;

    const NAME: &'static str = "bfv";

    fn probe() -> Result<(), BackendError> {
        self_test().map_err(|reason| BackendError::DependencyUnavailable {
            reason,
            guidance: GUIDANCE.to_string(),
        })
    }

    fn from_profile(profile: &ParameterProfile) -> Result<Self, ParameterError> {
        let params = build_params(
            profile.degree(),
            profile.plaintext_modulus(),
            profile.moduli(),
        )
        .map_err(|e| ParameterError::invalid_modulus(e.to_string()))?;

        trace!(
            degree = profile.degree(),
            plaintext_modulus = profile.plaintext_modulus(),
            "Built BFV parameters"
        );

        Ok(BfvBackend {
            profile: profile.clone(),
            params,
        })
    }

    fn profile(&self) -> &ParameterProfile {
        &self.profile
    }

    fn generate_keys<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(PublicKey, SecretKey), BackendError> {
        let sk = SecretKey::random(&self.params, rng);
        let pk = PublicKey::new(&sk, rng);
        Ok((pk, sk))
    }

    fn encode(&self, slots: &[u64]) -> Result<Plaintext, BackendError> {
        Plaintext::try_encode(slots, Encoding::simd(), &self.params).map_err(BackendError::scheme)
    }

    fn decode(&self, plaintext: &Plaintext) -> Result<Vec<u64>, BackendError> {
        Vec::<u64>::try_decode(plaintext, Encoding::simd()).map_err(BackendError::scheme)
    }

    fn encrypt<R: RngCore + CryptoRng>(
        &self,
        public_key: &PublicKey,
        plaintext: &Plaintext,
        rng: &mut R,
    ) -> Result<Ciphertext, BackendError> {
        public_key
            .try_encrypt(plaintext, rng)
            .map_err(BackendError::scheme)
    }

    fn add(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext, BackendError> {
        Ok(lhs + rhs)
    }

    fn decrypt(
        &self,
        secret_key: &SecretKey,
        ciphertext: &Ciphertext,
    ) -> Result<Plaintext, BackendError> {
        secret_key
            .try_decrypt(ciphertext)
            .map_err(BackendError::scheme)
    }
}

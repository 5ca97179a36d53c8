//! Constants for the parameter ladder
//!
//! This module contains all hardcoded values used when deriving a profile.
//! Centralizing these values makes it easier to maintain and update the ladder.

/// One rung of the degree ladder.
#[derive(Debug, Clone, Copy)]
pub struct LadderRung {
    /// Polynomial degree d, also the number of SIMD slots.
    pub degree: usize,
    /// 128-bit security ciphertext moduli for this degree (all q_i ≡ 1 mod 2d).
    pub moduli: &'static [u64],
}

/// Degree 4096, log2(q) ≈ 103
pub mod rung_4096 {
    pub const DEGREE: usize = 4096;
    pub const MODULI: &[u64] = &[0x3fffe4001, 0x3fffd0001, 0x7ffff6001];
}

/// Degree 8192, log2(q) ≈ 205
pub mod rung_8192 {
    pub const DEGREE: usize = 8192;
    pub const MODULI: &[u64] = &[
        0x1ffffff0001,
        0x1fffffb0001,
        0x1fffff24001,
        0x1ffffed8001,
        0x1ffffed0001,
    ];
}

/// Degree 16384, log2(q) ≈ 411
pub mod rung_16384 {
    pub const DEGREE: usize = 16384;
    pub const MODULI: &[u64] = &[
        0x1ffffff18001,
        0x1fffffee8001,
        0x1fffffe58001,
        0x3ffffff70001,
        0x3ffffff58001,
        0x3ffffff28001,
        0x3fffffe50001,
        0x3fffffe08001,
        0x3fffffce8001,
    ];
}

/// Degree 32768, log2(q) ≈ 827
pub mod rung_32768 {
    pub const DEGREE: usize = 32768;
    pub const MODULI: &[u64] = &[
        0xffffffff00001,
        0xfffffffe40001,
        0xfffffffe20001,
        0xfffffffbe0001,
        0xfffffffa60001,
        0xfffffff820001,
        0xfffffff750001,
        0xfffffff5d0001,
        0xfffffff480001,
        0xfffffff3f0001,
        0xfffffff390001,
        0x7fffffffe0001,
        0x7ffffffdd0001,
        0x7ffffffd20001,
        0x7ffffffd10001,
        0x7ffffffc60001,
    ];
}

/// The ladder, smallest degree first.
pub const LADDER: [LadderRung; 4] = [
    LadderRung {
        degree: rung_4096::DEGREE,
        moduli: rung_4096::MODULI,
    },
    LadderRung {
        degree: rung_8192::DEGREE,
        moduli: rung_8192::MODULI,
    },
    LadderRung {
        degree: rung_16384::DEGREE,
        moduli: rung_16384::MODULI,
    },
    LadderRung {
        degree: rung_32768::DEGREE,
        moduli: rung_32768::MODULI,
    },
];

/// Smallest degree any profile may use.
pub const MIN_DEGREE: usize = rung_4096::DEGREE;

/// Plaintext modulus constants
pub mod plaintext {
    use super::rung_32768;

    /// Every plaintext modulus is ≡ 1 mod 2·d_max, so batching works on every rung.
    pub const CONGRUENCE: u64 = 2 * rung_32768::DEGREE as u64;
    /// 65537 is the smallest prime with that congruence.
    pub const MIN_BITS: usize = 17;
    pub const MAX_BITS: usize = 60;
}

/// Noise analysis bounds, same meaning as in the BFV parameter search.
pub mod noise {
    /// Bound B on the error distribution (CBD with σ≈3.2).
    pub const B: u64 = 20;
    /// Bound B_χ on the ternary secret key distribution.
    pub const B_CHI: u64 = 1;
    /// Bound B_U on the encryption randomness u, drawn from the same CBD as
    /// the errors rather than the ternary key distribution.
    pub const B_U: u64 = 20;
}

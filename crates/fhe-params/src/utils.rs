use num_bigint::BigUint;
use num_traits::{One, Zero};

pub fn product<'a>(xs: impl IntoIterator<Item = &'a u64>) -> BigUint {
    let mut acc = BigUint::one();
    for x in xs {
        acc *= *x;
    }
    acc
}

pub fn log2_big(x: &BigUint) -> f64 {
    if x.is_zero() {
        return f64::NEG_INFINITY;
    }
    let bytes = x.to_bytes_be();

    // top 8 bytes carry all the precision an f64 can hold
    let take = bytes.len().min(8);
    let mut top: u64 = 0;
    for &byte in bytes.iter().take(take) {
        top = (top << 8) | byte as u64;
    }
    let dropped_bits = ((bytes.len() - take) * 8) as f64;
    (top as f64).log2() + dropped_bits
}

/// Number of bits needed to represent `x` (0 needs 0 bits).
pub fn bit_length(x: u64) -> usize {
    (u64::BITS - x.leading_zeros()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log2_big_matches_f64_for_small_values() {
        for x in [1u64, 2, 3, 1000, 65537, u64::MAX >> 3] {
            let got = log2_big(&BigUint::from(x));
            assert!((got - (x as f64).log2()).abs() < 1e-9, "x={x} got={got}");
        }
    }

    #[test]
    fn log2_big_handles_wide_values() {
        let x = BigUint::one() << 300u32;
        assert!((log2_big(&x) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn product_of_moduli() {
        assert_eq!(product(&[3u64, 5, 7]), BigUint::from(105u32));
        assert_eq!(product(&[]), BigUint::one());
    }

    #[test]
    fn bit_length_edges() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(65536), 17);
        assert_eq!(bit_length(u64::MAX), 64);
    }
}

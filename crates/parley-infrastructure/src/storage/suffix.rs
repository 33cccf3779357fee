//! Short random tokens used to disambiguate record names.

use rand::RngCore;

/// Number of characters in a suffix (32 random bits, lowercase hex).
pub const SUFFIX_LEN: usize = 8;

/// Returns a fresh fixed-length hex token.
///
/// Two records picking the same name collide with probability 2^-32 per
/// attempt.
pub fn random_suffix() -> String {
    format!("{:08x}", rand::thread_rng().next_u32())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_shape() {
        for _ in 0..64 {
            let suffix = random_suffix();
            assert_eq!(suffix.len(), SUFFIX_LEN);
            assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
}

//! Primality helpers for the bucket-array capacity.
//!
//! Quadratic probing over `j² mod capacity` needs a prime modulus to
//! spread probes well, so every capacity the table ever adopts comes out
//! of [`next_prime`].

/// Trial division by odd factors up to √n.
pub(crate) fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }
    let mut factor = 3;
    while factor * factor <= n {
        if n % factor == 0 {
            return false;
        }
        factor += 2;
    }
    true
}

/// Smallest odd prime reached by stepping even inputs to the next odd
/// number and then scanning odd candidates upward. Note the scan never
/// yields 2: `next_prime(2)` is 3, so table capacities are always odd.
pub(crate) fn next_prime(n: usize) -> usize {
    let mut candidate = if n % 2 == 0 { n + 1 } else { n };
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_small_primes() {
        let primes = [2, 3, 5, 7, 11, 13, 23, 31, 53, 101, 223, 449];
        for p in primes {
            assert!(is_prime(p), "{p} is prime");
        }
        for n in [0, 1, 4, 9, 15, 21, 25, 49, 121, 221] {
            assert!(!is_prime(n), "{n} is composite");
        }
    }

    #[test]
    fn next_prime_scans_odd_candidates() {
        assert_eq!(next_prime(0), 3);
        assert_eq!(next_prime(1), 3);
        // Even inputs step to odd before scanning, so 2 skips itself.
        assert_eq!(next_prime(2), 3);
        assert_eq!(next_prime(11), 11);
        assert_eq!(next_prime(20), 23);
        assert_eq!(next_prime(30), 31);
        assert_eq!(next_prime(100), 101);
        assert_eq!(next_prime(106), 107);
        assert_eq!(next_prime(214), 223);
    }
}

//! Integer helpers for period arithmetic.

/// Greatest common divisor (Euclid). `gcd(0, 0)` is 0.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Least common multiple of two values. Returns `Some(0)` if either is 0 and
/// `None` if the result does not fit in a `u64`.
pub fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

/// Least common multiple of all values, i.e. the hyper-cycle of a set of periods.
///
/// An empty slice yields 1, matching the neutral element of `lcm`.
pub fn lcm_all(values: &[u64]) -> Option<u64> {
    values.iter().try_fold(1, |acc, &v| lcm(acc, v))
}

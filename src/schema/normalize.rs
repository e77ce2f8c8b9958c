//! Field normalizers applied before range checks.

/// Round a probability to two decimal places.
///
/// Rounding happens before the `[0.0, 1.0]` check, so `1.004` becomes `1.0`
/// and is accepted while `1.006` becomes `1.01` and is rejected.
pub fn round_probability(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whether a rounded probability lies in `[0.0, 1.0]`.
pub fn is_probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Strip leading and trailing whitespace.
pub fn strip(text: &str) -> String {
    text.trim().to_string()
}

//! CPF (Brazilian individual taxpayer number) checksum validation.
//!
//! # Responsibility
//! - Decide whether a raw identity-number string is structurally valid and
//!   carries the two modulo-11 check digits.
//!
//! # Invariants
//! - Non-digit characters are ignored, so `111.444.777-35` and
//!   `11144477735` are equivalent.
//! - Only ASCII digits count; any other character, including non-ASCII
//!   numerals, is stripped.
//! - Repeated-digit strings are judged by the checksum alone.

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of digits in a CPF, check digits included.
pub const CPF_LEN: usize = 11;
const PAYLOAD_LEN: usize = 9;

static NON_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9]").expect("valid non-digit regex"));

/// Returns `raw` with every non-digit character removed.
pub fn digits_only(raw: &str) -> String {
    NON_DIGIT_RE.replace_all(raw, "").into_owned()
}

/// Computes both check digits for a 9-digit payload.
///
/// Each element of `payload` must be in `0..=9`.
pub fn check_digits(payload: &[u8; PAYLOAD_LEN]) -> (u8, u8) {
    let first = check_digit(payload, 10);

    let mut extended = [0u8; PAYLOAD_LEN + 1];
    extended[..PAYLOAD_LEN].copy_from_slice(payload);
    extended[PAYLOAD_LEN] = first;
    let second = check_digit(&extended, 11);

    (first, second)
}

/// Returns whether `raw` is a checksum-valid CPF.
pub fn is_valid(raw: &str) -> bool {
    let digits: Vec<u8> = digits_only(raw)
        .bytes()
        .map(|byte| byte - b'0')
        .collect();
    if digits.len() != CPF_LEN {
        return false;
    }

    let mut payload = [0u8; PAYLOAD_LEN];
    payload.copy_from_slice(&digits[..PAYLOAD_LEN]);
    let (first, second) = check_digits(&payload);

    digits[PAYLOAD_LEN] == first && digits[PAYLOAD_LEN + 1] == second
}

// Weights run from `top_weight` down to 2 across `digits`.
fn check_digit(digits: &[u8], top_weight: u32) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(index, digit)| u32::from(*digit) * (top_weight - index as u32))
        .sum();
    ((sum * 10 % 11) % 10) as u8
}

/// Per-position weights applied to the first twelve digits of a CNP.
const CHECKSUM_WEIGHTS: &[u8; 12] = b"279146358279";

const CNP_LENGTH: usize = 13;

/// Returns `true` when `id` is a 13-digit CNP whose last digit matches the weighted checksum.
///
/// Any other shape (wrong length, non-ASCII-digit characters) is simply invalid.
pub fn validate(id: &str) -> bool {
    let bytes = id.as_bytes();
    if bytes.len() != CNP_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    match control_digit(&bytes[..CNP_LENGTH - 1]) {
        Some(expected) => bytes[CNP_LENGTH - 1] - b'0' == expected,
        None => false,
    }
}

/// Expected trailing digit for a 12-digit prefix; a checksum of 10 maps to 1.
///
/// Returns `None` when the prefix is not exactly twelve ASCII digits.
pub fn control_digit(prefix: &[u8]) -> Option<u8> {
    if prefix.len() != CHECKSUM_WEIGHTS.len() || !prefix.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let sum: u32 = prefix
        .iter()
        .zip(CHECKSUM_WEIGHTS.iter())
        .map(|(digit, weight)| u32::from(digit - b'0') * u32::from(weight - b'0'))
        .sum();

    match (sum % 11) as u8 {
        10 => Some(1),
        control => Some(control),
    }
}

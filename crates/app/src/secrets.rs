//! Random secrets, hex encoding and SHA-256 verifiers.
//!
//! Both anti-forgery nonces and administrator API tokens hand a random secret to the
//! client once and keep only a SHA-256 digest of it.

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Number of random bytes in a secret.
pub const SECRET_BYTES: usize = 32;

const SECRET_HEX_CHARS: usize = SECRET_BYTES * 2;

/// Random secret material, zeroised on drop.
#[derive(Clone)]
pub struct Secret {
    bytes: [u8; SECRET_BYTES],
}

impl Secret {
    /// Generate a secret from the operating system's RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; SECRET_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self { bytes }
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    /// Parse the hex form produced by [`Secret::to_hex`].
    #[must_use]
    pub fn from_hex(encoded: &str) -> Option<Self> {
        decode_hex(encoded).map(Self::from_bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SECRET_BYTES] {
        &self.bytes
    }

    /// Lowercase hex encoding.
    #[must_use]
    pub fn to_hex(&self) -> String {
        encode_hex(&self.bytes)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(**redacted**)")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Hex-encoded SHA-256 digest of `input`.
#[must_use]
pub fn sha256_hex(input: &[u8]) -> String {
    encode_hex(&Sha256::digest(input))
}

/// Compare two verifiers without short-circuiting on the first differing byte.
#[must_use]
pub fn verifiers_match(left: &str, right: &str) -> bool {
    let (left, right) = (left.as_bytes(), right.as_bytes());

    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        encoded.push(char::from(HEX[usize::from(byte >> 4)]));
        encoded.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }

    encoded
}

fn decode_hex(encoded: &str) -> Option<[u8; SECRET_BYTES]> {
    if encoded.len() != SECRET_HEX_CHARS {
        return None;
    }

    let mut bytes = [0_u8; SECRET_BYTES];

    for (byte, pair) in bytes.iter_mut().zip(encoded.as_bytes().chunks_exact(2)) {
        let [hi, lo] = pair else {
            return None;
        };

        *byte = (decode_hex_nibble(*hi)? << 4) | decode_hex_nibble(*lo)?;
    }

    Some(bytes)
}

fn decode_hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let secret = Secret::from_bytes([0xAB; SECRET_BYTES]);
        let decoded = Secret::from_hex(&secret.to_hex());

        assert_eq!(
            decoded.as_ref().map(Secret::as_bytes),
            Some(secret.as_bytes())
        );
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(Secret::from_hex("abc").is_none());
        assert!(Secret::from_hex(&"zz".repeat(SECRET_BYTES)).is_none());
    }

    #[test]
    fn generated_secrets_differ() {
        assert_ne!(Secret::generate().to_hex(), Secret::generate().to_hex());
    }

    #[test]
    fn sha256_hex_matches_known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn verifiers_match_compares_whole_value() {
        assert!(verifiers_match("abcd", "abcd"));
        assert!(!verifiers_match("abcd", "abce"));
        assert!(!verifiers_match("abcd", "abc"));
    }

    #[test]
    fn debug_output_is_redacted() {
        let secret = Secret::from_bytes([0x01; SECRET_BYTES]);

        assert_eq!(format!("{secret:?}"), "Secret(**redacted**)");
    }
}

//! Commitment preimages for `register`

use alloy_primitives::{keccak256, B256};
use rand::Rng;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Number of hex digits in a generated preimage
pub const PREIMAGE_LEN: usize = 64;

/// Draw a fresh preimage: 64 lowercase hex digits, each uniform and independent
pub fn random_preimage() -> String {
    let mut rng = rand::thread_rng();
    (0..PREIMAGE_LEN)
        .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
        .collect()
}

/// Hash the user-entered preimage the way the contract expects the commitment.
///
/// The value is prefixed with `0x`; if that forms valid hex the decoded bytes are
/// hashed, otherwise the UTF-8 text itself is.
pub fn commitment_hash(preimage: &str) -> B256 {
    let prefixed = format!("0x{}", preimage.trim());
    match hex::decode(&prefixed[2..]) {
        Ok(bytes) => keccak256(bytes),
        Err(_) => keccak256(prefixed.as_bytes()),
    }
}

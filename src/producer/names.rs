//! Canonical producer account names.
//!
//! The first 26 producers are `defproducera` .. `defproducerz`. Later
//! ordinals switch to `defpr` followed by a seven letter base-26 code of
//! `ordinal - 25`, so `defpraaaaaab` follows `defproducerz`. Shared
//! producers use the `shr` prefix instead of `def`.

/// Name of the system producer owned by the bios node.
pub const SYSTEM_PRODUCER: &str = "eosio";

const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";
const CODE_WIDTH: usize = 7;

/// Returns the account name of producer `ordinal`.
pub fn producer_name(ordinal: u32, shared: bool) -> String {
    let stem = if shared { "shr" } else { "def" };
    if ordinal < 26 {
        return format!("{}producer{}", stem, ALPHABET[ordinal as usize] as char);
    }
    format!("{}pr{}", stem, base26(ordinal - 25))
}

/// True for names produced by `producer_name(_, true)`.
pub fn is_shared_producer(name: &str) -> bool {
    name.starts_with("shrpr")
}

// Any u32 offset fits in seven digits (26^7 > u32::MAX) and stays below
// the "oducer" prefix, so long names never alias short ones.
fn base26(mut value: u32) -> String {
    let mut digits = [ALPHABET[0]; CODE_WIDTH];
    for slot in digits.iter_mut().rev() {
        *slot = ALPHABET[(value % 26) as usize];
        value /= 26;
    }
    digits.iter().map(|&b| b as char).collect()
}

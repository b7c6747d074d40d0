//! Short record keys.
//!
//! Record ids use an 8-character key drawn from a 32-character alphabet with
//! the lookalikes (0/O, 1/I/L) removed. Changing the alphabet or length on a
//! populated database would be... problematic.

use uuid::Uuid;

/// Unambiguous key alphabet, 32 characters.
pub const ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Default key length. ~1 trillion combinations with this alphabet.
pub const DEFAULT_LEN: usize = 8;

/// Generate a random short key of the default length.
pub fn short_id() -> String {
    short_id_len(DEFAULT_LEN)
}

/// Generate a random short key of `len` characters (max 16).
pub fn short_id_len(len: usize) -> String {
    let bytes = *Uuid::new_v4().as_bytes();
    bytes
        .iter()
        .take(len.min(bytes.len()))
        .map(|b| ALPHABET[(b & 0x1f) as usize] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_have_default_length() {
        assert_eq!(short_id().len(), DEFAULT_LEN);
        assert_eq!(short_id_len(12).len(), 12);
    }

    #[test]
    fn ids_use_only_the_alphabet() {
        for _ in 0..100 {
            let id = short_id();
            assert!(id.bytes().all(|b| ALPHABET.contains(&b)), "bad id: {}", id);
        }
    }

    #[test]
    fn ids_are_unique_enough() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(short_id()));
        }
    }
}

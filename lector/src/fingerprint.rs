//! Content fingerprinting for the result cache.
//!
//! The fingerprint is a SHA-256 digest over the full byte stream of an
//! uploaded image, fed to the hasher in fixed-size blocks so memory use
//! stays bounded for arbitrarily large files. Two byte-identical uploads
//! fingerprint identically regardless of filename or upload time.

use std::io::Read;

use sha2::{Digest, Sha256};

const BLOCK_SIZE: usize = 64 * 1024;

fn to_hex(digest: &[u8]) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Fingerprint an in-memory byte buffer.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    for block in bytes.chunks(BLOCK_SIZE) {
        hasher.update(block);
    }
    to_hex(&hasher.finalize())
}

/// Fingerprint a reader without buffering the whole stream.
pub fn fingerprint_reader<R: Read>(reader: &mut R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut block = [0u8; BLOCK_SIZE];
    loop {
        let n = reader.read(&mut block)?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }
    Ok(to_hex(&hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_fingerprint_identically() {
        let a = fingerprint_bytes(b"scanned page contents");
        let b = fingerprint_bytes(b"scanned page contents");
        assert_eq!(a, b);
    }

    #[test]
    fn different_bytes_fingerprint_differently() {
        let a = fingerprint_bytes(b"page one");
        let b = fingerprint_bytes(b"page two");
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_is_lowercase_hex_sha256() {
        let fp = fingerprint_bytes(b"");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        // SHA-256 of the empty string is a fixed vector.
        assert_eq!(
            fp,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn reader_matches_bytes_across_block_boundary() {
        let data = vec![0xa7u8; BLOCK_SIZE * 2 + 17];
        let from_bytes = fingerprint_bytes(&data);
        let from_reader = fingerprint_reader(&mut std::io::Cursor::new(&data)).unwrap();
        assert_eq!(from_bytes, from_reader);
    }
}

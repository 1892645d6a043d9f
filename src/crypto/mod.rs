//! Cryptographic utilities: content hashing and token derivation.

mod hash;

pub use hash::{content_hash, sha256_hex, verification_token, verification_url};

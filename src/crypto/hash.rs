//! Deterministic hashing for product provenance.
//!
//! Two independent derivations, both SHA-256 over a delimited concatenation
//! of identifying fields:
//!
//! - The **content hash** commits to a product's identifying fields
//!   (`name|batch|date`) and is the fact attested on-chain. Lowercase hex
//!   with a `0x` prefix.
//! - The **verification token** (`record_id::batch_id`) makes a scan link
//!   unguessable without knowing both identifiers. It is derived on demand
//!   and never stored; there is no corresponding validation step in this
//!   design, so the token is a one-way artifact.

use sha2::{Digest, Sha256};

/// Field delimiter for the content hash preimage.
const CONTENT_DELIMITER: &str = "|";

/// Field delimiter for the verification token preimage.
const TOKEN_DELIMITER: &str = "::";

/// SHA-256 of raw bytes as a lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the content hash for a product's identifying fields.
///
/// Preimage: `{product_name}|{batch_id}|{mfg_date}`, fixed field order.
/// Identical inputs always yield an identical hash; any field change yields
/// a different hash under the standard collision-resistance assumption.
pub fn content_hash(product_name: &str, batch_id: &str, mfg_date: &str) -> String {
    let preimage = format!(
        "{product_name}{CONTENT_DELIMITER}{batch_id}{CONTENT_DELIMITER}{mfg_date}"
    );
    format!("0x{}", sha256_hex(preimage.as_bytes()))
}

/// Derive the verification token for a registered record.
///
/// Preimage: `{record_id}::{batch_id}`. Unlike the content hash this carries
/// no `0x` prefix; it is embedded in URLs, not attested on-chain.
pub fn verification_token(record_id: &str, batch_id: &str) -> String {
    let preimage = format!("{record_id}{TOKEN_DELIMITER}{batch_id}");
    sha256_hex(preimage.as_bytes())
}

/// Build the scannable verification link for a record.
pub fn verification_url(base: &str, record_id: &str, token: &str) -> String {
    format!(
        "{}/verify?productId={}&token={}",
        base.trim_end_matches('/'),
        percent_encode(record_id),
        token
    )
}

/// Minimal percent-encoding for query-string values. Record identifiers are
/// store-generated and usually URL-safe already; this covers the rest.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

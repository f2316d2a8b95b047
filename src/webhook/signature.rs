use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::{BridgeError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the delivery signature
pub const SIGNATURE_HEADER: &str = "x-enode-signature";

const PREFIX: &str = "sha1=";

fn keyed_mac(secret: &str, body: &[u8]) -> Result<HmacSha1> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| BridgeError::signature(format!("invalid key: {}", e)))?;
    mac.update(body);
    Ok(mac)
}

const DIGEST_HEX_LEN: usize = 40;

fn is_lowercase_hex(digest: &str) -> bool {
    digest.len() == DIGEST_HEX_LEN
        && digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// `sha1=` followed by the lowercase hex HMAC-SHA1 of `body` keyed by `secret`
pub fn compute_signature(secret: &str, body: &[u8]) -> Result<String> {
    let tag = keyed_mac(secret, body)?.finalize().into_bytes();
    Ok(format!("{}{}", PREFIX, hex::encode(tag)))
}

/// Check a declared `sha1=<hex>` signature against the body.
/// The tag comparison is constant time.
pub fn verify_signature(secret: &str, body: &[u8], declared: &str) -> Result<()> {
    let digest = declared
        .strip_prefix(PREFIX)
        .ok_or_else(|| BridgeError::signature("unsupported signature scheme"))?;
    if !is_lowercase_hex(digest) {
        return Err(BridgeError::signature(
            "signature must be lowercase hex of the full digest",
        ));
    }
    let tag = hex::decode(digest)
        .map_err(|_| BridgeError::signature("signature is not valid hex"))?;
    keyed_mac(secret, body)?
        .verify_slice(&tag)
        .map_err(|_| BridgeError::signature("signature mismatch"))
}

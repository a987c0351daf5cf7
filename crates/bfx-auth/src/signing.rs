//! HMAC-SHA384 signing primitive

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha384;

use crate::error::{AuthError, AuthResult};

type HmacSha384 = Hmac<Sha384>;

/// HMAC-SHA384 of `message` keyed by `secret`, lowercase hex encoded
pub fn hmac_sha384_hex(secret: &[u8], message: &[u8]) -> AuthResult<String> {
    let mut mac =
        HmacSha384::new_from_slice(secret).map_err(|e| AuthError::InvalidKey(e.to_string()))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Encode a serialized v1 body as the `X-BFX-PAYLOAD` value
pub fn encode_v1_payload(body_json: &str) -> String {
    BASE64.encode(body_json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_auth_fixture() {
        // independently computed with openssl dgst -sha384 -hmac
        let sig = hmac_sha384_hex(b"secret", b"AUTH1600000000000000").unwrap();
        assert_eq!(
            sig,
            "052bea43f4dc0ffd1b1f233d08be9333abc76606d831b1b1a103e2f7366f4075fea035a358af1ec145a86adbb5b2ac42"
        );
    }

    #[test]
    fn test_signature_is_lower_hex() {
        let sig = hmac_sha384_hex(b"k", b"m").unwrap();
        assert_eq!(sig.len(), 96);
        assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_empty_key_accepted() {
        assert!(hmac_sha384_hex(b"", b"message").is_ok());
    }

    #[test]
    fn test_v1_payload_encoding() {
        let payload = encode_v1_payload(r#"{"nonce":"1600000000000000","request":"/v1/balances"}"#);
        assert_eq!(
            payload,
            "eyJub25jZSI6IjE2MDAwMDAwMDAwMDAwMDAiLCJyZXF1ZXN0IjoiL3YxL2JhbGFuY2VzIn0="
        );
    }
}

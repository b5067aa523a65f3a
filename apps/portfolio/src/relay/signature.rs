use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "sanity-webhook-signature";
const SIGNATURE_PREFIX: &str = "sha256=";

/// `sha256=<hex hmac>` of `body` under `secret`.
pub fn sign(secret: &[u8], body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(body);
    Some(format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Checks `provided` against the signature of `body`.
///
/// A missing secret or missing header never verifies.
pub fn verify(secret: Option<&str>, body: &[u8], provided: Option<&str>) -> bool {
    let (Some(secret), Some(provided)) = (secret, provided) else {
        return false;
    };
    let Some(expected) = sign(secret.as_bytes(), body) else {
        return false;
    };
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();
    if expected.len() != provided.len() {
        return false;
    }
    expected.ct_eq(provided).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_matches_known_vector() {
        // RFC 4231 test case 2
        let sig = sign(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            sig,
            "sha256=5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_accepts_correct_signature() {
        let body = br#"{"x":1}"#;
        let sig = sign(b"shh", body).unwrap();
        assert!(verify(Some("shh"), body, Some(&sig)));
    }

    #[test]
    fn test_verify_rejects_wrong_signature() {
        let body = br#"{"x":1}"#;
        let wrong = format!("sha256={}", "0".repeat(64));
        assert!(!verify(Some("shh"), body, Some(&wrong)));
    }

    #[test]
    fn test_verify_rejects_tampered_body() {
        let sig = sign(b"shh", br#"{"x":1}"#).unwrap();
        assert!(!verify(Some("shh"), br#"{"x":2}"#, Some(&sig)));
    }

    #[test]
    fn test_verify_rejects_missing_secret_or_header() {
        let body = b"{}";
        let sig = sign(b"shh", body).unwrap();
        assert!(!verify(None, body, Some(&sig)));
        assert!(!verify(Some("shh"), body, None));
    }

    #[test]
    fn test_verify_requires_prefix() {
        let body = b"{}";
        let sig = sign(b"shh", body).unwrap();
        let bare = sig.trim_start_matches(SIGNATURE_PREFIX);
        assert!(!verify(Some("shh"), body, Some(bare)));
    }
}

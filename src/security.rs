//! Credential primitives: Argon2 password hashing and HMAC-SHA256 signing of
//! client-held values (the session cookie).

use anyhow::{anyhow, Result};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use base64::Engine;
use hmac::{Hmac, Mac};
use password_hash::{PasswordHash, SaltString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const B64: base64::engine::GeneralPurpose = base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Hash a password into an Argon2 PHC string with a fresh 16-byte salt.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2.hash_password(password.as_bytes(), &salt).map_err(|e| anyhow!(e.to_string()))?.to_string();
    Ok(phc)
}

/// Recompute against a stored PHC string. Unparsable hashes never verify.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    } else { false }
}

/// Server secret used to sign and verify cookie payloads.
#[derive(Clone)]
pub struct SigningKey {
    secret: Vec<u8>,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").field("len", &self.secret.len()).finish()
    }
}

impl SigningKey {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self { secret: secret.as_ref().to_vec() }
    }

    /// 32 random bytes; values signed with it do not survive a restart.
    pub fn random() -> Result<Self> {
        let mut buf = [0u8; 32];
        getrandom::getrandom(&mut buf).map_err(|e| anyhow!(e.to_string()))?;
        Ok(Self { secret: buf.to_vec() })
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| anyhow!(e.to_string()))
    }

    /// `base64url(payload) "." base64url(mac)`
    pub fn sign(&self, payload: &[u8]) -> Result<String> {
        let body = B64.encode(payload);
        let mut mac = self.mac()?;
        mac.update(body.as_bytes());
        let tag = B64.encode(mac.finalize().into_bytes());
        Ok(format!("{}.{}", body, tag))
    }

    /// Returns the payload bytes when the tag matches, `None` otherwise.
    pub fn verify(&self, signed: &str) -> Option<Vec<u8>> {
        let (body, tag) = signed.rsplit_once('.')?;
        let tag = B64.decode(tag).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(body.as_bytes());
        mac.verify_slice(&tag).ok()?;
        B64.decode(body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let phc = hash_password("hunter2").unwrap();
        assert!(phc.starts_with("$argon2"));
        assert!(verify_password(&phc, "hunter2"));
        assert!(!verify_password(&phc, "hunter3"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("pw").unwrap();
        let b = hash_password("pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "pw"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn signed_payload_verifies_with_same_key_only() {
        let key = SigningKey::new("s3cret");
        let signed = key.sign(br#"{"user":"a@b.c"}"#).unwrap();
        assert_eq!(key.verify(&signed).unwrap(), br#"{"user":"a@b.c"}"#.to_vec());

        let other = SigningKey::new("different");
        assert!(other.verify(&signed).is_none());
    }

    #[test]
    fn tampered_body_is_rejected() {
        let key = SigningKey::new("s3cret");
        let signed = key.sign(b"payload").unwrap();
        let (_, tag) = signed.rsplit_once('.').unwrap();
        let forged = format!("{}.{}", B64.encode(b"PAYLOAD"), tag);
        assert!(key.verify(&forged).is_none());
        assert!(key.verify("no-dot-here").is_none());
    }
}

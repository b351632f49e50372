use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::env;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

pub const MAGIC_LINK_TTL_MINUTES: i64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum SignedLinkError {
    #[error("Signature mismatch")]
    InvalidSignature,
    #[error("Link has expired")]
    Expired,
}

/// Issues and validates signed magic-link URLs. Nothing is persisted: the
/// URL carries the user id, an expiry timestamp and an HMAC-SHA256 over
/// both, so validation is a pure computation against the signing key.
#[derive(Clone)]
pub struct LinkSigner {
    key: Vec<u8>,
    base_url: String,
}

impl LinkSigner {
    pub fn new(key: impl Into<Vec<u8>>, base_url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let base_url = env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

        let key = match env::var("APP_SECRET") {
            Ok(secret) if !secret.is_empty() => {
                crate::config::session::decode_secret_bytes(&secret)
            }
            _ => {
                warn!("APP_SECRET not set; generating ephemeral link-signing key (development only)");
                use rand::Rng;
                let mut rng = rand::thread_rng();
                (0..64).map(|_| rng.gen()).collect()
            }
        };

        Self::new(key, base_url)
    }

    /// Expiry timestamp for a link issued now.
    pub fn expiry_timestamp() -> i64 {
        (Utc::now() + Duration::minutes(MAGIC_LINK_TTL_MINUTES)).timestamp()
    }

    pub fn magic_link_url(&self, user_id: i64, expires_at: i64) -> String {
        let signature = self.sign(user_id, expires_at);
        format!(
            "{}/auth/magic-link/{}?expires={}&signature={}",
            self.base_url, user_id, expires_at, signature
        )
    }

    pub fn sign(&self, user_id: i64, expires_at: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC can take a key of any size");
        mac.update(payload(user_id, expires_at).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// The signature is checked before the expiry so a tampered link never
    /// learns whether its timestamp was acceptable.
    pub fn verify(
        &self,
        user_id: i64,
        expires_at: i64,
        signature: &str,
    ) -> Result<(), SignedLinkError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC can take a key of any size");
        mac.update(payload(user_id, expires_at).as_bytes());

        let provided = hex::decode(signature).map_err(|_| SignedLinkError::InvalidSignature)?;
        mac.verify_slice(&provided)
            .map_err(|_| SignedLinkError::InvalidSignature)?;

        if expires_at < Utc::now().timestamp() {
            return Err(SignedLinkError::Expired);
        }

        Ok(())
    }
}

fn payload(user_id: i64, expires_at: i64) -> String {
    format!("{user_id}:{expires_at}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> LinkSigner {
        LinkSigner::new(*b"0123456789abcdef0123456789abcdef", "http://localhost:8080")
    }

    #[test]
    fn valid_link_verifies() {
        let signer = signer();
        let expires = LinkSigner::expiry_timestamp();
        let signature = signer.sign(42, expires);
        assert!(signer.verify(42, expires, &signature).is_ok());
    }

    #[test]
    fn altered_user_id_is_rejected() {
        let signer = signer();
        let expires = LinkSigner::expiry_timestamp();
        let signature = signer.sign(42, expires);
        assert!(matches!(
            signer.verify(43, expires, &signature),
            Err(SignedLinkError::InvalidSignature)
        ));
    }

    #[test]
    fn altered_expiry_is_rejected() {
        let signer = signer();
        let expires = LinkSigner::expiry_timestamp();
        let signature = signer.sign(42, expires);
        assert!(matches!(
            signer.verify(42, expires + 60, &signature),
            Err(SignedLinkError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_signature_is_rejected() {
        let signer = signer();
        let expires = LinkSigner::expiry_timestamp();
        assert!(matches!(
            signer.verify(42, expires, "not-hex"),
            Err(SignedLinkError::InvalidSignature)
        ));
        assert!(matches!(
            signer.verify(42, expires, "deadbeef"),
            Err(SignedLinkError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_link_is_rejected() {
        let signer = signer();
        let expires = Utc::now().timestamp() - 1;
        let signature = signer.sign(42, expires);
        assert!(matches!(
            signer.verify(42, expires, &signature),
            Err(SignedLinkError::Expired)
        ));
    }

    #[test]
    fn url_embeds_expiry_and_signature() {
        let signer = signer();
        let expires = 1_900_000_000;
        let url = signer.magic_link_url(7, expires);
        assert!(url.starts_with("http://localhost:8080/auth/magic-link/7?expires=1900000000&signature="));
        let signature = url.rsplit('=').next().unwrap();
        assert!(signer.verify(7, expires, signature).is_ok());
    }

    #[test]
    fn different_keys_do_not_cross_verify() {
        let a = LinkSigner::new(*b"0123456789abcdef0123456789abcdef", "http://a");
        let b = LinkSigner::new(*b"fedcba9876543210fedcba9876543210", "http://b");
        let expires = LinkSigner::expiry_timestamp();
        let signature = a.sign(1, expires);
        assert!(b.verify(1, expires, &signature).is_err());
    }
}

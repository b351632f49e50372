use std::env;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha512};
use time::Duration;
use tower_sessions::{
    cookie::{Key, SameSite},
    service::SignedCookie,
    Expiry, SessionManagerLayer,
};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::warn;

/// Signed session layer as produced by [`SessionConfig::create_layer`].
pub type SessionLayer = SessionManagerLayer<SqliteStore, SignedCookie>;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub expiry: Duration,
    pub name: String,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        if is_production() {
            SessionConfig {
                secure: true,
                http_only: true,
                same_site: SameSite::Strict,
                expiry: Duration::hours(2),
                name: "__Host-staffdesk".to_string(),
            }
        } else {
            SessionConfig {
                secure: false,
                http_only: true,
                same_site: SameSite::Lax,
                expiry: Duration::days(7),
                name: "staffdesk_session".to_string(),
            }
        }
    }

    pub fn create_layer(&self, store: SqliteStore) -> SessionLayer {
        SessionManagerLayer::new(store)
            .with_secure(self.secure)
            .with_http_only(self.http_only)
            .with_same_site(self.same_site)
            .with_name(self.name.clone())
            .with_expiry(Expiry::OnInactivity(self.expiry))
            .with_signed(load_session_key())
    }
}

/// Fail fast on misconfigured production deployments instead of serving
/// with weak cookies or default secrets.
pub fn validate_production_config() {
    if !is_production() {
        return;
    }

    for var in ["SESSION_SECRET", "APP_SECRET"] {
        let secret = env::var(var)
            .unwrap_or_else(|_| panic!("FATAL: {var} must be set in production"));

        if decode_secret_bytes(&secret).len() < 32 {
            panic!("FATAL: {var} must be at least 32 bytes in production");
        }

        let lowered = secret.to_ascii_lowercase();
        if lowered.contains("example") || lowered.contains("changeme") {
            panic!("FATAL: {var} appears to be a placeholder. Generate a real secret!");
        }
    }
}

pub fn is_production() -> bool {
    env::var("ENVIRONMENT")
        .map(|v| v == "production")
        .unwrap_or(false)
}

fn load_session_key() -> Key {
    match env::var("SESSION_SECRET") {
        Ok(secret) if !secret.is_empty() => {
            let bytes = decode_secret_bytes(&secret);
            if bytes.len() >= 64 {
                Key::from(&bytes[..64])
            } else {
                // Stretch short secrets to the 64 bytes Key requires.
                let digest = Sha512::digest(&bytes);
                Key::from(digest.as_slice())
            }
        }
        _ => {
            warn!("SESSION_SECRET not set; generating ephemeral key (development only)");
            Key::generate()
        }
    }
}

/// Secrets may be provided base64-encoded or as raw bytes.
pub(crate) fn decode_secret_bytes(secret: &str) -> Vec<u8> {
    STANDARD
        .decode(secret.as_bytes())
        .unwrap_or_else(|_| secret.as_bytes().to_vec())
}

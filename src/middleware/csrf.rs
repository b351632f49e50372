use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, warn};

pub const CSRF_TOKEN_KEY: &str = "csrf_token";

const TOKEN_MAX_AGE_SECONDS: i64 = 86400;

/// Session-stored CSRF token. Mutating form posts must echo the current
/// value back in a `csrf_token` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrfToken {
    pub value: String,
    pub created_at: i64,
}

impl CsrfToken {
    pub fn new() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
        Self {
            value: hex::encode(bytes),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() - self.created_at > TOKEN_MAX_AGE_SECONDS
    }
}

impl Default for CsrfToken {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn generate_csrf_token(
    session: &Session,
) -> Result<String, tower_sessions::session::Error> {
    let token = CsrfToken::new();
    let value = token.value.clone();
    session.insert(CSRF_TOKEN_KEY, token).await?;
    debug!("generated new CSRF token: {}", &value[..8]);
    Ok(value)
}

pub async fn get_or_create_csrf_token(
    session: &Session,
) -> Result<String, tower_sessions::session::Error> {
    let token: Option<CsrfToken> = session.get(CSRF_TOKEN_KEY).await?;

    match token {
        Some(existing) if !existing.is_expired() => Ok(existing.value),
        _ => generate_csrf_token(session).await,
    }
}

/// Validate the token a form posted back. On success the token is rotated
/// so it cannot be replayed.
pub async fn validate_csrf_form_field(
    session: &Session,
    form_token: &str,
) -> Result<(), StatusCode> {
    let stored: Option<CsrfToken> = session.get(CSRF_TOKEN_KEY).await.map_err(|e| {
        warn!("failed to read CSRF token from session: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let stored = match stored {
        Some(token) if !token.is_expired() => token,
        Some(_) => {
            warn!("CSRF token expired during form validation");
            return Err(StatusCode::FORBIDDEN);
        }
        None => {
            warn!("no CSRF token in session for form validation");
            return Err(StatusCode::FORBIDDEN);
        }
    };

    if form_token != stored.value {
        warn!("CSRF form token mismatch");
        return Err(StatusCode::FORBIDDEN);
    }

    let _ = generate_csrf_token(session).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        let store = std::sync::Arc::new(MemoryStore::default());
        Session::new(None, store, None)
    }

    #[tokio::test]
    async fn tokens_are_unique() {
        let session = session();
        let first = generate_csrf_token(&session).await.unwrap();
        let second = generate_csrf_token(&session).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn get_or_create_is_stable_until_rotated() {
        let session = session();
        let first = get_or_create_csrf_token(&session).await.unwrap();
        let second = get_or_create_csrf_token(&session).await.unwrap();
        assert_eq!(first, second);

        let _ = generate_csrf_token(&session).await.unwrap();
        let third = get_or_create_csrf_token(&session).await.unwrap();
        assert_ne!(first, third);
    }

    #[tokio::test]
    async fn stale_token_is_expired() {
        let token = CsrfToken {
            value: "stale".to_string(),
            created_at: chrono::Utc::now().timestamp() - 100_000,
        };
        assert!(token.is_expired());
        assert!(!CsrfToken::new().is_expired());
    }

    #[tokio::test]
    async fn form_validation_accepts_current_and_rejects_wrong_token() {
        let session = session();
        let token = get_or_create_csrf_token(&session).await.unwrap();

        assert_eq!(
            validate_csrf_form_field(&session, "wrong").await,
            Err(StatusCode::FORBIDDEN)
        );
        assert!(validate_csrf_form_field(&session, &token).await.is_ok());

        // Rotated after use; the old value no longer validates.
        assert_eq!(
            validate_csrf_form_field(&session, &token).await,
            Err(StatusCode::FORBIDDEN)
        );
    }
}

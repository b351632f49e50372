use crate::auth::signed_url::{LinkSigner, SignedLinkError};
use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use crate::services::email_service::EmailService;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum MagicLinkError {
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid or expired link")]
    Forbidden,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] crate::repositories::user_repository::RepositoryError),
}

pub struct MagicLinkService {
    user_repository: Arc<dyn UserRepository>,
    signer: LinkSigner,
    email_service: Arc<dyn EmailService>,
}

impl MagicLinkService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        signer: LinkSigner,
        email_service: Arc<dyn EmailService>,
    ) -> Self {
        Self {
            user_repository,
            signer,
            email_service,
        }
    }

    /// Build a signed link for the account behind `email` and hand it to the
    /// mailer on a spawned task: the caller's response does not wait for
    /// SMTP. Returns the signed URL.
    pub async fn issue(&self, email: &str) -> Result<String, MagicLinkError> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(MagicLinkError::UserNotFound)?;

        let expires_at = LinkSigner::expiry_timestamp();
        let magic_url = self.signer.magic_link_url(user.id, expires_at);

        let email_service = self.email_service.clone();
        let to_email = user.email.clone();
        let url = magic_url.clone();
        tokio::spawn(async move {
            if let Err(e) = email_service.send_magic_link_email(&to_email, &url).await {
                tracing::error!("Failed to send magic link email to {}: {}", to_email, e);
            }
        });

        Ok(magic_url)
    }

    /// Stateless check of a presented link. Every failure mode collapses to
    /// `Forbidden`: a tampered link learns nothing about why it was refused.
    pub async fn verify(
        &self,
        user_id: i64,
        expires_at: i64,
        signature: &str,
    ) -> Result<User, MagicLinkError> {
        self.signer
            .verify(user_id, expires_at, signature)
            .map_err(|e| match e {
                SignedLinkError::InvalidSignature | SignedLinkError::Expired => {
                    MagicLinkError::Forbidden
                }
            })?;

        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(MagicLinkError::Forbidden)
    }

    pub fn signer(&self) -> &LinkSigner {
        &self.signer
    }
}

use std::sync::Arc;

use async_trait::async_trait;

/// A fully addressed plain-text email, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

/// Hands composed emails to a delivery backend.
///
/// Every call is one independent attempt: implementations must not retry and
/// a failed send must not affect later ones.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<()>;
}

#[async_trait]
impl<M: Mailer + ?Sized> Mailer for Arc<M> {
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<()> {
        (**self).send(email).await
    }
}

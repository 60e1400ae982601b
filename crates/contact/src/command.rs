use portfolio_notification::{EmailConfig, Mailer, OutgoingEmail};
use portfolio_shared::{ContactSubmission, Error};
use validator::Validate;

/// Fixed addressing applied to every relayed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub subject_prefix: String,
}

impl From<&EmailConfig> for Envelope {
    fn from(config: &EmailConfig) -> Self {
        Self {
            from: config.user.clone(),
            to: config.recipient().to_owned(),
            subject_prefix: config.subject_prefix.clone(),
        }
    }
}

#[derive(Clone)]
pub struct Command<M: Mailer>(pub M, pub Envelope);

impl<M: Mailer> Command<M> {
    pub fn new(mailer: M, envelope: Envelope) -> Self {
        Self(mailer, envelope)
    }

    pub fn compose(&self, submission: ContactSubmission) -> OutgoingEmail {
        OutgoingEmail {
            from: self.1.from.clone(),
            to: self.1.to.clone(),
            subject: format!("{} {}", self.1.subject_prefix, submission.subject),
            body: format!(
                "Name: {}\nEmail: {}\n\n{}",
                submission.name, submission.email, submission.message
            ),
            reply_to: submission.email,
        }
    }

    /// Validate the submission and make exactly one dispatch attempt.
    #[tracing::instrument(skip_all)]
    pub async fn submit(&self, submission: ContactSubmission) -> portfolio_shared::Result<()> {
        submission.validate()?;

        let email = self.compose(submission);
        self.0.send(email).await.map_err(Error::Dispatch)?;

        tracing::info!("Contact submission relayed");

        Ok(())
    }
}

use std::str::FromStr;

use portfolio_shared::ContactSubmission;
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::Relay;

pub const FILL_IN_ALL_FIELDS: &str = "Please fill in all fields.";
pub const MESSAGE_SENT: &str = "Message sent successfully!";
pub const FAILED_TO_SEND_MESSAGE: &str = "Failed to send message.";

/// Form controls, named as they are bound in the markup.
#[derive(EnumString, Display, VariantArray, AsRefStr, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

#[derive(Display, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Validating,
    Rejected,
    Sending,
    Succeeded,
    Failed,
}

/// Draft state and submission flow of the contact section.
#[derive(Debug, Default, Clone)]
pub struct ContactForm {
    draft: ContactSubmission,
    status: FormStatus,
    loading: bool,
    success: Option<String>,
    error: Option<String>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.draft.name = value,
            Field::Email => self.draft.email = value,
            Field::Subject => self.draft.subject = value,
            Field::Message => self.draft.message = value,
        }
        self.status = FormStatus::Idle;
    }

    /// Change handler keyed by control name. Unknown names are ignored.
    pub fn update(&mut self, name: &str, value: impl Into<String>) -> bool {
        match Field::from_str(name) {
            Ok(field) => {
                self.set_field(field, value);
                true
            }
            Err(_) => {
                tracing::debug!(name, "ignoring change for unknown contact field");
                false
            }
        }
    }

    pub fn draft(&self) -> &ContactSubmission {
        &self.draft
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    /// Submit controls should be disabled while this is true.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Run one submission attempt: at most one request, never retried.
    pub async fn submit<R: Relay + ?Sized>(&mut self, relay: &R) -> FormStatus {
        self.success = None;
        self.error = None;
        self.status = FormStatus::Validating;

        if !self.draft.is_complete() {
            self.error = Some(FILL_IN_ALL_FIELDS.to_owned());
            self.status = FormStatus::Rejected;
            return self.status;
        }

        self.status = FormStatus::Sending;
        self.loading = true;

        match relay.post_contact(&self.draft).await {
            Ok(reply) if reply.is_success() => {
                self.success = Some(MESSAGE_SENT.to_owned());
                self.draft = ContactSubmission::default();
                self.status = FormStatus::Succeeded;
            }
            Ok(reply) => {
                tracing::warn!(status = reply.status, "relay rejected contact submission");
                self.error = Some(
                    reply
                        .error_message()
                        .unwrap_or_else(|| FAILED_TO_SEND_MESSAGE.to_owned()),
                );
                self.status = FormStatus::Failed;
            }
            Err(err) => {
                tracing::warn!(error = %err, "contact relay unreachable");
                self.error = Some(FAILED_TO_SEND_MESSAGE.to_owned());
                self.status = FormStatus::Failed;
            }
        }

        self.loading = false;
        self.status
    }
}

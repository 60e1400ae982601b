#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use portfolio_contact::{Command, Envelope};
use portfolio_notification::{Mailer, OutgoingEmail};

/// Records every email handed to it and optionally fails.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub fail_with: Option<String>,
}

impl RecordingMailer {
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_owned()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<OutgoingEmail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(email);

        match &self.fail_with {
            Some(reason) => anyhow::bail!("{reason}"),
            None => Ok(()),
        }
    }
}

pub fn envelope() -> Envelope {
    Envelope {
        from: "relay@example.com".to_owned(),
        to: "inbox@example.com".to_owned(),
        subject_prefix: "[Portfolio]".to_owned(),
    }
}

pub fn command(mailer: RecordingMailer) -> (Arc<RecordingMailer>, Command<Arc<RecordingMailer>>) {
    let mailer = Arc::new(mailer);
    (mailer.clone(), Command::new(mailer, envelope()))
}

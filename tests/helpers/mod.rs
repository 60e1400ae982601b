//! Test helpers for driving the relay router in-process

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use portfolio::{
    AppState, Config,
    config::{ObservabilityConfig, ServerConfig},
};
use portfolio_contact::Envelope;
use portfolio_notification::{EmailConfig, Mailer, OutgoingEmail};
use tower::ServiceExt;

/// Mailer double that records every email and optionally fails.
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

pub fn test_config(allowed_origins: Vec<String>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 5000,
            allowed_origins,
        },
        mail: EmailConfig {
            user: "relay@example.com".to_owned(),
            password: "secret".to_owned(),
            to: Some("inbox@example.com".to_owned()),
            ..Default::default()
        },
        observability: ObservabilityConfig::default(),
    }
}

pub fn app_with_config(mailer: Arc<RecordingMailer>, config: Config) -> Router {
    let envelope = Envelope::from(&config.mail);
    let mailer: Arc<dyn Mailer> = mailer;

    portfolio::router(AppState {
        config,
        contact_command: portfolio_contact::Command::new(mailer, envelope),
    })
}

pub fn app(mailer: Arc<RecordingMailer>) -> Router {
    app_with_config(mailer, test_config(Vec::new()))
}

/// POST a raw JSON body to /api/contact and decode the JSON reply.
pub async fn post_contact(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, serde_json::from_slice(&bytes).unwrap())
}

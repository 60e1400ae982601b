//! Email delivery service using lettre

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use serde::Deserialize;

use crate::{Mailer, OutgoingEmail};

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Relay mailbox. Used both to authenticate and as the sender address.
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Destination mailbox. Falls back to `user` when unset or empty.
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            user: String::new(),
            password: String::new(),
            to: None,
            subject_prefix: default_subject_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EmailConfig {
    pub fn recipient(&self) -> &str {
        match self.to.as_deref() {
            Some(to) if !to.is_empty() => to,
            _ => &self.user,
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject_prefix() -> String {
    "[Portfolio]".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Long-lived SMTP mailer backed by a pooled lettre transport.
///
/// Every session upgrades with STARTTLS and authenticates. Broken connections
/// are discarded by the pool, so one failed send does not poison the next.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    timeout: Duration,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        if config.user.is_empty() || config.password.is_empty() {
            anyhow::bail!("SMTP user and password must both be configured");
        }

        let timeout = Duration::from_secs(config.timeout_secs);

        tracing::info!(
            smtp_host = %config.smtp_host,
            smtp_port = config.smtp_port,
            from = %config.user,
            timeout_secs = config.timeout_secs,
            "Email service initialized with authentication and STARTTLS"
        );

        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(creds)
            .timeout(Some(timeout))
            .build();

        Ok(Self { mailer, timeout })
    }

    /// Open a session against the SMTP server without sending anything.
    pub async fn verify(&self) -> anyhow::Result<bool> {
        match tokio::time::timeout(self.timeout, self.mailer.test_connection()).await {
            Ok(result) => Ok(result?),
            Err(_) => anyhow::bail!("SMTP test connection timed out after {:?}", self.timeout),
        }
    }
}

#[async_trait]
impl Mailer for EmailService {
    #[tracing::instrument(skip_all, fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: OutgoingEmail) -> anyhow::Result<()> {
        tracing::info!("Sending email text plain");

        let message = to_message(email)?;

        // Bounds the whole session, greeting and replies included.
        match tokio::time::timeout(self.timeout, self.mailer.send(message)).await {
            Ok(result) => {
                result?;
            }
            Err(_) => anyhow::bail!("SMTP send timed out after {:?}", self.timeout),
        }

        Ok(())
    }
}

pub fn to_message(email: OutgoingEmail) -> anyhow::Result<Message> {
    Ok(Message::builder()
        .from(email.from.parse()?)
        .to(email.to.parse()?)
        .reply_to(email.reply_to.parse()?)
        .subject(email.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(email.body)?)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use tokio::{
        io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
        net::TcpListener,
    };

    use super::*;

    fn email(reply_to: &str) -> OutgoingEmail {
        OutgoingEmail {
            from: "relay@example.com".to_string(),
            to: "inbox@example.com".to_string(),
            reply_to: reply_to.to_string(),
            subject: "[Portfolio] Hello".to_string(),
            body: "Name: Ada\nEmail: ada@example.com\n\nHi there".to_string(),
        }
    }

    #[test]
    fn test_message_headers() {
        let message = to_message(email("ada@example.com")).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("From: relay@example.com"));
        assert!(formatted.contains("To: inbox@example.com"));
        assert!(formatted.contains("Reply-To: ada@example.com"));
        assert!(formatted.contains("Subject: [Portfolio] Hello"));
        assert!(formatted.contains("Content-Type: text/plain"));
    }

    #[test]
    fn test_malformed_reply_to_fails() {
        assert!(to_message(email("not an address")).is_err());
    }

    #[test]
    fn test_recipient_defaults_to_user() {
        let mut config = EmailConfig {
            user: "relay@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.recipient(), "relay@example.com");

        config.to = Some(String::new());
        assert_eq!(config.recipient(), "relay@example.com");

        config.to = Some("inbox@example.com".to_string());
        assert_eq!(config.recipient(), "inbox@example.com");
    }

    fn local_config(port: u16) -> EmailConfig {
        EmailConfig {
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: port,
            user: "relay@example.com".to_string(),
            password: "secret".to_string(),
            timeout_secs: 1,
            ..Default::default()
        }
    }

    /// Plain SMTP server that never offers STARTTLS or AUTH and accepts anything.
    async fn spawn_plaintext_server() -> (u16, Arc<AtomicBool>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let accepted_data = Arc::new(AtomicBool::new(false));
        let flag = accepted_data.clone();

        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let flag = flag.clone();
                tokio::spawn(async move {
                    let (read, mut write) = socket.into_split();
                    let mut lines = BufReader::new(read).lines();
                    let _ = write.write_all(b"220 localhost ESMTP\r\n").await;
                    let mut in_data = false;
                    while let Ok(Some(line)) = lines.next_line().await {
                        let reply: &[u8] = if in_data {
                            if line != "." {
                                continue;
                            }
                            in_data = false;
                            flag.store(true, Ordering::SeqCst);
                            b"250 OK\r\n"
                        } else if line.starts_with("EHLO") {
                            b"250 localhost\r\n"
                        } else if line.starts_with("DATA") {
                            in_data = true;
                            b"354 go ahead\r\n"
                        } else if line.starts_with("QUIT") {
                            let _ = write.write_all(b"221 bye\r\n").await;
                            break;
                        } else {
                            b"250 OK\r\n"
                        };
                        if write.write_all(reply).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        (port, accepted_data)
    }

    #[test]
    fn test_missing_credentials_are_rejected() {
        let mut config = local_config(587);
        config.password = String::new();
        assert!(EmailService::new(&config).is_err());

        let mut config = local_config(587);
        config.user = String::new();
        assert!(EmailService::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_server_without_starttls_is_refused() {
        let (port, accepted_data) = spawn_plaintext_server().await;
        let service = EmailService::new(&local_config(port)).unwrap();

        assert!(service.send(email("ada@example.com")).await.is_err());
        assert!(!accepted_data.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_connection_refused_fails() {
        let service = EmailService::new(&local_config(1)).unwrap();

        assert!(service.send(email("ada@example.com")).await.is_err());
    }

    #[tokio::test]
    async fn test_silent_server_is_bounded_by_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let service = EmailService::new(&local_config(port)).unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(3),
            service.send(email("ada@example.com")),
        )
        .await;

        assert!(matches!(result, Ok(Err(_))));
    }
}

// ABOUTME: SMTP notifier built on lettre.
// ABOUTME: Authenticates at startup so a bad login aborts before any build work.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use parking_lot::Mutex;

use super::{Notifier, NotifyError};
use crate::config::NotifyConfig;

type Transport = AsyncSmtpTransport<Tokio1Executor>;

/// An authenticated SMTP session used for exactly one send.
pub struct SmtpNotifier {
    from: Mailbox,
    to: Mailbox,
    subject: String,
    transport: Mutex<Option<Transport>>,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| NotifyError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

impl SmtpNotifier {
    /// Open the session and log in (STARTTLS).
    pub async fn connect(config: &NotifyConfig, password: String) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&config.sender)?;
        let to = parse_mailbox(&config.admin)?;

        let transport = Transport::starttls_relay(&config.smtp_host)
            .map_err(|e| NotifyError::Transport {
                host: config.smtp_host.clone(),
                reason: e.to_string(),
            })?
            .port(config.smtp_port)
            .timeout(Some(config.timeout))
            .credentials(Credentials::new(config.sender.clone(), password))
            .build();

        let authenticated = |reason: String| NotifyError::Authentication {
            user: config.sender.clone(),
            host: config.smtp_host.clone(),
            reason,
        };

        match transport.test_connection().await {
            Ok(true) => {}
            Ok(false) => return Err(authenticated("server rejected the connection".to_string())),
            Err(e) => return Err(authenticated(e.to_string())),
        }

        tracing::info!(host = %config.smtp_host, user = %config.sender, "SMTP session ready");

        Ok(Self {
            from,
            to,
            subject: config.subject.clone(),
            transport: Mutex::new(Some(transport)),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, body: &str) -> Result<(), NotifyError> {
        // Take the session so the guard is not held across the send
        let transport = self.transport.lock().take().ok_or(NotifyError::SessionClosed)?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Message(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Send {
                recipient: self.to.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(recipient = %self.to, "notification email sent");
        Ok(())
    }
}

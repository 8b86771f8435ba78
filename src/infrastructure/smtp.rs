use crate::domain::repository::Mailer;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::env;
use tracing::{debug, info, instrument};

/// SMTP-backed mailer. Configuration comes from the environment:
/// `EMAIL_HOST` (default smtp.gmail.com), `EMAIL_PORT` (default 587),
/// `EMAIL_ADDRESS` and `EMAIL_PASSWORD` (required).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_env() -> Result<Self> {
        let host = env::var("EMAIL_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let port = env::var("EMAIL_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(587);
        let address = env::var("EMAIL_ADDRESS").context("EMAIL_ADDRESS is not set")?;
        let password = env::var("EMAIL_PASSWORD").context("EMAIL_PASSWORD is not set")?;

        let from: Mailbox = address
            .parse()
            .with_context(|| format!("invalid sender address: {}", address))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
            .with_context(|| format!("invalid SMTP relay host: {}", host))?
            .port(port)
            .credentials(Credentials::new(address, password))
            .build();

        info!(host = %host, port = port, "SMTP mailer configured");
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, body), fields(to = to, subject = subject))]
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().with_context(|| format!("invalid recipient: {}", to))?)
            .subject(subject)
            .body(body.to_string())
            .context("failed to build email message")?;

        self.transport
            .send(message)
            .await
            .with_context(|| format!("failed to send email to {}", to))?;
        debug!(to = to, "Email handed off to SMTP relay");
        Ok(())
    }
}

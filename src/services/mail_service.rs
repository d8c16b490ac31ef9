use crate::config::Config;
use crate::error::{Error, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Outbound transactional mail: password resets and address verification.
/// Connections are pooled by the transport, one service instance per process.
#[derive(Clone)]
pub struct MailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    frontend_url: String,
}

impl MailService {
    pub fn new(config: &Config) -> Result<Self> {
        let credentials =
            Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();
        let from = config
            .mail_from
            .parse::<Mailbox>()
            .map_err(|e| Error::Config(format!("Invalid MAIL_FROM address: {}", e)))?;

        Ok(Self {
            transport,
            from,
            frontend_url: config.frontend_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn send_password_reset(
        &self,
        to_email: &str,
        first_name: &str,
        token: &str,
    ) -> Result<()> {
        let link = format!("{}/reset-password/{}", self.frontend_url, token);
        let body = format!(
            "Hi {first_name},\n\n\
             We received a request to reset your password. Follow the link below\n\
             to choose a new one:\n\n{link}\n\n\
             The link expires in one hour. If you did not request this, you can\n\
             safely ignore this message.\n"
        );
        self.send(to_email, "Reset your password", body).await
    }

    pub async fn send_email_verification(
        &self,
        to_email: &str,
        first_name: &str,
        token: &str,
    ) -> Result<()> {
        let link = format!("{}/verify-email/{}", self.frontend_url, token);
        let body = format!(
            "Hi {first_name},\n\n\
             Please confirm your email address by following this link:\n\n{link}\n"
        );
        self.send(to_email, "Verify your email address", body).await
    }

    async fn send(&self, to_email: &str, subject: &str, body: String) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.transport.send(message).await?;
        tracing::info!(to = to_email, subject, "sent mail");
        Ok(())
    }
}

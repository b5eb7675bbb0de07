//! SMTP mailer implementation

use std::{fmt, time::Duration};

use async_trait::async_trait;
use clap::{ArgAction, Parser};
use lettre::{
    address::Envelope,
    message::{header::ContentType, Mailbox as SmtpMailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
        response::Response,
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::domain::communication::mailer::{
    DeliveryEnvelope, DeliveryInfo, Mailbox, Mailer, MailerError, MessageEnvelope,
};

/// SMTP configuration
#[derive(Clone, Parser)]
pub struct SmtpConfig {
    /// The SMTP host
    #[arg(long = "smtp-host", env = "SMTP_HOST", default_value = "smtpout.secureserver.net")]
    pub host: String,

    /// The SMTP port
    #[arg(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The mail account, used as both sender and recipient
    #[arg(long = "email-user", env = "EMAIL_USER")]
    pub username: String,

    /// The mail account password
    #[arg(long = "email-pass", env = "EMAIL_PASS", hide_env_values = true)]
    pub password: String,

    /// Upgrade the connection with STARTTLS instead of connecting over TLS
    #[arg(long = "smtp-starttls", env = "SMTP_STARTTLS", default_value = "true", action = ArgAction::Set)]
    pub starttls: bool,

    /// Verify the server's TLS certificate
    #[arg(long = "smtp-verify-tls", env = "SMTP_VERIFY_TLS", default_value = "false", action = ArgAction::Set)]
    pub verify_tls: bool,

    /// Give up on an SMTP exchange after this many seconds
    #[arg(long = "smtp-timeout-secs", env = "SMTP_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .field("starttls", &self.starttls)
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// SMTP mailer
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Create a new SMTP mailer. Does not connect to the server.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailerError> {
        let tls_parameters = TlsParameters::builder(config.host.clone())
            .dangerous_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|err| MailerError::UnknownError(err.into()))?;

        let tls = if config.starttls {
            Tls::Required(tls_parameters)
        } else {
            Tls::Wrapper(tls_parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(tls)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, envelope: MessageEnvelope) -> Result<DeliveryInfo, MailerError> {
        let message = build_message(&envelope)?;
        let smtp_envelope = message.envelope().clone();
        let message_id = message_id(&message);

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|err| MailerError::SendError(err.to_string()))?;

        Ok(delivery_info(&smtp_envelope, message_id, &response))
    }

    async fn verify(&self) -> Result<(), MailerError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailerError::SendError(
                "could not connect to the SMTP server".to_string(),
            )),
            Err(err) => Err(MailerError::SendError(err.to_string())),
        }
    }
}

fn smtp_mailbox(mailbox: &Mailbox) -> Result<SmtpMailbox, MailerError> {
    let address: Address = mailbox
        .address
        .as_str()
        .parse()
        .map_err(|_| MailerError::InvalidEmail(mailbox.address.to_string()))?;

    Ok(SmtpMailbox::new(mailbox.name.clone(), address))
}

fn build_message(envelope: &MessageEnvelope) -> Result<Message, MailerError> {
    let from = smtp_mailbox(&envelope.from)?;
    let message_id = format!("<{}@{}>", Uuid::now_v7(), from.email.domain());

    Message::builder()
        .message_id(Some(message_id))
        .from(from)
        .to(smtp_mailbox(&envelope.to)?)
        .subject(envelope.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(envelope.html_body.clone())
        .map_err(|err| MailerError::UnknownError(err.into()))
}

fn message_id(message: &Message) -> String {
    message
        .headers()
        .get_raw("Message-ID")
        .unwrap_or_default()
        .to_string()
}

fn delivery_info(envelope: &Envelope, message_id: String, response: &Response) -> DeliveryInfo {
    let to: Vec<String> = envelope.to().iter().map(ToString::to_string).collect();

    DeliveryInfo {
        message_id,
        envelope: DeliveryEnvelope {
            from: envelope.from().map(ToString::to_string).unwrap_or_default(),
            to: to.clone(),
        },
        accepted: to,
        rejected: vec![],
        response: format!(
            "{} {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        ),
    }
}

//! Mailer port

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::{DeliveryEnvelope, DeliveryInfo, Mailbox, MessageEnvelope};

/// Outbound mail transport
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `envelope` - The [`MessageEnvelope`] to deliver.
    ///
    /// # Returns
    /// [`Ok`] with the server's [`DeliveryInfo`], or an [`Err`] containing a [`MailerError`]
    /// if the SMTP exchange could not be completed.
    async fn send(&self, envelope: MessageEnvelope) -> Result<DeliveryInfo, MailerError>;

    /// Check that the mail server is reachable and accepts our credentials.
    async fn verify(&self) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(&self, envelope: MessageEnvelope) -> Result<DeliveryInfo, MailerError>;
        async fn verify(&self) -> Result<(), MailerError>;
    }
}

#[cfg(test)]
pub mod tests {
    pub use super::MockMailer;

    use super::{DeliveryEnvelope, DeliveryInfo, MessageEnvelope};

    /// A delivery receipt for `envelope`, as a well-behaved server would report it
    pub fn delivered(envelope: &MessageEnvelope) -> DeliveryInfo {
        let to = envelope.to.address.to_string();

        DeliveryInfo {
            message_id: "<0190b7a2@example.com>".to_string(),
            envelope: DeliveryEnvelope {
                from: envelope.from.address.to_string(),
                to: vec![to.clone()],
            },
            accepted: vec![to],
            rejected: vec![],
            response: "250 2.0.0 Ok: queued".to_string(),
        }
    }
}

//! Registration service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    clock::Clock,
    communication::{
        email_addresses::EmailAddress,
        mailer::{DeliveryInfo, Mailbox, Mailer, MessageEnvelope},
    },
    registrations::{emails::NewRegistrationTemplate, Registration, SubmissionError},
};

/// Display name on the `From` header of every notification
pub const SENDER_NAME: &str = "Course Registration";

/// Registration service
#[async_trait]
pub trait RegistrationService: Clone + Send + Sync + 'static {
    /// Notifies the institute's staff mailbox of a new registration.
    ///
    /// # Arguments
    /// * `registration` - A validated [`Registration`].
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] containing the transport's [`DeliveryInfo`] if the email was
    /// sent, or an [`Err`] containing a [`SubmissionError`] if it could not be rendered or
    /// delivered. Failed sends are not retried.
    async fn submit(&self, registration: &Registration) -> Result<DeliveryInfo, SubmissionError>;
}

#[cfg(test)]
mock! {
    pub RegistrationService {}

    impl Clone for RegistrationService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl RegistrationService for RegistrationService {
        async fn submit(&self, registration: &Registration) -> Result<DeliveryInfo, SubmissionError>;
    }
}

/// Registration service implementation
#[derive(Debug, Clone)]
pub struct RegistrationServiceImpl<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
    staff_mailbox: EmailAddress,
}

impl<M> RegistrationServiceImpl<M>
where
    M: Mailer,
{
    /// Creates a new registration service sending from and to `staff_mailbox`.
    pub fn new(mailer: Arc<M>, clock: Arc<dyn Clock>, staff_mailbox: EmailAddress) -> Self {
        Self {
            mailer,
            clock,
            staff_mailbox,
        }
    }

    fn envelope(&self, registration: &Registration) -> Result<MessageEnvelope, SubmissionError> {
        let html_body =
            NewRegistrationTemplate::new(registration, self.clock.today()).render_html()?;

        Ok(MessageEnvelope {
            from: Mailbox::new(Some(SENDER_NAME), self.staff_mailbox.clone()),
            to: Mailbox::new(None, self.staff_mailbox.clone()),
            subject: registration.subject(),
            html_body,
        })
    }
}

#[async_trait]
impl<M> RegistrationService for RegistrationServiceImpl<M>
where
    M: Mailer,
{
    async fn submit(&self, registration: &Registration) -> Result<DeliveryInfo, SubmissionError> {
        info!(
            full_name = %registration.form_data.full_name,
            course = %registration.course_or("Course"),
            "received registration"
        );

        let envelope = self.envelope(registration)?;
        let delivery = self.mailer.send(envelope).await?;

        info!(response = %delivery.response, "email sent");

        Ok(delivery)
    }
}

//! Registration errors

use css_inline::InlineError;
use thiserror::Error;
use tracing::debug;

use crate::domain::communication::mailer::MailerError;

/// The submitted full name is unusable
#[derive(Debug, Error)]
pub enum FullNameError {
    /// Missing, empty or not a string
    #[error("fullName is required")]
    Missing,
}

/// Errors that can occur after a registration passed validation
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The notification email could not be rendered
    #[error("could not render email: {0}")]
    RenderError(String),

    /// The mail transport failed to deliver the email
    #[error(transparent)]
    DeliveryError(#[from] MailerError),
}

impl From<askama::Error> for SubmissionError {
    fn from(err: askama::Error) -> Self {
        debug!("askama::Error -> SubmissionError");

        SubmissionError::RenderError(err.to_string())
    }
}

impl From<InlineError> for SubmissionError {
    fn from(err: InlineError) -> Self {
        debug!("InlineError -> SubmissionError");

        SubmissionError::RenderError(err.to_string())
    }
}

//! Course registrations: the submitted form, its notification email and the
//! service that delivers it

pub mod emails;
mod errors;
mod form_data;
mod service;

pub use errors::{FullNameError, SubmissionError};
pub use form_data::{CourseId, FieldText, FormData, FullName, Registration};
pub use service::{RegistrationService, RegistrationServiceImpl, SENDER_NAME};

#[cfg(test)]
pub mod tests {
    pub use super::service::MockRegistrationService;
}

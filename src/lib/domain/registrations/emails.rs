//! Email templates

mod new_registration;

pub use new_registration::{FieldRow, NewRegistrationTemplate, PLACEHOLDER};

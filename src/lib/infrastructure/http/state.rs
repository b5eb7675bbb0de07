//! Application state module

use std::{fmt, sync::Arc};

use crate::domain::registrations::RegistrationService;

/// Global application state
#[derive(Clone)]
pub struct AppState<R: RegistrationService> {
    /// Registration service
    pub registrations: Arc<R>,
}

impl<R> AppState<R>
where
    R: RegistrationService,
{
    /// Create a new application state
    pub fn new(registrations: R) -> Self {
        Self {
            registrations: Arc::new(registrations),
        }
    }
}

impl<R> fmt::Debug for AppState<R>
where
    R: RegistrationService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("registrations", &"RegistrationService")
            .finish()
    }
}

#[cfg(test)]
use crate::domain::registrations::tests::MockRegistrationService;

#[cfg(test)]
pub fn test_state(
    registrations: Option<MockRegistrationService>,
) -> AppState<MockRegistrationService> {
    AppState::new(registrations.unwrap_or_default())
}

//! API error-handling module

use std::fmt;

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::registrations::{FullNameError, SubmissionError};

/// An error response
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    #[schema(example = false)]
    pub success: bool,

    /// A message that can be shown to the user
    #[schema(example = "Error processing form submission")]
    pub message: String,

    /// The underlying error, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Connection refused")]
    pub error: Option<String>,
}

/// An error raised in the API
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApiError {
    /// The status code
    #[schema(example = 500, value_type = u16)]
    #[serde(with = "http_serde::status_code")]
    pub status: StatusCode,

    /// The error message
    #[schema(example = "Internal server error")]
    pub message: String,

    /// The underlying error
    pub error: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            error: None,
        }
    }

    /// Create a new bad request error
    pub fn new_400(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a new not found error
    pub fn new_404(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create new internal server error
    pub fn new_500(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Attach the underlying error's message
    pub fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                success: false,
                message: self.message,
                error: self.error,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::new_500("Internal server error").with_error(err)
    }
}

impl From<FullNameError> for ApiError {
    fn from(err: FullNameError) -> Self {
        match err {
            FullNameError::Missing => ApiError::new_400("Invalid form data: fullName is required"),
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        ApiError::new_500("Error processing form submission").with_error(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new_500("Internal server error").with_error(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::new_500("Internal server error").with_error(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use testresult::TestResult;

    use crate::domain::communication::mailer::MailerError;

    use super::*;

    #[tokio::test]
    async fn test_error_response() -> TestResult {
        let error = ApiError::new_500("Error processing form submission").with_error("boom");

        let response = error.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await?;

        assert_eq!(
            body,
            r#"{"success":false,"message":"Error processing form submission","error":"boom"}"#
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_error_response_without_error() -> TestResult {
        let response = ApiError::new_404("Not found").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await?;

        assert_eq!(body, r#"{"success":false,"message":"Not found"}"#);

        Ok(())
    }

    #[test]
    fn test_api_error_from_error() {
        let api_error = ApiError::from(anyhow!("Something went wrong"));

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "Internal server error");
        assert_eq!(api_error.error.as_deref(), Some("Something went wrong"));
    }

    #[test]
    fn test_api_error_from_missing_full_name() {
        let api_error = ApiError::from(FullNameError::Missing);

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.message, "Invalid form data: fullName is required");
        assert_eq!(api_error.error, None);
    }

    #[test]
    fn test_api_error_from_submission_error() {
        let api_error = ApiError::from(SubmissionError::from(MailerError::SendError(
            "Invalid login: 535 Authentication Failed".to_string(),
        )));

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "Error processing form submission");
        assert_eq!(
            api_error.error.as_deref(),
            Some("Invalid login: 535 Authentication Failed")
        );
    }
}

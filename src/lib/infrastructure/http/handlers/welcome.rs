//! Welcome handler

/// Body of `GET /`
pub const WELCOME: &str = "Welcome to the German Language Institute API";

/// Greet API clients
#[utoipa::path(
    get,
    operation_id = "welcome",
    tag = "System",
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = String, content_type = "text/plain"),
    )
)]
pub async fn handler() -> &'static str {
    WELCOME
}

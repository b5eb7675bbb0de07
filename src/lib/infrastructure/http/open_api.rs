//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{
    errors::ErrorResponse,
    handlers::{submit_form, welcome},
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "German Language Institute API"),
    paths(welcome::handler, submit_form::handler),
    components(schemas(
        submit_form::SubmitFormBody,
        submit_form::FormDataBody,
        submit_form::SubmitFormResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;

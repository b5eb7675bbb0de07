//! Registration form submission handler

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::{
    domain::{
        communication::mailer::DeliveryInfo,
        registrations::{
            CourseId, FieldText, FormData, FullName, FullNameError, Registration,
            RegistrationService,
        },
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Submit form request body
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFormBody {
    /// The registration form
    #[schema(value_type = Option<FormDataBody>)]
    pub form_data: Option<Value>,

    /// The course being registered for
    #[schema(value_type = Option<String>, example = "A1 German")]
    pub course_id: Option<Value>,
}

impl SubmitFormBody {
    /// Collect `formData[field]=...` and `courseId=...` pairs from an HTML form post
    fn from_form_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form_data = Map::new();
        let mut course_id = None;

        for (key, value) in pairs {
            if key == "courseId" {
                course_id = Some(Value::String(value));
            } else if let Some(field) = key
                .strip_prefix("formData[")
                .and_then(|rest| rest.strip_suffix(']'))
            {
                form_data.insert(field.to_string(), Value::String(value));
            }
        }

        Self {
            form_data: (!form_data.is_empty()).then_some(Value::Object(form_data)),
            course_id,
        }
    }
}

/// The registration form. Only `fullName` is required.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDataBody {
    /// Full name
    #[schema(value_type = String, example = "Ayesha Khan")]
    pub full_name: Option<Value>,
    /// Father's or husband's name
    #[schema(value_type = Option<String>, example = "Imran Khan")]
    pub father_or_husband_name: Option<Value>,
    /// Date of birth
    #[schema(value_type = Option<String>, example = "1998-04-12")]
    pub date_of_birth: Option<Value>,
    /// Place of birth
    #[schema(value_type = Option<String>, example = "Lahore")]
    pub place_of_birth: Option<Value>,
    /// Nationality
    #[schema(value_type = Option<String>, example = "Pakistani")]
    pub nationality: Option<Value>,
    /// National identity card number
    #[schema(value_type = Option<String>, example = "35202-1234567-8")]
    pub cnic: Option<Value>,
    /// Gender
    #[schema(value_type = Option<String>, example = "Female")]
    pub gender: Option<Value>,
    /// Email address
    #[schema(value_type = Option<String>, example = "ayesha@example.com")]
    pub email: Option<Value>,
    /// WhatsApp number
    #[schema(value_type = Option<String>, example = "+92 300 1234567")]
    pub whatsapp_number: Option<Value>,
    /// Emergency contact number
    #[schema(value_type = Option<String>, example = "+92 300 7654321")]
    pub emergency_number: Option<Value>,
    /// May span several lines
    #[schema(value_type = Option<String>, example = "House 12\nStreet 4\nLahore")]
    pub address: Option<Value>,
    /// Highest education
    #[schema(value_type = Option<String>, example = "Bachelor's")]
    pub education: Option<Value>,
    /// May span several lines
    #[schema(value_type = Option<String>, example = "I want to study in Germany.")]
    pub learn_german_reason: Option<Value>,
    /// Preferred time slot
    #[schema(value_type = Option<String>, example = "Evening (6pm - 8pm)")]
    pub time_slot: Option<Value>,
}

/// Strings are used as-is and numbers as their text; anything else is absent.
fn text(value: Option<&Value>) -> Option<FieldText> {
    match value? {
        Value::String(s) => FieldText::new(s),
        Value::Number(n) => FieldText::new(&n.to_string()),
        _ => None,
    }
}

impl TryFrom<SubmitFormBody> for Registration {
    type Error = ApiError;

    fn try_from(body: SubmitFormBody) -> Result<Self, Self::Error> {
        let form = match body.form_data {
            Some(Value::Object(map)) => serde_json::from_value::<FormDataBody>(Value::Object(map))
                .map_err(|_| FullNameError::Missing)?,
            _ => return Err(FullNameError::Missing.into()),
        };

        let full_name = match &form.full_name {
            Some(Value::String(name)) => FullName::new(name)?,
            _ => return Err(FullNameError::Missing.into()),
        };

        let form_data = FormData {
            full_name,
            father_or_husband_name: text(form.father_or_husband_name.as_ref()),
            date_of_birth: text(form.date_of_birth.as_ref()),
            place_of_birth: text(form.place_of_birth.as_ref()),
            nationality: text(form.nationality.as_ref()),
            cnic: text(form.cnic.as_ref()),
            gender: text(form.gender.as_ref()),
            email: text(form.email.as_ref()),
            whatsapp_number: text(form.whatsapp_number.as_ref()),
            emergency_number: text(form.emergency_number.as_ref()),
            address: text(form.address.as_ref()),
            education: text(form.education.as_ref()),
            learn_german_reason: text(form.learn_german_reason.as_ref()),
            time_slot: text(form.time_slot.as_ref()),
        };

        let course_id =
            text(body.course_id.as_ref()).and_then(|course| CourseId::new(course.as_str()));

        Ok(Registration::new(form_data, course_id))
    }
}

/// A submission sent as JSON or as an HTML form post.
///
/// Any other content type, or none at all, is read as an empty body.
#[derive(Debug)]
pub struct Submission(pub SubmitFormBody);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for Submission {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|mime| mime.trim().to_ascii_lowercase())
            .unwrap_or_default();

        let body = match content_type.as_str() {
            "application/x-www-form-urlencoded" => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|rejection| {
                        error!(error = %rejection.body_text(), "could not parse form submission");
                        ApiError::from(rejection)
                    })?;

                SubmitFormBody::from_form_pairs(pairs)
            }
            mime if mime == "application/json" || mime.ends_with("+json") => {
                let Json(body) = Json::<SubmitFormBody>::from_request(req, state)
                    .await
                    .map_err(|rejection| {
                        error!(error = %rejection.body_text(), "could not parse form submission");
                        ApiError::from(rejection)
                    })?;

                body
            }
            _ => SubmitFormBody::default(),
        };

        Ok(Submission(body))
    }
}

/// Submit form response body
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitFormResponse {
    /// Always `true`
    #[schema(example = true)]
    pub success: bool,

    /// Confirmation message
    #[schema(example = "Form submitted successfully")]
    pub message: String,

    /// What the mail server reported
    #[schema(value_type = Object)]
    pub info: DeliveryInfo,
}

/// Email a registration to the institute
#[utoipa::path(
    post,
    operation_id = "submit_form",
    tag = "Registrations",
    path = "/submit-form",
    request_body = SubmitFormBody,
    responses(
        (status = 200, description = "Registration emailed", body = SubmitFormResponse),
        (status = 400, description = "Missing full name", body = ErrorResponse, example = json!({ "success": false, "message": "Invalid form data: fullName is required" })),
        (status = 500, description = "The email could not be sent", body = ErrorResponse, example = json!({ "success": false, "message": "Error processing form submission", "error": "Connection refused" })),
    )
)]
pub async fn handler<R: RegistrationService>(
    State(state): State<AppState<R>>,
    Submission(request): Submission,
) -> Result<Json<SubmitFormResponse>, ApiError> {
    let registration = Registration::try_from(request).map_err(|err| {
        debug!(message = %err, "rejected form submission");
        err
    })?;

    match state.registrations.submit(&registration).await {
        Ok(info) => Ok(Json(SubmitFormResponse {
            success: true,
            message: "Form submitted successfully".to_string(),
            info,
        })),
        Err(err) => {
            error!(error = %err, "error processing form submission");
            Err(err.into())
        }
    }
}

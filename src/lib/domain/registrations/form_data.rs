//! Registration form data

use std::fmt;

use super::errors::FullNameError;

/// A submitted text value, trimmed and known to be non-empty
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldText(String);

impl FieldText {
    /// Returns `None` when `raw` is empty or only whitespace.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The text split on line breaks (`\n` or `\r\n`), in order.
    ///
    /// Empty lines are kept so that every break in the input maps to exactly
    /// one break in the output.
    pub fn lines(&self) -> Vec<&str> {
        self.0
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }

    /// The text as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The applicant's full name, the only required field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FullName(FieldText);

impl FullName {
    /// Create a full name, rejecting empty or whitespace-only input
    pub fn new(raw: &str) -> Result<Self, FullNameError> {
        FieldText::new(raw).map(Self).ok_or(FullNameError::Missing)
    }

    /// The name as a [`FieldText`]
    pub fn as_field(&self) -> &FieldText {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-text identifier of the course being registered for, e.g. `A1 German`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseId(FieldText);

impl CourseId {
    /// Returns `None` when `raw` is empty or only whitespace.
    pub fn new(raw: &str) -> Option<Self> {
        FieldText::new(raw).map(Self)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The registration form as submitted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormData {
    /// The applicant's full name
    pub full_name: FullName,

    /// Father's or husband's name
    pub father_or_husband_name: Option<FieldText>,

    /// Date of birth, as typed
    pub date_of_birth: Option<FieldText>,

    /// Place of birth
    pub place_of_birth: Option<FieldText>,

    /// Nationality
    pub nationality: Option<FieldText>,

    /// CNIC or passport number
    pub cnic: Option<FieldText>,

    /// Gender
    pub gender: Option<FieldText>,

    /// The applicant's own email address
    pub email: Option<FieldText>,

    /// WhatsApp number
    pub whatsapp_number: Option<FieldText>,

    /// Emergency contact number
    pub emergency_number: Option<FieldText>,

    /// Postal address, may span several lines
    pub address: Option<FieldText>,

    /// Highest level of education
    pub education: Option<FieldText>,

    /// Why the applicant wants to learn German, may span several lines
    pub learn_german_reason: Option<FieldText>,

    /// Preferred class time
    pub time_slot: Option<FieldText>,
}

impl FormData {
    /// A form with only the full name filled in
    pub fn new(full_name: FullName) -> Self {
        Self {
            full_name,
            father_or_husband_name: None,
            date_of_birth: None,
            place_of_birth: None,
            nationality: None,
            cnic: None,
            gender: None,
            email: None,
            whatsapp_number: None,
            emergency_number: None,
            address: None,
            education: None,
            learn_german_reason: None,
            time_slot: None,
        }
    }
}

/// One form submission for a course
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    /// The submitted form
    pub form_data: FormData,

    /// The course, if the form named one
    pub course_id: Option<CourseId>,
}

impl Registration {
    /// Create a new registration
    pub fn new(form_data: FormData, course_id: Option<CourseId>) -> Self {
        Self {
            form_data,
            course_id,
        }
    }

    /// The course identifier, or `default` when the form named none
    pub fn course_or(&self, default: &str) -> String {
        self.course_id
            .as_ref()
            .map_or_else(|| default.to_string(), CourseId::to_string)
    }

    /// Subject line of the notification email
    pub fn subject(&self) -> String {
        format!(
            "New {} Registration - {}",
            self.course_or("Course"),
            self.form_data.full_name
        )
    }
}

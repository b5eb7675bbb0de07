//! New registration notification template

use askama::Template;
use chrono::{Datelike, NaiveDate};
use css_inline::CSSInliner;

use crate::domain::registrations::{FieldText, Registration, SubmissionError};

/// Shown in place of any field the applicant left empty
pub const PLACEHOLDER: &str = "Not provided";

/// One labelled value in a section of the email
#[derive(Debug, Template)]
#[template(path = "emails/registrations/field_row.html")]
pub struct FieldRow<'a> {
    label: &'a str,
    value: Option<&'a FieldText>,
    badge: Option<&'a str>,
}

impl<'a> FieldRow<'a> {
    /// Pairs `label` with `value`, or with [`PLACEHOLDER`] when there is no value.
    pub fn new(label: &'a str, value: Option<&'a FieldText>) -> Self {
        Self {
            label,
            value,
            badge: None,
        }
    }

    /// Adds a badge after the value. Not shown when the value is missing.
    pub fn with_badge(mut self, badge: &'a str) -> Self {
        self.badge = Some(badge);
        self
    }
}

/// Notification sent to the institute for each new registration
#[derive(Debug, Template)]
#[template(path = "emails/registrations/new_registration.html")]
pub struct NewRegistrationTemplate<'a> {
    date: String,
    year: i32,
    course_name: String,
    course_title: String,
    time_slot: Option<&'a FieldText>,
    personal: Vec<FieldRow<'a>>,
    contact: Vec<FieldRow<'a>>,
    education: Vec<FieldRow<'a>>,
    motivation: Option<&'a FieldText>,
}

impl<'a> NewRegistrationTemplate<'a> {
    /// Creates the template for `registration`, dated `today`.
    pub fn new(registration: &'a Registration, today: NaiveDate) -> Self {
        let form = &registration.form_data;

        Self {
            date: today.format("%A, %B %-d, %Y").to_string(),
            year: today.year(),
            course_name: registration.course_or("course"),
            course_title: registration.course_or("German Language Course"),
            time_slot: form.time_slot.as_ref(),
            personal: vec![
                FieldRow::new("Full Name", Some(form.full_name.as_field())),
                FieldRow::new("Father/Husband Name", form.father_or_husband_name.as_ref()),
                FieldRow::new("Date of Birth", form.date_of_birth.as_ref()),
                FieldRow::new("Place of Birth", form.place_of_birth.as_ref()),
                FieldRow::new("Nationality", form.nationality.as_ref()),
                FieldRow::new("CNIC/Passport", form.cnic.as_ref()),
                FieldRow::new("Gender", form.gender.as_ref()).with_badge("Verified"),
            ],
            contact: vec![
                FieldRow::new("Email Address", form.email.as_ref()),
                FieldRow::new("WhatsApp Number", form.whatsapp_number.as_ref()),
                FieldRow::new("Emergency Contact", form.emergency_number.as_ref()),
                FieldRow::new("Complete Address", form.address.as_ref()),
            ],
            education: vec![FieldRow::new("Education Level", form.education.as_ref())],
            motivation: form.learn_german_reason.as_ref(),
        }
    }

    /// Renders the email with its stylesheet inlined into `style` attributes.
    ///
    /// The `<style>` block is kept for clients that support it.
    pub fn render_html(&self) -> Result<String, SubmissionError> {
        let html = self.render()?;

        let inliner = CSSInliner::options()
            .keep_style_tags(true)
            .load_remote_stylesheets(false)
            .build();

        Ok(inliner.inline(&html)?)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::registrations::{CourseId, FormData, FullName};

    use super::*;

    fn new_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn registration(form_data: FormData) -> Registration {
        Registration::new(form_data, CourseId::new("A1 German"))
    }

    #[test]
    fn test_field_row_with_value() -> TestResult {
        let value = FieldText::new("Pakistani");
        let html = FieldRow::new("Nationality", value.as_ref()).render()?;

        assert!(html.contains(r#"<div class="field-label">Nationality</div>"#));
        assert!(html.contains("Pakistani"));
        assert!(!html.contains(PLACEHOLDER));

        Ok(())
    }

    #[test]
    fn test_field_row_without_value() -> TestResult {
        let html = FieldRow::new("Nationality", None).render()?;

        assert!(html.contains("Nationality"));
        assert!(html.contains(PLACEHOLDER));

        Ok(())
    }

    #[test]
    fn test_field_row_badge_needs_a_value() -> TestResult {
        let value = FieldText::new("Female");

        let with_value = FieldRow::new("Gender", value.as_ref())
            .with_badge("Verified")
            .render()?;
        let without_value = FieldRow::new("Gender", None).with_badge("Verified").render()?;

        assert!(with_value.contains(r#"<span class="badge">Verified</span>"#));
        assert!(!without_value.contains("Verified"));

        Ok(())
    }

    #[test]
    fn test_field_row_escapes_markup() -> TestResult {
        let value = FieldText::new("<b>bold</b>");
        let html = FieldRow::new("Education Level", value.as_ref()).render()?;

        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<b>"));

        Ok(())
    }

    #[test]
    fn test_render_with_only_full_name() -> TestResult {
        let registration = Registration::new(FormData::new(FullName::new("Ayesha Khan")?), None);

        let html = NewRegistrationTemplate::new(&registration, new_year()).render_html()?;

        assert!(html.contains("Ayesha Khan"));
        assert_eq!(html.matches(PLACEHOLDER).count(), 12);
        assert!(html.contains("To be scheduled"));
        assert!(html.contains("German Language Course"));
        assert!(html.contains("join our course program"));

        Ok(())
    }

    #[test]
    fn test_render_includes_course_and_date() -> TestResult {
        let registration = registration(FormData::new(FullName::new("Ayesha Khan")?));

        let html = NewRegistrationTemplate::new(&registration, new_year()).render_html()?;

        assert!(html.contains("Monday, January 1, 2024"));
        assert!(html.contains("join our A1 German program"));
        assert_eq!(html.matches("A1 German").count(), 2);
        assert!(html.contains("© 2024 German Language Institute"));
        assert!(html.contains("fonts.googleapis.com"));

        Ok(())
    }

    #[test]
    fn test_render_groups_fields_into_sections() -> TestResult {
        let registration = registration(FormData {
            father_or_husband_name: FieldText::new("Imran Khan"),
            email: FieldText::new("ayesha@example.com"),
            education: FieldText::new("Bachelor's"),
            gender: FieldText::new("Female"),
            time_slot: FieldText::new("Evening (6pm - 8pm)"),
            ..FormData::new(FullName::new("Ayesha Khan")?)
        });

        let html = NewRegistrationTemplate::new(&registration, new_year()).render_html()?;

        let personal = html.find("Personal Information").unwrap();
        let contact = html.find("Contact Information").unwrap();
        let education = html.find("Education Details").unwrap();
        let motivation = html.find("Your Motivation").unwrap();

        assert!(personal < html.find("Imran Khan").unwrap());
        assert!(html.find("Imran Khan").unwrap() < contact);
        assert!(contact < html.find("ayesha@example.com").unwrap());
        assert!(html.find("ayesha@example.com").unwrap() < education);
        assert!(education < html.find("Bachelor").unwrap());
        assert!(html.find("Bachelor").unwrap() < motivation);

        assert!(html.contains("Evening (6pm - 8pm)"));
        assert!(html.contains("Verified"));
        assert_eq!(html.matches(PLACEHOLDER).count(), 8);

        Ok(())
    }

    #[test]
    fn test_render_converts_line_breaks() -> TestResult {
        let registration = registration(FormData {
            address: FieldText::new("House 12\nStreet 4\r\nLahore"),
            learn_german_reason: FieldText::new("Study in Berlin\n\nWork as a nurse"),
            ..FormData::new(FullName::new("Ayesha Khan")?)
        });

        let html = NewRegistrationTemplate::new(&registration, new_year()).render_html()?;

        assert!(html.contains("House 12<br>Street 4<br>Lahore"));
        assert!(html.contains("Study in Berlin<br><br>Work as a nurse"));

        Ok(())
    }

    #[test]
    fn test_render_escapes_submitted_markup() -> TestResult {
        let registration = registration(FormData {
            address: FieldText::new("<script>alert(1)</script>"),
            ..FormData::new(FullName::new("Ayesha Khan")?)
        });

        let html = NewRegistrationTemplate::new(&registration, new_year()).render_html()?;

        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));

        Ok(())
    }

    #[test]
    fn test_render_is_deterministic_for_a_day() -> TestResult {
        let registration = registration(FormData {
            address: FieldText::new("House 12\nLahore"),
            ..FormData::new(FullName::new("Ayesha Khan")?)
        });

        let first = NewRegistrationTemplate::new(&registration, new_year()).render_html()?;
        let second = NewRegistrationTemplate::new(&registration, new_year()).render_html()?;

        assert_eq!(first, second);

        Ok(())
    }
}

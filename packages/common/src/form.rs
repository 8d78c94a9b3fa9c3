use std::path::Path;

/// Multipart field carrying the student's name.
pub const FIELD_NAME: &str = "name";
/// Multipart field carrying the selected grade.
pub const FIELD_GRADE: &str = "grade";
/// Multipart field carrying the schedule photo.
pub const FIELD_IMAGE: &str = "scheduleImage";

pub const NAME_REQUIRED: &str = "Name is required";
pub const GRADE_REQUIRED: &str = "Please select your grade";
pub const IMAGE_REQUIRED: &str = "Please upload a schedule image";
/// Shown whenever a submission fails without a server-provided message.
pub const SUBMISSION_FAILED: &str = "An error occurred during submission";

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_GRADE_CHARS: usize = 10;

/// Image extensions accepted by the intake server.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// An image attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A schedule submission as filled out by the student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleForm {
    pub name: String,
    pub grade: String,
    pub image: Option<ImageUpload>,
}

/// Whether the image field is checked before submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRequirement {
    Required,
    Optional,
}

/// Outcome of validating a [`ScheduleForm`].
///
/// The name error is rendered inline next to the field, everything else is
/// raised as a blocking alert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub name_error: Option<String>,
    pub alerts: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.name_error.is_none() && self.alerts.is_empty()
    }
}

impl ScheduleForm {
    /// Runs every field check and collects all failures.
    pub fn validate(&self, image: ImageRequirement) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.name.trim().is_empty() {
            report.name_error = Some(NAME_REQUIRED.to_string());
        }

        if self.grade.is_empty() {
            report.alerts.push(GRADE_REQUIRED.to_string());
        }

        if image == ImageRequirement::Required && self.image.is_none() {
            report.alerts.push(IMAGE_REQUIRED.to_string());
        }

        report
    }
}

/// Errors raised by the stricter server-side checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0}")]
    Missing(&'static str),
    #[error("Name must be at most 50 characters")]
    NameTooLong,
    #[error("Grade must be at most 10 characters")]
    GradeTooLong,
}

/// Validates name and grade the way the intake server stores them.
///
/// Returns the trimmed name and the grade on success.
pub fn validate_identity<'a>(
    name: &'a str,
    grade: &'a str,
) -> Result<(&'a str, &'a str), FieldError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FieldError::Missing(NAME_REQUIRED));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(FieldError::NameTooLong);
    }

    let grade = grade.trim();
    if grade.is_empty() {
        return Err(FieldError::Missing(GRADE_REQUIRED));
    }
    if grade.chars().count() > MAX_GRADE_CHARS {
        return Err(FieldError::GradeTooLong);
    }

    Ok((name, grade))
}

/// Returns the lowercased extension when the file name is an allowed image.
pub fn allowed_image_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_IMAGE_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

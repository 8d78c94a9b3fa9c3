//! Blocking client for the schedule intake server.
//!
//! A submission is validated locally first; nothing is sent unless the
//! [`ValidationReport`] is clean. Once sent, the server's answer is reduced to
//! an [`Outcome`]: either a page to navigate to, or a message to show next to
//! the form. Transport failures never surface as errors, they become the
//! fixed [`SUBMISSION_FAILED`] message.

use common::api::{ConfirmRequest, MessageResponse, ScheduleListResponse, VerifyResponse};
use common::form::{FIELD_GRADE, FIELD_IMAGE, FIELD_NAME, SUBMISSION_FAILED};
use common::{ImageRequirement, ScheduleForm, ValidationReport};
use reqwest::StatusCode;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::header::LOCATION;

/// Where a schedule form is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Extract the schedule and navigate to the verification page.
    Verify,
    /// Extract and save in one step, then show the server's message.
    Upload,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Verify => "/verify",
            Endpoint::Upload => "/upload",
        }
    }

    /// `/verify` refuses to send without an image; `/upload` leaves the check
    /// to the server.
    pub fn image_requirement(self) -> ImageRequirement {
        match self {
            Endpoint::Verify => ImageRequirement::Required,
            Endpoint::Upload => ImageRequirement::Optional,
        }
    }
}

/// What the user gets to see after a request resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Navigate {
        location: String,
        /// Extracted schedule returned alongside a successful verification.
        preview: Option<VerifyResponse>,
    },
    Message {
        text: String,
        ok: bool,
    },
}

impl Outcome {
    fn failed() -> Self {
        Outcome::Message {
            text: SUBMISSION_FAILED.to_string(),
            ok: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid server URL '{0}'")]
    InvalidUrl(String),

    #[error("submission is incomplete")]
    Invalid(ValidationReport),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
}

pub struct SubmissionClient {
    http: Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        reqwest::Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;

        // Redirects are reported to the caller, not followed.
        let http = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Validates `form` and, when it passes, posts it to `endpoint` once.
    pub fn submit(&self, endpoint: Endpoint, form: &ScheduleForm) -> Result<Outcome, ClientError> {
        let report = form.validate(endpoint.image_requirement());
        if !report.is_valid() {
            return Err(ClientError::Invalid(report));
        }

        let response = match self
            .http
            .post(self.url(endpoint.path()))
            .multipart(multipart_form(form))
            .send()
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, endpoint = endpoint.path(), "Submission failed");
                return Ok(Outcome::failed());
            }
        };

        Ok(match endpoint {
            Endpoint::Verify => verify_outcome(response),
            Endpoint::Upload => message_outcome(response),
        })
    }

    /// Saves a verified schedule. The server answers with a redirect to the
    /// schedule listing.
    pub fn confirm(&self, request: &ConfirmRequest) -> Result<Outcome, ClientError> {
        let form = ScheduleForm {
            name: request.name.clone(),
            grade: request.grade.clone(),
            image: None,
        };
        let mut report = form.validate(ImageRequirement::Optional);
        if request.schedule.trim().is_empty() {
            report.alerts.push("Schedule is required".to_string());
        }
        if !report.is_valid() {
            return Err(ClientError::Invalid(report));
        }

        let response = match self.http.post(self.url("/confirm")).form(request).send() {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Confirmation failed");
                return Ok(Outcome::failed());
            }
        };

        let status = response.status();
        if status.is_redirection() || status.is_success() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("/schedules")
                .to_string();
            return Ok(Outcome::Navigate {
                location,
                preview: None,
            });
        }

        Ok(message_outcome(response))
    }

    pub fn list_schedules(&self) -> Result<ScheduleListResponse, ClientError> {
        let response = self.http.get(self.url("/schedules")).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: server_message(response).unwrap_or_else(|| SUBMISSION_FAILED.into()),
            });
        }
        Ok(response.json()?)
    }
}

fn multipart_form(form: &ScheduleForm) -> Form {
    let mut multipart = Form::new()
        .text(FIELD_NAME, form.name.clone())
        .text(FIELD_GRADE, form.grade.clone());

    if let Some(image) = &form.image {
        let part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
        multipart = multipart.part(FIELD_IMAGE, part);
    }

    multipart
}

fn verify_outcome(response: Response) -> Outcome {
    if response.status().is_success() {
        let preview = response.json::<VerifyResponse>().ok();
        return Outcome::Navigate {
            location: Endpoint::Verify.path().to_string(),
            preview,
        };
    }
    message_outcome(response)
}

fn message_outcome(response: Response) -> Outcome {
    let ok = response.status().is_success();
    match server_message(response) {
        Some(text) => Outcome::Message { text, ok },
        None => Outcome::failed(),
    }
}

/// The `message` field of a JSON body, if there is one.
fn server_message(response: Response) -> Option<String> {
    let status: StatusCode = response.status();
    match response.json::<MessageResponse>() {
        Ok(body) if !body.message.is_empty() => Some(body.message),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(status = status.as_u16(), error = %e, "Response carried no message");
            None
        }
    }
}

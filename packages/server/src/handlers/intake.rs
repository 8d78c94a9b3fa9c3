use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::api::{MessageResponse, VerifyResponse};
use common::form::{IMAGE_REQUIRED, validate_identity};
use common::storage::StoredImage;
use sea_orm::{ActiveModelTrait, Set};
use tracing::{info, instrument};

use crate::entity::schedule;
use crate::error::AppError;
use crate::extractors::multipart::{ImagePart, ScheduleUpload};
use crate::state::AppState;
use crate::utils::filename::{FilenameError, validate_image_filename};

/// Room for the text fields and multipart framing on top of the image itself.
const FORM_OVERHEAD: u64 = 64 * 1024;

pub fn intake_body_limit(max_image_size: u64) -> DefaultBodyLimit {
    DefaultBodyLimit::max(intake_body_bytes(max_image_size))
}

fn intake_body_bytes(max_image_size: u64) -> usize {
    usize::try_from(max_image_size.saturating_add(FORM_OVERHEAD)).unwrap_or(usize::MAX)
}

/// Image recognized and turned into a schedule, not yet persisted.
struct Recognized {
    image: StoredImage,
    schedule: String,
}

#[utoipa::path(
    post,
    path = "/verify",
    tag = "Intake",
    operation_id = "verifySchedule",
    summary = "Read a schedule from an uploaded image",
    description = "Stores the `scheduleImage`, runs OCR on it and extracts the class schedule. \
        Nothing is persisted; post the result to `/confirm` to save it.",
    request_body(content_type = "multipart/form-data", description = "Fields `name`, `grade` and `scheduleImage`"),
    responses(
        (status = 200, description = "Extracted schedule awaiting confirmation", body = VerifyResponse),
        (status = 400, description = "Missing or invalid field (VALIDATION_ERROR, FILE_NOT_ALLOWED)", body = MessageResponse),
        (status = 502, description = "OCR or extraction failed (UPSTREAM_ERROR)", body = MessageResponse),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn verify(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<VerifyResponse>, AppError> {
    let upload = ScheduleUpload::read(multipart, state.config.storage.max_image_size).await?;

    let image = upload
        .image
        .ok_or_else(|| AppError::Validation("No file part".into()))?;
    if image.file_name.trim().is_empty() {
        return Err(AppError::Validation(FilenameError::Empty.message().into()));
    }

    let (name, grade) = validate_identity(
        upload.name.as_deref().unwrap_or_default(),
        upload.grade.as_deref().unwrap_or_default(),
    )?;
    let image = accept_image(image)?;

    let recognized = recognize(&state, &image).await?;
    info!(
        image_hash = %recognized.image.hash,
        file_name = %image.file_name,
        content_type = ?image.content_type,
        "Schedule extracted for verification"
    );

    Ok(Json(VerifyResponse {
        name: name.to_string(),
        grade: grade.to_string(),
        schedule: recognized.schedule,
        image_hash: recognized.image.hash.to_hex(),
    }))
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Intake",
    operation_id = "uploadSchedule",
    summary = "Read and save a schedule in one step",
    description = "Validates `name` and `grade`, stores the `scheduleImage`, extracts the schedule \
        and saves it without a confirmation step. Always answers with a JSON `message`.",
    request_body(content_type = "multipart/form-data", description = "Fields `name`, `grade` and `scheduleImage`"),
    responses(
        (status = 201, description = "Schedule saved", body = MessageResponse),
        (status = 400, description = "Missing or invalid field (VALIDATION_ERROR, FILE_NOT_ALLOWED)", body = MessageResponse),
        (status = 502, description = "OCR or extraction failed (UPSTREAM_ERROR)", body = MessageResponse),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload = ScheduleUpload::read(multipart, state.config.storage.max_image_size).await?;

    let (name, grade) = validate_identity(
        upload.name.as_deref().unwrap_or_default(),
        upload.grade.as_deref().unwrap_or_default(),
    )?;

    let image = upload
        .image
        .filter(|part| !part.file_name.trim().is_empty())
        .ok_or_else(|| AppError::Validation(IMAGE_REQUIRED.into()))?;
    let image = accept_image(image)?;

    let recognized = recognize(&state, &image).await?;

    let model = schedule::ActiveModel {
        name: Set(name.to_string()),
        grade: Set(grade.to_string()),
        schedule: Set(recognized.schedule),
        image_hash: Set(Some(recognized.image.hash.to_hex())),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(schedule_id = model.id, image_hash = %recognized.image.hash, "Schedule saved from upload");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Schedule saved for {}", model.name),
            code: None,
            id: Some(model.id),
        }),
    ))
}

fn accept_image(image: ImagePart) -> Result<ImagePart, AppError> {
    match validate_image_filename(&image.file_name) {
        Ok(_) => Ok(image),
        Err(FilenameError::NotAnImage) => Err(AppError::FileNotAllowed),
        Err(e) => Err(AppError::Validation(e.message().into())),
    }
}

async fn recognize(state: &AppState, image: &ImagePart) -> Result<Recognized, AppError> {
    let stored = state.images.put(&image.bytes).await?;
    let text = state.recognizer.recognize(&image.bytes).await?;
    let schedule = state.extractor.extract(&text).await?;

    if schedule.trim().is_empty() {
        return Err(AppError::Upstream(format!(
            "extraction produced no schedule for image {}",
            stored.hash
        )));
    }

    Ok(Recognized {
        image: stored,
        schedule,
    })
}

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Redirect;
use chrono::Utc;
use common::api::{ConfirmRequest, MessageResponse, ScheduleListResponse, ScheduleResponse};
use common::form::validate_identity;
use common::storage::ContentHash;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use tracing::{info, instrument};

use crate::entity::schedule;
use crate::error::AppError;
use crate::extractors::form::AppForm;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/confirm",
    tag = "Schedules",
    operation_id = "confirmSchedule",
    summary = "Save a verified schedule",
    description = "Persists the schedule the student confirmed and redirects to `/schedules`.",
    request_body(content = ConfirmRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Saved; redirects to /schedules"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = MessageResponse),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn confirm(
    State(state): State<AppState>,
    AppForm(payload): AppForm<ConfirmRequest>,
) -> Result<Redirect, AppError> {
    let (name, grade) = validate_identity(&payload.name, &payload.grade)?;

    let text = payload.schedule.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Schedule is required".into()));
    }

    let image_hash = match payload.image_hash.as_deref().map(str::trim) {
        Some(hex) if !hex.is_empty() => {
            let hash: ContentHash = hex
                .parse()
                .map_err(|_| AppError::Validation("Invalid image hash".into()))?;
            if !state.images.exists(&hash).await? {
                return Err(AppError::Validation("Unknown image hash".into()));
            }
            Some(hash.to_hex())
        }
        _ => None,
    };

    let model = schedule::ActiveModel {
        name: Set(name.to_string()),
        grade: Set(grade.to_string()),
        schedule: Set(text.to_string()),
        image_hash: Set(image_hash),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(schedule_id = model.id, "Schedule confirmed");

    Ok(Redirect::to("/schedules"))
}

#[utoipa::path(
    get,
    path = "/schedules",
    tag = "Schedules",
    operation_id = "listSchedules",
    summary = "List confirmed schedules",
    responses(
        (status = 200, description = "All confirmed schedules, oldest first", body = ScheduleListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_schedules(
    State(state): State<AppState>,
) -> Result<Json<ScheduleListResponse>, AppError> {
    let rows = schedule::Entity::find()
        .order_by_asc(schedule::Column::Id)
        .all(&state.db)
        .await?;

    let total = rows.len() as u64;
    let schedules = rows.into_iter().map(ScheduleResponse::from).collect();

    Ok(Json(ScheduleListResponse { schedules, total }))
}

#[utoipa::path(
    get,
    path = "/schedules/{id}",
    tag = "Schedules",
    operation_id = "getSchedule",
    summary = "Get one confirmed schedule",
    params(("id" = i32, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule", body = ScheduleResponse),
        (status = 404, description = "Schedule not found (NOT_FOUND)", body = MessageResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let model = schedule::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule not found".into()))?;

    Ok(Json(ScheduleResponse::from(model)))
}

//! Wire types exchanged between the intake server and its clients.

use serde::{Deserialize, Serialize};

/// Body returned by `/upload` and by every failed request.
///
/// Clients only rely on `message`; `code` and `id` are informational.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    /// Human-readable text to show next to the form.
    #[schema(example = "Schedule saved for Ada")]
    pub message: String,
    /// Machine-readable error code, present on failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "VALIDATION_ERROR")]
    pub code: Option<String>,
    /// Identifier of the stored schedule, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

/// Result of recognizing and extracting a schedule before confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VerifyResponse {
    pub name: String,
    pub grade: String,
    /// Schedule text extracted from the uploaded image.
    #[schema(example = "Mon 08:00 Math\nMon 09:00 History")]
    pub schedule: String,
    /// SHA-256 of the stored image, to be passed along to `/confirm`.
    pub image_hash: String,
}

/// Fields posted to `/confirm`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ConfirmRequest {
    pub name: String,
    pub grade: String,
    pub schedule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_hash: Option<String>,
}

/// A confirmed schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScheduleResponse {
    pub id: i32,
    pub name: String,
    pub grade: String,
    pub schedule: String,
    pub image_hash: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScheduleListResponse {
    pub schedules: Vec<ScheduleResponse>,
    pub total: u64,
}

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use common::form::{FIELD_GRADE, FIELD_IMAGE, FIELD_NAME};

use crate::error::AppError;

/// Raw fields of a schedule upload, as received.
#[derive(Debug, Default)]
pub struct ScheduleUpload {
    pub name: Option<String>,
    pub grade: Option<String>,
    /// `None` when the request had no `scheduleImage` part at all.
    pub image: Option<ImagePart>,
}

#[derive(Debug)]
pub struct ImagePart {
    /// Client-supplied filename; empty when the browser sent no file.
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ScheduleUpload {
    /// Drains a multipart body. Unknown fields are ignored; a repeated field
    /// keeps its last value.
    pub async fn read(mut multipart: Multipart, max_image_size: u64) -> Result<Self, AppError> {
        let mut upload = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            match field.name() {
                Some(FIELD_NAME) => upload.name = Some(read_text(field).await?),
                Some(FIELD_GRADE) => upload.grade = Some(read_text(field).await?),
                Some(FIELD_IMAGE) => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = read_limited(field, max_image_size).await?;
                    upload.image = Some(ImagePart {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                _ => {} // Ignore unknown fields.
            }
        }

        Ok(upload)
    }
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

async fn read_limited(mut field: Field<'_>, max_size: u64) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (bytes.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

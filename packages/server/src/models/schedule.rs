use common::api::ScheduleResponse;

use crate::entity::schedule;

impl From<schedule::Model> for ScheduleResponse {
    fn from(model: schedule::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            grade: model.grade,
            schedule: model.schedule,
            image_hash: model.image_hash,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

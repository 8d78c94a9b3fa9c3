pub mod api;
pub mod form;
pub mod storage;

pub use form::{ImageRequirement, ImageUpload, ScheduleForm, ValidationReport};

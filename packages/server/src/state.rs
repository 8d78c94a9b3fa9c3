use std::sync::Arc;

use common::storage::ImageStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::extraction::ScheduleExtractor;
use crate::recognition::TextRecognizer;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub images: Arc<dyn ImageStore>,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub extractor: Arc<dyn ScheduleExtractor>,
}

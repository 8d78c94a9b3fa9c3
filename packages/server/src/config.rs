use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded schedule images.
    pub upload_dir: String,
    /// Largest accepted image, in bytes.
    pub max_image_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    /// Executable invoked as `<command> stdin stdout -l <language>`.
    pub command: String,
    pub language: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorProvider {
    /// Ask a completion endpoint to pull the schedule out of the OCR text.
    Completion,
    /// Use the OCR text as the schedule.
    Passthrough,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractorConfig {
    pub provider: ExtractorProvider,
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
    pub extractor: ExtractorConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(Environment::with_prefix("SCHEDULE").separator("__"))
    }

    fn load_with_env(env: Environment) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://schedules.db?mode=rwc")?
            .set_default("storage.upload_dir", "./uploads")?
            .set_default("storage.max_image_size", 10 * 1024 * 1024)?
            .set_default("ocr.command", "tesseract")?
            .set_default("ocr.language", "eng")?
            .set_default("extractor.provider", "passthrough")?
            .set_default("extractor.base_url", "https://api.openai.com/v1")?
            .set_default("extractor.model", "davinci-002")?
            .set_default("extractor.max_tokens", 150)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., SCHEDULE__EXTRACTOR__API_KEY)
            .add_source(env)
            .build()?;

        s.try_deserialize()
    }
}

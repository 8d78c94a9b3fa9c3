use std::net::SocketAddr;
use std::path::PathBuf;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tempfile::TempDir;

use common::storage::FilesystemImageStore;
use server::config::{
    AppConfig, CorsConfig, DatabaseConfig, ExtractorConfig, ExtractorProvider, OcrConfig,
    ServerConfig, StorageConfig,
};
use server::extraction::PassthroughExtractor;
use server::recognition::{RecognitionError, TextRecognizer};
use server::state::AppState;

pub const MAX_IMAGE_SIZE: u64 = 64 * 1024;

pub mod routes {
    pub const INDEX: &str = "/";
    pub const VERIFY: &str = "/verify";
    pub const UPLOAD: &str = "/upload";
    pub const CONFIRM: &str = "/confirm";
    pub const SCHEDULES: &str = "/schedules";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn schedule(id: i64) -> String {
        format!("/schedules/{id}")
    }
}

/// Recognizer that answers with canned text, or fails when given none.
pub struct ScriptedRecognizer {
    text: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedRecognizer {
    pub fn returning(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for ScriptedRecognizer {
    async fn recognize(&self, _image: &[u8]) -> Result<String, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text
            .clone()
            .ok_or_else(|| RecognitionError::Failed("scripted failure".into()))
    }
}

/// Formatted INFO-level log output of the current thread, without ANSI codes.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Captures events until the guard is dropped. The server spawned by
    /// `TestApp` runs on the same current-thread runtime, so its spans land here.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A running test server backed by a scratch directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub recognizer: Arc<ScriptedRecognizer>,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub location: Option<String>,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// One multipart submission; `None` fields are left out of the body.
#[derive(Default)]
pub struct Submission<'a> {
    pub name: Option<&'a str>,
    pub grade: Option<&'a str>,
    pub image: Option<(&'a str, Vec<u8>)>,
}

impl<'a> Submission<'a> {
    pub fn complete(name: &'a str, grade: &'a str, file_name: &'a str, bytes: &[u8]) -> Self {
        Self {
            name: Some(name),
            grade: Some(grade),
            image: Some((file_name, bytes.to_vec())),
        }
    }

    fn into_form(self) -> Form {
        let mut form = Form::new();
        if let Some(name) = self.name {
            form = form.text("name", name.to_string());
        }
        if let Some(grade) = self.grade {
            form = form.text("grade", grade.to_string());
        }
        if let Some((file_name, bytes)) = self.image {
            let part = Part::bytes(bytes).file_name(file_name.to_string());
            form = form.part("scheduleImage", part);
        }
        form
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(ScriptedRecognizer::returning("MON 08:00 MATH\nMON 09:00 ART")).await
    }

    pub async fn spawn_with(recognizer: ScriptedRecognizer) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let upload_dir = dir.path().join("uploads");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

        let db = server::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let images = FilesystemImageStore::new(upload_dir.clone(), MAX_IMAGE_SIZE)
            .await
            .expect("Failed to create image store");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig { url: db_url },
            storage: StorageConfig {
                upload_dir: upload_dir.display().to_string(),
                max_image_size: MAX_IMAGE_SIZE,
            },
            ocr: OcrConfig {
                command: "tesseract".to_string(),
                language: "eng".to_string(),
            },
            extractor: ExtractorConfig {
                provider: ExtractorProvider::Passthrough,
                api_key: None,
                base_url: "http://127.0.0.1:9".to_string(),
                model: "test".to_string(),
                max_tokens: 150,
            },
        };

        let recognizer = Arc::new(recognizer);
        let state = AppState {
            db,
            config,
            images: Arc::new(images),
            recognizer: recognizer.clone(),
            extractor: Arc::new(PassthroughExtractor),
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            client,
            recognizer,
            upload_dir,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn submit(&self, path: &str, submission: Submission<'_>) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .multipart(submission.into_form())
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("Failed to send form request");

        TestResponse::from_response(res).await
    }

    /// Number of images persisted in the upload directory.
    pub fn stored_image_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .expect("upload dir should exist")
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name() != ".tmp")
            .map(|shard| std::fs::read_dir(shard.path()).map_or(0, |files| files.count()))
            .sum()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            location,
            text,
            body,
        }
    }

    pub fn message(&self) -> &str {
        self.body["message"]
            .as_str()
            .expect("response body should contain 'message'")
    }
}

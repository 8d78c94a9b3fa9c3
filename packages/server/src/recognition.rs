use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::instrument;

use crate::config::OcrConfig;

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("failed to run OCR command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("OCR command failed: {0}")]
    Failed(String),

    #[error("no text recognized in image")]
    NoText,
}

/// Turns an image into plain text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String, RecognitionError>;
}

/// Runs an external OCR program that reads the image from stdin and writes
/// the text to stdout.
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `tesseract stdin stdout -l <language>`
    pub fn tesseract(config: &OcrConfig) -> Self {
        Self::new(
            config.command.clone(),
            vec![
                "stdin".into(),
                "stdout".into(),
                "-l".into(),
                config.language.clone(),
            ],
        )
    }
}

#[async_trait]
impl TextRecognizer for CommandRecognizer {
    #[instrument(skip(self, image), fields(program = %self.program, bytes = image.len()))]
    async fn recognize(&self, image: &[u8]) -> Result<String, RecognitionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Feed stdin concurrently so a chatty child cannot block on a full pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let data = image.to_vec();
            tokio::spawn(async move {
                let result = stdin.write_all(&data).await;
                drop(stdin);
                result
            })
        });

        let output = child.wait_with_output().await?;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                // The child may exit before consuming all input; its status decides.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(e.into()),
                Err(e) => return Err(RecognitionError::Failed(format!("stdin writer: {e}"))),
            }
        }

        if !output.status.success() {
            return Err(RecognitionError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(RecognitionError::NoText);
        }

        Ok(text)
    }
}

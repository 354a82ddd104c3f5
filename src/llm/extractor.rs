use crate::error::{ReportError, Result};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::extraction_prompt;
use crate::llm::types::ExtractionEvent;
use crate::service::{PdfUpload, ReportExtractor};
use log::{info, warn};
use std::path::Path;
use tokio::sync::mpsc::Sender;

pub struct ReportExtractionAgent {
    client: GeminiClient,
    model: String,
    prompt: String,
    progress: Option<Sender<ExtractionEvent>>,
}

impl ReportExtractionAgent {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            prompt: extraction_prompt(),
            progress: None,
        }
    }

    /// Replace the default instructions, e.g. for a different report layout.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_progress(mut self, progress: Sender<ExtractionEvent>) -> Self {
        self.progress = Some(progress);
        self
    }

    async fn send_event(&self, event: ExtractionEvent) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event).await;
        }
    }

    async fn run(&self, upload: &PdfUpload) -> Result<String> {
        self.send_event(ExtractionEvent::Encoding {
            filename: upload.file_name.clone(),
            bytes: upload.bytes.len(),
        })
        .await;

        self.send_event(ExtractionEvent::Requesting {
            model: self.model.clone(),
        })
        .await;

        let text = self
            .client
            .generate_content(&self.model, &self.prompt, &upload.mime_type, &upload.bytes)
            .await?;

        self.send_event(ExtractionEvent::ProcessingResponse).await;
        Ok(text)
    }
}

impl ReportExtractor for ReportExtractionAgent {
    async fn extract(&self, upload: &PdfUpload) -> Result<String> {
        self.send_event(ExtractionEvent::Starting).await;
        info!("Sending '{}' to {}", upload.file_name, self.model);

        match self.run(upload).await {
            Ok(text) => {
                self.send_event(ExtractionEvent::Success).await;
                Ok(text)
            }
            Err(e) => {
                warn!("Extraction of '{}' failed: {}", upload.file_name, e);
                self.send_event(ExtractionEvent::Failed {
                    reason: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }
}

impl PdfUpload {
    /// Reads a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ReportError::InvalidUpload("Invalid file name".to_string()))?
            .to_string();

        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        let bytes = tokio::fs::read(path).await?;

        Ok(Self::new(file_name, mime_type, bytes))
    }
}

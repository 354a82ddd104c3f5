use crate::error::{ReportError, Result};
use crate::llm::types::*;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;
use reqwest::Client;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different endpoint (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Sends the prompt together with an inline document and returns the
    /// model's text reply.
    pub async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        mime_type: &str,
        document: &[u8],
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::Text {
                    text: prompt.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.to_string(),
                        data: STANDARD.encode(document),
                    },
                },
            ])],
            // The reply must keep its fenced code block, so plain text is requested.
            generation_config: GenerationConfig {
                response_mime_type: "text/plain".to_string(),
                temperature: Some(0.0),
            },
        };

        debug!(
            "Calling Gemini model {} with a {} byte document",
            model,
            document.len()
        );

        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(ReportError::ExtractionFailed(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;

        body.text().ok_or_else(|| {
            ReportError::ExtractionFailed("The AI model returned an empty response.".to_string())
        })
    }
}

use crate::error::Result;
use crate::store::JsonFileReportStore;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_STORE_PATH: &str = "reports.json";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default)]
    pub gemini_api_key: Option<String>,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            gemini_model: default_gemini_model(),
            gemini_api_key: None,
        }
    }
}

impl DashboardConfig {
    /// Reads `REPORT_STORE_PATH`, `GEMINI_MODEL` and `GEMINI_API_KEY`,
    /// falling back to the defaults for anything unset or blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            store_path: get("REPORT_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_api_key: get("GEMINI_API_KEY"),
        }
    }

    pub fn open_store(&self) -> Result<JsonFileReportStore> {
        JsonFileReportStore::open(&self.store_path)
    }

    #[cfg(feature = "gemini")]
    pub fn extraction_agent(&self) -> Result<crate::llm::ReportExtractionAgent> {
        let api_key = self.gemini_api_key.clone().ok_or_else(|| {
            crate::error::ReportError::ExtractionFailed("GEMINI_API_KEY must be set".to_string())
        })?;
        let client = crate::llm::GeminiClient::new(api_key);
        Ok(crate::llm::ReportExtractionAgent::new(
            client,
            self.gemini_model.clone(),
        ))
    }
}

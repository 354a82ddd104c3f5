//! Admin and viewer actions over a [`ReportStore`].
//!
//! Every admin action ends in an [`ActionOutcome`]: errors from extraction,
//! parsing or storage are logged and turned into a message, never retried.

use crate::aggregate::combine;
use crate::error::{ReportError, Result};
use crate::month::Month;
use crate::parser;
use crate::schema::{AggregatedRecord, MonthlyRecord};
use crate::store::ReportStore;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// An uploaded report file.
#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PdfUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(ReportError::InvalidUpload(
                "Không có tệp nào được tải lên.".to_string(),
            ));
        }
        if self.mime_type != PDF_MIME_TYPE {
            return Err(ReportError::InvalidUpload(
                "Loại tệp không hợp lệ. Vui lòng tải lên một tệp PDF.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sends a PDF to a model and returns its raw text reply.
pub trait ReportExtractor: Send + Sync {
    fn extract(&self, upload: &PdfUpload) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub struct ReportService<S, E> {
    store: S,
    extractor: E,
}

impl<S: ReportStore, E: ReportExtractor> ReportService<S, E> {
    pub fn new(store: S, extractor: E) -> Self {
        Self { store, extractor }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Extracts, parses and stores the report for `month`.
    ///
    /// The store is only written when every earlier step succeeded.
    pub async fn upload_report(&self, month: Month, upload: PdfUpload) -> ActionOutcome {
        match self.process_upload(month, &upload).await {
            Ok(()) => ActionOutcome::success(format!(
                "Đã xử lý và lưu báo cáo cho {} thành công.",
                month
            )),
            Err(e) => {
                error!("Upload of '{}' for {} failed: {}", upload.file_name, month, e);
                ActionOutcome::failure(failure_message(e))
            }
        }
    }

    async fn process_upload(&self, month: Month, upload: &PdfUpload) -> Result<()> {
        upload.validate()?;

        info!(
            "Extracting report for {} from '{}' ({} bytes)",
            month,
            upload.file_name,
            upload.bytes.len()
        );
        let raw_text = self.extractor.extract(upload).await?;
        let mut record = parser::parse(&raw_text)?;
        stamp_month(&mut record, month);

        self.store.save(month, &record)
    }

    /// Every stored report; a store failure yields an empty map.
    pub fn load_all_reports(&self) -> BTreeMap<Month, MonthlyRecord> {
        match self.store.load_all() {
            Ok(reports) => reports,
            Err(e) => {
                error!("Error loading reports: {}", e);
                BTreeMap::new()
            }
        }
    }

    pub fn delete_report(&self, month: Month) -> ActionOutcome {
        match self.store.delete(month) {
            Ok(()) => ActionOutcome::success(format!("Đã xóa báo cáo {} thành công.", month)),
            Err(e) => {
                error!("Deleting report for {} failed: {}", month, e);
                ActionOutcome::failure(failure_message(e))
            }
        }
    }

    /// The combined view for a selection, or `None` when nothing is selected.
    pub fn view<I>(&self, selected: I) -> Option<AggregatedRecord>
    where
        I: IntoIterator<Item = Month>,
    {
        let selected: Vec<Month> = selected.into_iter().collect();
        if selected.is_empty() {
            return None;
        }
        Some(combine(selected, &self.load_all_reports()))
    }
}

/// Replaces the model's placeholder label with the month the admin chose.
fn stamp_month(record: &mut MonthlyRecord, month: Month) {
    record.trends.labels = vec![month.label()];
}

fn failure_message(err: ReportError) -> String {
    match err {
        ReportError::InvalidUpload(message) | ReportError::Store(message) => message,
        other => other.to_string(),
    }
}

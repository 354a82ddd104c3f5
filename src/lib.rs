//! # Health Report Dashboard
//!
//! Turns monthly public-health PDF reports into structured statistics (via an
//! LLM) and combines any selection of months into one view.
//!
//! ## Core Concepts
//!
//! - **MonthlyRecord**: everything extracted from one month's report, complete after parsing
//! - **Month**: a reporting month 1-12, labelled `"Tháng N"` and ordered numerically
//! - **Parser**: the only seam where the model's optional, loosely shaped JSON becomes a record
//! - **Aggregation**: per-month series side by side, summed totals, percentages recomputed from counts
//! - **Report Store**: one record per month, replaced wholesale on re-upload
//!
//! ## Example
//!
//! ```rust,ignore
//! use health_report_dashboard::*;
//! use std::collections::BTreeMap;
//!
//! let reply = "```json\n{\"trends\":{\"labels\":[\"PlaceholderMonth\"],\"sxh\":[5],\"tcm\":[3],\"soi\":[1]}}\n```";
//! let record = parse(reply).unwrap();
//!
//! let jan = Month::new(1).unwrap();
//! let records = BTreeMap::from([(jan, record)]);
//! let combined = combine([jan], &records);
//! assert_eq!(combined.trends.labels, vec!["Tháng 1"]);
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod month;
pub mod parser;
pub mod presentation;
pub mod schema;
pub mod service;
pub mod store;

#[cfg(feature = "gemini")]
pub mod llm;

pub use aggregate::{available_months, combine, format_visit_count, percentage};
pub use config::DashboardConfig;
pub use error::{FormatError, ReportError, Result};
pub use month::Month;
pub use parser::{extract_json_block, parse};
pub use presentation::{Presentation, SummaryTable, TextSummaryRenderer};
pub use schema::*;
pub use service::{ActionOutcome, PdfUpload, ReportExtractor, ReportService};
pub use store::{JsonFileReportStore, MemoryReportStore, ReportStore};

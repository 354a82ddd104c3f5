//! Persistence of one [`MonthlyRecord`] per month.

use crate::error::{ReportError, Result};
use crate::month::Month;
use crate::schema::MonthlyRecord;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// Key-value storage of monthly reports.
///
/// `save` replaces any existing record for the month in full. `delete` of a
/// month that was never stored succeeds. Concurrent writers race with
/// last-write-wins semantics.
pub trait ReportStore: Send + Sync {
    fn save(&self, month: Month, record: &MonthlyRecord) -> Result<()>;

    fn load(&self, month: Month) -> Result<Option<MonthlyRecord>>;

    fn load_all(&self) -> Result<BTreeMap<Month, MonthlyRecord>>;

    fn delete(&self, month: Month) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: RwLock<BTreeMap<Month, MonthlyRecord>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reports(reports: BTreeMap<Month, MonthlyRecord>) -> Self {
        Self {
            reports: RwLock::new(reports),
        }
    }
}

fn poisoned<T>(_: T) -> ReportError {
    ReportError::Store("report store lock poisoned".to_string())
}

impl ReportStore for MemoryReportStore {
    fn save(&self, month: Month, record: &MonthlyRecord) -> Result<()> {
        self.reports
            .write()
            .map_err(poisoned)?
            .insert(month, record.clone());
        debug!("Saved report for {} in memory", month);
        Ok(())
    }

    fn load(&self, month: Month) -> Result<Option<MonthlyRecord>> {
        Ok(self.reports.read().map_err(poisoned)?.get(&month).cloned())
    }

    fn load_all(&self) -> Result<BTreeMap<Month, MonthlyRecord>> {
        Ok(self.reports.read().map_err(poisoned)?.clone())
    }

    fn delete(&self, month: Month) -> Result<()> {
        self.reports.write().map_err(poisoned)?.remove(&month);
        debug!("Deleted report for {} from memory", month);
        Ok(())
    }
}

/// Stores every report in one JSON document keyed by month label.
///
/// ```json
/// { "Tháng 1": { "trends": { ... }, ... }, "Tháng 2": { ... } }
/// ```
pub struct JsonFileReportStore {
    file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileReportStore {
    /// Opens the store, creating the file (and parent directories) with an
    /// empty document when it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = path.into();

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| store_io("create store directory", e))?;
            }
        }

        if !file_path.exists() {
            write_document(&file_path, &BTreeMap::new())?;
            info!("Created empty report store at {}", file_path.display());
        }

        Ok(Self {
            file_path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_document(&self) -> Result<BTreeMap<Month, MonthlyRecord>> {
        let file = File::open(&self.file_path).map_err(|e| store_io("open report store", e))?;
        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                ReportError::Store(format!(
                    "Failed to read reports from {}: {}",
                    self.file_path.display(),
                    e
                ))
            })?;

        let mut reports = BTreeMap::new();
        for (label, value) in raw {
            let month = match label.parse::<Month>() {
                Ok(month) => month,
                Err(_) => {
                    warn!("Ignoring report stored under unknown key '{}'", label);
                    continue;
                }
            };
            let record: MonthlyRecord = serde_json::from_value(value).map_err(|e| {
                ReportError::Store(format!("Stored report for {} is malformed: {}", label, e))
            })?;
            reports.insert(month, record);
        }

        Ok(reports)
    }

    fn modify<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<Month, MonthlyRecord>),
    {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        let mut reports = self.read_document()?;
        change(&mut reports);
        write_document(&self.file_path, &reports)
    }
}

fn store_io(action: &str, err: std::io::Error) -> ReportError {
    ReportError::Store(format!("Failed to {}: {}", action, err))
}

/// Writes to a sibling temp file and renames it over the target, so readers
/// never observe a half-written document.
fn write_document(path: &Path, reports: &BTreeMap<Month, MonthlyRecord>) -> Result<()> {
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    let written = write_pretty(&tmp_path, reports).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| store_io("replace report store", e))
    });

    // Leave no temp file behind after a failed write.
    if written.is_err() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            debug!("Could not remove {}: {}", tmp_path.display(), e);
        }
    }
    written
}

fn write_pretty(path: &Path, reports: &BTreeMap<Month, MonthlyRecord>) -> Result<()> {
    let file = File::create(path).map_err(|e| store_io("write report store", e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, reports)?;
    writer
        .flush()
        .map_err(|e| store_io("flush report store", e))
}

impl ReportStore for JsonFileReportStore {
    fn save(&self, month: Month, record: &MonthlyRecord) -> Result<()> {
        self.modify(|reports| {
            reports.insert(month, record.clone());
        })?;
        info!("Report saved: {}", month);
        Ok(())
    }

    fn load(&self, month: Month) -> Result<Option<MonthlyRecord>> {
        let mut reports = self.read_document()?;
        let record = reports.remove(&month);
        if record.is_none() {
            debug!("No report found for month: {}", month);
        }
        Ok(record)
    }

    fn load_all(&self) -> Result<BTreeMap<Month, MonthlyRecord>> {
        let reports = self.read_document()?;
        debug!(
            "Loaded reports: {:?}",
            reports.keys().map(|m| m.label()).collect::<Vec<_>>()
        );
        Ok(reports)
    }

    fn delete(&self, month: Month) -> Result<()> {
        self.modify(|reports| {
            reports.remove(&month);
        })?;
        info!("Report deleted: {}", month);
        Ok(())
    }
}

//! Sinks that consume an aggregated record.
//!
//! Chart drawing and document export live outside this crate; the
//! [`SummaryTable`] is the tabular summary shown next to them.

use crate::error::Result;
use crate::month::Month;
use crate::schema::AggregatedRecord;
use std::fmt;

/// Anything that can display a combined record for an ordered month selection.
pub trait Presentation {
    fn render(&mut self, record: &AggregatedRecord, months: &[Month]) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub caption: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub title: String,
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    pub months: Vec<Month>,
    pub sections: Vec<SummarySection>,
}

/// Groups digits in threes with commas: `1234567` → `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn row(caption: &str, value: String) -> SummaryRow {
    SummaryRow {
        caption: caption.to_string(),
        value,
    }
}

fn count(value: u64) -> String {
    group_thousands(value)
}

fn share(cases: u64, percentage: f64) -> String {
    format!("{} ({}%)", group_thousands(cases), percentage)
}

impl SummaryTable {
    pub fn from_record(record: &AggregatedRecord, months: &[Month]) -> Self {
        let h = &record.highlights;
        let traffic = &record.accidents.traffic_accidents;
        let occupational = &record.accidents.occupational_accidents;
        let d = &record.additional_diseases;

        let sections = vec![
            SummarySection {
                title: "Điểm nổi bật".to_string(),
                rows: vec![
                    row("Tổng lượt khám", h.tong_kham.clone()),
                    row("Tổng lượt khám (số)", count(h.tong_kham_so)),
                    row("Khám nội trú", count(h.kham_noi_tru)),
                    row("Ca tiêu chảy", count(h.tieu_chay)),
                    row("Ca HIV/AIDS", count(h.hiv)),
                    row("Ca viêm màng não do não mô cầu", count(h.nao_mo_cau)),
                ],
            },
            SummarySection {
                title: "Tai nạn".to_string(),
                rows: vec![
                    row("Tai nạn giao thông - Tổng số", count(traffic.total)),
                    row(
                        "Tai nạn giao thông - Ca tại địa phương",
                        share(traffic.local_cases, traffic.local_percentage),
                    ),
                    row(
                        "Tai nạn giao thông - Ca do rượu bia",
                        share(traffic.alcohol_cases, traffic.alcohol_percentage),
                    ),
                    row("Tai nạn lao động - Tổng số", count(occupational.total)),
                    row(
                        "Tai nạn lao động - Số người bị thương",
                        count(occupational.injuries),
                    ),
                    row("Tai nạn lao động - Số người tử vong", count(occupational.deaths)),
                ],
            },
            SummarySection {
                title: "Các bệnh truyền nhiễm khác".to_string(),
                rows: vec![
                    row("Đậu mùa khỉ", count(d.dau_mua_khi)),
                    row("Bạch hầu", count(d.bach_hau)),
                    row("SARS", count(d.sars)),
                    row("Cúm A(H5N1)", count(d.cum_ah5n1)),
                    row("Cúm A(H1N1)", count(d.cum_ah1n1)),
                ],
            },
        ];

        Self {
            months: months.to_vec(),
            sections,
        }
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bảng Tổng Hợp Dữ Liệu")?;
        if !self.months.is_empty() {
            let labels: Vec<String> = self.months.iter().map(|m| m.label()).collect();
            writeln!(f, "{}", labels.join(", "))?;
        }

        let caption_width = self
            .sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .map(|r| r.caption.chars().count())
            .max()
            .unwrap_or(0);

        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.title)?;
            for r in &section.rows {
                let pad = caption_width - r.caption.chars().count();
                writeln!(f, "  {}{}  {}", r.caption, " ".repeat(pad), r.value)?;
            }
        }
        Ok(())
    }
}

/// Renders summary tables into an in-memory text buffer.
#[derive(Debug, Default)]
pub struct TextSummaryRenderer {
    pub output: String,
}

impl Presentation for TextSummaryRenderer {
    fn render(&mut self, record: &AggregatedRecord, months: &[Month]) -> Result<()> {
        let table = SummaryTable::from_record(record, months);
        self.output.push_str(&table.to_string());
        Ok(())
    }
}

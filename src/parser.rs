//! Turns the extraction model's free-form reply into a complete [`MonthlyRecord`].
//!
//! The reply is expected to contain a single ```` ```json ```` fenced block.
//! Everything the model may omit is optional here; [`RawReport::normalize`]
//! is the one place where absent sections are filled with zeros.

use crate::error::FormatError;
use crate::schema::{
    null_as_default, null_series_as_zeros, Accidents, AdditionalDiseases, Composition,
    Highlights, MonthlyRecord, TrendSeries, Trends,
};
use log::{debug, warn};
use serde::{Deserialize, Deserializer};

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Returns the trimmed contents of the first ```` ```json ```` block, if any.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE_OPEN)? + FENCE_OPEN.len();
    let rest = &text[start..];
    let end = rest.find(FENCE_CLOSE)?;
    let block = rest[..end].trim();

    if block.is_empty() {
        None
    } else {
        Some(block)
    }
}

/// Parses and normalizes the model's reply.
pub fn parse(raw_text: &str) -> Result<MonthlyRecord, FormatError> {
    let block = extract_json_block(raw_text).ok_or_else(|| {
        warn!("Model response did not contain a JSON code block");
        debug!("Response without JSON block: {}", raw_text);
        FormatError::MissingJsonBlock
    })?;

    let raw: RawReport = serde_json::from_str(block).map_err(|e| {
        warn!("Failed to parse extracted JSON: {}", e);
        debug!("Invalid JSON content: {}", block);
        FormatError::InvalidJson {
            details: e.to_string(),
        }
    })?;

    Ok(raw.normalize())
}

/// The record exactly as the model produced it, before defaults are applied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    trends: RawTrends,
    composition: Option<RawComposition>,
    highlights: Option<Highlights>,
    accidents: Option<Accidents>,
    additional_diseases: Option<AdditionalDiseases>,
}

#[derive(Debug, Deserialize)]
struct RawTrends {
    #[serde(default, deserialize_with = "null_as_default")]
    labels: Vec<String>,
    #[serde(default, deserialize_with = "null_series_as_zeros")]
    sxh: Vec<u64>,
    #[serde(default, deserialize_with = "null_series_as_zeros")]
    tcm: Vec<u64>,
    #[serde(default, deserialize_with = "null_series_as_zeros")]
    soi: Vec<u64>,
    #[serde(default, rename = "dauMuaKhi", deserialize_with = "optional_series")]
    dau_mua_khi: Option<Vec<u64>>,
    #[serde(default, rename = "bachHau", deserialize_with = "optional_series")]
    bach_hau: Option<Vec<u64>>,
    #[serde(default, deserialize_with = "optional_series")]
    sars: Option<Vec<u64>>,
    #[serde(default, rename = "cumAH5N1", deserialize_with = "optional_series")]
    cum_ah5n1: Option<Vec<u64>>,
    #[serde(default, rename = "cumAH1N1", deserialize_with = "optional_series")]
    cum_ah1n1: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
struct RawComposition {
    #[serde(default, deserialize_with = "null_series_as_zeros")]
    data: Vec<u64>,
}

/// An extended series that is `None` when absent or `null`; `null` entries count as zero.
fn optional_series<'de, D>(deserializer: D) -> Result<Option<Vec<u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Option<u64>>> = Option::deserialize(deserializer)?;
    Ok(values.map(|values| values.into_iter().map(|v| v.unwrap_or(0)).collect()))
}

impl RawTrends {
    fn into_trends(self) -> Trends {
        let mut trends = Trends {
            labels: self.labels,
            sxh: self.sxh,
            tcm: self.tcm,
            soi: self.soi,
            ..Trends::default()
        };

        let extended = [
            self.dau_mua_khi,
            self.bach_hau,
            self.sars,
            self.cum_ah5n1,
            self.cum_ah1n1,
        ];
        for (series, values) in TrendSeries::EXTENDED.into_iter().zip(extended) {
            *trends.series_mut(series) = values.unwrap_or_else(|| vec![0]);
        }

        trends
    }
}

impl RawReport {
    fn normalize(self) -> MonthlyRecord {
        let trends = self.trends.into_trends();

        let data = match self.composition {
            Some(composition) => {
                let mut data = [0u64; 3];
                for (slot, value) in data.iter_mut().zip(composition.data) {
                    *slot = value;
                }
                data
            }
            None => [
                trends.single_value(TrendSeries::Sxh),
                trends.single_value(TrendSeries::Tcm),
                trends.single_value(TrendSeries::Soi),
            ],
        };

        // The display string is always derived downstream, never trusted.
        let highlights = match self.highlights {
            Some(highlights) => Highlights {
                tong_kham: String::new(),
                ..highlights
            },
            None => Highlights::default(),
        };

        MonthlyRecord {
            trends,
            composition: Composition {
                data,
                ..Composition::default()
            },
            highlights,
            accidents: self.accidents.unwrap_or_default(),
            additional_diseases: self.additional_diseases.unwrap_or_default(),
        }
    }
}

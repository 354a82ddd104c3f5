use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed labels of the three-disease composition breakdown, in `data` order.
pub const COMPOSITION_LABELS: [&str; 3] = ["Sốt xuất huyết", "Tay chân miệng", "Sởi"];

/// Reads an explicit `null` the same way as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A series where both the whole array and single entries may be `null`.
pub(crate) fn null_series_as_zeros<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Option<u64>>> = Option::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(|value| value.unwrap_or(0))
        .collect())
}

/// Every disease tracked as a per-month time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrendSeries {
    Sxh,
    Tcm,
    Soi,
    DauMuaKhi,
    BachHau,
    Sars,
    CumAH5N1,
    CumAH1N1,
}

impl TrendSeries {
    pub const ALL: [TrendSeries; 8] = [
        TrendSeries::Sxh,
        TrendSeries::Tcm,
        TrendSeries::Soi,
        TrendSeries::DauMuaKhi,
        TrendSeries::BachHau,
        TrendSeries::Sars,
        TrendSeries::CumAH5N1,
        TrendSeries::CumAH1N1,
    ];

    /// Series that are optional in the model output and default to `[0]`.
    pub const EXTENDED: [TrendSeries; 5] = [
        TrendSeries::DauMuaKhi,
        TrendSeries::BachHau,
        TrendSeries::Sars,
        TrendSeries::CumAH5N1,
        TrendSeries::CumAH1N1,
    ];

    /// JSON key under `trends`.
    pub fn key(self) -> &'static str {
        match self {
            TrendSeries::Sxh => "sxh",
            TrendSeries::Tcm => "tcm",
            TrendSeries::Soi => "soi",
            TrendSeries::DauMuaKhi => "dauMuaKhi",
            TrendSeries::BachHau => "bachHau",
            TrendSeries::Sars => "sars",
            TrendSeries::CumAH5N1 => "cumAH5N1",
            TrendSeries::CumAH1N1 => "cumAH1N1",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TrendSeries::Sxh => "Sốt xuất huyết",
            TrendSeries::Tcm => "Tay chân miệng",
            TrendSeries::Soi => "Sởi",
            TrendSeries::DauMuaKhi => "Đậu mùa khỉ",
            TrendSeries::BachHau => "Bạch hầu",
            TrendSeries::Sars => "SARS",
            TrendSeries::CumAH5N1 => "Cúm A(H5N1)",
            TrendSeries::CumAH1N1 => "Cúm A(H1N1)",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Trends {
    #[schemars(description = "One label per reporting month. For a single-month report use [\"PlaceholderMonth\"].")]
    #[serde(deserialize_with = "null_as_default")]
    pub labels: Vec<String>,

    #[schemars(description = "Cases of 'Sốt xuất huyết' (dengue fever), one value per label")]
    #[serde(deserialize_with = "null_series_as_zeros")]
    pub sxh: Vec<u64>,

    #[schemars(description = "Cases of 'Tay chân miệng' (hand, foot and mouth disease), one value per label")]
    #[serde(deserialize_with = "null_series_as_zeros")]
    pub tcm: Vec<u64>,

    #[schemars(description = "Cases of 'Sởi' (measles), one value per label")]
    #[serde(deserialize_with = "null_series_as_zeros")]
    pub soi: Vec<u64>,

    #[serde(rename = "dauMuaKhi")]
    #[schemars(description = "Cases of 'Đậu mùa khỉ' (monkeypox), one value per label")]
    #[serde(deserialize_with = "null_series_as_zeros")]
    pub dau_mua_khi: Vec<u64>,

    #[serde(rename = "bachHau")]
    #[schemars(description = "Cases of 'Bạch hầu' (diphtheria), one value per label")]
    #[serde(deserialize_with = "null_series_as_zeros")]
    pub bach_hau: Vec<u64>,

    #[schemars(description = "Cases of SARS, one value per label")]
    #[serde(deserialize_with = "null_series_as_zeros")]
    pub sars: Vec<u64>,

    #[serde(rename = "cumAH5N1")]
    #[schemars(description = "Cases of influenza A(H5N1), one value per label")]
    #[serde(deserialize_with = "null_series_as_zeros")]
    pub cum_ah5n1: Vec<u64>,

    #[serde(rename = "cumAH1N1")]
    #[schemars(description = "Cases of influenza A(H1N1), one value per label")]
    #[serde(deserialize_with = "null_series_as_zeros")]
    pub cum_ah1n1: Vec<u64>,
}

impl Trends {
    pub fn series(&self, which: TrendSeries) -> &Vec<u64> {
        match which {
            TrendSeries::Sxh => &self.sxh,
            TrendSeries::Tcm => &self.tcm,
            TrendSeries::Soi => &self.soi,
            TrendSeries::DauMuaKhi => &self.dau_mua_khi,
            TrendSeries::BachHau => &self.bach_hau,
            TrendSeries::Sars => &self.sars,
            TrendSeries::CumAH5N1 => &self.cum_ah5n1,
            TrendSeries::CumAH1N1 => &self.cum_ah1n1,
        }
    }

    pub fn series_mut(&mut self, which: TrendSeries) -> &mut Vec<u64> {
        match which {
            TrendSeries::Sxh => &mut self.sxh,
            TrendSeries::Tcm => &mut self.tcm,
            TrendSeries::Soi => &mut self.soi,
            TrendSeries::DauMuaKhi => &mut self.dau_mua_khi,
            TrendSeries::BachHau => &mut self.bach_hau,
            TrendSeries::Sars => &mut self.sars,
            TrendSeries::CumAH5N1 => &mut self.cum_ah5n1,
            TrendSeries::CumAH1N1 => &mut self.cum_ah1n1,
        }
    }

    /// The single-month value of a series; an empty series counts as zero.
    pub fn single_value(&self, which: TrendSeries) -> u64 {
        self.series(which).first().copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Composition {
    #[schemars(description = "Always [\"Sốt xuất huyết\", \"Tay chân miệng\", \"Sởi\"]")]
    #[serde(deserialize_with = "null_as_default")]
    pub labels: Vec<String>,

    #[schemars(description = "Case counts for the three labels, same numbers as the trends arrays")]
    #[serde(deserialize_with = "null_as_default")]
    pub data: [u64; 3],
}

impl Default for Composition {
    fn default() -> Self {
        Self {
            labels: COMPOSITION_LABELS.iter().map(|l| l.to_string()).collect(),
            data: [0; 3],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Highlights {
    /// Human-readable abbreviation of `tong_kham_so`, computed after aggregation.
    #[serde(rename = "tongKham")]
    #[schemars(description = "Leave empty; computed by the application")]
    #[serde(deserialize_with = "null_as_default")]
    pub tong_kham: String,

    #[serde(rename = "tongKhamSo")]
    #[schemars(description = "Total number of medical visits ('Tổng số lượt khám bệnh')")]
    #[serde(deserialize_with = "null_as_default")]
    pub tong_kham_so: u64,

    #[serde(rename = "khamNoiTru")]
    #[schemars(description = "Inpatient examinations and treatment ('khám và điều trị nội trú')")]
    #[serde(deserialize_with = "null_as_default")]
    pub kham_noi_tru: u64,

    #[serde(rename = "tieuChay")]
    #[schemars(description = "Cases of diarrhoea ('Tiêu chảy')")]
    #[serde(deserialize_with = "null_as_default")]
    pub tieu_chay: u64,

    #[schemars(description = "HIV/AIDS cases")]
    #[serde(deserialize_with = "null_as_default")]
    pub hiv: u64,

    #[serde(rename = "naoMoCau")]
    #[schemars(description = "Meningococcal cases ('Não mô cầu')")]
    #[serde(deserialize_with = "null_as_default")]
    pub nao_mo_cau: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TrafficAccidents {
    #[schemars(description = "Total number of traffic accidents")]
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,

    #[schemars(description = "Accidents occurring locally ('Xảy ra trên địa bàn')")]
    #[serde(deserialize_with = "null_as_default")]
    pub local_cases: u64,

    #[schemars(description = "Share of local cases, in percent with one decimal")]
    #[serde(deserialize_with = "null_as_default")]
    pub local_percentage: f64,

    #[schemars(description = "Cases with alcohol in the blood ('có nồng độ cồn trong máu')")]
    #[serde(deserialize_with = "null_as_default")]
    pub alcohol_cases: u64,

    #[schemars(description = "Share of alcohol-related cases, in percent with one decimal")]
    #[serde(deserialize_with = "null_as_default")]
    pub alcohol_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OccupationalAccidents {
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub injuries: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub deaths: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Accidents {
    #[serde(deserialize_with = "null_as_default")]
    pub traffic_accidents: TrafficAccidents,
    #[serde(deserialize_with = "null_as_default")]
    pub occupational_accidents: OccupationalAccidents,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AdditionalDiseases {
    #[serde(rename = "dauMuaKhi")]
    #[serde(deserialize_with = "null_as_default")]
    pub dau_mua_khi: u64,

    #[serde(rename = "bachHau")]
    #[serde(deserialize_with = "null_as_default")]
    pub bach_hau: u64,

    #[serde(deserialize_with = "null_as_default")]
    pub sars: u64,

    #[serde(rename = "cumAH5N1")]
    #[serde(deserialize_with = "null_as_default")]
    pub cum_ah5n1: u64,

    #[serde(rename = "cumAH1N1")]
    #[serde(deserialize_with = "null_as_default")]
    pub cum_ah1n1: u64,
}

/// One month's statistics, complete after normalization.
///
/// Stored documents that predate a section deserialize it as all zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct MonthlyRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub trends: Trends,
    #[serde(deserialize_with = "null_as_default")]
    pub composition: Composition,
    #[serde(deserialize_with = "null_as_default")]
    pub highlights: Highlights,
    #[serde(deserialize_with = "null_as_default")]
    pub accidents: Accidents,
    #[serde(deserialize_with = "null_as_default")]
    pub additional_diseases: AdditionalDiseases,
}

/// The combined view over several months. Same shape as a single month, with
/// per-month series, summed scalars and recomputed percentages.
pub type AggregatedRecord = MonthlyRecord;

impl MonthlyRecord {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(MonthlyRecord)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

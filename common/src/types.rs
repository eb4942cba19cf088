//! 指標照合・データ整形の型定義
//!
//! - IndicatorRecord: GHOカタログの1指標（コード＋表示名）
//! - Candidate: 照合候補（類似度付き）
//! - MatchReportRow: 照合レポートの1行（CSV出力用）
//! - Observation / LongRow / WideRow: 指標データの整形

use serde::{Deserialize, Deserializer, Serialize};

/// 照合候補なしの場合に出力する表示名
pub const NO_MATCH_FOUND: &str = "NO MATCH FOUND";

/// GHOカタログの指標レコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorRecord {
    #[serde(rename = "IndicatorCode")]
    pub code: String,

    /// null・欠落は空文字として扱う
    #[serde(rename = "IndicatorName", default, deserialize_with = "null_as_empty")]
    pub name: String,
}

impl IndicatorRecord {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 照合候補
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub code: String,
    pub name: String,
    /// 0.0〜1.0
    pub similarity: f64,
}

/// 照合レポートの1行
///
/// CSVヘッダー: `RequestedIndicator,Rank,IndicatorCode,IndicatorName,Similarity`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchReportRow {
    pub requested_indicator: String,
    pub rank: Option<usize>,
    pub indicator_code: String,
    pub indicator_name: String,
    pub similarity: Option<f64>,
}

impl MatchReportRow {
    /// 候補なしを示す行
    pub fn no_match(requested: &str) -> Self {
        Self {
            requested_indicator: requested.to_string(),
            rank: None,
            indicator_code: String::new(),
            indicator_name: NO_MATCH_FOUND.to_string(),
            similarity: None,
        }
    }

    pub fn is_no_match(&self) -> bool {
        self.rank.is_none() && self.indicator_name == NO_MATCH_FOUND
    }
}

/// GHOデータAPIの観測値1行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Observation {
    #[serde(deserialize_with = "lenient_text")]
    pub spatial_dim: Option<String>,
    /// 数値・文字列どちらの場合もある
    pub time_dim: Option<serde_json::Value>,
    pub numeric_value: Option<f64>,
    /// 表示用の値（例: `"12.5 [10.1-14.9]"`）
    pub value: Option<serde_json::Value>,
    #[serde(deserialize_with = "lenient_text")]
    pub unit: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub dim1: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub dim2: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub dim3: Option<String>,
}

/// 文字列・数値・真偽値を文字列として受け取る（null は None）
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "文字列または数値を期待: {}",
            other
        ))),
    }
}

/// long形式の1行（国×年×値）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongRow {
    pub country: String,
    pub year: i64,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub dim1: Option<String>,
    pub dim2: Option<String>,
    pub dim3: Option<String>,
}

/// long形式に付随する任意列
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExtraColumn {
    Unit,
    Dim1,
    Dim2,
    Dim3,
}

impl ExtraColumn {
    pub const ALL: [ExtraColumn; 4] = [
        ExtraColumn::Unit,
        ExtraColumn::Dim1,
        ExtraColumn::Dim2,
        ExtraColumn::Dim3,
    ];

    /// API上の列名（出力ヘッダーにもそのまま使う）
    pub fn name(&self) -> &'static str {
        match self {
            ExtraColumn::Unit => "Unit",
            ExtraColumn::Dim1 => "Dim1",
            ExtraColumn::Dim2 => "Dim2",
            ExtraColumn::Dim3 => "Dim3",
        }
    }

    pub fn get<'a>(&self, row: &'a LongRow) -> Option<&'a str> {
        match self {
            ExtraColumn::Unit => row.unit.as_deref(),
            ExtraColumn::Dim1 => row.dim1.as_deref(),
            ExtraColumn::Dim2 => row.dim2.as_deref(),
            ExtraColumn::Dim3 => row.dim3.as_deref(),
        }
    }
}

/// long形式テーブル
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongTable {
    /// 元データに存在した任意列（出力順）
    pub extra_columns: Vec<ExtraColumn>,
    pub rows: Vec<LongRow>,
}

impl LongTable {
    /// ヘッダー行: `country,year,value[,Unit,Dim1..Dim3]`
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["country".to_string(), "year".to_string(), "value".to_string()];
        header.extend(self.extra_columns.iter().map(|c| c.name().to_string()));
        header
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// wide形式の1行（国ごと）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideRow {
    pub country: String,
    /// `WideTable::years` と同じ順序
    pub values: Vec<Option<f64>>,
}

/// wide形式テーブル（国×年のピボット）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    pub years: Vec<i64>,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    /// ヘッダー行: `country,<year>...`
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["country".to_string()];
        header.extend(self.years.iter().map(|y| y.to_string()));
        header
    }
}

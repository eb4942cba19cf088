//! 指標データの整形（long形式・wide形式）
//!
//! ## 処理フロー
//! 1. APIの `value` 配列を `ObservationTable` に変換
//! 2. 国・年・値の long 形式に整形（国・年が欠けた行は除外）
//! 3. 国×年の wide 形式にピボット

use crate::error::{Error, Result};
use crate::types::{ExtraColumn, LongRow, LongTable, Observation, WideRow, WideTable};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

pub const COL_COUNTRY: &str = "SpatialDim";
pub const COL_YEAR: &str = "TimeDim";
pub const COL_NUMERIC_VALUE: &str = "NumericValue";
pub const COL_VALUE: &str = "Value";

/// 厳密モードで必須とする列
pub const STRICT_COLUMNS: [&str; 3] = [COL_COUNTRY, COL_YEAR, COL_NUMERIC_VALUE];

/// APIから取得した観測値テーブル
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    /// いずれかの行に存在した列名（値がnullでも存在扱い）
    pub columns: BTreeSet<String>,
    pub rows: Vec<Observation>,
}

impl ObservationTable {
    /// APIの `value` 配列の要素から作成
    pub fn from_records(records: Vec<Map<String, Value>>) -> Result<Self> {
        let mut columns = BTreeSet::new();
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            columns.extend(record.keys().cloned());
            let row: Observation = serde_json::from_value(Value::Object(record))
                .map_err(|e| Error::Format(format!("観測値の形式が不正: {}", e)))?;
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 必須列がすべて存在するか確認
    pub fn require_columns(&self, required: &[&str]) -> Result<()> {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|c| !self.has_column(c))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        Err(Error::Format(format!(
            "Missing columns {:?}. Available: {:?}",
            missing,
            self.columns.iter().collect::<Vec<_>>()
        )))
    }
}

/// long形式に整形
///
/// - `NumericValue` 列があればその値、なければ `Value` を数値として解釈
/// - `SpatialDim` → country, `TimeDim` → year（整数に変換できない行は除外）
/// - `Unit`, `Dim1`〜`Dim3` は列が存在する場合のみ出力
///
/// 行が1件もない場合は空のテーブル。行があるのに国・年の列がない場合はエラー。
pub fn to_long(table: &ObservationTable) -> Result<LongTable> {
    if table.is_empty() {
        return Ok(LongTable::default());
    }
    table.require_columns(&[COL_COUNTRY, COL_YEAR])?;

    let use_numeric = table.has_column(COL_NUMERIC_VALUE);
    let use_display = table.has_column(COL_VALUE);

    let extra_columns: Vec<ExtraColumn> = ExtraColumn::ALL
        .into_iter()
        .filter(|c| table.has_column(c.name()))
        .collect();

    let rows = table
        .rows
        .iter()
        .filter_map(|obs| {
            let country = obs.spatial_dim.clone()?;
            let year = obs.time_dim.as_ref().and_then(parse_year)?;

            let value = if use_numeric {
                obs.numeric_value
            } else if use_display {
                obs.value.as_ref().and_then(parse_number)
            } else {
                None
            };

            Some(LongRow {
                country,
                year,
                value,
                unit: obs.unit.clone(),
                dim1: obs.dim1.clone(),
                dim2: obs.dim2.clone(),
                dim3: obs.dim3.clone(),
            })
        })
        .collect();

    Ok(LongTable {
        extra_columns,
        rows,
    })
}

/// wide形式にピボット
///
/// 国（昇順）ごとに1行、年（昇順）ごとに1列。
/// 同じ国・年に複数の値がある場合は最初の値を使う。
/// 値が1つもない国・年は出力しない。
pub fn pivot_wide(long: &LongTable) -> WideTable {
    let mut cells: BTreeMap<&str, BTreeMap<i64, f64>> = BTreeMap::new();
    let mut years: BTreeSet<i64> = BTreeSet::new();

    for row in &long.rows {
        let Some(value) = row.value else {
            continue;
        };
        years.insert(row.year);
        cells
            .entry(row.country.as_str())
            .or_default()
            .entry(row.year)
            .or_insert(value);
    }

    let years: Vec<i64> = years.into_iter().collect();
    let rows = cells
        .into_iter()
        .map(|(country, by_year)| WideRow {
            country: country.to_string(),
            values: years.iter().map(|y| by_year.get(y).copied()).collect(),
        })
        .collect();

    WideTable { years, rows }
}

/// 年を整数に変換（数値・数値文字列に対応）
fn parse_year(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// 値を数値に変換（変換できなければNone）
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

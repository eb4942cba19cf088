//! CSV出力
//!
//! ヘッダーは行が0件でも必ず出力する。

use crate::error::Result;
use gho_indicators_common::{IndicatorRecord, LongTable, MatchReportRow, WideTable};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const MATCH_REPORT_HEADER: [&str; 5] = [
    "RequestedIndicator",
    "Rank",
    "IndicatorCode",
    "IndicatorName",
    "Similarity",
];

pub const CATALOG_HEADER: [&str; 2] = ["IndicatorCode", "IndicatorName"];

fn create_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(BufWriter::new(file)))
}

fn finish<W: Write>(mut writer: csv::Writer<W>) -> Result<()> {
    writer.flush()?;
    Ok(())
}

/// 照合レポートを出力
pub fn write_match_report(rows: &[MatchReportRow], path: &Path) -> Result<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(MATCH_REPORT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    finish(writer)
}

/// 指標カタログを出力
pub fn write_catalog(records: &[IndicatorRecord], path: &Path) -> Result<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(CATALOG_HEADER)?;
    for record in records {
        writer.write_record([record.code.as_str(), record.name.as_str()])?;
    }
    finish(writer)
}

/// long形式を出力: `country,year,value[,Unit,Dim1..Dim3]`
pub fn write_long(table: &LongTable, path: &Path) -> Result<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(table.header())?;

    for row in &table.rows {
        let mut record = vec![
            row.country.clone(),
            row.year.to_string(),
            row.value.map(format_number).unwrap_or_default(),
        ];
        for column in &table.extra_columns {
            record.push(column.get(row).unwrap_or_default().to_string());
        }
        writer.write_record(&record)?;
    }
    finish(writer)
}

/// wide形式を出力: `country,<year>...`
pub fn write_wide(table: &WideTable, path: &Path) -> Result<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(table.header())?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.country.clone());
        record.extend(row.values.iter().map(|v| v.map(format_number).unwrap_or_default()));
        writer.write_record(&record)?;
    }
    finish(writer)
}

/// 数値の出力表記（整数値も `1.0` のように小数点付き）
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

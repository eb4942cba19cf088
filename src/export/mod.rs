pub mod csv;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use gho_indicators_common::{pivot_wide, LongTable};
use std::path::{Path, PathBuf};

/// `<stem>_long.csv` / `<stem>_wide.csv` のパス
pub fn csv_paths(out_dir: &Path, stem: &str) -> (PathBuf, PathBuf) {
    (
        out_dir.join(format!("{}_long.csv", stem)),
        out_dir.join(format!("{}_wide.csv", stem)),
    )
}

/// `<stem>.xlsx` のパス
pub fn excel_path(out_dir: &Path, stem: &str) -> PathBuf {
    out_dir.join(format!("{}.xlsx", stem))
}

/// 指標データをlong/wide形式で出力し、出力したファイルのパスを返す
pub fn export_indicator(
    long: &LongTable,
    out_dir: &Path,
    stem: &str,
    format: &ExportFormat,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;

    let wide = pivot_wide(long);
    let mut written = Vec::new();

    if matches!(format, ExportFormat::Csv | ExportFormat::Both) {
        let (long_path, wide_path) = csv_paths(out_dir, stem);
        self::csv::write_long(long, &long_path)?;
        self::csv::write_wide(&wide, &wide_path)?;
        written.push(long_path);
        written.push(wide_path);
    }

    if matches!(format, ExportFormat::Excel | ExportFormat::Both) {
        let path = excel_path(out_dir, stem);
        excel::write_workbook(long, &wide, &path)?;
        written.push(path);
    }

    Ok(written)
}

//! Excel生成
//!
//! long形式・wide形式をそれぞれ1シートにまとめたブックを出力する

use crate::error::Result;
use gho_indicators_common::{LongTable, WideTable};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

pub const LONG_SHEET: &str = "long";
pub const WIDE_SHEET: &str = "wide";

pub fn write_workbook(long: &LongTable, wide: &WideTable, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(LONG_SHEET)?;
    write_header(sheet, &long.header(), &header_format)?;
    for (i, row) in long.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.country.as_str())?;
        sheet.write_number(r, 1, row.year as f64)?;
        if let Some(value) = row.value {
            sheet.write_number(r, 2, value)?;
        }
        for (offset, column) in long.extra_columns.iter().enumerate() {
            if let Some(text) = column.get(row) {
                sheet.write_string(r, (3 + offset) as u16, text)?;
            }
        }
    }
    sheet.set_freeze_panes(1, 0)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name(WIDE_SHEET)?;
    write_header(sheet, &wide.header(), &header_format)?;
    for (i, row) in wide.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.country.as_str())?;
        for (offset, value) in row.values.iter().enumerate() {
            if let Some(value) = value {
                sheet.write_number(r, (1 + offset) as u16, *value)?;
            }
        }
    }
    sheet.set_freeze_panes(1, 1)?;

    workbook.save(output_path)?;
    Ok(())
}

fn write_header(sheet: &mut Worksheet, header: &[String], format: &Format) -> Result<()> {
    for (col, name) in header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name.as_str(), format)?;
    }
    Ok(())
}

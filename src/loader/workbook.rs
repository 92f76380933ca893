//! ブック形式（xlsx/xlsm/xls/xlsb/ods）の読み込み

use crate::error::{MinamError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use minam_common::{CellValue, SheetTable};
use std::io::Cursor;

/// 全シートを読み込み（シート順を保持）
pub(super) fn read_sheets(bytes: Vec<u8>, file_name: &str) -> Result<Vec<SheetTable>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| MinamError::Spreadsheet(format!("{}: {}", file_name, e)))?;

    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!(file = file_name, sheet = %name, "シート読み込みをスキップ: {}", e);
                continue;
            }
        };

        let rows = range
            .rows()
            .map(|row| row.iter().map(to_cell_value).collect())
            .collect();

        sheets.push(SheetTable::new(name, rows));
    }

    Ok(sheets)
}

fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell_value() {
        assert_eq!(to_cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(to_cell_value(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(to_cell_value(&Data::String("BTC".into())), CellValue::from("BTC"));
        assert_eq!(to_cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(to_cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_read_sheets_rejects_garbage() {
        let result = read_sheets(b"not a workbook".to_vec(), "broken.xlsx");
        assert!(matches!(result, Err(MinamError::Spreadsheet(_))));
    }
}

//! CSV/TSVの読み込み
//!
//! 1ファイル = 1シート。行の長さは揃っていなくてもよい。
//! 数値として解釈できるフィールドは数値に変換する。

use crate::error::Result;
use csv::ReaderBuilder;
use minam_common::{CellValue, SheetTable};

pub(super) fn read_sheet(bytes: &[u8], delimiter: u8, file_name: &str) -> Result<SheetTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| parse_field(&String::from_utf8_lossy(field)))
                .collect(),
        );
    }

    let sheet_name = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);

    Ok(SheetTable::new(sheet_name, rows))
}

fn parse_field(raw: &str) -> CellValue {
    let value = raw.trim();
    if value.is_empty() {
        return CellValue::Empty;
    }

    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("42000"), CellValue::Number(42000.0));
        assert_eq!(parse_field(" 0.75 "), CellValue::Number(0.75));
        assert_eq!(parse_field("BTC"), CellValue::from("BTC"));
        assert_eq!(parse_field("inf"), CellValue::from("inf"));
        assert_eq!(parse_field("2024-01-01"), CellValue::from("2024-01-01"));
        assert_eq!(parse_field("   "), CellValue::Empty);
    }

    #[test]
    fn test_read_sheet_flexible_rows() {
        let sheet = read_sheet(b"Date,Symbol\n2024-01-01,BTC,extra\n2024-01-02\n", b',', "prices.csv").unwrap();

        assert_eq!(sheet.name, "prices");
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.column_count(), 3);
        assert_eq!(sheet.rows[1][1], CellValue::from("BTC"));
    }

    #[test]
    fn test_read_sheet_tab_delimited() {
        let sheet = read_sheet(b"a\tb\n1\t2\n", b'\t', "t.tsv").unwrap();
        assert_eq!(sheet.header(), &[CellValue::from("a"), CellValue::from("b")][..]);
        assert_eq!(sheet.rows[1], vec![CellValue::Number(1.0), CellValue::Number(2.0)]);
    }

    #[test]
    fn test_read_sheet_invalid_utf8_is_lossy() {
        let sheet = read_sheet(b"name\n\xffabc\n", b',', "bad.csv").unwrap();
        assert_eq!(sheet.row_count(), 2);
        assert!(sheet.rows[1][0].to_string().ends_with("abc"));
    }
}

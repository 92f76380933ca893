//! データ概要の抽出
//!
//! シートごとにレコード数・数値カラム・日付カラムを列挙する。

use minam_common::{CellValue, ParsedDataset, SheetTable};
use regex::Regex;

/// データセットの概要を抽出
pub fn extract_data_insights(dataset: &ParsedDataset) -> Vec<String> {
    let mut insights = Vec::new();

    for sheet in &dataset.sheets {
        if sheet.rows.len() <= 1 {
            continue;
        }

        let record_count = sheet.rows.len() - 1;
        insights.push(format!("Sheet \"{}\" contains {} data records", sheet.name, record_count));

        let numeric = columns_matching(sheet, CellValue::is_numeric);
        if !numeric.is_empty() {
            insights.push(format!("Numeric columns found: {}", numeric.join(", ")));
        }

        let dates = columns_matching(sheet, looks_like_date);
        if !dates.is_empty() {
            insights.push(format!("Date columns found: {}", dates.join(", ")));
        }
    }

    insights
}

/// データ行のいずれかのセルが `predicate` を満たすカラム名
fn columns_matching(sheet: &SheetTable, predicate: impl Fn(&CellValue) -> bool) -> Vec<String> {
    sheet
        .header()
        .iter()
        .enumerate()
        .filter(|(index, _)| {
            sheet
                .rows
                .iter()
                .skip(1)
                .filter_map(|row| row.get(*index))
                .any(&predicate)
        })
        .map(|(_, header)| header.to_string())
        .collect()
}

fn looks_like_date(cell: &CellValue) -> bool {
    lazy_static::lazy_static! {
        // 2024-01-01, 2024/1/1, 01/31/2024 など
        static ref DATE_RE: Regex = Regex::new(r"\d{1,4}[/\-]\d{1,2}[/\-]\d{1,4}").unwrap();
        static ref YEAR_RE: Regex = Regex::new(r"\b(19|20)\d{2}\b").unwrap();
    }

    match cell {
        CellValue::Text(s) => DATE_RE.is_match(s) || YEAR_RE.is_match(s),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|&c| CellValue::from(c)).collect()
    }

    #[test]
    fn test_extract_data_insights() {
        let sheet = SheetTable::new(
            "trades",
            vec![
                row(&["timestamp", "symbol", "price"]),
                vec![CellValue::from("2024-01-01T00:00:00Z"), CellValue::from("BTC"), CellValue::Number(42000.0)],
                vec![CellValue::from("2024-01-01T01:00:00Z"), CellValue::from("BTC"), CellValue::from("42150")],
            ],
        );
        let dataset = ParsedDataset::from_sheets("id", "trades.csv", "csv", 0, vec![sheet]);

        let insights = extract_data_insights(&dataset);
        assert_eq!(
            insights,
            vec![
                "Sheet \"trades\" contains 2 data records".to_string(),
                "Numeric columns found: price".to_string(),
                "Date columns found: timestamp".to_string(),
            ]
        );
    }

    #[test]
    fn test_header_only_sheet_has_no_insights() {
        let sheet = SheetTable::new("empty", vec![row(&["a", "b"])]);
        let dataset = ParsedDataset::from_sheets("id", "e.csv", "csv", 0, vec![sheet]);
        assert!(extract_data_insights(&dataset).is_empty());
    }

    #[test]
    fn test_looks_like_date() {
        assert!(looks_like_date(&CellValue::from("2024/01/31")));
        assert!(looks_like_date(&CellValue::from("FY 2023")));
        assert!(!looks_like_date(&CellValue::from("BTC")));
        assert!(!looks_like_date(&CellValue::Number(2024.0)));
    }
}

//! 接続レポートExcel生成（共通ライブラリ）
//!
//! シート構成:
//! - Connections: ファイルA / ファイルB / 種類 / 根拠
//! - Datasets: ファイル名 / 形式 / 行数 / 列数 / シート数

use crate::error::{Error, Result};
use crate::types::{ConnectionKind, ParsedDataset, RelationshipEvidence};
use rust_xlsxwriter::*;

const CONNECTION_HEADERS: &[(&str, f64)] = &[
    ("File A", 28.0),
    ("File B", 28.0),
    ("Kind", 18.0),
    ("Detail", 60.0),
];

const DATASET_HEADERS: &[(&str, f64)] = &[
    ("File", 32.0),
    ("Type", 10.0),
    ("Rows", 10.0),
    ("Columns", 10.0),
    ("Sheets", 10.0),
];

/// 種類の表示名
pub fn kind_label(kind: ConnectionKind) -> &'static str {
    match kind {
        ConnectionKind::CommonColumns => "Common columns",
        ConnectionKind::CommonValues => "Common values",
        ConnectionKind::SimilarShape => "Similar shape",
    }
}

/// 接続レポートをバッファに生成
///
/// # Arguments
/// * `datasets` - 解析対象データセット
/// * `connections` - `find_connections` の結果
pub fn generate_report_buffer(
    datasets: &[ParsedDataset],
    connections: &[RelationshipEvidence],
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    // Connections シート
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Connections").map_err(excel_error("シート名設定エラー"))?;
    write_headers(worksheet, CONNECTION_HEADERS, &header_format)?;

    for (i, conn) in connections.iter().enumerate() {
        let row = i as u32 + 1;
        let detail = conn
            .detail
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        for (col, value) in [
            conn.file1.as_str(),
            conn.file2.as_str(),
            kind_label(conn.kind),
            detail.as_str(),
        ]
        .into_iter()
        .enumerate()
        {
            worksheet
                .write_string_with_format(row, col as u16, value, &value_format)
                .map_err(excel_error("接続書き込みエラー"))?;
        }
    }

    // Datasets シート
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Datasets").map_err(excel_error("シート名設定エラー"))?;
    write_headers(worksheet, DATASET_HEADERS, &header_format)?;

    for (i, dataset) in datasets.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet
            .write_string_with_format(row, 0, &dataset.file_name, &value_format)
            .map_err(excel_error("データセット書き込みエラー"))?;
        worksheet
            .write_string_with_format(row, 1, &dataset.file_type, &value_format)
            .map_err(excel_error("データセット書き込みエラー"))?;

        let counts = [dataset.total_rows, dataset.total_columns, dataset.sheets.len()];
        for (offset, count) in counts.into_iter().enumerate() {
            worksheet
                .write_number_with_format(row, 2 + offset as u16, count as f64, &value_format)
                .map_err(excel_error("データセット書き込みエラー"))?;
        }
    }

    workbook.save_to_buffer().map_err(excel_error("Excel保存エラー"))
}

fn write_headers(worksheet: &mut Worksheet, headers: &[(&str, f64)], format: &Format) -> Result<()> {
    for (col, (label, width)) in headers.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *label, format)
            .map_err(excel_error("ヘッダー書き込みエラー"))?;
        worksheet
            .set_column_width(col, *width)
            .map_err(excel_error("列幅設定エラー"))?;
    }
    worksheet.set_freeze_panes(1, 0).map_err(excel_error("ウィンドウ枠固定エラー"))?;
    Ok(())
}

fn excel_error(context: &'static str) -> impl Fn(XlsxError) -> Error {
    move |e| Error::Excel(format!("{}: {}", context, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, SheetTable};

    #[test]
    fn test_generate_report_buffer() {
        let rows = vec![vec![CellValue::from("Date")], vec![CellValue::from("2024-01-01")]];
        let datasets = vec![
            ParsedDataset::from_sheets("a", "a.csv", "csv", 10, vec![SheetTable::new("a", rows.clone())]),
            ParsedDataset::from_sheets("b", "b.csv", "csv", 10, vec![SheetTable::new("b", rows)]),
        ];
        let connections = crate::find_connections(&datasets);

        let buffer = generate_report_buffer(&datasets, &connections).expect("Excel生成失敗");

        // xlsx は zip 形式
        assert!(buffer.len() > 4);
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_generate_report_buffer_empty() {
        let buffer = generate_report_buffer(&[], &[]).expect("Excel生成失敗");
        assert_eq!(&buffer[..2], b"PK");
    }

    #[test]
    fn test_kind_label() {
        assert_eq!(kind_label(ConnectionKind::SimilarShape), "Similar shape");
    }
}

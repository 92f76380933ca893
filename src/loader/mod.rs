//! 表計算ファイル読み込みモジュール
//!
//! ファイルを読み込んで `ParsedDataset` に変換する。
//! - ブック形式（xlsx/xls/ods等）: calamine
//! - CSV/TSV: csv
//!
//! IDは読み込みごとに採番するUUID v4（内容が同じファイルでも別ID）。

mod delimited;
mod workbook;

use crate::error::Result;
use crate::scanner::{DataFileInfo, DataFormat};
use minam_common::ParsedDataset;
use rayon::prelude::*;
use uuid::Uuid;

/// 1ファイルを読み込み
pub fn load_dataset(file: &DataFileInfo) -> Result<ParsedDataset> {
    let bytes = std::fs::read(&file.path)?;
    let id = new_dataset_id();
    let file_size = bytes.len() as u64;

    let sheets = match file.format {
        DataFormat::Workbook => workbook::read_sheets(bytes, &file.file_name)?,
        DataFormat::Csv => vec![delimited::read_sheet(&bytes, b',', &file.file_name)?],
        DataFormat::Tsv => vec![delimited::read_sheet(&bytes, b'\t', &file.file_name)?],
    };

    let dataset = ParsedDataset::from_sheets(
        id,
        file.file_name.clone(),
        file_type(file),
        file_size,
        sheets,
    )
    .with_upload_time(chrono::Utc::now().to_rfc3339());

    tracing::debug!(
        file = %file.file_name,
        sheets = dataset.sheets.len(),
        rows = dataset.total_rows,
        columns = dataset.total_columns,
        "dataset loaded"
    );

    Ok(dataset)
}

/// 複数ファイルを並列に読み込み（入力順を保持）
pub fn load_datasets(files: &[DataFileInfo]) -> Result<Vec<ParsedDataset>> {
    load_datasets_with(files, |_| {})
}

/// 複数ファイルを並列に読み込み、1件読み込むごとに `on_loaded` を呼ぶ
pub fn load_datasets_with<F>(files: &[DataFileInfo], on_loaded: F) -> Result<Vec<ParsedDataset>>
where
    F: Fn(&DataFileInfo) + Sync,
{
    files
        .par_iter()
        .map(|file| {
            let dataset = load_dataset(file);
            on_loaded(file);
            dataset
        })
        .collect()
}

fn new_dataset_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn file_type(file: &DataFileInfo) -> String {
    file.path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

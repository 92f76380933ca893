//! データセット間の接続検出
//!
//! 複数のデータセットの全ペア（入力順で i < j）について、
//! 以下の3種類の根拠を独立に判定する:
//! 1. 共通カラム（プライマリシートのヘッダー行）
//! 2. 共通値（ヘッダーを除く先頭4行のセル値）
//! 3. 類似構造（行数・列数の差が20%未満）
//!
//! どの判定も失敗しない。データがなければ根拠なしになるだけ。

use crate::types::{CellValue, ConnectionKind, ParsedDataset, RelationshipEvidence};

/// 共通値の比較に使うデータ行数（ヘッダー行は除く）
pub const SAMPLE_DATA_ROWS: usize = 4;

/// 共通値として報告する最大件数
pub const MAX_COMMON_VALUES: usize = 5;

/// 類似構造とみなす行数・列数の相対差の上限（未満）
pub const SHAPE_TOLERANCE: f64 = 0.2;

/// 全ペアの接続を検出
///
/// 各ペアについて 共通カラム → 共通値 → 類似構造 の順に記録を追加する。
pub fn find_connections(datasets: &[ParsedDataset]) -> Vec<RelationshipEvidence> {
    let mut connections = Vec::new();

    for (i, file1) in datasets.iter().enumerate() {
        for file2 in &datasets[i + 1..] {
            let evidence = |kind, detail| RelationshipEvidence {
                file1: file1.file_name.clone(),
                file2: file2.file_name.clone(),
                kind,
                detail,
            };

            let common_columns = find_common_columns(file1, file2);
            if !common_columns.is_empty() {
                connections.push(evidence(ConnectionKind::CommonColumns, common_columns));
            }

            let common_values = find_common_values(file1, file2);
            if !common_values.is_empty() {
                connections.push(evidence(ConnectionKind::CommonValues, common_values));
            }

            if has_similar_shape(file1, file2) {
                connections.push(evidence(ConnectionKind::SimilarShape, Vec::new()));
            }
        }
    }

    connections
}

/// file1 のヘッダーのうち file2 のヘッダーにも含まれるもの
///
/// file1 の並び順と重複をそのまま保つ（集合の積ではない）。
pub fn find_common_columns(file1: &ParsedDataset, file2: &ParsedDataset) -> Vec<CellValue> {
    let columns2 = file2.header();

    file1
        .header()
        .iter()
        .filter(|col| columns2.contains(col))
        .cloned()
        .collect()
}

/// 先頭データ行に共通して現れるセル値（最大5件）
///
/// file1 の値を行優先で並べ、file2 に含まれるものを重複込みで残す。
pub fn find_common_values(file1: &ParsedDataset, file2: &ParsedDataset) -> Vec<CellValue> {
    let values2: Vec<&CellValue> = sample_values(file2).collect();

    sample_values(file1)
        .filter(|val| values2.contains(val))
        .take(MAX_COMMON_VALUES)
        .cloned()
        .collect()
}

/// 行数・列数がともに許容差未満か
///
/// 両方0（分母0）の場合は類似とみなさない。
pub fn has_similar_shape(file1: &ParsedDataset, file2: &ParsedDataset) -> bool {
    let row_diff = relative_difference(file1.total_rows, file2.total_rows);
    let col_diff = relative_difference(file1.total_columns, file2.total_columns);

    match (row_diff, col_diff) {
        (Some(rows), Some(cols)) => rows < SHAPE_TOLERANCE && cols < SHAPE_TOLERANCE,
        _ => false,
    }
}

/// |a - b| / max(a, b)、max が0なら None
fn relative_difference(a: usize, b: usize) -> Option<f64> {
    let max = a.max(b);
    if max == 0 {
        return None;
    }
    Some(a.abs_diff(b) as f64 / max as f64)
}

fn sample_values(dataset: &ParsedDataset) -> impl Iterator<Item = &CellValue> {
    dataset
        .primary_sheet()
        .into_iter()
        .flat_map(|sheet| sheet.data_rows(SAMPLE_DATA_ROWS))
        .flatten()
}

//! 接続検出のE2Eテスト
//!
//! 実ファイル（CSV/TSV）を読み込んでから接続を検出する

use minam::{loader, scanner};
use minam_common::{find_connections, CellValue, ConnectionKind, ParsedDataset};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn load(dir: &Path) -> Vec<ParsedDataset> {
    let files = scanner::scan_inputs(&[dir.to_path_buf()], false).unwrap();
    loader::load_datasets(&files).unwrap()
}

/// 共通カラムと共通値を持つ2ファイル
#[test]
fn test_prices_and_symbols() {
    let dir = tempdir().expect("Failed to create temp dir");
    write(
        dir.path(),
        "a_prices.csv",
        "Date,Price,Volume\n2024-01-01,BTC,1500000000\n2024-01-02,BTC,1200000000\n2024-01-03,BTC,1800000000\n",
    );
    write(dir.path(), "b_symbols.csv", "Date,Symbol\n2024-01-04,BTC\n2024-01-05,BTC\n");

    let datasets = load(dir.path());
    assert_eq!(datasets[0].total_rows, 4);
    assert_eq!(datasets[0].total_columns, 3);
    assert_eq!(datasets[1].total_rows, 3);
    assert_eq!(datasets[1].total_columns, 2);

    let connections = find_connections(&datasets);
    assert_eq!(connections.len(), 2);

    assert_eq!(connections[0].kind, ConnectionKind::CommonColumns);
    assert_eq!(connections[0].file1, "a_prices.csv");
    assert_eq!(connections[0].file2, "b_symbols.csv");
    assert_eq!(connections[0].detail, vec![CellValue::from("Date")]);

    assert_eq!(connections[1].kind, ConnectionKind::CommonValues);
    assert!(connections[1].detail.contains(&CellValue::from("BTC")));
    assert_eq!(
        connections[1].to_string(),
        "a_prices.csv ↔ b_symbols.csv: Common data patterns: BTC, BTC, BTC"
    );
}

/// 空ファイルのみ
#[test]
fn test_empty_files_have_no_connections() {
    let dir = tempdir().expect("Failed to create temp dir");
    for name in ["a.csv", "b.csv", "c.tsv"] {
        write(dir.path(), name, "");
    }

    let datasets = load(dir.path());
    assert_eq!(datasets.len(), 3);
    assert!(datasets.iter().all(|d| d.total_rows == 0 && d.sheets.is_empty()));
    assert!(find_connections(&datasets).is_empty());
}

/// 同形の数値表は形状一致として検出される
#[test]
fn test_numeric_tables_with_similar_shape() {
    let dir = tempdir().expect("Failed to create temp dir");
    write(dir.path(), "q1.csv", "x,y\n1,2\n3,4\n5,6\n7,8\n9,10\n");
    write(dir.path(), "q2.tsv", "a\tb\n11\t12\n13\t14\n15\t16\n17\t18\n19\t20\n");

    let connections = find_connections(&load(dir.path()));
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0].kind, ConnectionKind::SimilarShape);
    assert!(connections[0].detail.is_empty());
}

/// 数値は数値として比較される（"42000" と 42000.0 は同値）
#[test]
fn test_numeric_values_match_across_formats() {
    let dir = tempdir().expect("Failed to create temp dir");
    write(dir.path(), "a.csv", "price\n42000\n");
    write(dir.path(), "b.tsv", "close\tnote\n42000.0\tlatest\n41900\tprev\n");

    let connections = find_connections(&load(dir.path()));
    let values = connections
        .iter()
        .find(|c| c.kind == ConnectionKind::CommonValues)
        .expect("common values");
    assert_eq!(values.detail, vec![CellValue::Number(42000.0)]);
}

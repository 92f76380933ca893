//! データセットの型定義
//!
//! CLIとHTTPサーバーで共有される型:
//! - CellValue: パース済みセル値
//! - SheetTable: シート（テーブル）1枚分の行データ
//! - ParsedDataset: アップロード1件分の表データ
//! - RelationshipEvidence: データセット間の接続（関係）の根拠
//! - ValidationReport: データ検証レポート

use serde::{Deserialize, Serialize};
use std::fmt;

/// セル値
///
/// パーサー側で文字列・数値・真偽値に変換済みの値。
/// 比較は値の等価性のみで行う。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// 空セル（空文字含む）かどうか
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 数値として解釈できるか
    pub fn is_numeric(&self) -> bool {
        match self {
            CellValue::Number(n) => n.is_finite(),
            CellValue::Text(s) => {
                let s = s.trim();
                !s.is_empty() && s.parse::<f64>().is_ok()
            }
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// シート（ワークシート/テーブル）
///
/// `rows[0]` は慣習としてヘッダー行として扱う。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetTable {
    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "data")]
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// ヘッダー行（行がなければ空）
    pub fn header(&self) -> &[CellValue] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// ヘッダーを除いた先頭 `limit` 行
    pub fn data_rows(&self, limit: usize) -> impl Iterator<Item = &Vec<CellValue>> {
        self.rows.iter().skip(1).take(limit)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 最も長い行の列数
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// 末尾の空行を除去
    fn trim_trailing_empty_rows(&mut self) {
        while self
            .rows
            .last()
            .is_some_and(|row| row.iter().all(CellValue::is_empty))
        {
            self.rows.pop();
        }
    }
}

/// アップロード（またはテーブル取込）1件分のデータセット
///
/// 生成後は変更しない。`total_rows` は全シートの行数合計、
/// `total_columns` は全シート中の最大列数。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedDataset {
    pub id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub sheets: Vec<SheetTable>,
    pub total_rows: usize,
    pub total_columns: usize,
    pub upload_time: String,
}

impl ParsedDataset {
    /// シート一覧からデータセットを構築
    ///
    /// 末尾の空行を除去し、空になったシートは捨てる。
    pub fn from_sheets(
        id: impl Into<String>,
        file_name: impl Into<String>,
        file_type: impl Into<String>,
        file_size: u64,
        sheets: Vec<SheetTable>,
    ) -> Self {
        let mut kept = Vec::with_capacity(sheets.len());
        let mut total_rows = 0;
        let mut total_columns = 0;

        for mut sheet in sheets {
            sheet.trim_trailing_empty_rows();
            if sheet.rows.is_empty() {
                continue;
            }
            total_rows += sheet.row_count();
            total_columns = total_columns.max(sheet.column_count());
            kept.push(sheet);
        }

        Self {
            id: id.into(),
            file_name: file_name.into(),
            file_type: file_type.into(),
            file_size,
            sheets: kept,
            total_rows,
            total_columns,
            upload_time: String::new(),
        }
    }

    pub fn with_upload_time(mut self, upload_time: impl Into<String>) -> Self {
        self.upload_time = upload_time.into();
        self
    }

    /// 比較に使うプライマリシート（先頭シート）
    pub fn primary_sheet(&self) -> Option<&SheetTable> {
        self.sheets.first()
    }

    /// プライマリシートのヘッダー行
    pub fn header(&self) -> &[CellValue] {
        self.primary_sheet().map(SheetTable::header).unwrap_or(&[])
    }

    /// プライマリシートの先頭 `n` 行（ヘッダー含む）
    pub fn sample_rows(&self, n: usize) -> &[Vec<CellValue>] {
        match self.primary_sheet() {
            Some(sheet) => &sheet.rows[..n.min(sheet.rows.len())],
            None => &[],
        }
    }
}

/// データ検証レポート（`analyze-file` の応答）
///
/// `quality_score` と `missing_values` は 0〜100 のパーセンテージ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub file_type: String,
    pub data_rows: f64,
    pub quality_score: f64,
    pub missing_values: f64,
    pub schema_generated: bool,
}

impl ValidationReport {
    /// LLM応答を解釈できなかったときの既定レポート
    ///
    /// 形式はファイル名の最後の拡張子を大文字化したもの。
    pub fn fallback(dataset: &ParsedDataset) -> Self {
        let extension = dataset.file_name.rsplit('.').next().unwrap_or_default();
        let file_type = if extension.is_empty() {
            "UNKNOWN".to_string()
        } else {
            extension.to_uppercase()
        };

        Self {
            file_type,
            data_rows: dataset.total_rows as f64,
            quality_score: 85.0,
            missing_values: 5.0,
            schema_generated: true,
        }
    }
}

/// 接続の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionKind {
    CommonColumns,
    CommonValues,
    SimilarShape,
}

/// データセット間の接続の根拠
///
/// `file1` は入力順で先に現れるデータセット。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEvidence {
    pub file1: String,
    pub file2: String,
    pub kind: ConnectionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detail: Vec<CellValue>,
}

impl RelationshipEvidence {
    /// 表示用ラベル（例: "Common columns: Date, Price"）
    pub fn connection_type(&self) -> String {
        match self.kind {
            ConnectionKind::CommonColumns => format!("Common columns: {}", self.joined_detail()),
            ConnectionKind::CommonValues => {
                format!("Common data patterns: {}", self.joined_detail())
            }
            ConnectionKind::SimilarShape => "Similar data structure".to_string(),
        }
    }

    fn joined_detail(&self) -> String {
        self.detail
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RelationshipEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ↔ {}: {}", self.file1, self.file2, self.connection_type())
    }
}

/// 会話の発話者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// 会話履歴の1メッセージ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_references: Option<Vec<String>>,
}

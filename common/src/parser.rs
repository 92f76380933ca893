//! LLMレスポンスパーサー
//!
//! レスポンス本文からJSONを抽出・デシリアライズし、
//! 本文中で言及されたファイルを特定する

use crate::error::{Error, Result};
use crate::types::{ParsedDataset, ValidationReport};

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト / [...] 配列（先に現れる方）
/// 3. エラー
///
/// # Examples
/// ```
/// use minam_common::extract_json;
///
/// let response = "Here you go: {\"openapi\": \"3.0.0\"}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"openapi\": \"3.0.0\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    let object = enclosed(response, '{', '}');
    let array = enclosed(response, '[', ']');

    let found = match (object, array) {
        (Some(o), Some(a)) => Some(if o.0 <= a.0 { o } else { a }),
        (o, a) => o.or(a),
    };

    found
        .map(|(start, end)| &response[start..=end])
        .ok_or_else(|| Error::Parse("JSONが見つかりません".into()))
}

/// データ検証レスポンスをパース
pub fn parse_validation_report(response: &str) -> Result<ValidationReport> {
    let json_str = extract_json(response)?;
    let report: ValidationReport = serde_json::from_str(json_str)?;
    Ok(report)
}

/// 最初の `open` から最後の `close` までの範囲
fn enclosed(response: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = response.find(open)?;
    let end = response.rfind(close)?;
    (end >= start).then_some((start, end))
}

/// レスポンス中でファイル名が言及されたファイルのIDを抽出
///
/// 大文字小文字を区別せずに照合し、ファイルの入力順で返す。
pub fn extract_file_references(response: &str, files: &[ParsedDataset]) -> Vec<String> {
    let response_lower = response.to_lowercase();

    files
        .iter()
        .filter(|file| !file.file_name.is_empty())
        .filter(|file| response_lower.contains(&file.file_name.to_lowercase()))
        .map(|file| file.id.clone())
        .collect()
}

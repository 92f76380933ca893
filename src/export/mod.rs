//! 接続レポートの出力

pub mod excel;

use crate::error::{MinamError, Result};
use minam_common::{ParsedDataset, RelationshipEvidence};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Excel,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Excel => "xlsx",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "excel" | "xlsx" => Ok(ReportFormat::Excel),
            _ => Err(format!("Unknown format: {}. Use text, json, or excel", s)),
        }
    }
}

/// 1接続1行のテキスト
pub fn render_text(connections: &[RelationshipEvidence]) -> String {
    connections
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_json(connections: &[RelationshipEvidence]) -> Result<String> {
    Ok(serde_json::to_string_pretty(connections)?)
}

/// ディレクトリまたは拡張子なしのパスなら `connections.<ext>` を付与
fn output_path_for_format(output: &Path, format: ReportFormat) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("connections.{}", format.extension()))
    } else {
        output.to_path_buf()
    }
}

/// レポートを出力
///
/// `output` が `None` の場合、テキストとJSONは標準出力へ書き出す。
/// Excelは出力先が必須。書き出したファイルのパスを返す。
pub fn export_report(
    datasets: &[ParsedDataset],
    connections: &[RelationshipEvidence],
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<Option<PathBuf>> {
    let content = match format {
        ReportFormat::Text => render_text(connections).into_bytes(),
        ReportFormat::Json => render_json(connections)?.into_bytes(),
        ReportFormat::Excel => excel::generate_report(datasets, connections)?,
    };

    let Some(output) = output else {
        if format == ReportFormat::Excel {
            return Err(MinamError::Export("Excel出力には --output の指定が必要です".into()));
        }
        println!("{}", String::from_utf8_lossy(&content));
        return Ok(None);
    };

    let path = output_path_for_format(output, format);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), ?format, "report written");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minam_common::{CellValue, ConnectionKind};

    fn connections() -> Vec<RelationshipEvidence> {
        vec![
            RelationshipEvidence {
                file1: "a.csv".into(),
                file2: "b.csv".into(),
                kind: ConnectionKind::CommonColumns,
                detail: vec![CellValue::from("Date")],
            },
            RelationshipEvidence {
                file1: "a.csv".into(),
                file2: "b.csv".into(),
                kind: ConnectionKind::SimilarShape,
                detail: vec![],
            },
        ]
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("xlsx".parse::<ReportFormat>().unwrap(), ReportFormat::Excel);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_render_text() {
        assert_eq!(
            render_text(&connections()),
            "a.csv ↔ b.csv: Common columns: Date\na.csv ↔ b.csv: Similar data structure"
        );
    }

    #[test]
    fn test_render_json_omits_empty_detail() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&connections()).unwrap()).unwrap();
        assert_eq!(json[0]["kind"], "commonColumns");
        assert_eq!(json[0]["detail"][0], "Date");
        assert!(json[1].get("detail").is_none());
    }

    #[test]
    fn test_export_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_report(&[], &connections(), ReportFormat::Json, Some(dir.path()))
            .unwrap()
            .unwrap();
        assert_eq!(path, dir.path().join("connections.json"));
        assert!(std::fs::read_to_string(path).unwrap().contains("commonColumns"));
    }

    #[test]
    fn test_excel_requires_output() {
        let err = export_report(&[], &connections(), ReportFormat::Excel, None).unwrap_err();
        assert!(matches!(err, MinamError::Export(_)));
    }
}

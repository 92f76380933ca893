use crate::error::{MinamError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 表計算ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// calamine で読み込むブック形式（xlsx/xlsm/xls/xlsb/ods）
    Workbook,
    Csv,
    Tsv,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(DataFormat::Workbook),
            "csv" => Some(DataFormat::Csv),
            "tsv" => Some(DataFormat::Tsv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataFileInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub format: DataFormat,
}

impl DataFileInfo {
    fn new(path: &Path, format: DataFormat) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            file_name,
            format,
        }
    }
}

/// 入力パスを表計算ファイルの一覧に展開
///
/// - ファイル: 対応形式ならそのまま（未対応はエラー）
/// - フォルダ: 直下（`recursive` なら再帰）の対応ファイルをファイル名順で
pub fn scan_inputs(paths: &[PathBuf], recursive: bool) -> Result<Vec<DataFileInfo>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(MinamError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            files.extend(scan_folder(path, recursive));
        } else {
            let format = DataFormat::from_path(path)
                .ok_or_else(|| MinamError::UnsupportedFormat(path.display().to_string()))?;
            files.push(DataFileInfo::new(path, format));
        }
    }

    Ok(files)
}

fn scan_folder(folder: &Path, recursive: bool) -> Vec<DataFileInfo> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files: Vec<DataFileInfo> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let path = e.path();
            DataFormat::from_path(path).map(|format| DataFileInfo::new(path, format))
        })
        .collect();

    // ファイル名でソート
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    files
}

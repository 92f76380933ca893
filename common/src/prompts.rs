//! プロンプト生成モジュール
//!
//! CLIとHTTPサーバーで共有されるプロンプト生成ロジック:
//! - build_multi_file_system_prompt: 複数ファイル解析エージェント用システムプロンプト
//! - build_multi_file_user_prompt: 同ユーザープロンプト
//! - build_excel_agent_system_prompt / build_excel_agent_user_prompt: 単一ファイル解析用
//! - build_validation_system_prompt / build_validation_user_prompt: データ検証用
//! - format_dataset_for_ai: データセットをテキスト化

use crate::error::Result;
use crate::types::{ConversationMessage, ParsedDataset, RelationshipEvidence};

/// プロンプトに載せるサンプル行数（ヘッダー含む）
pub const PROMPT_SAMPLE_ROWS: usize = 3;

/// データ検証プロンプトに載せるプレビュー行数（ヘッダー含む）
pub const VALIDATION_PREVIEW_ROWS: usize = 5;

/// 複数ファイル解析用システムプロンプト生成
///
/// # Arguments
/// * `files` - アップロード済みデータセット
/// * `connections` - `find_connections` の結果
/// * `history` - これまでの会話履歴
/// * `selected_file_id` - 注目ファイルのID（任意）
pub fn build_multi_file_system_prompt(
    files: &[ParsedDataset],
    connections: &[RelationshipEvidence],
    history: &[ConversationMessage],
    selected_file_id: Option<&str>,
) -> String {
    let file_context = files
        .iter()
        .map(describe_file)
        .collect::<Vec<_>>()
        .join("");

    let connection_lines = connections
        .iter()
        .map(|conn| format!("- {}", conn))
        .collect::<Vec<_>>()
        .join("\n");

    let history_lines = history
        .iter()
        .map(|msg| format!("{}: {}", msg.role, msg.content))
        .collect::<Vec<_>>()
        .join("\n");

    let focus = selected_file_id
        .and_then(|id| files.iter().find(|f| f.id == id))
        .map(|f| format!("\n**FOCUSED FILE:** {} (the user selected this file; prefer it when the question is ambiguous)\n", f.file_name))
        .unwrap_or_default();

    format!(
        r#"You are an advanced AI assistant with access to multiple uploaded files and extensive general knowledge. You can:

1. **Analyze individual files** - Deep dive into specific files
2. **Cross-file analysis** - Find patterns and connections between files
3. **General knowledge integration** - Use your training data to provide context, insights, and answer questions about topics outside the uploaded files
4. **Conversation memory** - Remember previous questions and build on them
5. **File recommendations** - Suggest which files to focus on for specific questions

**IMPORTANT**: You can answer questions about ANY topic, not just the uploaded files. Use your general knowledge to provide comprehensive answers while also referencing uploaded file data when relevant.

**PRIORITY SYSTEM:**
- **HIGHEST**: Direct answers to user questions using your general knowledge
- **HIGH**: Data from uploaded files when directly relevant to the question
- **MEDIUM**: Connections and patterns between uploaded files
- **LOW**: General knowledge for additional context

**CURRENT FILES:**
{file_context}{focus}
**FILE CONNECTIONS:**
{connection_lines}

**CONVERSATION HISTORY:**
{history_lines}

Always:
1. Answer the user's question directly using your general knowledge
2. Reference uploaded file data when it's relevant to the question
3. Explain connections between files when applicable
4. Provide actionable insights and suggestions
5. Be conversational, helpful, and comprehensive
6. Don't limit yourself to just the uploaded files - use your full knowledge base"#
    )
}

/// 複数ファイル解析用ユーザープロンプト生成
pub fn build_multi_file_user_prompt(query: &str) -> String {
    format!(
        r#"User Query: "{query}"

Please provide a comprehensive answer to this question. You can:
1. Use your general knowledge to answer the question directly
2. Reference uploaded file data if it's relevant to the question
3. Consider any connections between files if applicable
4. Build on previous conversation context
5. Provide additional insights and suggestions

Don't limit yourself to just the uploaded files - use your full knowledge base to give the best possible answer."#
    )
}

/// 単一ファイル解析用システムプロンプト生成
pub fn build_excel_agent_system_prompt(file_name: Option<&str>) -> String {
    let file_name = file_name.unwrap_or("Unknown");

    format!(
        r#"You are an expert Excel data analyst and AI agent. You can analyze Excel files, answer questions about the data, perform calculations, identify patterns, and provide insights.

Your capabilities include:
- Analyzing spreadsheet data structure and content
- Answering questions about specific data points
- Performing calculations and aggregations
- Identifying trends and patterns
- Providing data visualizations suggestions
- Explaining data relationships
- Suggesting data cleaning or transformation steps

When analyzing Excel data, always:
1. Provide clear, actionable insights
2. Include specific data references when possible
3. Suggest follow-up questions or analyses
4. Be precise with numbers and calculations
5. Explain your reasoning clearly

File: {file_name}"#
    )
}

/// 単一ファイル解析用ユーザープロンプト生成
pub fn build_excel_agent_user_prompt(query: &str, file_content: &str) -> String {
    format!(
        r#"Please analyze this Excel file data and answer the following question: "{query}"

Excel File Content:
{file_content}

Please provide a comprehensive analysis that includes:
1. Direct answer to the question
2. Relevant data points and calculations
3. Key insights and patterns
4. Any recommendations or follow-up suggestions"#
    )
}

/// データ検証用システムプロンプト（応答JSONの形を指定）
pub fn build_validation_system_prompt() -> &'static str {
    r#"You are an expert data analyst. Analyze the provided file data and return a JSON response with the following structure:
{
  "fileType": "string (file extension in uppercase)",
  "dataRows": "number (total number of data rows)",
  "qualityScore": "number (0-100, data quality assessment)",
  "missingValues": "number (0-100, percentage of missing values)",
  "schemaGenerated": "boolean (whether schema generation was successful)"
}

Analyze the data structure, content quality, completeness, and provide accurate metrics."#
}

/// データ検証用ユーザープロンプト生成
///
/// プレビューは先頭シートの先頭5行（ヘッダー含む）を整形JSONで載せる。
pub fn build_validation_user_prompt(dataset: &ParsedDataset) -> Result<String> {
    let preview = serde_json::to_string_pretty(dataset.sample_rows(VALIDATION_PREVIEW_ROWS))?;
    let file_name = if dataset.file_name.is_empty() {
        "Unknown"
    } else {
        dataset.file_name.as_str()
    };

    Ok(format!(
        r#"Please analyze this file data for data validation:

File Name: {file_name}
File Size: {size} bytes
Total Rows: {rows}
Total Columns: {columns}
Sheets: {sheets}

File Content Preview:
{preview}

Please provide a comprehensive data validation analysis."#,
        size = dataset.file_size,
        rows = dataset.total_rows,
        columns = dataset.total_columns,
        sheets = dataset.sheets.len(),
    ))
}

/// データセットをAI向けテキストに整形
pub fn format_dataset_for_ai(dataset: &ParsedDataset) -> String {
    let mut text = format!("EXCEL FILE ANALYSIS: {}\n", dataset.file_name);
    text.push_str(&format!("File Size: {:.2} KB\n", dataset.file_size as f64 / 1024.0));
    text.push_str(&format!("Total Sheets: {}\n", dataset.sheets.len()));
    text.push_str(&format!("Total Rows: {}\n", dataset.total_rows));
    text.push_str(&format!("Total Columns: {}\n\n", dataset.total_columns));

    for (index, sheet) in dataset.sheets.iter().enumerate() {
        text.push_str(&format!("=== SHEET {}: {} ===\n", index + 1, sheet.name));
        text.push_str(&format!(
            "Dimensions: {} rows × {} columns\n\n",
            sheet.row_count(),
            sheet.column_count()
        ));

        for (row_index, row) in sheet.rows.iter().enumerate() {
            let joined = join_cells(row, " | ");
            if row_index == 0 {
                text.push_str(&format!("Headers: {}\n", joined));
                text.push_str(&format!("{}\n", "=".repeat(joined.chars().count())));
            } else {
                text.push_str(&format!("Row {}: {}\n", row_index, joined));
            }
        }

        text.push('\n');
    }

    text
}

fn describe_file(file: &ParsedDataset) -> String {
    let samples: Vec<Vec<String>> = file
        .sample_rows(PROMPT_SAMPLE_ROWS)
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    let sample_json = serde_json::to_string(&samples).unwrap_or_default();

    format!(
        r#"
- **{name}** ({file_type})
  - Size: {size:.2} MB
  - Data: {rows} rows × {columns} columns
  - Sheets: {sheets}
  - Sample: {sample_json}
"#,
        name = file.file_name,
        file_type = file.file_type.to_uppercase(),
        size = file.file_size as f64 / 1024.0 / 1024.0,
        rows = file.total_rows,
        columns = file.total_columns,
        sheets = file.sheets.len(),
    )
}

fn join_cells(row: &[crate::types::CellValue], separator: &str) -> String {
    row.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, ConnectionKind, Role, SheetTable};

    fn sample_dataset() -> ParsedDataset {
        let rows = vec![
            vec![CellValue::from("Date"), CellValue::from("Price")],
            vec![CellValue::from("2024-01-01"), CellValue::Number(42000.0)],
            vec![CellValue::from("2024-01-02"), CellValue::Number(42150.0)],
            vec![CellValue::from("2024-01-03"), CellValue::Number(41900.0)],
        ];
        ParsedDataset::from_sheets("f1", "prices.csv", "csv", 2048, vec![SheetTable::new("prices", rows)])
    }

    #[test]
    fn test_system_prompt_lists_files_and_connections() {
        let files = vec![sample_dataset()];
        let connections = vec![RelationshipEvidence {
            file1: "prices.csv".to_string(),
            file2: "volumes.csv".to_string(),
            kind: ConnectionKind::CommonColumns,
            detail: vec![CellValue::from("Date")],
        }];
        let history = vec![ConversationMessage {
            role: Role::User,
            content: "前回の質問".to_string(),
            timestamp: String::new(),
            file_references: None,
        }];

        let prompt = build_multi_file_system_prompt(&files, &connections, &history, None);

        assert!(prompt.contains("**prices.csv** (CSV)"));
        assert!(prompt.contains("Data: 4 rows × 2 columns"));
        assert!(prompt.contains("Size: 0.00 MB"));
        assert!(prompt.contains("- prices.csv ↔ volumes.csv: Common columns: Date"));
        assert!(prompt.contains("user: 前回の質問"));
        assert!(!prompt.contains("FOCUSED FILE"));
    }

    #[test]
    fn test_system_prompt_sample_is_first_three_rows() {
        let prompt = build_multi_file_system_prompt(&[sample_dataset()], &[], &[], None);
        assert!(prompt.contains(r#"Sample: [["Date","Price"],["2024-01-01","42000"],["2024-01-02","42150"]]"#));
        assert!(!prompt.contains("41900"));
    }

    #[test]
    fn test_system_prompt_focus_on_selected_file() {
        let prompt = build_multi_file_system_prompt(&[sample_dataset()], &[], &[], Some("f1"));
        assert!(prompt.contains("FOCUSED FILE:** prices.csv"));

        let prompt = build_multi_file_system_prompt(&[sample_dataset()], &[], &[], Some("missing"));
        assert!(!prompt.contains("FOCUSED FILE"));
    }

    #[test]
    fn test_user_prompt_quotes_query() {
        let prompt = build_multi_file_user_prompt("What is the BTC trend?");
        assert!(prompt.starts_with(r#"User Query: "What is the BTC trend?""#));
    }

    #[test]
    fn test_excel_agent_prompts() {
        assert!(build_excel_agent_system_prompt(None).ends_with("File: Unknown"));
        assert!(build_excel_agent_system_prompt(Some("a.xlsx")).ends_with("File: a.xlsx"));

        let user = build_excel_agent_user_prompt("合計は?", "Headers: a | b");
        assert!(user.contains(r#"answer the following question: "合計は?""#));
        assert!(user.contains("Excel File Content:\nHeaders: a | b"));
    }

    #[test]
    fn test_format_dataset_for_ai() {
        let text = format_dataset_for_ai(&sample_dataset());

        assert!(text.starts_with("EXCEL FILE ANALYSIS: prices.csv\n"));
        assert!(text.contains("File Size: 2.00 KB"));
        assert!(text.contains("=== SHEET 1: prices ==="));
        assert!(text.contains("Dimensions: 4 rows × 2 columns"));
        assert!(text.contains("Headers: Date | Price\n============\n"));
        assert!(text.contains("Row 1: 2024-01-01 | 42000"));
        assert!(text.contains("Row 3: 2024-01-03 | 41900"));
    }

    #[test]
    fn test_validation_prompts() {
        assert!(build_validation_system_prompt().contains(r#""qualityScore": "number (0-100, data quality assessment)""#));

        let user = build_validation_user_prompt(&sample_dataset()).unwrap();
        assert!(user.contains("File Name: prices.csv\nFile Size: 2048 bytes\nTotal Rows: 4\nTotal Columns: 2\nSheets: 1"));
        assert!(user.contains("\"2024-01-03\",\n    41900.0"));
        assert!(user.ends_with("Please provide a comprehensive data validation analysis."));
    }

    #[test]
    fn test_validation_preview_is_first_five_rows() {
        let rows = (0..8).map(|i| vec![CellValue::from(format!("row{}", i))]).collect();
        let dataset = ParsedDataset::from_sheets("f2", "", "csv", 0, vec![SheetTable::new("s", rows)]);

        let user = build_validation_user_prompt(&dataset).unwrap();
        assert!(user.contains("File Name: Unknown"));
        assert!(user.contains("row4"));
        assert!(!user.contains("row5"));
    }
}

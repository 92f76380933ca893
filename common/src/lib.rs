//! minam Common Library
//!
//! CLIとHTTPサーバーで共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod connections;
pub mod parser;
pub mod prompts;
#[cfg(feature = "excel")]
pub mod export;

pub use types::{
    CellValue, ConnectionKind, ConversationMessage, ParsedDataset, RelationshipEvidence, Role,
    SheetTable, ValidationReport,
};
pub use error::{Error, Result};
pub use connections::{find_common_columns, find_common_values, find_connections, has_similar_shape};
pub use parser::{extract_file_references, extract_json, parse_validation_report};
pub use prompts::{
    build_excel_agent_system_prompt, build_excel_agent_user_prompt, build_multi_file_system_prompt,
    build_multi_file_user_prompt, build_validation_system_prompt, build_validation_user_prompt,
    format_dataset_for_ai,
};

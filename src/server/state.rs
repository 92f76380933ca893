use crate::agent::{ExcelAgent, FileAnalysisAgent, MultiFileAgent};
use crate::llm::{CompletionClient, GenerationSettings};
use std::sync::Arc;

/// ハンドラ間で共有する状態
///
/// エージェントはいずれもリクエスト単位で完結するため、ここに可変状態は持たない。
#[derive(Clone)]
pub struct AppState {
    pub multi_file: Arc<MultiFileAgent>,
    pub excel: Arc<ExcelAgent>,
    pub analyzer: Arc<FileAnalysisAgent>,
}

impl AppState {
    pub fn new(client: Arc<dyn CompletionClient>, settings: GenerationSettings) -> Self {
        Self {
            multi_file: Arc::new(MultiFileAgent::new(client.clone(), settings.clone())),
            excel: Arc::new(ExcelAgent::new(client.clone(), settings.clone())),
            analyzer: Arc::new(FileAnalysisAgent::new(client, settings)),
        }
    }
}

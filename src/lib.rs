pub mod agent;
pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod insights;
pub mod llm;
pub mod loader;
pub mod mock_api;
pub mod progress;
pub mod scanner;
pub mod server;

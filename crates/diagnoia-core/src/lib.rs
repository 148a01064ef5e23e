//! DiagnOIA Core Library
//!
//! This crate provides the core functionality for DiagnOIA, including:
//! - Intent classification of Spanish clinical questions
//! - Read-only query catalog over the Neo4j knowledge graph
//! - Patient lookup by name
//! - Context formatting and response composition
//! - LLM integration (Ollama API)
//! - Triage vocabulary shared by the chat and the dashboard

pub mod catalog;
pub mod composer;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod graph;
pub mod intent;
pub mod llm;
pub mod triage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{Patient, PriorityEntry, QueryCatalog};
    pub use crate::composer::{Assistant, Reply, ReplyKind, ResponseMode};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::graph::{GraphStore, Neo4jClient};
    pub use crate::llm::{LanguageModel, OllamaClient};
    pub use crate::triage::Priority;
}

//! Tabular QA agent — answers natural-language questions over the dataset.
//!
//! The session holds the agent as a trait object so tests can swap in a
//! canned implementation.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::CerebraError;
use crate::llm_client::CompletionBackend;
use crate::prompts::AGENT_PREAMBLE;

/// A component that answers a natural-language question by reasoning over
/// the tabular dataset it is bound to.
#[async_trait]
pub trait TabularAgent: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, CerebraError>;
}

/// LLM-backed agent bound to the dataset file. Reads the CSV wholesale on
/// every question, so answers always reflect the latest appends.
pub struct CsvQaAgent {
    llm: Arc<dyn CompletionBackend>,
    data_path: PathBuf,
}

impl CsvQaAgent {
    pub fn new(llm: Arc<dyn CompletionBackend>, data_path: PathBuf) -> Self {
        Self { llm, data_path }
    }
}

#[async_trait]
impl TabularAgent for CsvQaAgent {
    async fn answer(&self, question: &str) -> Result<String, CerebraError> {
        let dataset = tokio::fs::read_to_string(&self.data_path).await?;
        debug!(
            "Answering query over dataset {:?} ({} bytes)",
            self.data_path,
            dataset.len()
        );

        let prompt = format!("{AGENT_PREAMBLE}\n\n{dataset}\n\n{question}");
        Ok(self.llm.complete(&prompt).await?)
    }
}

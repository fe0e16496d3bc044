#![allow(dead_code)]

use thiserror::Error;

use crate::llm_client::LlmError;

/// Central application error. Every failure on the journal or query path
/// lands here before the session boundary collapses it into the single
/// user-facing fallback message.
#[derive(Debug, Error)]
pub enum CerebraError {
    #[error("Completion call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Tabular agent failed: {0}")]
    Agent(String),

    #[error("Malformed extraction output: {0}")]
    MalformedExtraction(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt matched neither journal nor query keywords")]
    UnrecognizedIntent,
}

impl CerebraError {
    /// Short stable label for logs. The caller only ever sees the uniform
    /// fallback message, so this is the one place failure kinds stay apart.
    pub fn kind(&self) -> &'static str {
        match self {
            CerebraError::Llm(_) => "upstream_failure",
            CerebraError::Agent(_) => "upstream_failure",
            CerebraError::MalformedExtraction(_) => "parse_failure",
            CerebraError::Csv(_) | CerebraError::Io(_) => "storage_failure",
            CerebraError::UnrecognizedIntent => "unclassified_intent",
        }
    }
}

//! Dispatcher / Session — routes an incoming prompt to the journal-recording
//! path or the query path and owns the day context for the session.
//!
//! Failure policy: every error on a selected path is logged with its kind,
//! then collapsed into one uniform user-facing message. A prompt that matches
//! neither keyword set gets an explicit "unrecognized" response rather than
//! falling through silently.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use crate::agent::{CsvQaAgent, TabularAgent};
use crate::config::Config;
use crate::errors::CerebraError;
use crate::extraction::convert_journal_output;
use crate::llm_client::{CompletionBackend, LlmClient};
use crate::prompts::{journal_prompt, query_prompt};
use crate::store::{append_records, JournalEntryRecord};

pub const ACK_MESSAGE: &str = "Thank you. Your Cerebra Journal has been updated.";
pub const FALLBACK_MESSAGE: &str =
    "I'm sorry. I was not able to handle that. Please try again.";
pub const UNRECOGNIZED_MESSAGE: &str = "I couldn't tell whether that was a journal entry \
or a question. Include \"journal\" or \"query\" in your prompt.";

const JOURNAL_KEYWORDS: [&str; 2] = ["journal", "entry"];
const QUERY_KEYWORDS: [&str; 2] = ["query", "question"];

/// Closed set of prompt intents. Journal keywords win when a prompt matches
/// both sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Journal,
    Query,
    Unrecognized,
}

impl Intent {
    /// Pure keyword classification over the raw prompt text.
    pub fn classify(prompt: &str) -> Self {
        if JOURNAL_KEYWORDS.iter().any(|kw| prompt.contains(kw)) {
            Intent::Journal
        } else if QUERY_KEYWORDS.iter().any(|kw| prompt.contains(kw)) {
            Intent::Query
        } else {
            Intent::Unrecognized
        }
    }
}

/// One interactive session: the day context, the file paths, the completion
/// backend, and the long-lived tabular agent. The day context is fixed at
/// construction and never changes afterward.
pub struct Cerebra {
    current_day: String,
    entry_path: PathBuf,
    data_path: PathBuf,
    llm: Arc<dyn CompletionBackend>,
    agent: Box<dyn TabularAgent>,
}

impl Cerebra {
    /// Builds a session with the day context derived from the local clock.
    pub fn new(config: &Config) -> Self {
        Self::with_day(config, current_date())
    }

    /// Builds a session with an explicit day context.
    pub fn with_day(config: &Config, current_day: String) -> Self {
        let llm: Arc<dyn CompletionBackend> = Arc::new(LlmClient::new(
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            config.model.clone(),
        ));
        let data_path = PathBuf::from(&config.data_path);
        let agent = Box::new(CsvQaAgent::new(llm.clone(), data_path.clone()));

        Self {
            current_day,
            entry_path: PathBuf::from(&config.entry_path),
            data_path,
            llm,
            agent,
        }
    }

    /// Fully-injected constructor. This is the test seam: both external
    /// collaborators can be substituted with doubles.
    pub fn with_backends(
        current_day: String,
        entry_path: PathBuf,
        data_path: PathBuf,
        llm: Arc<dyn CompletionBackend>,
        agent: Box<dyn TabularAgent>,
    ) -> Self {
        Self {
            current_day,
            entry_path,
            data_path,
            llm,
            agent,
        }
    }

    /// Routes a prompt and always returns a user-facing string.
    pub async fn handle(&self, prompt: &str) -> String {
        let result = match Intent::classify(prompt) {
            Intent::Journal => self
                .record_journal_entry(prompt)
                .await
                .map(|_| ACK_MESSAGE.to_string()),
            Intent::Query => self.run_query(prompt).await,
            Intent::Unrecognized => Err(CerebraError::UnrecognizedIntent),
        };

        match result {
            Ok(response) => response,
            Err(CerebraError::UnrecognizedIntent) => {
                info!("Prompt matched neither journal nor query keywords");
                UNRECOGNIZED_MESSAGE.to_string()
            }
            Err(e) => {
                error!(kind = e.kind(), "Failed to handle prompt: {e}");
                FALLBACK_MESSAGE.to_string()
            }
        }
    }

    /// Journal path: persist the raw entry, then extract labels from it and
    /// merge them into the dataset. The two appends are independent
    /// all-or-nothing units; a failure after the entry append leaves the
    /// dataset untouched.
    async fn record_journal_entry(&self, entry: &str) -> Result<(), CerebraError> {
        let record = JournalEntryRecord::new(&self.current_day, entry);
        append_records(&self.entry_path, &[record])?;

        let prompt = journal_prompt(entry);
        let output = self.llm.complete(&prompt).await?;

        let rows = convert_journal_output(&output, &self.current_day)?;
        append_records(&self.data_path, &rows)?;

        info!(day = %self.current_day, rows = rows.len(), "Journal entry recorded");
        Ok(())
    }

    /// Query path: schema preamble plus the literal query, answered by the
    /// agent over the whole dataset.
    async fn run_query(&self, query: &str) -> Result<String, CerebraError> {
        let prompt = query_prompt(query);
        self.agent.answer(&prompt).await
    }
}

/// Day context label, e.g. "5-Nov".
fn current_date() -> String {
    chrono::Local::now().format("%-d-%b").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    use crate::extraction::ObservationRow;
    use crate::llm_client::LlmError;

    /// Completion double: returns a canned response, or fails when none is set.
    struct FakeCompletion {
        response: Option<String>,
    }

    #[async_trait]
    impl CompletionBackend for FakeCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            match &self.response {
                Some(text) => Ok(text.clone()),
                None => Err(LlmError::Api {
                    status: 500,
                    message: "injected failure".to_string(),
                }),
            }
        }
    }

    /// Agent double: records the question it was asked, answers with a
    /// canned string.
    struct FakeAgent {
        answer: String,
        questions: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl TabularAgent for FakeAgent {
        async fn answer(&self, question: &str) -> Result<String, CerebraError> {
            self.questions.lock().unwrap().push(question.to_string());
            Ok(self.answer.clone())
        }
    }

    const FULL_EXTRACTION: &str = r#"{"headache": {"12am-8am": 0, "8am-4pm": 0, "4pm-12am": 1},
        "worked_out": {"12am-8am": 0, "8am-4pm": 1, "4pm-12am": 0},
        "shower": {"12am-8am": 1, "8am-4pm": 0, "4pm-12am": 1}}"#;

    fn session_in(
        dir: &Path,
        completion: Option<String>,
        agent_answer: &str,
    ) -> (Cerebra, Arc<Mutex<Vec<String>>>) {
        let questions = Arc::new(Mutex::new(Vec::new()));
        let session = Cerebra::with_backends(
            "5-Nov".to_string(),
            dir.join("journal_entries.csv"),
            dir.join("data.csv"),
            Arc::new(FakeCompletion {
                response: completion,
            }),
            Box::new(FakeAgent {
                answer: agent_answer.to_string(),
                questions: questions.clone(),
            }),
        );
        (session, questions)
    }

    fn read_observations(path: &Path) -> Vec<ObservationRow> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader.deserialize().collect::<Result<_, _>>().unwrap()
    }

    fn read_entries(path: &Path) -> Vec<JournalEntryRecord> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader.deserialize().collect::<Result<_, _>>().unwrap()
    }

    #[test]
    fn test_classify_journal_keywords() {
        assert_eq!(Intent::classify("journal: long day"), Intent::Journal);
        assert_eq!(Intent::classify("new entry for today"), Intent::Journal);
    }

    #[test]
    fn test_classify_query_keywords() {
        assert_eq!(Intent::classify("query: headaches this week"), Intent::Query);
        assert_eq!(Intent::classify("a question about sleep"), Intent::Query);
    }

    #[test]
    fn test_classify_journal_wins_over_query() {
        assert_eq!(
            Intent::classify("journal entry: I had a question at work"),
            Intent::Journal
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(Intent::classify("hello there"), Intent::Unrecognized);
    }

    #[tokio::test]
    async fn test_journal_prompt_returns_acknowledgement() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _) = session_in(dir.path(), Some(FULL_EXTRACTION.to_string()), "");

        let response = session.handle("journal: ran 5k, showered, headache at night").await;
        assert_eq!(response, ACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_journal_prompt_appends_entry_record_and_six_rows() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _) = session_in(dir.path(), Some(FULL_EXTRACTION.to_string()), "");

        session.handle("journal: ran 5k, showered, headache at night").await;

        let entries = read_entries(&dir.path().join("journal_entries.csv"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].d, "5-Nov");
        assert_eq!(
            entries[0].journal_entry,
            "\"journal: ran 5k, showered, headache at night\""
        );

        let rows = read_observations(&dir.path().join("data.csv"));
        assert_eq!(rows.len(), 6);
        assert_eq!(rows.iter().filter(|r| r.data_type == "q").count(), 3);
        assert_eq!(rows.iter().filter(|r| r.data_type == "w").count(), 3);
        assert!(rows.iter().all(|r| r.d == "5-Nov"));
    }

    #[tokio::test]
    async fn test_repeated_journal_prompts_accumulate_rows() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _) = session_in(dir.path(), Some(FULL_EXTRACTION.to_string()), "");

        session.handle("journal: day one").await;
        session.handle("journal: day one").await;

        assert_eq!(read_entries(&dir.path().join("journal_entries.csv")).len(), 2);
        assert_eq!(read_observations(&dir.path().join("data.csv")).len(), 12);
    }

    #[tokio::test]
    async fn test_completion_failure_returns_fallback_and_leaves_dataset_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _) = session_in(dir.path(), None, "");

        let response = session.handle("journal: a day to forget").await;
        assert_eq!(response, FALLBACK_MESSAGE);

        // The raw-entry append precedes the model call and stands on its own;
        // the dataset must not gain partial rows.
        assert!(dir.path().join("journal_entries.csv").exists());
        assert!(!dir.path().join("data.csv").exists());
    }

    #[tokio::test]
    async fn test_malformed_extraction_returns_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _) = session_in(dir.path(), Some("no mapping here".to_string()), "");

        let response = session.handle("journal: fine day").await;
        assert_eq!(response, FALLBACK_MESSAGE);
        assert!(!dir.path().join("data.csv").exists());
    }

    #[tokio::test]
    async fn test_query_prompt_returns_agent_answer_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let (session, questions) = session_in(dir.path(), None, "You had 3 headaches.");

        let response = session.handle("query: how many headaches?").await;
        assert_eq!(response, "You had 3 headaches.");

        // The agent receives the schema-prefixed prompt, not the bare query.
        let asked = questions.lock().unwrap();
        assert_eq!(asked.len(), 1);
        assert!(asked[0].contains("- d: the day the label was extracted"));
        assert!(asked[0].ends_with("Query: query: how many headaches?"));
    }

    #[tokio::test]
    async fn test_unrecognized_prompt_gets_explicit_response() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _) = session_in(dir.path(), None, "");

        let response = session.handle("good morning").await;
        assert_eq!(response, UNRECOGNIZED_MESSAGE);
        assert!(!dir.path().join("journal_entries.csv").exists());
        assert!(!dir.path().join("data.csv").exists());
    }
}

//! All prompt constants and builders for Cerebra. Pure string assembly —
//! no side effects, no external calls.

/// Preamble for the journal-extraction call — pins the label vocabulary, the
/// time buckets, and the output shape.
const JOURNAL_PREAMBLE: &str = "Here is the way I would like you to extract labels \
from this journal entry. The labels in the following example are exactly the ones \
I would like you to extract. The actual word a label contains may not be present \
in the journal entry; we care about the meaning, so a slightly different phrasing \
is fine. The desired output is a JSON object where each key is a label and the \
value is a nested object, for which each key is a time of day ('12am-8am', \
'8am-4pm', '4pm-12am') and the value is either 1 or 0 (binary for whether that \
label occurred during that time of the day). '12am-8am' is the time of day \
between 12 am and 8 am, and so on. The only labels that may be used are \
'headache', 'worked_out', and 'shower'. These exact labels must be used in the \
output! Respond with the object only — no text outside it, no markdown code \
fences. Here is an example format (numbers are made up):\n\
{\"headache\": {\"12am-8am\": 0, \"8am-4pm\": 0, \"4pm-12am\": 1}, \
\"worked_out\": {\"12am-8am\": 1, \"8am-4pm\": 1, \"4pm-12am\": 1}, \
\"shower\": {\"12am-8am\": 0, \"8am-4pm\": 0, \"4pm-12am\": 1}}";

/// Preamble for query prompts — describes the dataset columns the agent
/// reasons over.
const QUERY_PREAMBLE: &str = "Here is a breakdown of the columns present in this data:\n\
 - d: the day the label was extracted\n\
 - label: the label extracted\n\
 - 12am-8am: the first time period of the day\n\
 - 8am-4pm: the second time period of the day\n\
 - 4pm-12am: the third and final time period of the day\n\
When information about a label is requested in the query, please use all time \
period columns.";

/// Preamble the tabular agent wraps around the raw dataset before the query.
pub const AGENT_PREAMBLE: &str = "You are answering questions about a personal \
journal dataset. The full contents of the dataset, in CSV format, follow. Answer \
the query using only this data and reply with a concise natural-language answer.";

/// Builds the extraction prompt for a journal entry. The caller-supplied entry
/// is authoritative (the original implementation substituted a hardcoded
/// example narrative here; that was a bug, not behavior to keep).
pub fn journal_prompt(entry: &str) -> String {
    format!("{JOURNAL_PREAMBLE}\n\nJournal Entry:\n{entry}\n\nOutput:\n")
}

/// Builds the query prompt: schema description plus the literal query text.
pub fn query_prompt(query: &str) -> String {
    format!("{QUERY_PREAMBLE}\n\nQuery: {query}")
}

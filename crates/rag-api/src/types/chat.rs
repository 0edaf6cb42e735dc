//! Question answering request/response types

use serde::{Deserialize, Serialize};

use super::memory::MemoryAnswer;

/// Question payload for `POST /ask`
///
/// Unknown fields (such as a legacy `documentId`) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The question to answer. `null` and missing are both `None`.
    #[serde(default)]
    pub question: Option<String>,
}

impl ChatRequest {
    /// The question, if present and not blank
    pub fn non_blank_question(&self) -> Option<&str> {
        self.question.as_deref().filter(|q| !q.trim().is_empty())
    }
}

/// Answer with the names of the sources it was built from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated answer, passed through from the memory service
    pub answer: String,
    /// Source names, deduplicated in first-seen order
    pub sources: Vec<String>,
}

impl ChatResponse {
    /// The response returned for blank questions and backend failures
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a gateway answer, removing repeated source names
    pub fn from_memory_answer(answer: MemoryAnswer) -> Self {
        let sources = dedup_sources(answer.relevant_sources.into_iter().map(|s| s.source_name));
        Self {
            answer: answer.result,
            sources,
        }
    }

    /// True for the empty response shape
    pub fn is_empty(&self) -> bool {
        self.answer.is_empty() && self.sources.is_empty()
    }
}

/// Remove duplicates by exact (case-sensitive) match, keeping the first occurrence
pub fn dedup_sources<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

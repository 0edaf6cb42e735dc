//! Wire types of the Kernel Memory compatible service

use serde::{Deserialize, Serialize};

/// Answer returned by the memory service `ask` operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryAnswer {
    /// The question as seen by the service
    #[serde(default)]
    pub question: String,
    /// Set when no relevant memory was found
    #[serde(default)]
    pub no_result: bool,
    /// Generated answer text
    #[serde(rename = "text", alias = "result")]
    pub result: String,
    /// Sources that contributed to the answer
    #[serde(default)]
    pub relevant_sources: Vec<RelevantSource>,
}

/// A document that contributed to an answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevantSource {
    /// Source name, usually the uploaded file name
    pub source_name: String,
    /// Document id inside the memory service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// Link to the source inside the memory service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl RelevantSource {
    /// Source identified only by name
    pub fn named(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Default::default()
        }
    }
}

/// Ask request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest<'a> {
    pub question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_relevance: Option<f64>,
}

/// Upload acknowledgement
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadAccepted {
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub index: Option<String>,
}

/// Pipeline status of an uploaded document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatus {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub failed: bool,
}

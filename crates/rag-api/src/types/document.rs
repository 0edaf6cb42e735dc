//! Document upload types

use serde::{Deserialize, Serialize};

/// Confirmation returned by `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Human readable confirmation
    pub message: String,
    /// Name of the ingested file
    pub file_name: String,
}

impl UploadResponse {
    /// Confirmation for a successfully ingested file
    pub fn ingested(file_name: impl Into<String>) -> Self {
        Self {
            message: "Document ingested successfully.".to_string(),
            file_name: file_name.into(),
        }
    }
}

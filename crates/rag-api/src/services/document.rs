//! Document ingestion service

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use crate::gateway::{GatewayError, MemoryGateway};

/// Why a document was refused before reaching the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidDocument {
    /// No content stream was supplied
    MissingContent,
    /// File name was empty
    EmptyFileName,
}

/// Result of an ingestion attempt
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The gateway accepted the document
    Imported { document_id: String },
    /// Input failed validation; the gateway was not called
    Rejected(InvalidDocument),
    /// The gateway call failed
    Failed(GatewayError),
}

impl IngestOutcome {
    /// Whether the document was handed over successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Imported { .. })
    }
}

/// Trait for document ingestion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Validate and import a document, reporting the detailed outcome
    async fn ingest(&self, content: Option<Bytes>, file_name: &str) -> IngestOutcome;

    /// Validate and import a document; any failure is `false`
    async fn ingest_document(&self, content: Option<Bytes>, file_name: &str) -> bool {
        self.ingest(content, file_name).await.is_success()
    }
}

/// Ingestion backed by the memory gateway
pub struct MemoryDocumentService {
    gateway: Arc<dyn MemoryGateway>,
    readiness_delay: Option<Duration>,
}

impl MemoryDocumentService {
    /// Create a new ingestion service
    pub fn new(gateway: Arc<dyn MemoryGateway>) -> Self {
        Self {
            gateway,
            readiness_delay: None,
        }
    }

    /// Probe document readiness this long after each successful import
    pub fn with_readiness_check(mut self, delay: Duration) -> Self {
        self.readiness_delay = Some(delay);
        self
    }
}

#[async_trait]
impl DocumentService for MemoryDocumentService {
    async fn ingest(&self, content: Option<Bytes>, file_name: &str) -> IngestOutcome {
        let Some(content) = content else {
            tracing::warn!("Rejected document '{}': no content", file_name);
            return IngestOutcome::Rejected(InvalidDocument::MissingContent);
        };
        if file_name.is_empty() {
            tracing::warn!("Rejected document: empty file name");
            return IngestOutcome::Rejected(InvalidDocument::EmptyFileName);
        }

        let size = content.len();
        match self.gateway.import_document(content, file_name).await {
            Ok(document_id) => {
                tracing::info!(
                    "Imported '{}' ({} bytes) via {} as {}",
                    file_name,
                    size,
                    self.gateway.name(),
                    document_id
                );
                if let Some(delay) = self.readiness_delay {
                    tokio::spawn(probe_readiness(
                        Arc::clone(&self.gateway),
                        document_id.clone(),
                        delay,
                    ));
                }
                IngestOutcome::Imported { document_id }
            }
            Err(e) => {
                tracing::error!("Failed to import '{}' ({} bytes): {}", file_name, size, e);
                IngestOutcome::Failed(e)
            }
        }
    }
}

/// Wait, then log whether the document is searchable. Diagnostic only.
pub async fn probe_readiness(
    gateway: Arc<dyn MemoryGateway>,
    document_id: String,
    delay: Duration,
) -> Option<bool> {
    tokio::time::sleep(delay).await;

    match gateway.is_document_ready(&document_id).await {
        Ok(true) => {
            tracing::info!("Document {} is ready", document_id);
            Some(true)
        }
        Ok(false) => {
            tracing::warn!("Document {} not ready after {:?}", document_id, delay);
            Some(false)
        }
        Err(e) => {
            tracing::warn!("Readiness check for {} failed: {}", document_id, e);
            None
        }
    }
}

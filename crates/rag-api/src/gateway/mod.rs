//! Memory gateway: the capability boundary to the external RAG service
//!
//! Chunking, embedding, vector search and answer generation all happen behind this trait.
//! The production implementation is [`KernelMemoryClient`]; tests use the generated
//! `MockMemoryGateway`.

pub mod kernel_memory;

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

use crate::types::memory::MemoryAnswer;

pub use kernel_memory::KernelMemoryClient;

/// Result type for gateway calls
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Failures reported by the memory service or the path to it
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// Service could not be reached
    #[error("memory service unavailable: {0}")]
    Unavailable(String),

    /// Service did not answer in time
    #[error("memory service timed out after {0:?}")]
    Timeout(Duration),

    /// Document is larger than the service accepts; `limit` is known when checked locally
    #[error("document of {size} bytes is too large for the memory service")]
    PayloadTooLarge { size: usize, limit: Option<usize> },

    /// Service cannot process this kind of content
    #[error("unsupported content: {0}")]
    UnsupportedContent(String),

    /// Nothing has been ingested that could answer the question
    #[error("memory index is empty")]
    EmptyIndex,

    /// Any other non-success response
    #[error("memory service returned HTTP {status}: {message}")]
    Backend { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("malformed response from memory service: {0}")]
    MalformedResponse(String),
}

/// Trait for the external ingestion/retrieval/generation service
///
/// Implementations must tolerate concurrent calls from many requests; the handle is shared
/// for the lifetime of the process and never mutated after startup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemoryGateway: Send + Sync {
    /// Hand a document to the service for ingestion, returning its document id
    async fn import_document(&self, content: Bytes, file_name: &str) -> GatewayResult<String>;

    /// Best-effort check whether an imported document is searchable yet
    async fn is_document_ready(&self, document_id: &str) -> GatewayResult<bool>;

    /// Answer a question from the ingested documents
    async fn ask(&self, question: &str, min_relevance: Option<f64>) -> GatewayResult<MemoryAnswer>;

    /// Check if the service is healthy and available
    async fn health_check(&self) -> GatewayResult<bool>;

    /// Get gateway name for logging
    fn name(&self) -> &str;
}

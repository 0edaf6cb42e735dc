//! rag-api: HTTP front end for document ingestion and question answering
//!
//! The heavy lifting (chunking, embeddings, vector search, answer synthesis) lives in an
//! external Kernel Memory compatible service. This crate validates requests, forwards them
//! through the [`gateway::MemoryGateway`] capability and shapes the results for HTTP callers.

pub mod config;
pub mod error;
pub mod gateway;
pub mod server;
pub mod services;
pub mod types;

pub use config::RagApiConfig;
pub use error::{Error, Result};
pub use gateway::{GatewayError, KernelMemoryClient, MemoryGateway};
pub use services::{ChatService, DocumentService, MemoryChatService, MemoryDocumentService};
pub use types::{
    chat::{ChatRequest, ChatResponse},
    document::UploadResponse,
};

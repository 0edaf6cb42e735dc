//! Application services between the HTTP routes and the memory gateway
//!
//! Each service exposes a tagged outcome carrying the failure cause, and a contract method
//! that collapses it to the shape callers see.

pub mod chat;
pub mod document;

pub use chat::{AnswerOutcome, ChatService, MemoryChatService};
pub use document::{DocumentService, IngestOutcome, InvalidDocument, MemoryDocumentService};

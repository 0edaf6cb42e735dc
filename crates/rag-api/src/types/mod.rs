//! Request, response and wire types

pub mod chat;
pub mod document;
pub mod memory;

pub use chat::{ChatRequest, ChatResponse};
pub use document::UploadResponse;
pub use memory::{MemoryAnswer, RelevantSource};

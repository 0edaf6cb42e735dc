//! Question answering service

use async_trait::async_trait;
use std::sync::Arc;

use crate::gateway::{GatewayError, MemoryGateway};
use crate::types::ChatResponse;

/// Result of a question answering attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// The gateway produced an answer
    Answered(ChatResponse),
    /// The question was blank; the gateway was not called
    Skipped,
    /// The gateway call failed
    Failed(GatewayError),
}

impl AnswerOutcome {
    /// Collapse to the response callers see: blank input and failures both become empty
    pub fn into_response(self) -> ChatResponse {
        match self {
            Self::Answered(response) => response,
            Self::Skipped | Self::Failed(_) => ChatResponse::empty(),
        }
    }
}

/// Trait for question answering
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Answer a question, reporting the detailed outcome
    async fn answer(&self, question: &str) -> AnswerOutcome;

    /// Answer a question; blank questions and failures yield an empty response
    async fn ask_question(&self, question: &str) -> ChatResponse {
        self.answer(question).await.into_response()
    }
}

/// Question answering backed by the memory gateway
pub struct MemoryChatService {
    gateway: Arc<dyn MemoryGateway>,
    min_relevance: Option<f64>,
}

impl MemoryChatService {
    /// Create a new question answering service
    pub fn new(gateway: Arc<dyn MemoryGateway>) -> Self {
        Self {
            gateway,
            min_relevance: None,
        }
    }

    /// Only use sources at or above this relevance
    pub fn with_min_relevance(mut self, min_relevance: Option<f64>) -> Self {
        self.min_relevance = min_relevance;
        self
    }
}

#[async_trait]
impl ChatService for MemoryChatService {
    async fn answer(&self, question: &str) -> AnswerOutcome {
        if question.trim().is_empty() {
            tracing::debug!("Skipping blank question");
            return AnswerOutcome::Skipped;
        }

        tracing::info!("Question: \"{}\"", question);

        match self.gateway.ask(question, self.min_relevance).await {
            Ok(answer) => {
                let response = ChatResponse::from_memory_answer(answer);
                tracing::info!(
                    "Answered via {} with {} source(s)",
                    self.gateway.name(),
                    response.sources.len()
                );
                AnswerOutcome::Answered(response)
            }
            Err(e) => {
                tracing::error!("Failed to answer \"{}\": {}", question, e);
                AnswerOutcome::Failed(e)
            }
        }
    }
}

//! Application state for the RAG API server

use std::sync::Arc;
use std::time::Duration;

use crate::config::RagApiConfig;
use crate::error::Result;
use crate::gateway::{KernelMemoryClient, MemoryGateway};
use crate::services::{ChatService, DocumentService, MemoryChatService, MemoryDocumentService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagApiConfig,
    /// Memory gateway, shared by every request
    gateway: Arc<dyn MemoryGateway>,
    /// Document ingestion
    document_service: Arc<dyn DocumentService>,
    /// Question answering
    chat_service: Arc<dyn ChatService>,
}

impl AppState {
    /// Create state connected to the configured memory service
    pub fn new(config: RagApiConfig) -> Result<Self> {
        tracing::info!("Initializing RAG API state...");

        let gateway = Arc::new(KernelMemoryClient::new(&config.memory)?);
        tracing::info!(
            "Memory gateway initialized ({}, max {} concurrent requests)",
            gateway.base_url(),
            config.memory.max_concurrent_requests
        );

        Ok(Self::with_gateway(config, gateway))
    }

    /// Create state with the default services over a given gateway
    pub fn with_gateway(config: RagApiConfig, gateway: Arc<dyn MemoryGateway>) -> Self {
        let mut document_service = MemoryDocumentService::new(Arc::clone(&gateway));
        if let Some(secs) = config.ingestion.readiness_check_delay_secs {
            tracing::info!("Readiness probe enabled ({}s after import)", secs);
            document_service = document_service.with_readiness_check(Duration::from_secs(secs));
        }
        let chat_service = MemoryChatService::new(Arc::clone(&gateway))
            .with_min_relevance(config.memory.min_relevance);

        Self::from_parts(
            config,
            gateway,
            Arc::new(document_service),
            Arc::new(chat_service),
        )
    }

    /// Create state from explicit components
    pub fn from_parts(
        config: RagApiConfig,
        gateway: Arc<dyn MemoryGateway>,
        document_service: Arc<dyn DocumentService>,
        chat_service: Arc<dyn ChatService>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                document_service,
                chat_service,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagApiConfig {
        &self.inner.config
    }

    /// Get the memory gateway
    pub fn gateway(&self) -> &Arc<dyn MemoryGateway> {
        &self.inner.gateway
    }

    /// Get the document ingestion service
    pub fn document_service(&self) -> &Arc<dyn DocumentService> {
        &self.inner.document_service
    }

    /// Get the question answering service
    pub fn chat_service(&self) -> &Arc<dyn ChatService> {
        &self.inner.chat_service
    }

    /// Check if the memory service is reachable
    pub async fn is_ready(&self) -> bool {
        match self.inner.gateway.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Health check via {} failed: {}", self.inner.gateway.name(), e);
                false
            }
        }
    }
}

//! API routes for the RAG API server

pub mod ask;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Question answering
        .route("/ask", post(ask::ask))
        .route("/api/chat", post(ask::ask))
        // Ingestion - with larger body limit for file uploads
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/api/ingest",
            post(upload::upload).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Info
        .route("/api/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    Json(serde_json::json!({
        "name": "rag-api",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document ingestion and question answering over a Kernel Memory service",
        "endpoints": {
            "POST /ask": "Ask a question; returns answer and sources",
            "POST /upload": "Upload a document (multipart field 'file')",
            "POST /api/chat": "Alias of POST /ask",
            "POST /api/ingest": "Alias of POST /upload",
            "GET /health": "Liveness",
            "GET /ready": "Memory service reachability"
        },
        "memory": {
            "gateway": state.gateway().name(),
            "index": config.memory.index,
            "min_relevance": config.memory.min_relevance,
            "max_document_size": config.memory.max_document_size,
        },
        "backend": config.backend,
    }))
}

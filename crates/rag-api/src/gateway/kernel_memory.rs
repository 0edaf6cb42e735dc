//! HTTP client for a Kernel Memory compatible web service

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    header::AUTHORIZATION,
    multipart::{Form, Part},
    Client, RequestBuilder, Response, StatusCode,
};
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};
use uuid::Uuid;

use crate::config::MemoryConfig;
use crate::error::Result;
use crate::types::memory::{AskRequest, MemoryAnswer, UploadAccepted, UploadStatus};

use super::{GatewayError, GatewayResult, MemoryGateway};

/// Kernel Memory web service client
pub struct KernelMemoryClient {
    /// HTTP client
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Value of the `Authorization` header
    api_key: Option<String>,
    /// Target index
    index: Option<String>,
    /// Import size limit
    max_document_size: usize,
    /// Per-request timeout, reported in timeout errors
    timeout: Duration,
    /// Bounds in-flight requests
    permits: Semaphore,
}

/// Which operation a response belongs to, for status mapping
#[derive(Debug, Clone, Copy)]
enum Operation {
    Upload { size: usize },
    UploadStatus,
    Ask,
}

impl KernelMemoryClient {
    /// Create a new client
    pub fn new(config: &MemoryConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(config.max_concurrent_requests)
            .build()?;

        Ok(Self {
            client,
            base_url: config.service_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            index: config.index.clone(),
            max_document_size: config.max_document_size,
            timeout,
            permits: Semaphore::new(config.max_concurrent_requests),
        })
    }

    /// Base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header(AUTHORIZATION, key),
            None => builder,
        }
    }

    async fn acquire(&self) -> GatewayResult<SemaphorePermit<'_>> {
        self.permits
            .acquire()
            .await
            .map_err(|_| GatewayError::Unavailable("client is shut down".to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout)
        } else if err.is_decode() {
            GatewayError::MalformedResponse(err.to_string())
        } else {
            GatewayError::Unavailable(err.to_string())
        }
    }

    /// Turn non-success responses into gateway errors
    async fn check_status(response: Response, operation: Operation) -> GatewayResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(match (status, operation) {
            (StatusCode::PAYLOAD_TOO_LARGE, Operation::Upload { size }) => {
                GatewayError::PayloadTooLarge { size, limit: None }
            }
            (StatusCode::UNSUPPORTED_MEDIA_TYPE | StatusCode::UNPROCESSABLE_ENTITY, _) => {
                GatewayError::UnsupportedContent(message)
            }
            (StatusCode::NOT_FOUND, Operation::Ask) => GatewayError::EmptyIndex,
            (StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY, _) => {
                GatewayError::Unavailable(format!("HTTP {}: {}", status.as_u16(), message))
            }
            _ => GatewayError::Backend {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl MemoryGateway for KernelMemoryClient {
    async fn import_document(&self, content: Bytes, file_name: &str) -> GatewayResult<String> {
        let size = content.len();
        if size > self.max_document_size {
            return Err(GatewayError::PayloadTooLarge {
                size,
                limit: Some(self.max_document_size),
            });
        }

        let document_id = Uuid::new_v4().simple().to_string();
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = Part::stream_with_length(content, size as u64)
            .file_name(file_name.to_string())
            .mime_str(mime.as_ref())
            .map_err(|e| GatewayError::UnsupportedContent(e.to_string()))?;

        let mut form = Form::new()
            .part("file", part)
            .text("documentId", document_id.clone());
        if let Some(index) = &self.index {
            form = form.text("index", index.clone());
        }

        let _permit = self.acquire().await?;
        tracing::debug!("Uploading {} ({} bytes, {}) as {}", file_name, size, mime, document_id);

        let response = self
            .authorized(self.client.post(self.url("upload")))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = Self::check_status(response, Operation::Upload { size }).await?;

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        if body.trim().is_empty() {
            return Ok(document_id);
        }
        let accepted: UploadAccepted = serde_json::from_str(&body)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        Ok(accepted.document_id.unwrap_or(document_id))
    }

    async fn is_document_ready(&self, document_id: &str) -> GatewayResult<bool> {
        let mut query = vec![("documentId", document_id)];
        if let Some(index) = &self.index {
            query.push(("index", index.as_str()));
        }

        let _permit = self.acquire().await?;
        let response = self
            .authorized(self.client.get(self.url("upload-status")))
            .query(&query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        let response = Self::check_status(response, Operation::UploadStatus).await?;
        let status: UploadStatus = response.json().await.map_err(|e| self.transport_error(e))?;

        Ok(status.completed && !status.failed)
    }

    async fn ask(&self, question: &str, min_relevance: Option<f64>) -> GatewayResult<MemoryAnswer> {
        let request = AskRequest {
            question,
            index: self.index.as_deref(),
            min_relevance,
        };

        let _permit = self.acquire().await?;
        let response = self
            .authorized(self.client.post(self.url("ask")))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let response = Self::check_status(response, Operation::Ask).await?;

        response.json().await.map_err(|e| self.transport_error(e))
    }

    /// Unhealthy statuses are `Ok(false)`; an unreachable service is an error.
    /// Does not take a permit.
    async fn health_check(&self) -> GatewayResult<bool> {
        let response = self
            .authorized(self.client.get(self.url("health")))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        "kernel-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Multipart, Query},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Serve a fake memory service on an ephemeral port
    async fn spawn_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(service_url: String) -> KernelMemoryClient {
        let config = MemoryConfig {
            service_url,
            timeout_secs: 5,
            ..Default::default()
        };
        KernelMemoryClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_import_sends_file_and_document_id() {
        let received: Arc<Mutex<HashMap<String, (Option<String>, Vec<u8>)>>> = Arc::default();
        let captured = Arc::clone(&received);

        let router = Router::new().route(
            "/upload",
            post(move |mut multipart: Multipart| {
                let captured = Arc::clone(&captured);
                async move {
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        let file_name = field.file_name().map(str::to_string);
                        let data = field.bytes().await.unwrap().to_vec();
                        captured.lock().unwrap().insert(name, (file_name, data));
                    }
                    Json(json!({"index": "default", "documentId": "doc-42", "message": "ok"}))
                }
            }),
        );

        let client = client_for(spawn_service(router).await);
        let id = client
            .import_document(Bytes::from_static(b"hello memory"), "notes.txt")
            .await
            .unwrap();
        assert_eq!(id, "doc-42");

        let received = received.lock().unwrap();
        let (file_name, data) = &received["file"];
        assert_eq!(file_name.as_deref(), Some("notes.txt"));
        assert_eq!(data.as_slice(), b"hello memory");
        assert!(received.contains_key("documentId"));
    }

    #[tokio::test]
    async fn test_import_rejects_oversized_document_locally() {
        let config = MemoryConfig {
            service_url: "http://127.0.0.1:1".to_string(),
            max_document_size: 4,
            ..Default::default()
        };
        let client = KernelMemoryClient::new(&config).unwrap();

        let err = client
            .import_document(Bytes::from_static(b"too long"), "big.bin")
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::PayloadTooLarge { size: 8, limit: Some(4) });
    }

    #[tokio::test]
    async fn test_import_maps_unsupported_media_type() {
        let router = Router::new().route(
            "/upload",
            post(|| async { (StatusCode::UNSUPPORTED_MEDIA_TYPE, "no decoder for .xyz") }),
        );
        let client = client_for(spawn_service(router).await);

        let err = client
            .import_document(Bytes::from_static(b"data"), "file.xyz")
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::UnsupportedContent("no decoder for .xyz".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        let client = client_for("http://127.0.0.1:1".to_string());

        let err = client.ask("What is RAG?", None).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
        assert!(matches!(
            client.health_check().await,
            Err(GatewayError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_ask_parses_answer_and_forwards_options() {
        let seen: Arc<Mutex<Option<(Value, Option<String>)>>> = Arc::default();
        let captured = Arc::clone(&seen);

        let router = Router::new().route(
            "/ask",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = Arc::clone(&captured);
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *captured.lock().unwrap() = Some((body, auth));
                    Json(json!({
                        "question": "What is RAG?",
                        "noResult": false,
                        "text": "RAG stands for Retrieval-Augmented Generation.",
                        "relevantSources": [
                            {"sourceName": "doc1.pdf", "link": "default/doc1/file1"},
                            {"sourceName": "doc1.pdf"}
                        ]
                    }))
                }
            }),
        );

        let config = MemoryConfig {
            service_url: spawn_service(router).await,
            api_key: Some("secret".to_string()),
            index: Some("papers".to_string()),
            ..Default::default()
        };
        let client = KernelMemoryClient::new(&config).unwrap();

        let answer = client.ask("What is RAG?", Some(0.5)).await.unwrap();
        assert_eq!(answer.result, "RAG stands for Retrieval-Augmented Generation.");
        assert_eq!(answer.relevant_sources.len(), 2);

        let (body, auth) = seen.lock().unwrap().take().unwrap();
        assert_eq!(
            body,
            json!({"question": "What is RAG?", "index": "papers", "minRelevance": 0.5})
        );
        assert_eq!(auth.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_ask_status_mapping() {
        let router = Router::new()
            .route("/ask", post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }));
        let client = client_for(spawn_service(router).await);
        assert_eq!(
            client.ask("q", None).await.unwrap_err(),
            GatewayError::Backend {
                status: 500,
                message: "boom".to_string()
            }
        );

        let router = Router::new().route("/ask", post(|| async { StatusCode::NOT_FOUND }));
        let client = client_for(spawn_service(router).await);
        assert_eq!(client.ask("q", None).await.unwrap_err(), GatewayError::EmptyIndex);
    }

    #[tokio::test]
    async fn test_ask_malformed_body() {
        let router = Router::new().route("/ask", post(|| async { Json(json!({"unexpected": 1})) }));
        let client = client_for(spawn_service(router).await);

        let err = client.ask("q", None).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_document_readiness() {
        let router = Router::new()
            .route(
                "/upload-status",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    match params.get("documentId").map(String::as_str) {
                        Some("done") => (StatusCode::OK, Json(json!({"completed": true}))),
                        Some("pending") => (StatusCode::OK, Json(json!({"completed": false}))),
                        _ => (StatusCode::NOT_FOUND, Json(json!({}))),
                    }
                }),
            )
            .route("/health", get(|| async { "OK" }));
        let client = client_for(spawn_service(router).await);

        assert!(client.is_document_ready("done").await.unwrap());
        assert!(!client.is_document_ready("pending").await.unwrap());
        assert!(!client.is_document_ready("missing").await.unwrap());
        assert!(client.health_check().await.unwrap());
    }
}

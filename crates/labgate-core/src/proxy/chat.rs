//! Notes-chat proxy.
//!
//! Forwards one student question to the upstream chat/RAG service through
//! [`RetryPolicy`], bounded by a hard request deadline, then normalizes the
//! heterogeneous upstream body shapes into a single `{answer}` reply. When
//! the RAG index is broken, issues exactly one degraded-mode retry without
//! RAG before surfacing an error.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use labgate_types::chat::{ChatReply, ChatRequest, UpstreamChatCall};
use labgate_types::error::ProxyError;

use super::retry::{RetryError, RetryPolicy};

/// Hard ceiling for the primary upstream call, independent of retry count.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Warning attached to answers produced by the non-RAG fallback.
const FALLBACK_WARNING: &str = "PDF indexing unavailable, using general response";

const RETRY_SUGGESTION: &str = "Please try again or upload the PDF again.";

/// Proxy for the upstream chat service.
pub struct ChatProxy {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    request_timeout: Duration,
}

impl ChatProxy {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            retry: RetryPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Overrides the retry policy and request deadline.
    pub fn with_policy(mut self, retry: RetryPolicy, request_timeout: Duration) -> Self {
        self.retry = retry;
        self.request_timeout = request_timeout;
        self
    }

    /// Handles one chat turn.
    ///
    /// At most two upstream calls are made: the primary and, when the RAG
    /// index is broken, a single non-RAG fallback. The fallback runs its
    /// own retry loop and is not covered by the primary deadline.
    pub async fn handle(&self, request: &ChatRequest) -> Result<ChatReply, ProxyError> {
        if request.question.trim().is_empty() {
            return Err(ProxyError::InvalidRequest {
                message: "Question is required".to_string(),
            });
        }

        let use_rag = request.use_pdf;
        let message = frame_message(&request.question, &request.context, use_rag);

        if let Some(mode) = &request.response_mode {
            debug!("response mode hint: {} (advisory only)", mode);
        }
        info!("forwarding chat request, use_pdf={}", use_rag);

        let primary = tokio::time::timeout(
            self.request_timeout,
            self.retry.execute(|| self.call_upstream(&message, use_rag)),
        );
        let response = match primary.await {
            Err(_) => {
                warn!("chat upstream exceeded the {}s deadline", self.request_timeout.as_secs());
                return Err(ProxyError::Timeout {
                    duration_secs: self.request_timeout.as_secs(),
                });
            },
            Ok(Err(err)) => return Err(self.transport_error(err)),
            Ok(Ok(response)) => response,
        };

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("chat upstream returned {}: {}", status, body);
            return Err(status_error(status, body));
        }

        let data: Value = response.json().await.map_err(|err| {
            warn!("chat upstream returned unparsable body: {}", err);
            ProxyError::Internal {
                message: "Internal server error. Please try again.".to_string(),
            }
        })?;

        if let Some(error_text) = data.get("error").and_then(Value::as_str) {
            warn!("chat upstream reported error: {}", error_text);

            if is_rag_index_error(error_text, use_rag) {
                if let Some(reply) = self.fallback(&request.question, &request.context).await {
                    return Ok(reply);
                }
            }

            let details = data
                .get("details")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| RETRY_SUGGESTION.to_string());
            return Err(ProxyError::Upstream {
                status: 500,
                message: error_text.to_string(),
                details: Some(details),
            });
        }

        Ok(ChatReply { answer: normalize_answer(&data), warning: None })
    }

    /// One-shot degraded retry without RAG. Returns `None` when the
    /// fallback itself fails; the caller then surfaces the original error.
    async fn fallback(&self, question: &str, context: &str) -> Option<ChatReply> {
        info!("RAG index unavailable, retrying once without RAG");
        let message = frame_message(question, context, false);

        let response = match self.retry.execute(|| self.call_upstream(&message, false)).await {
            Ok(response) => response,
            Err(err) => {
                warn!("non-RAG fallback failed: {}", err);
                return None;
            },
        };
        if !response.status().is_success() {
            warn!("non-RAG fallback returned {}", response.status());
            return None;
        }

        let data: Value = response.json().await.ok()?;
        let answer = data.get("answer").and_then(Value::as_str)?;
        Some(ChatReply {
            answer: answer.to_string(),
            warning: Some(FALLBACK_WARNING.to_string()),
        })
    }

    async fn call_upstream(
        &self,
        message: &str,
        use_pdf: bool,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(format!("{}/chat", self.base_url))
            .json(&UpstreamChatCall { message: message.to_string(), use_pdf })
            .send()
            .await
    }

    fn transport_error(&self, err: RetryError) -> ProxyError {
        match err {
            RetryError::Exhausted { last_status: Some(429) } => ProxyError::RateLimited {
                message: "API quota exceeded. Please try again later.".to_string(),
                quota_info: Some("The free tier has daily and per-minute limits.".to_string()),
            },
            RetryError::Exhausted { last_status } => {
                let status = last_status.unwrap_or(502);
                ProxyError::Upstream {
                    status,
                    message: format!("Chat service error ({}). Please try again.", status),
                    details: Some("max retries exceeded".to_string()),
                }
            },
            RetryError::Network(err) => {
                warn!("cannot reach chat upstream: {}", err);
                ProxyError::UpstreamUnavailable {
                    message: "Chat server is not available".to_string(),
                    details: Some(format!(
                        "The chat server at {} is not running. Start it and try again.",
                        self.base_url
                    )),
                    suggestion: Some(format!(
                        "Make sure the chat server is listening at {}",
                        self.base_url
                    )),
                }
            },
        }
    }
}

fn status_error(status: u16, body: String) -> ProxyError {
    match status {
        429 => ProxyError::RateLimited {
            message: "API quota exceeded. Please try again in a few minutes.".to_string(),
            quota_info: Some(
                "You've reached the free tier limits. The chat will be available again shortly."
                    .to_string(),
            ),
        },
        503 => ProxyError::UpstreamUnavailable {
            message: "Chat service is unavailable. Please ensure the chat server is running."
                .to_string(),
            details: None,
            suggestion: None,
        },
        _ => ProxyError::Upstream {
            status,
            message: format!("Chat service error ({}). Please try again.", status),
            details: if body.is_empty() { None } else { Some(body) },
        },
    }
}

/// Builds the outbound message. Context framing applies only when RAG is
/// off: the RAG path answers from the PDF index, not inline context.
fn frame_message(question: &str, context: &str, use_rag: bool) -> String {
    if !use_rag && !context.trim().is_empty() {
        format!(
            "Context from uploaded study materials:\n{context}\n\nStudent Question: {question}\n\n\
             Please answer the question based on the provided context. If the context doesn't \
             contain relevant information, provide a general educational response."
        )
    } else {
        question.to_string()
    }
}

/// True when the upstream error text points at a broken PDF/FAISS index.
///
/// `&&` binds tighter than `||`: a "FAISS" match fires even when RAG was
/// not requested. Callers rely on that exact shape.
fn is_rag_index_error(error_text: &str, use_rag: bool) -> bool {
    use_rag && error_text.contains("PDF") || error_text.contains("FAISS")
}

/// Collapses the upstream body shapes into one answer string: `{answer}`,
/// `{response}`, a bare string, or any other JSON serialized verbatim.
fn normalize_answer(data: &Value) -> String {
    if let Some(answer) = data.get("answer").and_then(Value::as_str) {
        return answer.to_string();
    }
    if let Some(response) = data.get("response").and_then(Value::as_str) {
        return response.to_string();
    }
    if let Some(text) = data.as_str() {
        return text.to_string();
    }
    data.to_string()
}

//! Notes-chat wire types, inbound and upstream.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,

    /// Concatenated contents of uploaded text files. Ignored when
    /// `use_pdf` is set: the RAG path answers from the PDF index.
    #[serde(default)]
    pub context: String,

    /// UI hint (concise/detailed). Advisory only, never forwarded upstream.
    #[serde(default, rename = "responseMode", skip_serializing_if = "Option::is_none")]
    pub response_mode: Option<String>,

    /// Selects RAG over the uploaded PDF index instead of the general LLM.
    #[serde(default)]
    pub use_pdf: bool,
}

/// Normalized reply for a successful chat turn.
///
/// `warning` is present only when the answer came through the degraded
/// non-RAG fallback; it never coexists with an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Body sent to the upstream chat service (`POST {CHAT_SERVER_URL}/chat`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpstreamChatCall {
    pub message: String,
    pub use_pdf: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"question":"What is pH?"}"#)
            .expect("deserialize");
        assert_eq!(request.question, "What is pH?");
        assert_eq!(request.context, "");
        assert!(request.response_mode.is_none());
        assert!(!request.use_pdf);
    }

    #[test]
    fn test_chat_request_wire_field_names() {
        let request: ChatRequest = serde_json::from_str(
            r#"{"question":"q","context":"c","responseMode":"detailed","use_pdf":true}"#,
        )
        .expect("deserialize");
        assert_eq!(request.response_mode.as_deref(), Some("detailed"));
        assert!(request.use_pdf);
    }

    #[test]
    fn test_reply_without_warning_omits_field() {
        let reply = ChatReply { answer: "42".to_string(), warning: None };
        let json = serde_json::to_string(&reply).expect("serialize");
        assert_eq!(json, r#"{"answer":"42"}"#);
    }
}

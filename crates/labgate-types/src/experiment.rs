//! Experiment-generation wire types and the platform experiment schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/generate-experiment`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub files: Vec<ExperimentFile>,
}

impl ExperimentRequest {
    /// True when nothing usable was supplied (rejected at the boundary).
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.description.trim().is_empty()
            && self.files.is_empty()
    }
}

/// One uploaded file excerpt attached to the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentFile {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: String,
}

/// Interactive control exposed by a generated experiment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: ParameterKind,
    #[serde(default)]
    pub default: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Control widget kind, inferred from the value when not supplied.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    #[default]
    Number,
    Boolean,
    Select,
}

/// Reshaped generator output. Always carries exactly these fields with
/// non-null values; `id` is minted fresh per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub code: String,
    pub parameters: Vec<Parameter>,
    pub instructions: Vec<String>,
}

/// Body sent to the upstream generator (`POST {EXPERIMENT_SERVER_URL}/generate`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateCall {
    pub prompt: String,
    pub template_hint: Option<String>,
}

/// Structured reply from the upstream generator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub config: Option<GenerateConfig>,
    #[serde(default)]
    pub html_code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Optional experiment config block inside a generator reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Already-shaped parameter list, taken verbatim when present.
    #[serde(default)]
    pub parameters: Option<Vec<Parameter>>,
    /// Flat name→value map, converted when `parameters` is absent.
    #[serde(default)]
    pub params: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    pub instructions: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_detection() {
        assert!(ExperimentRequest::default().is_empty());
        assert!(ExperimentRequest { title: "  ".to_string(), ..Default::default() }.is_empty());
        assert!(!ExperimentRequest { title: "Pendulum".to_string(), ..Default::default() }
            .is_empty());

        let with_file = ExperimentRequest {
            files: vec![ExperimentFile {
                name: "notes.txt".to_string(),
                kind: "text/plain".to_string(),
                content: "gravity".to_string(),
            }],
            ..Default::default()
        };
        assert!(!with_file.is_empty());
    }

    #[test]
    fn test_parameter_kind_serializes_lowercase() {
        let param = Parameter {
            name: "speed".to_string(),
            label: "Animation Speed".to_string(),
            kind: ParameterKind::Number,
            default: serde_json::json!(1),
            min: Some(0.1),
            max: Some(5.0),
            step: Some(0.1),
            options: Vec::new(),
        };
        let json = serde_json::to_string(&param).expect("serialize");
        assert!(json.contains(r#""type":"number""#));
        assert!(!json.contains("options"));
    }

    #[test]
    fn test_generate_reply_tolerates_sparse_bodies() {
        let reply: GenerateReply =
            serde_json::from_str(r#"{"success":true,"html_code":"<div/>"}"#).expect("deserialize");
        assert!(reply.success);
        assert!(reply.config.is_none());
        assert_eq!(reply.html_code.as_deref(), Some("<div/>"));
    }

    #[test]
    fn test_file_kind_maps_the_type_field() {
        let file: ExperimentFile =
            serde_json::from_str(r#"{"name":"a.txt","type":"text/plain","content":"x"}"#)
                .expect("deserialize");
        assert_eq!(file.kind, "text/plain");
    }
}

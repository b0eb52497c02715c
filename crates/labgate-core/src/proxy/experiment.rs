//! Experiment-generation proxy.
//!
//! Composes a natural-language prompt from the caller's title, description
//! and file excerpts, forwards it to the upstream generator through
//! [`RetryPolicy`], and reshapes the structured reply into the platform's
//! fixed experiment schema, substituting defaults for anything absent.

use rand::Rng;
use tracing::{info, warn};

use labgate_types::error::ProxyError;
use labgate_types::experiment::{
    ExperimentRequest, ExperimentResponse, GenerateCall, GenerateConfig, GenerateReply, Parameter,
    ParameterKind,
};

use super::retry::{RetryError, RetryPolicy};

/// Proxy for the upstream experiment generator.
pub struct ExperimentProxy {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ExperimentProxy {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into(), retry: RetryPolicy::default() }
    }

    /// Overrides the retry policy.
    pub fn with_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generates one experiment. Expects an already-validated request —
    /// the boundary rejects fully-empty input before calling in.
    pub async fn handle(
        &self,
        request: &ExperimentRequest,
    ) -> Result<ExperimentResponse, ProxyError> {
        let prompt = compose_prompt(request);
        info!("forwarding experiment generation request ({} chars)", prompt.len());

        let response = self
            .retry
            .execute(|| self.call_upstream(&prompt))
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("experiment upstream returned {}: {}", status, body);
            return Err(status_error(status, body));
        }

        let reply: GenerateReply = response.json().await.map_err(|err| {
            warn!("experiment upstream returned unparsable body: {}", err);
            ProxyError::Internal { message: "Internal server error".to_string() }
        })?;

        if !reply.success {
            let message =
                reply.error.unwrap_or_else(|| "Failed to generate experiment".to_string());
            warn!("experiment upstream rejected request: {}", message);
            return Err(ProxyError::Upstream { status: 500, message, details: None });
        }

        Ok(shape_response(request, reply))
    }

    async fn call_upstream(&self, prompt: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(format!("{}/generate", self.base_url))
            .json(&GenerateCall { prompt: prompt.to_string(), template_hint: None })
            .send()
            .await
    }

    fn transport_error(&self, err: RetryError) -> ProxyError {
        match err {
            RetryError::Exhausted { last_status: Some(429) } => ProxyError::RateLimited {
                message: "API quota exceeded. Please try again later.".to_string(),
                quota_info: Some(
                    "The free tier has daily and per-minute limits. Try again in a few minutes."
                        .to_string(),
                ),
            },
            RetryError::Exhausted { last_status } => ProxyError::Upstream {
                status: last_status.unwrap_or(502),
                message: "Failed to generate experiment".to_string(),
                details: Some("max retries exceeded".to_string()),
            },
            RetryError::Network(err) => {
                warn!("cannot reach experiment upstream: {}", err);
                ProxyError::UpstreamUnavailable {
                    message: "Experiment service is not available".to_string(),
                    details: Some(format!(
                        "The experiment server at {} is not reachable. Start it and try again.",
                        self.base_url
                    )),
                    suggestion: None,
                }
            },
        }
    }
}

fn status_error(status: u16, body: String) -> ProxyError {
    match status {
        429 => ProxyError::RateLimited {
            message: "API quota exceeded. Please try again in a few minutes.".to_string(),
            quota_info: Some("You've reached the free tier limits. Please try again later.".to_string()),
        },
        503 => ProxyError::UpstreamUnavailable {
            message: "Experiment service is unavailable. Please ensure the experiment server is running."
                .to_string(),
            details: None,
            suggestion: None,
        },
        _ => ProxyError::Upstream {
            status,
            message: "Failed to generate experiment".to_string(),
            details: if body.is_empty() { None } else { Some(body) },
        },
    }
}

/// Concatenates title and description, then appends each file as a labeled
/// context block.
fn compose_prompt(request: &ExperimentRequest) -> String {
    let title = request.title.trim();
    let description = request.description.trim();

    let mut prompt = if !title.is_empty() && !description.is_empty() {
        format!("{title}. {description}")
    } else if !title.is_empty() {
        title.to_string()
    } else {
        description.to_string()
    };

    if !request.files.is_empty() {
        prompt.push_str("\n\nAdditional context from uploaded files:\n");
        for file in &request.files {
            let content = if file.content.is_empty() { "[File content]" } else { &file.content };
            prompt.push_str(&format!(
                "File: {}\nType: {}\nContent: {}\n\n",
                file.name, file.kind, content
            ));
        }
    }

    prompt.trim().to_string()
}

fn shape_response(request: &ExperimentRequest, reply: GenerateReply) -> ExperimentResponse {
    let config = reply.config;

    let title = pick_text(
        &request.title,
        config.as_ref().and_then(|c| c.title.clone()),
        "Custom Experiment",
    );
    let description = pick_text(
        &request.description,
        config.as_ref().and_then(|c| c.description.clone()),
        "AI-generated experiment",
    );

    let (parameters, instructions) = match config {
        Some(config) => (config_parameters(&config), config_instructions(&config)),
        None => (vec![default_speed_parameter()], default_instructions()),
    };

    ExperimentResponse {
        id: fresh_id(),
        title,
        description,
        code: reply.html_code.unwrap_or_default(),
        parameters,
        instructions,
    }
}

/// Caller input wins over the generator's config; a fixed fallback covers
/// both being empty.
fn pick_text(supplied: &str, from_config: Option<String>, fallback: &str) -> String {
    let supplied = supplied.trim();
    if !supplied.is_empty() {
        return supplied.to_string();
    }
    from_config
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Parameter precedence: `parameters` verbatim, then converted `params`,
/// then the default control. Never empty.
fn config_parameters(config: &GenerateConfig) -> Vec<Parameter> {
    if let Some(parameters) = &config.parameters {
        if !parameters.is_empty() {
            return parameters.clone();
        }
    }
    if let Some(params) = &config.params {
        if !params.is_empty() {
            return params
                .iter()
                .map(|(name, value)| parameter_from_value(name, value))
                .collect();
        }
    }
    vec![default_speed_parameter()]
}

fn config_instructions(config: &GenerateConfig) -> Vec<String> {
    match &config.instructions {
        Some(instructions) if !instructions.is_empty() => instructions.clone(),
        _ => vec![
            "Review the generated experiment code".to_string(),
            "Adjust parameters to see different behaviors".to_string(),
            "Explore the interactive features".to_string(),
        ],
    }
}

fn default_instructions() -> Vec<String> {
    vec![
        "Review the generated experiment".to_string(),
        "Interact with the controls".to_string(),
        "Observe the simulation behavior".to_string(),
    ]
}

/// Converts one flat `params` entry, inferring the control kind from the
/// JSON value.
fn parameter_from_value(name: &str, value: &serde_json::Value) -> Parameter {
    let kind = match value {
        serde_json::Value::Number(_) => ParameterKind::Number,
        serde_json::Value::Bool(_) => ParameterKind::Boolean,
        _ => ParameterKind::Select,
    };
    Parameter {
        name: name.to_string(),
        label: humanize_label(name),
        kind,
        default: value.clone(),
        min: None,
        max: None,
        step: None,
        options: Vec::new(),
    }
}

/// `wave_speed` → `Wave speed`: upper-case the first character, replace
/// underscores in the remainder with spaces.
fn humanize_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str().replace('_', " ")),
        None => String::new(),
    }
}

fn default_speed_parameter() -> Parameter {
    Parameter {
        name: "speed".to_string(),
        label: "Animation Speed".to_string(),
        kind: ParameterKind::Number,
        default: serde_json::json!(1),
        min: Some(0.1),
        max: Some(5.0),
        step: Some(0.1),
        options: Vec::new(),
    }
}

const ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Mints `custom-{unix_millis}-{9 base36 chars}`. Never caller- or
/// upstream-supplied, so identical requests get distinct ids.
fn fresh_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char)
        .collect();
    format!("custom-{}-{}", chrono::Utc::now().timestamp_millis(), suffix)
}

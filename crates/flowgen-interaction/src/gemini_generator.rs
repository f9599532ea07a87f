//! GeminiDiagramGenerator - REST implementation of the generation service.
//!
//! Sends the user's description to the Gemini `generateContent` endpoint with
//! a JSON response schema, so the answer is a `{title, mermaidCode,
//! explanation}` object.

use std::time::Duration;

use async_trait::async_trait;
use flowgen_core::config::{GenerationConfig, SecretConfig};
use flowgen_core::error::Result;
use flowgen_core::{DiagramGenerator, DiagramResponse, FlowgenError};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::GenerationError;
use crate::instruction::system_instruction;
use crate::response::parse_diagram_response;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Generator that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiDiagramGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    system_instruction: Option<String>,
}

impl GeminiDiagramGenerator {
    /// Creates a new generator with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.2,
            system_instruction: None,
        }
    }

    /// Builds a generator from loaded secrets and the `[generation]` section.
    ///
    /// The model named in `secret.json` wins over the configured one.
    pub fn from_config(
        secrets: &SecretConfig,
        config: &GenerationConfig,
    ) -> std::result::Result<Self, GenerationError> {
        let gemini = secrets
            .gemini
            .as_ref()
            .filter(|g| !g.api_key.trim().is_empty())
            .ok_or(GenerationError::MissingApiKey)?;

        let model = gemini
            .model_name
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| config.model.clone());

        let instruction = system_instruction(&config.language)
            .map_err(|e| GenerationError::Instruction(e.to_string()))?;

        let mut generator = Self::new(gemini.api_key.clone(), model)
            .with_temperature(config.temperature)
            .with_system_instruction(instruction);
        if let Some(secs) = config.request_timeout_secs {
            generator = generator.with_timeout(Duration::from_secs(secs))?;
        }
        Ok(generator)
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Adds a system instruction that will be sent alongside every request.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Points the generator at another endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bounds every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> std::result::Result<Self, GenerationError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GenerationError::Transport {
                message: format!("Failed to build HTTP client: {err}"),
                is_retryable: false,
            })?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: self.system_instruction.as_ref().map(|text| Content {
                role: None,
                parts: vec![Part { text: text.clone() }],
            }),
            generation_config: GenerationSettings {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
                temperature: self.temperature,
            },
        }
    }

    async fn send_request(
        &self,
        body: &GenerateContentRequest,
    ) -> std::result::Result<String, GenerationError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| GenerationError::Transport {
                message: err.to_string(),
                is_retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            GenerationError::MalformedResponse(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl DiagramGenerator for GeminiDiagramGenerator {
    async fn generate(&self, prompt: &str) -> Result<DiagramResponse> {
        if prompt.trim().is_empty() {
            return Err(FlowgenError::generation("Prompt is empty"));
        }

        tracing::info!("[Gemini] Generating diagram with model {}", self.model);
        let request = self.build_request(prompt);
        let text = self.send_request(&request).await.inspect_err(|err| {
            tracing::warn!("[Gemini] Request failed: {}", err);
        })?;

        let response = parse_diagram_response(&text).inspect_err(|err| {
            tracing::warn!("[Gemini] {}", err);
        })?;
        tracing::debug!("[Gemini] Received diagram '{}'", response.title);
        Ok(response)
    }
}

/// Schema constraining the answer to the three required string fields.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A short, professional title for the diagram."
            },
            "mermaidCode": {
                "type": "STRING",
                "description": "The raw Mermaid.js code. Do not include markdown code fences."
            },
            "explanation": {
                "type": "STRING",
                "description": "A brief explanation of what the diagram represents."
            }
        },
        "required": ["title", "mermaidCode", "explanation"]
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationSettings,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    response_mime_type: String,
    response_schema: Value,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(
    response: GenerateContentResponse,
) -> std::result::Result<String, GenerationError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

fn map_http_error(
    status: StatusCode,
    body: String,
    retry_after: Option<Duration>,
) -> GenerationError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    GenerationError::Http {
        status: status.as_u16(),
        message,
        is_retryable,
        retry_after,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date values are ignored.
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

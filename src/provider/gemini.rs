//! Google Gemini client over the Generative Language REST API.

use super::{GenerateRequest, ModelClient, ModelOutput, ResponseFormat, Schema};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::timeout as tokio_timeout;
use tracing::{debug, error, instrument};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    api_key: Option<SecretString>,
    key_sources: String,
    client: Client,
    model: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Schema>,
    candidate_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<SecretString>,
        key_sources: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key,
            key_sources,
            client: Client::new(),
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_body(request: &GenerateRequest) -> GeminiRequest<'_> {
        let contents = request
            .contents
            .iter()
            .map(|turn| GeminiContent {
                role: Some(turn.role.as_str().to_string()),
                parts: vec![Part {
                    text: Some(turn.text.clone()),
                }],
            })
            .collect();

        let system_instruction = request.system_instruction.as_ref().map(|text| GeminiContent {
            role: None,
            parts: vec![Part {
                text: Some(text.clone()),
            }],
        });

        let (response_mime_type, response_schema) = match &request.response_format {
            ResponseFormat::Text => (None, None),
            ResponseFormat::Json(schema) => (Some("application/json"), Some(schema)),
        };

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: Some(GenerationConfig {
                temperature: request.temperature,
                response_mime_type,
                response_schema,
                candidate_count: 1,
            }),
        }
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(response: &GeminiResponse) -> Result<(String, Option<String>), ProviderError> {
        let candidate = response
            .candidates
            .first()
            .ok_or(ProviderError::EmptyResponse)?;

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok((text, candidate.finish_reason.clone()))
    }

    fn map_api_error(status: u16, body: &str) -> ProviderError {
        let message = serde_json::from_str::<GeminiResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| body.trim().to_string(), |e| e.message);
        ProviderError::Api { status, message }
    }

    async fn send(&self, api_key: &SecretString, request: &GenerateRequest) -> Result<String, ProviderError> {
        let body = Self::build_body(request);

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &text));
        }
        Ok(text)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %self.model, turns = request.contents.len()))]
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelOutput, ProviderError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::MissingCredential(self.key_sources.clone()))?;

        let start = Instant::now();
        debug!("Sending request to Gemini API");

        let raw = tokio_timeout(self.timeout, self.send(api_key, request))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;

        let response: GeminiResponse = serde_json::from_str(&raw)?;
        if let Some(err) = response.error {
            return Err(ProviderError::Api {
                status: 200,
                message: err.message,
            });
        }

        let (text, finish_reason) = Self::extract_text(&response)?;
        debug!(
            chars = text.len(),
            finish_reason = finish_reason.as_deref().unwrap_or("-"),
            "Received Gemini response in {:?}",
            start.elapsed()
        );

        Ok(ModelOutput {
            text,
            model: self.model.clone(),
            duration: start.elapsed(),
            finish_reason,
        })
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Turn;

    fn client(api_key: Option<&str>) -> GeminiClient {
        client_at(api_key, "http://127.0.0.1:9/v1beta/", Duration::from_secs(1))
    }

    fn client_at(api_key: Option<&str>, base_url: &str, timeout: Duration) -> GeminiClient {
        GeminiClient::new(
            api_key.map(|k| SecretString::from(k.to_string())),
            "GEMINI_API_KEY or API_KEY".to_string(),
            "gemini-2.5-flash".to_string(),
            base_url.to_string(),
            timeout,
        )
    }

    fn hello() -> GenerateRequest {
        GenerateRequest {
            contents: vec![Turn::user("hi")],
            system_instruction: None,
            response_format: ResponseFormat::Text,
            temperature: None,
        }
    }

    /// Accepts connections and never answers
    async fn silent_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{addr}/v1beta")
    }

    #[test]
    fn test_body_for_json_request() {
        let schema = Schema::object().required_property("summary", Schema::string());
        let request = GenerateRequest {
            contents: vec![Turn::user("plan please")],
            system_instruction: Some("You are FitToon".to_string()),
            response_format: ResponseFormat::Json(schema),
            temperature: None,
        };

        let value = serde_json::to_value(GeminiClient::build_body(&request)).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "plan please");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "You are FitToon");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(value["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_body_for_chat_request() {
        let request = GenerateRequest {
            contents: vec![Turn::user("hi"), Turn::model("你好"), Turn::user("练什么")],
            system_instruction: None,
            response_format: ResponseFormat::Text,
            temperature: Some(0.7),
        };

        let value = serde_json::to_value(GeminiClient::build_body(&request)).unwrap();
        assert_eq!(value["contents"].as_array().unwrap().len(), 3);
        assert_eq!(value["contents"][1]["role"], "model");
        assert!(value.get("systemInstruction").is_none());
        assert!(value["generationConfig"].get("responseSchema").is_none());
        assert!(value["generationConfig"]["temperature"].as_f64().is_some());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let raw = r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": " 1}"}]}, "finishReason": "STOP"}]}"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        let (text, reason) = GeminiClient::extract_text(&response).unwrap();
        assert_eq!(text, "{\"a\": 1}");
        assert_eq!(reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            GeminiClient::extract_text(&response),
            Err(ProviderError::EmptyResponse)
        ));

        let blocked = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GeminiResponse = serde_json::from_str(blocked).unwrap();
        assert!(GeminiClient::extract_text(&response).is_err());
    }

    #[test]
    fn test_map_api_error_prefers_gemini_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        match GeminiClient::map_api_error(400, body) {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match GeminiClient::map_api_error(502, "Bad Gateway\n") {
            ProviderError::Api { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            client(None).endpoint(),
            "http://127.0.0.1:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let printed = format!("{:?}", client(Some("super-secret")));
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_network() {
        let err = client(None).generate(&hello()).await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential(_)));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_key() {
        // bind then release a port so the connection is refused
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_at(
            Some("super-secret-key"),
            &format!("http://{addr}/v1beta"),
            Duration::from_secs(5),
        );
        let err = client.generate(&hello()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));

        let wrapped = crate::error::GenerationError::from(err);
        let printed = format!("{wrapped} {wrapped:?}");
        assert!(!printed.contains("super-secret-key"), "{printed}");
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let base_url = silent_server().await;
        let client = client_at(Some("k"), &base_url, Duration::from_millis(200));

        let err = client.generate(&hello()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(d) if d == Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn test_chat_timeout_becomes_fallback_reply() {
        use crate::conversation::{CoachChat, FALLBACK_REPLY};
        use std::sync::Arc;

        let base_url = silent_server().await;
        let client = client_at(Some("k"), &base_url, Duration::from_millis(200));
        let chat = CoachChat::new(Arc::new(client));

        assert_eq!(chat.reply(&[], "还在吗？").await, FALLBACK_REPLY);
    }
}

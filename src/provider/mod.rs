mod gemini;
pub mod schema;

pub use gemini::GeminiClient;
pub use schema::Schema;

use crate::config::Config;
use crate::error::ProviderError;
use crate::model::Turn;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// One `generateContent` call: prior turns, persona, and the expected output shape.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub contents: Vec<Turn>,
    pub system_instruction: Option<String>,
    pub response_format: ResponseFormat,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    /// `application/json` constrained by the given schema
    Json(Schema),
}

#[derive(Debug)]
pub struct ModelOutput {
    pub text: String,
    pub model: String,
    pub duration: Duration,
    pub finish_reason: Option<String>,
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, request: &GenerateRequest) -> Result<ModelOutput, ProviderError>;
}

/// Create the model client described by the config
pub fn create_client(config: &Config) -> Arc<dyn ModelClient> {
    let api_key = config.api_key();
    if api_key.is_none() {
        tracing::warn!(
            "No API credential in {}; model calls will fail",
            config.api_key_sources()
        );
    }
    Arc::new(GeminiClient::new(
        api_key,
        config.api_key_sources(),
        config.model.clone(),
        config.api_base_url.clone(),
        config.timeout(),
    ))
}

#[cfg(test)]
pub mod testing {
    //! In-process client returning canned replies, optionally after a delay.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    pub struct Scripted {
        pub reply: Result<String, String>,
        pub delay: Duration,
    }

    impl Scripted {
        pub fn text(text: impl Into<String>) -> Self {
            Self {
                reply: Ok(text.into()),
                delay: Duration::ZERO,
            }
        }

        pub fn failure(message: impl Into<String>) -> Self {
            Self {
                reply: Err(message.into()),
                delay: Duration::ZERO,
            }
        }

        pub fn after(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[derive(Default)]
    pub struct ScriptedClient {
        script: Mutex<VecDeque<Scripted>>,
        pub requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedClient {
        pub fn new(script: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub fn requests(&self) -> Vec<GenerateRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn generate(&self, request: &GenerateRequest) -> Result<ModelOutput, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            let next = self.script.lock().unwrap().pop_front();
            let Some(step) = next else {
                return Err(ProviderError::EmptyResponse);
            };
            if !step.delay.is_zero() {
                tokio::time::sleep(step.delay).await;
            }
            match step.reply {
                Ok(text) => Ok(ModelOutput {
                    text,
                    model: "scripted".to_string(),
                    duration: step.delay,
                    finish_reason: Some("STOP".to_string()),
                }),
                Err(message) => Err(ProviderError::Api {
                    status: 503,
                    message,
                }),
            }
        }
    }
}

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Failures talking to the upstream model API.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No API credential found (set {0})")]
    MissingCredential(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Model API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode model API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Model API returned no content")]
    EmptyResponse,
}

/// Plan generation is all-or-nothing: every variant is fatal for the attempt.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Plan request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Generator returned an empty plan")]
    EmptyResponse,

    #[error("Generator output is not valid plan JSON: {0}")]
    Malformed(String),

    #[error("Generated plan does not match the schema: {0}")]
    SchemaMismatch(String),
}

/// Only ever seen inside the conversation client, which turns it into a canned reply.
#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("Chat request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Coach replied with empty text")]
    EmptyReply,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OnboardingError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Plan can only be submitted from the last step")]
    NotFinalStep,

    #[error("Already at the first step")]
    NoPreviousStep,

    #[error("Onboarding was already submitted")]
    AlreadySubmitted,

    #[error("A plan is already being generated")]
    Busy,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("A plan is already being generated")]
    GenerationInFlight,

    #[error("A plan is already loaded; reset first")]
    PlanAlreadyLoaded,

    #[error("No plan generation in progress")]
    NotLoading,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

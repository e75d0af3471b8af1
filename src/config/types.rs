use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    /// Config format version; only `1` is understood
    #[serde(default = "default_version")]
    pub version: u32,

    /// Gemini model used for both plan generation and chat
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Upper bound on every outbound model call
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,

    /// Prior chat messages sent with each assistant request
    #[serde(default = "default_max_history_messages")]
    pub max_history_messages: usize,

    #[serde(default)]
    pub temperature: Option<f32>,

    /// Log destination while the terminal UI owns the screen
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

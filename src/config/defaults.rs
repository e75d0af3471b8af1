use std::path::PathBuf;

pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

pub const CONFIG_VERSION: u32 = 1;

pub fn default_version() -> u32 {
    CONFIG_VERSION
}

pub fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

pub fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

pub fn default_timeout_sec() -> u64 {
    30
}

pub fn default_max_history_messages() -> usize {
    20
}

pub fn default_log_file() -> PathBuf {
    PathBuf::from("fittoon.log")
}

//! Chat relay between the assistant widget and the model.
//!
//! `CoachChat::reply` never fails: upstream errors are logged and replaced by a
//! canned apology so the transcript always gets a model turn.

use crate::error::{ConversationError, ProviderError};
use crate::model::{Role, Turn};
use crate::provider::{GenerateRequest, ModelClient, ResponseFormat};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are FitToon, a helpful and funny fitness assistant. Keep answers concise, motivating, and in Chinese. Use emojis liberally.";

/// Shown when the request itself failed
pub const FALLBACK_REPLY: &str = "网络似乎开小差了，请稍后再试！";

/// Shown when the model answered with nothing
pub const EMPTY_REPLY: &str = "抱歉，我一时没想好怎么回答！";

pub const DEFAULT_MAX_HISTORY: usize = 20;

pub struct CoachChat {
    client: Arc<dyn ModelClient>,
    max_history: usize,
    temperature: Option<f32>,
}

impl CoachChat {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            max_history: DEFAULT_MAX_HISTORY,
            temperature: None,
        }
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Send `message` with the prior `history` and return the coach's answer.
    pub async fn reply(&self, history: &[Turn], message: &str) -> String {
        match self.try_reply(history, message).await {
            Ok(text) => text,
            Err(ConversationError::EmptyReply) => {
                warn!("Coach returned an empty reply");
                EMPTY_REPLY.to_string()
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }

    pub fn request_for(&self, history: &[Turn], message: &str) -> GenerateRequest {
        let mut contents = history_window(history, self.max_history).to_vec();
        contents.push(Turn::user(message));

        GenerateRequest {
            contents,
            system_instruction: Some(CHAT_SYSTEM_INSTRUCTION.to_string()),
            response_format: ResponseFormat::Text,
            temperature: self.temperature,
        }
    }

    #[instrument(skip_all, fields(history = history.len()))]
    async fn try_reply(&self, history: &[Turn], message: &str) -> Result<String, ConversationError> {
        let request = self.request_for(history, message);
        debug!("Sending {} turns to the coach", request.contents.len());

        let output = match self.client.generate(&request).await {
            Ok(output) => output,
            Err(ProviderError::EmptyResponse) => return Err(ConversationError::EmptyReply),
            Err(e) => return Err(e.into()),
        };

        debug!(
            finish_reason = output.finish_reason.as_deref().unwrap_or("-"),
            "Coach replied in {:?}",
            output.duration
        );
        let text = output.text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyReply);
        }
        Ok(text.to_string())
    }
}

/// The most recent `max` turns, trimmed so the window opens with a user turn
pub fn history_window(history: &[Turn], max: usize) -> &[Turn] {
    let start = history.len().saturating_sub(max);
    let window = &history[start..];
    let first_user = window
        .iter()
        .position(|t| t.role == Role::User)
        .unwrap_or(window.len());
    &window[first_user..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{Scripted, ScriptedClient};

    fn transcript(n: usize) -> Vec<Turn> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Turn::model(format!("m{i}"))
                } else {
                    Turn::user(format!("u{i}"))
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn test_reply_passes_history_and_persona() {
        let client = ScriptedClient::new(vec![Scripted::text("  多喝水！💧 ")]);
        let chat = CoachChat::new(client.clone());

        let history = vec![Turn::user("你好"), Turn::model("嗨！")];
        let reply = chat.reply(&history, "今天练什么？").await;
        assert_eq!(reply, "多喝水！💧");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let contents = &requests[0].contents;
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[2], Turn::user("今天练什么？"));
        assert_eq!(
            requests[0].system_instruction.as_deref(),
            Some(CHAT_SYSTEM_INSTRUCTION)
        );
        assert!(matches!(requests[0].response_format, ResponseFormat::Text));
    }

    #[tokio::test]
    async fn test_failure_yields_fallback() {
        let client = ScriptedClient::new(vec![Scripted::failure("boom")]);
        let reply = CoachChat::new(client).reply(&[], "hi").await;
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_empty_reply_yields_apology() {
        let client = ScriptedClient::new(vec![Scripted::text("   ")]);
        let reply = CoachChat::new(client).reply(&[], "hi").await;
        assert_eq!(reply, EMPTY_REPLY);
    }

    #[test]
    fn test_history_window_is_bounded_and_opens_with_user() {
        let history = transcript(30);
        let window = history_window(&history, 20);
        // last 20 are m10..u29; the leading model turn is dropped
        assert_eq!(window.len(), 19);
        assert_eq!(window[0], Turn::user("u11"));
        assert_eq!(window.last(), history.last());
    }

    #[test]
    fn test_history_window_drops_greeting() {
        let history = vec![Turn::model("你好！我是FitToon助手")];
        assert!(history_window(&history, 20).is_empty());

        let chat = CoachChat::new(ScriptedClient::new(vec![])).with_max_history(4);
        let request = chat.request_for(&transcript(9), "next");
        assert_eq!(request.contents.first(), Some(&Turn::user("u5")));
        assert_eq!(request.contents.last(), Some(&Turn::user("next")));
    }
}

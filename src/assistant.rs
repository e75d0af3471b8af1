//! Floating coach chat: an append-only transcript plus serialized sends.
//!
//! Sends queue on a fair async lock, so each user message is immediately followed
//! by its own reply even when several are submitted back to back.

use crate::conversation::CoachChat;
use crate::model::{ChatMessage, Role, Turn};
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

pub const GREETING: &str = "你好！我是FitToon助手。对计划有什么疑问，或者想要调整吗？随时问我！🤖";

pub struct Assistant {
    chat: CoachChat,
    transcript: Mutex<Vec<ChatMessage>>,
    send_lock: tokio::sync::Mutex<()>,
    pending: AtomicUsize,
}

impl Assistant {
    pub fn new(chat: CoachChat) -> Self {
        let greeting = ChatMessage {
            role: Role::Model,
            text: GREETING.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };
        Self {
            chat,
            transcript: Mutex::new(vec![greeting]),
            send_lock: tokio::sync::Mutex::new(()),
            pending: AtomicUsize::new(0),
        }
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock_transcript().clone()
    }

    /// True while any submitted message is still waiting for its reply
    pub fn is_typing(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// Submit a message and wait for the reply. Blank input is ignored.
    pub async fn send(&self, input: &str) -> Option<ChatMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        let _pending = PendingGuard::new(&self.pending);
        let _turn = self.send_lock.lock().await;

        let history: Vec<Turn> = self.lock_transcript().iter().map(ChatMessage::turn).collect();
        self.push(Role::User, text.to_string());
        debug!("Assistant sending message ({} prior turns)", history.len());

        let reply = self.chat.reply(&history, text).await;
        Some(self.push(Role::Model, reply))
    }

    fn push(&self, role: Role, text: String) -> ChatMessage {
        let mut transcript = self.lock_transcript();
        let last = transcript.last().map_or(i64::MIN, |m| m.timestamp);
        let message = ChatMessage {
            role,
            text,
            timestamp: Utc::now().timestamp_millis().max(last.saturating_add(1)),
        };
        transcript.push(message.clone());
        message
    }

    fn lock_transcript(&self) -> std::sync::MutexGuard<'_, Vec<ChatMessage>> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Counts a send as pending until it finishes or its future is dropped
struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// src/chat/mod.rs
//! Campus assistant chat: dialogue sessions, their registry, and the seam to
//! the generative-language service.

pub mod manager;
pub mod prompts;
pub mod session;

pub use manager::{SessionManager, SessionSnapshot, SubmitResult};
pub use session::{ChatState, ContextEntry, DialogueSession, PendingExchange, Rejection, Speaker, Turn, TurnOrigin};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatServiceError {
    #[error("request to language service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("language service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("could not decode language service response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response blocked: {0}")]
    Blocked(String),
}

/// A generative-language backend: given the conversation so far and a new
/// utterance, produce the assistant's reply text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, context: &[ContextEntry], utterance: &str) -> Result<String, ChatServiceError>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    /// Answers with queued replies, then with an echo once the queue is empty.
    #[derive(Default)]
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, ChatServiceError>>>,
        pub seen: Mutex<Vec<(Vec<ContextEntry>, String)>>,
    }

    impl ScriptedModel {
        pub fn with_replies(replies: Vec<Result<String, ChatServiceError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, context: &[ContextEntry], utterance: &str) -> Result<String, ChatServiceError> {
            self.seen.lock().unwrap().push((context.to_vec(), utterance.to_string()));
            match self.replies.lock().unwrap().pop_front() {
                Some(reply) => reply,
                None => Ok(format!("echo: {}", utterance)),
            }
        }
    }

    /// Holds every completion until the gate is opened.
    pub struct GatedModel {
        pub gate: Arc<Notify>,
    }

    #[async_trait]
    impl LanguageModel for GatedModel {
        fn name(&self) -> &str {
            "gated"
        }

        async fn complete(&self, _context: &[ContextEntry], utterance: &str) -> Result<String, ChatServiceError> {
            self.gate.notified().await;
            Ok(format!("late reply to {}", utterance))
        }
    }
}

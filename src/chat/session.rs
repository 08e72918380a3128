// src/chat/session.rs
//! One chat widget's conversation: the visible transcript plus the
//! one-request-at-a-time state machine around the language service.

use super::prompts::{EMPTY_REPLY_FALLBACK, FAILURE_APOLOGY, OPENING_ASSISTANT, OPENING_USER};
use super::ChatServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// Where the text of a turn came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrigin {
    Utterance,
    Completion,
    Fallback,
    Apology,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub origin: TurnOrigin,
}

/// A message of the conversation as the language service sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl ContextEntry {
    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChatState {
    Idle,
    AwaitingResponse { since: DateTime<Utc> },
    /// Idle again, but the last exchange failed.
    Errored { at: DateTime<Utc> },
}

/// Why a submission was ignored.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("message is empty")]
    EmptyUtterance,
    #[error("still waiting for the previous reply")]
    AwaitingResponse,
}

/// Proof that a user turn is outstanding. Only `begin_turn` creates one and
/// `resolve` consumes it, so a reply can never be attached to a session that
/// is not waiting for it.
#[derive(Debug)]
pub struct PendingExchange {
    session_id: Uuid,
    utterance: String,
    context: Vec<ContextEntry>,
}

impl PendingExchange {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn utterance(&self) -> &str {
        &self.utterance
    }

    /// Prior conversation, oldest first, not including the utterance.
    pub fn context(&self) -> &[ContextEntry] {
        &self.context
    }
}

#[derive(Debug)]
pub struct DialogueSession {
    id: Uuid,
    transcript: Vec<Turn>,
    state: ChatState,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl DialogueSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            transcript: Vec::new(),
            state: ChatState::Idle,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, ChatState::AwaitingResponse { .. })
    }

    /// Append the user's turn and hand out the exchange to send.
    pub fn begin_turn(&mut self, utterance: &str) -> Result<PendingExchange, Rejection> {
        if self.is_awaiting() {
            return Err(Rejection::AwaitingResponse);
        }
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(Rejection::EmptyUtterance);
        }

        let context = self.context();
        let since = self.push(Speaker::User, utterance.to_string(), TurnOrigin::Utterance);
        self.state = ChatState::AwaitingResponse { since };

        Ok(PendingExchange {
            session_id: self.id,
            utterance: utterance.to_string(),
            context,
        })
    }

    /// Record the outcome of an exchange. Returns the assistant turn, or
    /// `None` when the token belongs to another session.
    pub fn resolve(
        &mut self,
        pending: PendingExchange,
        outcome: Result<String, ChatServiceError>,
    ) -> Option<&Turn> {
        if pending.session_id != self.id || !self.is_awaiting() {
            tracing::warn!(
                "Discarding reply for session {} delivered to session {}",
                pending.session_id,
                self.id
            );
            return None;
        }

        match outcome {
            Ok(text) if text.trim().is_empty() => {
                self.push(Speaker::Assistant, EMPTY_REPLY_FALLBACK.to_string(), TurnOrigin::Fallback);
                self.state = ChatState::Idle;
            }
            Ok(text) => {
                self.push(Speaker::Assistant, text, TurnOrigin::Completion);
                self.state = ChatState::Idle;
            }
            Err(e) => {
                tracing::error!("Language service error in chat session {}: {}", self.id, e);
                let at = self.push(Speaker::Assistant, FAILURE_APOLOGY.to_string(), TurnOrigin::Apology);
                self.state = ChatState::Errored { at };
            }
        }

        self.transcript.last()
    }

    // The seeded opening, then every exchange the service actually answered.
    fn context(&self) -> Vec<ContextEntry> {
        let mut context = vec![
            ContextEntry::new(Speaker::User, OPENING_USER),
            ContextEntry::new(Speaker::Assistant, OPENING_ASSISTANT),
        ];
        for pair in self.transcript.chunks_exact(2) {
            if pair[0].speaker == Speaker::User && pair[1].origin == TurnOrigin::Completion {
                context.push(ContextEntry::new(Speaker::User, pair[0].text.clone()));
                context.push(ContextEntry::new(Speaker::Assistant, pair[1].text.clone()));
            }
        }
        context
    }

    fn push(&mut self, speaker: Speaker, text: String, origin: TurnOrigin) -> DateTime<Utc> {
        // Clock steps backwards must not reorder the transcript.
        let now = Utc::now();
        let timestamp = match self.transcript.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        self.transcript.push(Turn {
            speaker,
            text,
            timestamp,
            origin,
        });
        self.last_activity = timestamp;
        timestamp
    }
}

impl Default for DialogueSession {
    fn default() -> Self {
        Self::new()
    }
}

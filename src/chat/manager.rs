// src/chat/manager.rs
//! Registry of live chat widget sessions.

use super::session::{ChatState, DialogueSession, Turn};
use super::LanguageModel;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<DialogueSession>>;

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub state: ChatState,
    pub transcript: Vec<Turn>,
    pub created_at: DateTime<Utc>,
}

impl SessionSnapshot {
    fn of(session: &DialogueSession) -> Self {
        Self {
            id: session.id(),
            state: session.state(),
            transcript: session.transcript().to_vec(),
            created_at: session.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResult {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
    pub session: SessionSnapshot,
}

pub struct SessionManager {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
    model: Arc<dyn LanguageModel>,
}

impl SessionManager {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            model,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Open a session for a freshly mounted widget.
    pub async fn create(&self) -> SessionSnapshot {
        let session = DialogueSession::new();
        let snapshot = SessionSnapshot::of(&session);
        self.sessions
            .write()
            .await
            .insert(snapshot.id, Arc::new(Mutex::new(session)));
        tracing::info!("💬 Opened chat session {}", snapshot.id);
        snapshot
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<SessionSnapshot> {
        let session = self.get(id).await?;
        let guard = session.lock().await;
        Some(SessionSnapshot::of(&guard))
    }

    /// Drop a session when its widget unmounts. A reply still in flight for
    /// it is discarded on arrival.
    pub async fn destroy(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!("💬 Closed chat session {}", id);
        }
        removed
    }

    /// Submit a user utterance and wait for the exchange to settle.
    /// `None` means the session does not exist.
    pub async fn submit(&self, id: Uuid, utterance: &str) -> Option<SubmitResult> {
        let session = self.get(id).await?;

        let pending = {
            let mut guard = session.lock().await;
            match guard.begin_turn(utterance) {
                Ok(pending) => pending,
                Err(rejection) => {
                    tracing::debug!("Ignored submission to chat session {}: {}", id, rejection);
                    return Some(SubmitResult {
                        accepted: false,
                        rejection: Some(rejection.to_string()),
                        session: SessionSnapshot::of(&guard),
                    });
                }
            }
        };

        // The session lock is released while the service works.
        tracing::info!(
            session_id = %id,
            model = %self.model.name(),
            context_len = pending.context().len(),
            "dispatching chat message"
        );
        let outcome = self.model.complete(pending.context(), pending.utterance()).await;

        let mut guard = session.lock().await;
        guard.resolve(pending, outcome);
        let snapshot = SessionSnapshot::of(&guard);
        drop(guard);

        if !self.sessions.read().await.contains_key(&id) {
            tracing::debug!("Chat session {} closed while awaiting a reply", id);
        }

        Some(SubmitResult {
            accepted: true,
            rejection: None,
            session: snapshot,
        })
    }

    /// Remove sessions nobody has touched for `max_idle`.
    pub async fn reap_idle(&self, max_idle: Duration) -> usize {
        self.reap_inactive_since(Utc::now() - max_idle).await
    }

    async fn reap_inactive_since(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            // Awaiting sessions stay until their reply lands.
            Ok(guard) => guard.is_awaiting() || guard.last_activity() >= cutoff,
            Err(_) => true,
        });
        let reaped = before - sessions.len();
        if reaped > 0 {
            tracing::info!("🗑️ Reaped {} idle chat session(s)", reaped);
        }
        reaped
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::prompts::FAILURE_APOLOGY;
    use crate::chat::testing::{GatedModel, ScriptedModel};
    use crate::chat::{ChatServiceError, Speaker};
    use tokio::sync::Notify;

    fn manager_with(replies: Vec<Result<String, ChatServiceError>>) -> SessionManager {
        SessionManager::new(Arc::new(ScriptedModel::with_replies(replies)))
    }

    #[tokio::test]
    async fn test_create_snapshot_destroy() {
        let manager = manager_with(vec![]);
        let created = manager.create().await;
        assert!(created.transcript.is_empty());
        assert_eq!(created.state, ChatState::Idle);

        assert!(manager.snapshot(created.id).await.is_some());
        assert!(manager.destroy(created.id).await);
        assert!(manager.snapshot(created.id).await.is_none());
        assert!(!manager.destroy(created.id).await);
    }

    #[tokio::test]
    async fn test_submit_adds_user_and_assistant_turns() {
        let manager = manager_with(vec![Ok("Head past the Tech Park.".to_string())]);
        let id = manager.create().await.id;

        let result = manager.submit(id, "How do I get to the Central Library?").await.unwrap();
        assert!(result.accepted);
        let transcript = &result.session.transcript;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].speaker, Speaker::User);
        assert_eq!(transcript[1].text, "Head past the Tech Park.");
        assert_eq!(result.session.state, ChatState::Idle);
    }

    #[tokio::test]
    async fn test_service_failure_becomes_apology() {
        let manager = manager_with(vec![Err(ChatServiceError::Blocked("SAFETY".to_string()))]);
        let id = manager.create().await.id;

        let result = manager.submit(id, "hello").await.unwrap();
        assert!(result.accepted);
        assert_eq!(result.session.transcript[1].text, FAILURE_APOLOGY);
        assert!(matches!(result.session.state, ChatState::Errored { .. }));
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let manager = manager_with(vec![]);
        assert!(manager.submit(Uuid::new_v4(), "hello").await.is_none());
    }

    #[tokio::test]
    async fn test_submit_while_awaiting_is_ignored() {
        let gate = Arc::new(Notify::new());
        let manager = Arc::new(SessionManager::new(Arc::new(GatedModel { gate: gate.clone() })));
        let id = manager.create().await.id;

        let background = manager.clone();
        let first = tokio::spawn(async move { background.submit(id, "first").await });

        loop {
            let snapshot = manager.snapshot(id).await.unwrap();
            if matches!(snapshot.state, ChatState::AwaitingResponse { .. }) {
                break;
            }
            tokio::task::yield_now().await;
        }

        let second = manager.submit(id, "second").await.unwrap();
        assert!(!second.accepted);
        assert_eq!(second.session.transcript.len(), 1);

        gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(first.accepted);
        assert_eq!(first.session.transcript.len(), 2);
        assert_eq!(first.session.transcript[1].text, "late reply to first");
    }

    #[tokio::test]
    async fn test_reap_skips_awaiting_sessions() {
        let gate = Arc::new(Notify::new());
        let manager = Arc::new(SessionManager::new(Arc::new(GatedModel { gate: gate.clone() })));
        let idle = manager.create().await.id;
        let busy = manager.create().await.id;

        let background = manager.clone();
        let pending = tokio::spawn(async move { background.submit(busy, "still thinking").await });
        loop {
            let snapshot = manager.snapshot(busy).await.unwrap();
            if matches!(snapshot.state, ChatState::AwaitingResponse { .. }) {
                break;
            }
            tokio::task::yield_now().await;
        }

        let reaped = manager.reap_inactive_since(Utc::now() + Duration::minutes(1)).await;
        assert_eq!(reaped, 1);
        assert!(manager.snapshot(idle).await.is_none());
        assert!(manager.snapshot(busy).await.is_some());

        gate.notify_one();
        pending.await.unwrap();
    }

    #[tokio::test]
    async fn test_reap_keeps_recent_sessions() {
        let manager = manager_with(vec![]);
        manager.create().await;
        assert_eq!(manager.reap_idle(Duration::minutes(60)).await, 0);
        assert_eq!(manager.len().await, 1);
    }
}

//! Single-session conversation state: append-only transcript, like/dislike
//! sets, copied marker, pending flag, and the relay calls behind submit and
//! regenerate. Nothing here survives the process.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::RelayClient;

/// How long the copied marker stays set after a copy.
pub const COPY_MARKER_CLEAR_MS: u64 = 2000;

/// How long the typing flag stays set after input activity.
pub const TYPING_CLEAR_MS: u64 = 1000;

/// Assistant turn appended when a regenerate call fails.
pub const REGENERATE_ERROR_TEXT: &str =
    "Sorry, I encountered an error while regenerating the response. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    fn now(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
        }
    }
}

/// Render-ready view of the session, sent to the frontend as JSON.
/// `liked` / `disliked` are sorted index lists.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub turns: Vec<Turn>,
    pub liked: Vec<usize>,
    pub disliked: Vec<usize>,
    pub copied_index: Option<usize>,
    pub pending: bool,
    pub typing: bool,
}

/// Session operation error.
#[derive(Debug)]
pub enum SessionError {
    /// Annotation or regenerate index outside the current transcript.
    IndexOutOfRange(usize),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::IndexOutOfRange(i) => write!(f, "no turn at index {}", i),
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Default)]
struct SessionState {
    turns: Vec<Turn>,
    liked: HashSet<usize>,
    disliked: HashSet<usize>,
    copied_index: Option<usize>,
    pending: bool,
    typing: bool,
}

/// Cloneable handle to one chat session. Clones share the same state, so a
/// command layer can hand out handles without serializing operations.
#[derive(Clone)]
pub struct ChatSession {
    state: Arc<Mutex<SessionState>>,
    relay: RelayClient,
}

impl ChatSession {
    pub fn new(relay: RelayClient) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            relay,
        }
    }

    /// Submit a new user message. No-op when `text` is empty or
    /// whitespace-only, or while another submit is pending. Appends the user
    /// turn immediately, then the assistant turn once the relay answers; a
    /// failed relay call appends nothing and is only logged.
    pub async fn submit(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        {
            let mut state = self.state.lock().unwrap();
            if state.pending {
                return;
            }
            state.pending = true;
            state
                .turns
                .push(Turn::now(Role::User, text.to_string()));
        }

        let result = self.relay.send_message(text).await;

        let mut state = self.state.lock().unwrap();
        match result {
            Ok(reply) => state.turns.push(Turn::now(Role::Assistant, reply)),
            Err(err) => tracing::error!(error = %err, "chat request failed"),
        }
        state.pending = false;
    }

    /// Re-send the content of the turn at `index` and append the answer as a
    /// new assistant turn; the original turn is never touched. A failed call
    /// appends a fixed apology turn instead. Does not consult the pending
    /// gate, so a regenerate may overlap an in-flight submit; the transcript
    /// then orders by completion.
    pub async fn regenerate(&self, index: usize) -> Result<(), SessionError> {
        let content = {
            let mut state = self.state.lock().unwrap();
            let content = match state.turns.get(index) {
                Some(turn) => turn.content.clone(),
                None => return Err(SessionError::IndexOutOfRange(index)),
            };
            state.pending = true;
            content
        };

        let result = self.relay.send_message(&content).await;

        let mut state = self.state.lock().unwrap();
        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(error = %err, "regenerate request failed");
                REGENERATE_ERROR_TEXT.to_string()
            }
        };
        state.turns.push(Turn::now(Role::Assistant, reply));
        state.pending = false;
        Ok(())
    }

    /// Toggle `index` in the liked set, removing it from the disliked set
    /// first. An index can be liked or disliked, never both.
    pub fn like(&self, index: usize) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        if index >= state.turns.len() {
            return Err(SessionError::IndexOutOfRange(index));
        }
        state.disliked.remove(&index);
        if state.liked.contains(&index) {
            state.liked.remove(&index);
        } else {
            state.liked.insert(index);
        }
        Ok(())
    }

    /// Mirror of [`like`](Self::like) for the disliked set.
    pub fn dislike(&self, index: usize) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        if index >= state.turns.len() {
            return Err(SessionError::IndexOutOfRange(index));
        }
        state.liked.remove(&index);
        if state.disliked.contains(&index) {
            state.disliked.remove(&index);
        } else {
            state.disliked.insert(index);
        }
        Ok(())
    }

    /// Return the content of the turn at `index` for the frontend to place on
    /// the clipboard, and mark it as copied. Each copy arms its own one-shot
    /// timer that clears the marker unconditionally after
    /// [`COPY_MARKER_CLEAR_MS`]; timers from earlier copies are not cancelled.
    pub async fn copy(&self, index: usize) -> Result<String, SessionError> {
        let content = {
            let mut state = self.state.lock().unwrap();
            let content = match state.turns.get(index) {
                Some(turn) => turn.content.clone(),
                None => return Err(SessionError::IndexOutOfRange(index)),
            };
            state.copied_index = Some(index);
            content
        };

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(COPY_MARKER_CLEAR_MS)).await;
            state.lock().unwrap().copied_index = None;
        });

        Ok(content)
    }

    /// Record input activity: sets the typing flag and arms a one-shot timer
    /// that clears it unconditionally after [`TYPING_CLEAR_MS`].
    pub async fn input_activity(&self) {
        self.state.lock().unwrap().typing = true;

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(TYPING_CLEAR_MS)).await;
            state.lock().unwrap().typing = false;
        });
    }

    pub fn snapshot(&self) -> SessionView {
        let state = self.state.lock().unwrap();
        let mut liked: Vec<usize> = state.liked.iter().copied().collect();
        liked.sort_unstable();
        let mut disliked: Vec<usize> = state.disliked.iter().copied().collect();
        disliked.sort_unstable();
        SessionView {
            turns: state.turns.clone(),
            liked,
            disliked,
            copied_index: state.copied_index,
            pending: state.pending,
            typing: state.typing,
        }
    }
}

use crate::error::{GraphError, GraphResult};
use crate::state::ConversationState;
use folha_llm::Message;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Sessions keyed by thread id, created on first use
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self, thread_id: &str) -> Arc<Session> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions
            .entry(thread_id.to_string())
            .or_insert_with(|| {
                tracing::info!("SESSION: created '{}'", thread_id);
                Arc::new(Session::new(thread_id))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of [`Session::submit_human`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Appended to the log; a turn can start
    Appended,
    /// A turn is in flight; the input joins the log when it ends
    Queued,
}

#[derive(Default)]
struct SessionInner {
    state: ConversationState,
    pending: VecDeque<Message>,
}

/// One conversation plus its re-entrancy guard
pub struct Session {
    thread_id: String,
    inner: Mutex<SessionInner>,
    in_flight: AtomicBool,
}

impl Session {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            inner: Mutex::new(SessionInner::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> ConversationState {
        self.lock().state.clone()
    }

    pub fn pending_inputs(&self) -> usize {
        self.lock().pending.len()
    }

    /// True when the log ends in a human message nobody has answered yet
    pub fn awaiting_response(&self) -> bool {
        matches!(self.lock().state.last_message(), Some(Message::Human { .. }))
    }

    /// Append external input, or queue it while a turn is running
    pub fn submit_human(&self, content: impl Into<String>) -> Submission {
        let mut inner = self.lock();
        // The flag is only cleared under this lock, so nothing slips between check and push
        if self.is_busy() {
            inner.pending.push_back(Message::human(content));
            tracing::debug!("SESSION {}: input queued behind running turn", self.thread_id);
            Submission::Queued
        } else {
            inner.state.push_human(content);
            Submission::Appended
        }
    }

    /// Drop the trailing human inputs a failed turn left unanswered
    ///
    /// Returns what was removed so the caller can offer it back. Refused while
    /// a turn is in flight.
    pub fn discard_unanswered(&self) -> GraphResult<Vec<Message>> {
        let mut inner = self.lock();
        if self.is_busy() {
            return Err(GraphError::SessionBusy(self.thread_id.clone()));
        }
        let keep = inner
            .state
            .messages
            .iter()
            .rposition(|m| !matches!(m, Message::Human { .. }))
            .map_or(0, |idx| idx + 1);
        let dropped = inner.state.messages.split_off(keep);
        if !dropped.is_empty() {
            tracing::debug!(
                "SESSION {}: discarded {} unanswered inputs",
                self.thread_id,
                dropped.len()
            );
        }
        Ok(dropped)
    }

    /// Check-and-set the guard
    pub fn begin_turn(&self) -> GraphResult<TurnGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GraphError::SessionBusy(self.thread_id.clone()))?;
        Ok(TurnGuard { session: self })
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Exclusive right to run a turn; dropping it clears the guard and moves
/// queued inputs into the log
pub struct TurnGuard<'a> {
    session: &'a Session,
}

impl TurnGuard<'_> {
    pub fn snapshot(&self) -> ConversationState {
        self.session.snapshot()
    }

    /// Replace the log with the turn's result
    pub fn commit(&self, state: ConversationState) {
        self.session.lock().state = state;
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.session.lock();
        let queued: Vec<Message> = inner.pending.drain(..).collect();
        if !queued.is_empty() {
            tracing::debug!(
                "SESSION {}: flushing {} queued inputs",
                self.session.thread_id,
                queued.len()
            );
            inner.state.apply(queued);
        }
        self.session.in_flight.store(false, Ordering::Release);
    }
}

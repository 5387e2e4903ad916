use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::endpoint::{EndpointError, GenerateEndpoint};
use crate::core::message::Message;
use crate::core::session::Session;
use crate::core::session_store::SessionStore;
use crate::core::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    NotFound { id: String },
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationError::NotFound { id } => write!(f, "Conversation not found: {id}"),
        }
    }
}

impl StdError for ConversationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank text, or another query was still outstanding.
    Ignored,
    /// The reply was appended and the exchange saved.
    Completed,
    /// The endpoint failed; an error reply was appended and nothing saved.
    Failed,
}

/// A query that has been shown in the draft and is waiting for its reply.
///
/// Handed back to [`ConversationController::finish_submit`] with the
/// endpoint result.
#[derive(Debug)]
pub struct PendingQuery {
    query: String,
    generation: u64,
    session_id: Option<String>,
    from_input: bool,
}

impl PendingQuery {
    pub fn query(&self) -> &str {
        &self.query
    }
}

pub struct ConversationController<S> {
    store: SessionStore<S>,
    endpoint: Arc<dyn GenerateEndpoint>,
    draft_messages: Vec<Message>,
    active_session_id: Option<String>,
    pending: bool,
    input: String,
    // Bumped whenever the draft is swapped out, so a late reply can tell
    // whether it still belongs on screen.
    generation: u64,
}

impl<S: KeyValueStore> ConversationController<S> {
    pub fn new(store: SessionStore<S>, endpoint: Arc<dyn GenerateEndpoint>) -> Self {
        Self {
            store,
            endpoint,
            draft_messages: Vec::new(),
            active_session_id: None,
            pending: false,
            input: String::new(),
            generation: 0,
        }
    }

    pub fn draft_messages(&self) -> &[Message] {
        &self.draft_messages
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_session_id.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn sessions(&self) -> &[Session] {
        self.store.sessions()
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn endpoint(&self) -> Arc<dyn GenerateEndpoint> {
        Arc::clone(&self.endpoint)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn start_new_conversation(&mut self) {
        self.draft_messages.clear();
        self.active_session_id = None;
        self.generation += 1;
    }

    pub fn load_conversation(&mut self, id: &str) -> Result<(), ConversationError> {
        let session = self
            .store
            .get(id)
            .ok_or_else(|| ConversationError::NotFound { id: id.to_string() })?;
        self.draft_messages = session.messages.clone();
        self.active_session_id = Some(session.id.clone());
        self.generation += 1;
        debug!(id = %id, messages = self.draft_messages.len(), "loaded conversation");
        Ok(())
    }

    /// Deletes a saved conversation, clearing the draft if it was the active one.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let removed = self.store.delete_session(id);
        if self.active_session_id.as_deref() == Some(id) {
            self.start_new_conversation();
        }
        removed
    }

    /// Shows `text` as a user message and marks a query outstanding.
    ///
    /// Returns `None` for blank text or while another query is pending.
    pub fn begin_submit(&mut self, text: &str) -> Option<PendingQuery> {
        if text.trim().is_empty() || self.pending {
            return None;
        }

        self.draft_messages.push(Message::user(text));
        self.pending = true;

        Some(PendingQuery {
            query: text.to_string(),
            generation: self.generation,
            session_id: self.active_session_id.clone(),
            from_input: false,
        })
    }

    /// [`begin_submit`](Self::begin_submit) for the current input buffer.
    pub fn begin_submit_input(&mut self) -> Option<PendingQuery> {
        let text = self.input.clone();
        let mut pending = self.begin_submit(&text)?;
        pending.from_input = true;
        Some(pending)
    }

    /// Applies the endpoint result for `pending`.
    pub fn finish_submit(
        &mut self,
        pending: PendingQuery,
        result: Result<String, EndpointError>,
    ) -> SubmitOutcome {
        self.pending = false;

        if pending.generation != self.generation {
            return self.finish_detached(pending, result);
        }

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "query failed");
                self.draft_messages.push(Message::fetch_error());
                return SubmitOutcome::Failed;
            }
        };

        let ai_message = Message::ai(reply);
        self.draft_messages.push(ai_message.clone());

        let exchange = vec![Message::user(pending.query.as_str()), ai_message];
        let active = self.active_session_id.take();
        let session_id = self.commit_exchange(active.as_deref(), &pending.query, exchange);
        self.active_session_id = Some(session_id);

        if pending.from_input {
            self.input.clear();
        }
        SubmitOutcome::Completed
    }

    /// The draft changed while the query was out. The exchange still belongs
    /// to the conversation it was asked in, so it is saved there without
    /// touching what is on screen now. A conversation deleted in the
    /// meantime stays deleted.
    fn finish_detached(
        &mut self,
        pending: PendingQuery,
        result: Result<String, EndpointError>,
    ) -> SubmitOutcome {
        match result {
            Ok(reply) => {
                let exchange = vec![Message::user(pending.query.as_str()), Message::ai(reply)];
                match pending.session_id.as_deref() {
                    Some(id) => {
                        if !self.store.append_to_session(id, exchange) {
                            info!(id = %id, "dropping late reply for a deleted conversation");
                        } else if self.active_session_id.as_deref() == Some(id) {
                            // Reloaded while the query was out.
                            self.refresh_draft(id);
                        }
                    }
                    None => {
                        self.store.create_session(&pending.query, exchange);
                    }
                }
                SubmitOutcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "query failed after the conversation changed");
                SubmitOutcome::Failed
            }
        }
    }

    fn refresh_draft(&mut self, id: &str) {
        if let Some(session) = self.store.get(id) {
            self.draft_messages = session.messages.clone();
        }
    }

    /// Saves one user/ai pair and returns the id of the session holding it.
    ///
    /// Without a session, or when the session has gone away, the pair starts
    /// a new one titled after `query`.
    fn commit_exchange(
        &mut self,
        session_id: Option<&str>,
        query: &str,
        exchange: Vec<Message>,
    ) -> String {
        if let Some(id) = session_id {
            if self.store.append_to_session(id, exchange.clone()) {
                return id.to_string();
            }
            warn!(id = %id, "active session vanished; starting a new one");
        }
        self.store.create_session(query, exchange).id
    }

    /// Runs one query end to end.
    pub async fn submit_query(&mut self, text: &str) -> SubmitOutcome {
        let Some(pending) = self.begin_submit(text) else {
            return SubmitOutcome::Ignored;
        };
        let result = self.endpoint.generate(pending.query()).await;
        self.finish_submit(pending, result)
    }

    /// Runs the input buffer as a query, clearing it on success.
    pub async fn submit_input(&mut self) -> SubmitOutcome {
        let Some(pending) = self.begin_submit_input() else {
            return SubmitOutcome::Ignored;
        };
        let result = self.endpoint.generate(pending.query()).await;
        self.finish_submit(pending, result)
    }
}

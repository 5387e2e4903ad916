//! Owner of the saved session collection.
//!
//! Every mutator writes the whole collection back through the
//! [`KeyValueStore`] before returning. The in-memory list is authoritative:
//! a failed write is logged and the mutation stands.

use chrono::Utc;
use tracing::{debug, warn};

use crate::core::message::Message;
use crate::core::session::{derive_title, Session};
use crate::core::storage::{KeyValueStore, StoreError};

/// Slot holding the JSON-serialized session list.
pub const SESSIONS_KEY: &str = "chat_sessions";

pub struct SessionStore<S> {
    backend: S,
    sessions: Vec<Session>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Reads the saved collection. Missing, unreadable or foreign data
    /// yields an empty history.
    pub fn load(backend: S) -> Self {
        let sessions = match backend.read(SESSIONS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Session>>(&raw) {
                Ok(sessions) => sessions,
                Err(err) => {
                    warn!(error = %err, "discarding unparseable session history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read session history");
                Vec::new()
            }
        };
        debug!(count = sessions.len(), "loaded session history");
        Self { backend, sessions }
    }

    /// Writes the full collection.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.sessions)?;
        self.backend.write(SESSIONS_KEY, &json)
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            warn!(error = %err, "failed to save session history");
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Records a new session at the front of the list and returns a copy.
    pub fn create_session(&mut self, first_message_text: &str, messages: Vec<Message>) -> Session {
        let created_at = Utc::now();
        let session = Session {
            id: self.unique_id(created_at.timestamp_millis()),
            title: derive_title(first_message_text),
            messages,
            created_at,
        };
        debug!(id = %session.id, title = %session.title, "created session");
        self.sessions.insert(0, session.clone());
        self.persist();
        session
    }

    /// Appends to an existing session. Returns `false` when `id` is unknown.
    pub fn append_to_session(&mut self, id: &str, new_messages: Vec<Message>) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            debug!(id = %id, "append skipped: unknown session");
            return false;
        };
        session.messages.extend(new_messages);
        self.persist();
        true
    }

    /// Removes a session. Returns `false` when `id` is unknown.
    pub fn delete_session(&mut self, id: &str) -> bool {
        match self.try_delete_session(id) {
            Ok(removed) => removed,
            Err(err) => {
                warn!(error = %err, "failed to save session history");
                true
            }
        }
    }

    /// Like [`delete_session`](Self::delete_session), but hands back the
    /// write error. The session is removed from memory either way.
    pub fn try_delete_session(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            return Ok(false);
        }
        debug!(id = %id, "deleted session");
        self.save()?;
        Ok(true)
    }

    fn unique_id(&self, millis: i64) -> String {
        let mut candidate = millis;
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::TITLE_ELLIPSIS;
    use crate::core::storage::MemoryStore;

    fn exchange(query: &str, reply: &str) -> Vec<Message> {
        vec![Message::user(query), Message::ai(reply)]
    }

    fn reload(store: &SessionStore<MemoryStore>) -> SessionStore<MemoryStore> {
        SessionStore::load(store.backend().clone())
    }

    #[test]
    fn missing_slot_loads_empty() {
        let store = SessionStore::load(MemoryStore::new());
        assert!(store.is_empty());
    }

    #[test]
    fn corrupted_slot_loads_empty() {
        let store = SessionStore::load(MemoryStore::with_value(SESSIONS_KEY, "{not json"));
        assert!(store.is_empty());
        let store = SessionStore::load(MemoryStore::with_value(SESSIONS_KEY, r#"{"a":1}"#));
        assert!(store.is_empty());
    }

    #[test]
    fn create_prepends_and_persists() {
        let mut store = SessionStore::load(MemoryStore::new());
        let first = store.create_session("first", exchange("first", "one"));
        let second = store.create_session("second", exchange("second", "two"));

        assert_ne!(first.id, second.id);
        let ids: Vec<_> = store.sessions().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);

        let reloaded = reload(&store);
        assert_eq!(reloaded.sessions(), store.sessions());
    }

    #[test]
    fn create_truncates_long_titles() {
        let mut store = SessionStore::load(MemoryStore::new());
        let text = "x".repeat(45);
        let session = store.create_session(&text, exchange(&text, "ok"));
        assert_eq!(session.title.chars().count(), 31);
        assert!(session.title.ends_with(TITLE_ELLIPSIS));

        let short = store.create_session("short", exchange("short", "ok"));
        assert_eq!(short.title, "short");
    }

    #[test]
    fn append_extends_in_order_and_persists() {
        let mut store = SessionStore::load(MemoryStore::new());
        let session = store.create_session("q1", exchange("q1", "a1"));
        assert!(store.append_to_session(&session.id, exchange("q2", "a2")));

        let reloaded = reload(&store);
        let texts: Vec<_> = reloaded
            .get(&session.id)
            .unwrap()
            .messages
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["q1", "a1", "q2", "a2"]);
    }

    #[test]
    fn append_to_unknown_id_is_a_noop() {
        let mut store = SessionStore::load(MemoryStore::new());
        store.create_session("q1", exchange("q1", "a1"));
        let before = store.sessions().to_vec();
        assert!(!store.append_to_session("missing", exchange("q2", "a2")));
        assert_eq!(store.sessions(), before.as_slice());
    }

    #[test]
    fn delete_unknown_id_leaves_collection_unchanged() {
        let mut store = SessionStore::load(MemoryStore::new());
        store.create_session("a", exchange("a", "1"));
        store.create_session("b", exchange("b", "2"));
        let before = store.sessions().to_vec();
        assert!(!store.delete_session("missing"));
        assert_eq!(store.sessions(), before.as_slice());
    }

    #[test]
    fn delete_removes_and_persists() {
        let mut store = SessionStore::load(MemoryStore::new());
        let a = store.create_session("a", exchange("a", "1"));
        let b = store.create_session("b", exchange("b", "2"));
        assert!(store.delete_session(&a.id));
        assert!(store.get(&a.id).is_none());

        let reloaded = reload(&store);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.sessions()[0].id, b.id);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn write(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: key.into(),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    #[test]
    fn try_delete_reports_write_failure() {
        let mut store = SessionStore::load(FailingStore);
        let session = store.create_session("a", exchange("a", "1"));

        assert!(store.try_delete_session(&session.id).is_err());
        assert!(store.is_empty());
        assert!(matches!(store.try_delete_session(&session.id), Ok(false)));
    }

    #[test]
    fn try_delete_persists_removal() {
        let mut store = SessionStore::load(MemoryStore::new());
        let session = store.create_session("a", exchange("a", "1"));
        assert!(store.try_delete_session(&session.id).unwrap());
        assert!(reload(&store).is_empty());
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut store = SessionStore::load(MemoryStore::new());
        let ids: Vec<_> = (0..5)
            .map(|i| store.create_session(&i.to_string(), Vec::new()).id)
            .collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }
}

//! In-memory session state.
//!
//! A single [`Session`] holds every patient record and the assistant chat history for the
//! lifetime of the process. Records keep insertion order; adding a record whose id is
//! already stored replaces it in place.
//!
//! [`SessionStore`] shares the session between request handlers behind an async
//! read/write lock. Callers must not hold a guard across a model call.

use crate::constants::{ALL_PATIENTS, NEXT_PATIENT_SEPARATOR};
use crate::prompts::format_patient_context;
use crate::record::PatientRecord;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Which patients the assistant should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextSelection {
    AllPatients,
    Patient(String),
}

impl ContextSelection {
    /// Interprets the value of the patient-context select box.
    ///
    /// Missing, blank, or `All Patients` select everyone; anything else is a patient id.
    pub fn from_choice(choice: Option<&str>) -> Self {
        match choice.map(str::trim) {
            None | Some("") => ContextSelection::AllPatients,
            Some(c) if c == ALL_PATIENTS => ContextSelection::AllPatients,
            Some(id) => ContextSelection::Patient(id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct Session {
    records: Vec<PatientRecord>,
    chat_history: Vec<ChatEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record`, replacing any record with the same id.
    ///
    /// # Returns
    /// `true` if an existing record was replaced.
    pub fn upsert(&mut self, record: PatientRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                self.records.push(record);
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PatientRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Builds the prompt context for `selection`.
    ///
    /// A known patient yields that patient's block, an unknown id yields an empty string,
    /// and all patients are joined in insertion order with the next-patient separator.
    pub fn relevant_context(&self, selection: &ContextSelection) -> String {
        match selection {
            ContextSelection::Patient(id) => {
                self.get(id).map(format_patient_context).unwrap_or_default()
            }
            ContextSelection::AllPatients => self
                .records
                .iter()
                .map(format_patient_context)
                .collect::<Vec<_>>()
                .join(NEXT_PATIENT_SEPARATOR),
        }
    }

    pub fn chat_history(&self) -> &[ChatEntry] {
        &self.chat_history
    }

    /// Appends a question and its answer to the chat history.
    pub fn push_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.chat_history.push(ChatEntry {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            content: question.into(),
        });
        self.chat_history.push(ChatEntry {
            id: Uuid::new_v4(),
            role: ChatRole::Assistant,
            content: answer.into(),
        });
    }

    pub fn clear_chat(&mut self) {
        self.chat_history.clear();
    }
}

/// Shared handle to the process-wide session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Gender;
    use chrono::NaiveDateTime;

    fn record(id: &str, name: &str) -> PatientRecord {
        PatientRecord {
            id: id.into(),
            name: name.into(),
            age: 30,
            gender: Gender::Other,
            text: format!("history of {name}"),
            summary: format!("summary of {name}"),
            prescription: None,
            timestamp: NaiveDateTime::parse_from_str("2024-01-02 03:04:05", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    #[test]
    fn test_record_round_trips_unchanged() {
        let mut session = Session::new();
        let original = record("P-1", "Ann");

        session.upsert(original.clone());

        assert_eq!(session.get("P-1"), Some(&original));
    }

    #[test]
    fn test_upsert_keeps_insertion_order() {
        let mut session = Session::new();
        assert!(!session.upsert(record("B", "Bea")));
        assert!(!session.upsert(record("A", "Al")));
        assert!(!session.upsert(record("C", "Cy")));

        let ids: Vec<_> = session.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["B", "A", "C"]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut session = Session::new();
        session.upsert(record("A", "Al"));
        session.upsert(record("B", "Bea"));
        session.get_mut("A").unwrap().prescription = Some("aspirin".into());

        let replaced = session.upsert(record("A", "Alan"));

        assert!(replaced);
        assert_eq!(session.len(), 2);
        assert_eq!(session.records()[0].name, "Alan");
        assert_eq!(session.records()[0].prescription, None);
        assert_eq!(session.records()[1].id, "B");
    }

    #[test]
    fn test_context_for_single_patient() {
        let mut session = Session::new();
        session.upsert(record("A", "Al"));
        session.upsert(record("B", "Bea"));

        let context = session.relevant_context(&ContextSelection::Patient("B".into()));

        assert_eq!(context, format_patient_context(session.get("B").unwrap()));
        assert!(!context.contains("Al\n"));
    }

    #[test]
    fn test_context_for_unknown_patient_is_empty() {
        let mut session = Session::new();
        session.upsert(record("A", "Al"));

        let context = session.relevant_context(&ContextSelection::Patient("missing".into()));

        assert_eq!(context, "");
    }

    #[test]
    fn test_context_for_all_patients() {
        let mut session = Session::new();
        session.upsert(record("A", "Al"));
        session.upsert(record("B", "Bea"));

        let context = session.relevant_context(&ContextSelection::AllPatients);

        let expected = format!(
            "{}\n\n===NEXT PATIENT===\n\n{}",
            format_patient_context(session.get("A").unwrap()),
            format_patient_context(session.get("B").unwrap())
        );
        assert_eq!(context, expected);
    }

    #[test]
    fn test_context_for_all_patients_when_empty() {
        let session = Session::new();
        assert_eq!(session.relevant_context(&ContextSelection::AllPatients), "");
    }

    #[test]
    fn test_selection_from_choice() {
        assert_eq!(ContextSelection::from_choice(None), ContextSelection::AllPatients);
        assert_eq!(
            ContextSelection::from_choice(Some("All Patients")),
            ContextSelection::AllPatients
        );
        assert_eq!(
            ContextSelection::from_choice(Some("  ")),
            ContextSelection::AllPatients
        );
        assert_eq!(
            ContextSelection::from_choice(Some(" P-7 ")),
            ContextSelection::Patient("P-7".into())
        );
    }

    #[test]
    fn test_chat_history() {
        let mut session = Session::new();
        session.push_exchange("How is Al?", "Al is stable.");

        let history = session.chat_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "How is Al?");
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[1].content, "Al is stable.");
        assert_ne!(history[0].id, history[1].id);

        session.clear_chat();
        assert!(session.chat_history().is_empty());
    }

    #[tokio::test]
    async fn test_store_is_shared_between_clones() {
        let store = SessionStore::new();
        let other = store.clone();

        store.write().await.upsert(record("A", "Al"));

        assert_eq!(other.read().await.len(), 1);
    }
}

//! Patient service.
//!
//! This module provides the main service for patient operations: adding a record from an
//! uploaded history, maintaining prescriptions, and asking the assistant about stored
//! patients. PDF parsing runs on the blocking pool; model calls are made without holding
//! the session lock.

use std::sync::Arc;

use chrono::Local;
use crms_llm::ChatModel;
use tracing::{info, warn};

use crate::prompts::{question_messages, summary_messages};
use crate::record::{NewPatient, PatientForm, PatientRecord};
use crate::session::{ChatEntry, ContextSelection, SessionStore};
use crate::{CoreConfig, PatientError, PatientResult};

/// Pure patient data operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    cfg: Arc<CoreConfig>,
    model: Arc<dyn ChatModel>,
    session: SessionStore,
}

impl PatientService {
    /// Creates a new instance of PatientService with an empty session.
    pub fn new(cfg: Arc<CoreConfig>, model: Arc<dyn ChatModel>) -> Self {
        Self::with_session(cfg, model, SessionStore::new())
    }

    /// Creates a PatientService over an existing session.
    pub fn with_session(
        cfg: Arc<CoreConfig>,
        model: Arc<dyn ChatModel>,
        session: SessionStore,
    ) -> Self {
        Self {
            cfg,
            model,
            session,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Adds a patient record from a submitted form.
    ///
    /// The uploaded history is validated, its text extracted and summarised, and the
    /// resulting record stored with the current local time. A record with the same id is
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - required fields are missing or invalid,
    /// - the upload is not an acceptable PDF,
    /// - no text can be extracted,
    /// - summary generation fails.
    pub async fn add_patient(&self, form: PatientForm) -> PatientResult<PatientRecord> {
        let mut patient = NewPatient::from_form(form)?;

        let upload = crms_files::inspect_upload(
            &patient.history.filename,
            &patient.history.bytes,
            self.cfg.max_upload_bytes(),
        )
        .map_err(PatientError::Upload)?;

        info!(
            patient_id = %patient.id,
            sha256 = %upload.sha256,
            size_bytes = upload.size_bytes,
            "processing patient record"
        );

        let text = self
            .extract_text(std::mem::take(&mut patient.history.bytes))
            .await?;
        let summary = self.generate_summary(&text).await?;

        let record = PatientRecord::new(&patient, text, summary, Local::now().naive_local());
        let replaced = self.session.write().await.upsert(record.clone());

        if replaced {
            warn!(patient_id = %record.id, "replaced existing patient record");
        }
        info!(patient_id = %record.id, "added patient record");

        Ok(record)
    }

    /// Extracts the text of an uploaded PDF.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Extraction` if the PDF cannot be read and
    /// `PatientError::NoExtractableText` if the extracted text is empty or only whitespace.
    pub async fn extract_text(&self, bytes: Vec<u8>) -> PatientResult<String> {
        let text = tokio::task::spawn_blocking(move || crms_files::extract_text(&bytes))
            .await
            .map_err(|e| PatientError::ExtractionTask(e.to_string()))?
            .map_err(PatientError::Extraction)?;

        if text.trim().is_empty() {
            return Err(PatientError::NoExtractableText);
        }

        Ok(text)
    }

    /// Asks the model for a sectioned summary of a medical record.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Summary` if the model call fails.
    pub async fn generate_summary(&self, text: &str) -> PatientResult<String> {
        self.model
            .invoke(&summary_messages(text))
            .await
            .map_err(PatientError::Summary)
    }

    /// Answers a question about the selected patients and records the exchange.
    ///
    /// The question and answer are appended to the chat history only when the model
    /// answers successfully.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - the question is blank,
    /// - no patient records exist,
    /// - the model call fails.
    pub async fn chat(&self, question: &str, selection: &ContextSelection) -> PatientResult<String> {
        if question.trim().is_empty() {
            return Err(PatientError::EmptyQuestion);
        }

        let context = {
            let session = self.session.read().await;
            if session.is_empty() {
                return Err(PatientError::NoRecords);
            }
            session.relevant_context(selection)
        };

        let answer = self
            .model
            .invoke(&question_messages(&context, question))
            .await
            .map_err(PatientError::Chat)?;

        self.session
            .write()
            .await
            .push_exchange(question, answer.clone());

        Ok(answer)
    }

    /// Saves the prescription for a stored patient.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::PatientNotFound` if no record has the given id.
    pub async fn update_prescription(&self, id: &str, prescription: String) -> PatientResult<()> {
        let mut session = self.session.write().await;
        let record = session
            .get_mut(id)
            .ok_or_else(|| PatientError::PatientNotFound(id.to_string()))?;
        record.prescription = Some(prescription);
        info!(patient_id = %id, "updated prescription");
        Ok(())
    }

    /// Lists every stored record in insertion order.
    pub async fn list_patients(&self) -> Vec<PatientRecord> {
        self.session.read().await.records().to_vec()
    }

    /// Returns one stored record.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::PatientNotFound` if no record has the given id.
    pub async fn get_patient(&self, id: &str) -> PatientResult<PatientRecord> {
        self.session
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PatientError::PatientNotFound(id.to_string()))
    }

    pub async fn chat_history(&self) -> Vec<ChatEntry> {
        self.session.read().await.chat_history().to_vec()
    }

    pub async fn clear_chat(&self) {
        self.session.write().await.clear_chat();
        info!("cleared chat history");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Gender, Upload};
    use crate::session::ChatRole;
    use async_trait::async_trait;
    use crms_files::testing::{encrypted_pdf_with_pages, pdf_with_pages};
    use crms_llm::{ChatMessage, LlmError, LlmResult, LlmSettings, Role};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replies from a queue and records every conversation it receives.
    struct ScriptedModel {
        replies: Mutex<VecDeque<LlmResult<String>>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<LlmResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Vec<ChatMessage>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn invoke(&self, messages: &[ChatMessage]) -> LlmResult<String> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyResponse))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn config(max_upload_bytes: u64) -> Arc<CoreConfig> {
        Arc::new(CoreConfig::new(LlmSettings::with_api_key("test"), max_upload_bytes).unwrap())
    }

    fn service(model: Arc<ScriptedModel>) -> PatientService {
        PatientService::new(config(1024 * 1024), model)
    }

    fn form(id: &str, name: &str, page: &str) -> PatientForm {
        PatientForm {
            name: name.into(),
            id: id.into(),
            age: 57,
            gender: "Male".into(),
            history: Some(Upload {
                filename: "history.pdf".into(),
                bytes: pdf_with_pages(&[page]),
            }),
        }
    }

    fn server_error() -> LlmError {
        LlmError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        }
    }

    #[tokio::test]
    async fn add_patient_extracts_summarises_and_stores() {
        let model = ScriptedModel::new(vec![Ok("1. Chief Complaints: chest pain".into())]);
        let service = service(model.clone());

        let record = service
            .add_patient(form("P-100", "John Smith", "Chest pain on exertion"))
            .await
            .unwrap();

        assert_eq!(record.id, "P-100");
        assert_eq!(record.name, "John Smith");
        assert_eq!(record.age, 57);
        assert_eq!(record.gender, Gender::Male);
        assert!(record.text.contains("Chest pain on exertion"));
        assert_eq!(record.summary, "1. Chief Complaints: chest pain");
        assert_eq!(record.prescription, None);
        assert!(chrono::NaiveDateTime::parse_from_str(&record.last_updated(), "%Y-%m-%d %H:%M:%S").is_ok());

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].role, Role::System);
        assert!(calls[0][1]
            .content
            .starts_with("Please summarize the following medical record:\n\n"));
        assert!(calls[0][1].content.contains("Chest pain on exertion"));

        assert_eq!(service.get_patient("P-100").await.unwrap(), record);
    }

    #[tokio::test]
    async fn add_patient_accepts_owner_protected_pdf() {
        let model = ScriptedModel::new(vec![Ok("summary".into())]);
        let service = service(model.clone());
        let mut f = form("P-7", "Ruth Ade", "unused");
        f.history = Some(Upload {
            filename: "locked.pdf".into(),
            bytes: encrypted_pdf_with_pages(&["Discharge note: stable"], "", "records-office"),
        });

        let record = service.add_patient(f).await.unwrap();

        assert!(record.text.contains("Discharge note: stable"));
        assert!(model.calls()[0][1].content.contains("Discharge note: stable"));
    }

    #[tokio::test]
    async fn add_patient_rejects_password_protected_pdf() {
        let model = ScriptedModel::new(vec![]);
        let service = service(model.clone());
        let mut f = form("P-8", "Tom Ng", "unused");
        f.history = Some(Upload {
            filename: "sealed.pdf".into(),
            bytes: encrypted_pdf_with_pages(&["Sealed"], "patient-only", "records-office"),
        });

        let err = service.add_patient(f).await.unwrap_err();

        assert!(matches!(err, PatientError::Extraction(crms_files::FilesError::Encrypted)));
        assert!(model.calls().is_empty());
        assert!(service.list_patients().await.is_empty());
    }

    #[tokio::test]
    async fn add_patient_rejects_missing_fields_without_calling_model() {
        let model = ScriptedModel::new(vec![]);
        let service = service(model.clone());
        let mut f = form("P-1", "Ann", "text");
        f.gender = "Select".into();

        let err = service.add_patient(f).await.unwrap_err();

        assert!(matches!(err, PatientError::MissingRequiredFields));
        assert!(model.calls().is_empty());
        assert!(service.list_patients().await.is_empty());
    }

    #[tokio::test]
    async fn add_patient_rejects_non_pdf_upload() {
        let model = ScriptedModel::new(vec![]);
        let service = service(model.clone());
        let mut f = form("P-1", "Ann", "text");
        f.history = Some(Upload {
            filename: "notes.pdf".into(),
            bytes: b"plain text notes".to_vec(),
        });

        let err = service.add_patient(f).await.unwrap_err();

        assert!(matches!(err, PatientError::Upload(_)));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn add_patient_rejects_oversized_upload() {
        let model = ScriptedModel::new(vec![]);
        let service = PatientService::new(config(16), model);

        let err = service.add_patient(form("P-1", "Ann", "text")).await.unwrap_err();

        assert!(matches!(err, PatientError::Upload(crms_files::FilesError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn add_patient_does_not_store_when_summary_fails() {
        let model = ScriptedModel::new(vec![Err(server_error())]);
        let service = service(model);

        let err = service
            .add_patient(form("P-1", "Ann", "Fever"))
            .await
            .unwrap_err();

        assert!(matches!(err, PatientError::Summary(_)));
        assert!(err.to_string().starts_with("Error generating summary: "));
        assert!(service.list_patients().await.is_empty());
    }

    #[tokio::test]
    async fn add_patient_rejects_pdf_without_text() {
        let model = ScriptedModel::new(vec![]);
        let service = service(model.clone());

        let err = service.add_patient(form("P-1", "Ann", "   ")).await.unwrap_err();

        assert!(matches!(err, PatientError::NoExtractableText));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn add_patient_with_existing_id_replaces_record() {
        let model = ScriptedModel::new(vec![Ok("first".into()), Ok("second".into())]);
        let service = service(model);

        service.add_patient(form("P-1", "Ann", "Visit one")).await.unwrap();
        service.update_prescription("P-1", "Ibuprofen".into()).await.unwrap();
        service.add_patient(form("P-1", "Ann B", "Visit two")).await.unwrap();

        let patients = service.list_patients().await;
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].name, "Ann B");
        assert_eq!(patients[0].summary, "second");
        assert_eq!(patients[0].prescription, None);
    }

    #[tokio::test]
    async fn update_prescription_round_trips() {
        let model = ScriptedModel::new(vec![Ok("summary".into())]);
        let service = service(model);
        service.add_patient(form("P-1", "Ann", "Asthma")).await.unwrap();

        service
            .update_prescription("P-1", "Salbutamol inhaler PRN".into())
            .await
            .unwrap();

        let record = service.get_patient("P-1").await.unwrap();
        assert_eq!(record.prescription.as_deref(), Some("Salbutamol inhaler PRN"));
    }

    #[tokio::test]
    async fn update_prescription_unknown_patient() {
        let service = service(ScriptedModel::new(vec![]));

        let err = service
            .update_prescription("nobody", "x".into())
            .await
            .unwrap_err();

        assert!(matches!(err, PatientError::PatientNotFound(ref id) if id == "nobody"));
    }

    #[tokio::test]
    async fn chat_requires_records() {
        let model = ScriptedModel::new(vec![]);
        let service = service(model.clone());

        let err = service
            .chat("Who is at risk?", &ContextSelection::AllPatients)
            .await
            .unwrap_err();

        assert!(matches!(err, PatientError::NoRecords));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn chat_rejects_blank_question() {
        let service = service(ScriptedModel::new(vec![]));

        let err = service
            .chat("   ", &ContextSelection::AllPatients)
            .await
            .unwrap_err();

        assert!(matches!(err, PatientError::EmptyQuestion));
    }

    #[tokio::test]
    async fn chat_uses_selected_patient_context_and_records_exchange() {
        let model = ScriptedModel::new(vec![
            Ok("summary one".into()),
            Ok("summary two".into()),
            Ok("Bob has no known allergies.".into()),
        ]);
        let service = service(model.clone());
        service.add_patient(form("A", "Alice", "Alice history")).await.unwrap();
        service.add_patient(form("B", "Bob", "Bob history")).await.unwrap();

        let answer = service
            .chat("Any allergies?", &ContextSelection::Patient("B".into()))
            .await
            .unwrap();

        assert_eq!(answer, "Bob has no known allergies.");

        let calls = model.calls();
        let prompt = &calls[2][1].content;
        assert!(prompt.contains("Name: Bob"));
        assert!(!prompt.contains("Name: Alice"));
        assert!(prompt.contains("Question: Any allergies?"));

        let history = service.chat_history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[0].content, "Any allergies?");
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[1].content, "Bob has no known allergies.");
    }

    #[tokio::test]
    async fn chat_all_patients_includes_everyone() {
        let model = ScriptedModel::new(vec![
            Ok("s1".into()),
            Ok("s2".into()),
            Ok("Both are stable.".into()),
        ]);
        let service = service(model.clone());
        service.add_patient(form("A", "Alice", "Alice history")).await.unwrap();
        service.add_patient(form("B", "Bob", "Bob history")).await.unwrap();

        service
            .chat("Summarise everyone", &ContextSelection::AllPatients)
            .await
            .unwrap();

        let prompt = &model.calls()[2][1].content;
        let alice = prompt.find("Name: Alice").unwrap();
        let separator = prompt.find("===NEXT PATIENT===").unwrap();
        let bob = prompt.find("Name: Bob").unwrap();
        assert!(alice < separator && separator < bob);
    }

    #[tokio::test]
    async fn chat_unknown_patient_sends_empty_context() {
        let model = ScriptedModel::new(vec![Ok("s".into()), Ok("I have no record of them.".into())]);
        let service = service(model.clone());
        service.add_patient(form("A", "Alice", "history")).await.unwrap();

        service
            .chat("Tell me about Z", &ContextSelection::Patient("Z".into()))
            .await
            .unwrap();

        assert!(model.calls()[1][1].content.starts_with("\nContext: \n\nQuestion:"));
    }

    #[tokio::test]
    async fn chat_failure_leaves_history_untouched() {
        let model = ScriptedModel::new(vec![Ok("s".into()), Err(server_error())]);
        let service = service(model);
        service.add_patient(form("A", "Alice", "history")).await.unwrap();

        let err = service
            .chat("Status?", &ContextSelection::AllPatients)
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Error processing question: "));
        assert!(service.chat_history().await.is_empty());
    }

    #[tokio::test]
    async fn clear_chat_empties_history() {
        let model = ScriptedModel::new(vec![Ok("s".into()), Ok("answer".into())]);
        let service = service(model);
        service.add_patient(form("A", "Alice", "history")).await.unwrap();
        service
            .chat("Status?", &ContextSelection::AllPatients)
            .await
            .unwrap();

        service.clear_chat().await;

        assert!(service.chat_history().await.is_empty());
        assert_eq!(service.list_patients().await.len(), 1);
    }

    #[tokio::test]
    async fn get_patient_unknown() {
        let service = service(ScriptedModel::new(vec![]));
        assert!(matches!(
            service.get_patient("X").await,
            Err(PatientError::PatientNotFound(_))
        ));
    }
}

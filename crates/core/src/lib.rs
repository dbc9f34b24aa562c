//! # CRMS Core
//!
//! Core business logic for the clinic record management system.
//!
//! This crate contains pure data operations:
//! - Validating new patient records and storing them in the in-memory session
//! - Extracting and summarising uploaded medical histories
//! - Building patient context and answering staff questions through a [`crms_llm::ChatModel`]
//!
//! **No API concerns**: HTTP servers and wire types belong in `api-rest` or `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod prompts;
pub mod record;
pub mod session;

pub use config::{core_config_from_lookup, CoreConfig};
pub use constants::{patient_added_message, ALL_PATIENTS, PRESCRIPTION_UPDATED};
pub use error::{PatientError, PatientResult};
pub use patient::PatientService;
pub use prompts::format_patient_context;
pub use record::{Gender, NewPatient, PatientForm, PatientRecord, Upload};
pub use session::{ChatEntry, ChatRole, ContextSelection, Session, SessionStore};

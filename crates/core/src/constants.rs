//! Constants used throughout the CRMS core crate.
//!
//! Environment variable names, labels shown to staff and the fixed pieces of prompt
//! formatting live here so the API layer and the core agree on them.

/// Label of the chat context choice that includes every stored patient.
pub const ALL_PATIENTS: &str = "All Patients";

/// Separator placed between patient blocks when the chat context covers all patients.
pub const NEXT_PATIENT_SEPARATOR: &str = "\n\n===NEXT PATIENT===\n\n";

/// Shown in the prompt context when a patient has never had a prescription saved.
pub const NO_PRESCRIPTION: &str = "No current prescription";

/// Display format for the record timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder option of the gender select; it is not a gender.
pub const GENDER_PLACEHOLDER: &str = "Select";

/// Environment variable holding the address the REST server binds to.
pub const ENV_REST_ADDR: &str = "CRMS_REST_ADDR";

/// Address the REST server binds to when `CRMS_REST_ADDR` is unset.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Environment variable holding the hosted model's API key.
pub const ENV_API_KEY: &str = "GROQ_API_KEY";

/// Environment variable overriding the model API base URL.
pub const ENV_LLM_BASE_URL: &str = "CRMS_LLM_BASE_URL";

/// Environment variable overriding the model name.
pub const ENV_LLM_MODEL: &str = "CRMS_LLM_MODEL";

/// Environment variable overriding the sampling temperature.
pub const ENV_LLM_TEMPERATURE: &str = "CRMS_LLM_TEMPERATURE";

/// Environment variable overriding the completion token limit.
pub const ENV_LLM_MAX_TOKENS: &str = "CRMS_LLM_MAX_TOKENS";

/// Environment variable overriding the request timeout in seconds.
pub const ENV_LLM_TIMEOUT_SECS: &str = "CRMS_LLM_TIMEOUT_SECS";

/// Environment variable overriding the number of retries for transient failures.
pub const ENV_LLM_MAX_RETRIES: &str = "CRMS_LLM_MAX_RETRIES";

/// Environment variable overriding the upload size limit in bytes.
pub const ENV_MAX_UPLOAD_BYTES: &str = "CRMS_MAX_UPLOAD_BYTES";

/// Shown after a prescription has been saved.
pub const PRESCRIPTION_UPDATED: &str = "Prescription updated successfully!";

/// Message shown after a record has been added.
pub fn patient_added_message(name: &str) -> String {
    format!("Successfully added patient: {name}")
}

use crms_files::FilesError;
use crms_llm::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Please fill in all required fields.")]
    MissingRequiredFields,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unknown gender: {0} (expected Male, Female or Other)")]
    InvalidGender(String),
    #[error("patient not found: {0}")]
    PatientNotFound(String),
    #[error("Add patient records to start using the medical assistant.")]
    NoRecords,
    #[error("question cannot be empty")]
    EmptyQuestion,

    #[error("invalid upload: {0}")]
    Upload(#[source] FilesError),
    #[error("Error extracting text from PDF: {0}")]
    Extraction(#[source] FilesError),
    #[error("Error extracting text from PDF: no text found in document")]
    NoExtractableText,
    #[error("Error extracting text from PDF: extraction task failed: {0}")]
    ExtractionTask(String),

    #[error("Error generating summary: {0}")]
    Summary(#[source] LlmError),
    #[error("Error processing question: {0}")]
    Chat(#[source] LlmError),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_shown_to_staff() {
        assert_eq!(
            PatientError::MissingRequiredFields.to_string(),
            "Please fill in all required fields."
        );
        assert_eq!(
            PatientError::NoRecords.to_string(),
            "Add patient records to start using the medical assistant."
        );
        assert_eq!(
            PatientError::Summary(LlmError::EmptyResponse).to_string(),
            "Error generating summary: empty or missing content in response"
        );
        assert_eq!(
            PatientError::Chat(LlmError::Status {
                status: 401,
                message: "Invalid API Key".into()
            })
            .to_string(),
            "Error processing question: HTTP 401: Invalid API Key"
        );
        assert_eq!(
            PatientError::Extraction(FilesError::Encrypted).to_string(),
            "Error extracting text from PDF: PDF is encrypted"
        );
    }
}

//! Prompt construction.
//!
//! Everything sent to the model is assembled here: the per-patient context block, the
//! summarisation request and the assistant question.

use crate::constants::NO_PRESCRIPTION;
use crate::record::PatientRecord;
use crms_llm::ChatMessage;

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a medical professional summarizing patient records.
Focus on key medical findings, diagnoses, treatments, and recommendations.
Format the summary in clear sections:
1. Chief Complaints
2. Key Findings
3. Diagnoses
4. Treatments
5. Recommendations
Use medical terminology appropriately and be concise but thorough.";

pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are an advanced medical assistant with access to patient records.
Your role is to provide accurate, relevant information based on the available medical records.
Always specify which patient you're referring to when answering questions.
If discussing multiple patients, clearly differentiate between them.
Focus on medical facts and avoid speculation.
If you're unsure about any information, explicitly state that.";

/// Formats one patient as a structured block for the model.
pub fn format_patient_context(record: &PatientRecord) -> String {
    format!(
        "
PATIENT INFORMATION:
Name: {name}
ID: {id}
Age: {age}
Gender: {gender}
Last Updated: {updated}

MEDICAL HISTORY:
{text}

MEDICAL SUMMARY:
{summary}

CURRENT PRESCRIPTION:
{prescription}
",
        name = record.name,
        id = record.id,
        age = record.age,
        gender = record.gender,
        updated = record.last_updated(),
        text = record.text,
        summary = record.summary,
        prescription = record.prescription.as_deref().unwrap_or(NO_PRESCRIPTION),
    )
}

/// Messages asking for a sectioned summary of a medical record.
pub fn summary_messages(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Please summarize the following medical record:\n\n{text}"
        )),
    ]
}

/// Messages asking the assistant a question about the given patient context.
pub fn question_messages(context: &str, question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(ASSISTANT_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "
Context: {context}

Question: {question}

Please provide a comprehensive answer based on the available medical records.
"
        )),
    ]
}

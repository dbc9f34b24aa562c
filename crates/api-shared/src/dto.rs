//! JSON request and response bodies.
//!
//! Field names are the wire names used by the page served at `/`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    /// Model answering summary and chat requests.
    pub model: String,
}

/// A stored record without its extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientSummaryRes {
    pub id: String,
    pub name: String,
    pub age: u32,
    #[schema(example = "Female")]
    pub gender: String,
    pub summary: String,
    pub prescription: Option<String>,
    #[schema(example = "2024-11-09 14:03:27")]
    pub last_updated: String,
}

/// A stored record including the text extracted from its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    #[serde(flatten)]
    pub record: PatientSummaryRes,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<PatientSummaryRes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientRes {
    #[schema(example = "Successfully added patient: Jane Doe")]
    pub message: String,
    pub patient: PatientSummaryRes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdatePrescriptionReq {
    pub prescription: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdatePrescriptionRes {
    #[schema(example = "Prescription updated successfully!")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatReq {
    pub question: String,
    /// Patient id, or `All Patients`. Absent means all patients.
    #[serde(default)]
    pub patient: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatEntryRes {
    pub id: String,
    #[schema(example = "assistant")]
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatRes {
    pub answer: String,
    pub history: Vec<ChatEntryRes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatHistoryRes {
    pub history: Vec<ChatEntryRes>,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_res_flattens_record() {
        let res = PatientRes {
            record: PatientSummaryRes {
                id: "P-1".into(),
                name: "Jane Doe".into(),
                age: 42,
                gender: "Female".into(),
                summary: "s".into(),
                prescription: None,
                last_updated: "2024-11-09 14:03:27".into(),
            },
            text: "history".into(),
        };

        let json = serde_json::to_value(&res).unwrap();

        assert_eq!(json["id"], "P-1");
        assert_eq!(json["text"], "history");
        assert!(json["prescription"].is_null());
        assert!(json.get("record").is_none());
    }

    #[test]
    fn test_chat_req_patient_is_optional() {
        let req: ChatReq = serde_json::from_str(r#"{"question":"Any allergies?"}"#).unwrap();
        assert_eq!(req.patient, None);

        let req: ChatReq =
            serde_json::from_str(r#"{"question":"q","patient":"All Patients"}"#).unwrap();
        assert_eq!(req.patient.as_deref(), Some("All Patients"));
    }
}

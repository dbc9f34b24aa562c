use api_shared::{
    ChatEntryRes, ChatHistoryRes, ChatReq, ChatRes, CreatePatientRes, ErrorRes, HealthRes,
    HealthService, ListPatientsRes, PatientRes, PatientSummaryRes, UpdatePrescriptionReq,
    UpdatePrescriptionRes,
};
use axum::{
    extract::{Multipart, Path as AxumPath, State},
    http::StatusCode,
    response::Json,
};
use crms_core::{
    patient_added_message, ChatEntry, ContextSelection, PatientError, PatientForm, PatientRecord,
    Upload, PRESCRIPTION_UPDATED,
};

use crate::{ApiError, AppState};

fn summary_res(record: &PatientRecord) -> PatientSummaryRes {
    PatientSummaryRes {
        id: record.id.clone(),
        name: record.name.clone(),
        age: record.age,
        gender: record.gender.to_string(),
        summary: record.summary.clone(),
        prescription: record.prescription.clone(),
        last_updated: record.last_updated(),
    }
}

fn chat_entry_res(entry: &ChatEntry) -> ChatEntryRes {
    ChatEntryRes {
        id: entry.id.to_string(),
        role: entry.role.as_str().to_string(),
        content: entry.content.clone(),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks. Does not contact the model.
#[axum::debug_handler]
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.service.model_name()))
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All records in insertion order", body = ListPatientsRes)
    )
)]
/// List every stored patient record, without the extracted text.
#[axum::debug_handler]
pub(crate) async fn list_patients(State(state): State<AppState>) -> Json<ListPatientsRes> {
    let patients = state
        .service
        .list_patients()
        .await
        .iter()
        .map(summary_res)
        .collect();
    Json(ListPatientsRes { patients })
}

/// Reads the "Add New Patient Record" form from a multipart body.
///
/// Unknown fields are ignored. A missing `age` counts as zero, matching the form's default.
async fn read_patient_form(mut multipart: Multipart) -> Result<PatientForm, ApiError> {
    let mut form = PatientForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => form.name = field.text().await?,
            "id" => form.id = field.text().await?,
            "gender" => form.gender = field.text().await?,
            "age" => form.age = parse_age(&field.text().await?)?,
            "history" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.history = Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn parse_age(raw: &str) -> Result<u32, PatientError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u32>()
        .map_err(|_| PatientError::InvalidInput(format!("age must be a whole number, got {raw:?}")))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body(
        content_type = "multipart/form-data",
        description = "Fields `name`, `id`, `age`, `gender` and the `history` PDF"
    ),
    responses(
        (status = 201, description = "Patient record added", body = CreatePatientRes),
        (status = 400, description = "Missing fields or invalid upload", body = ErrorRes),
        (status = 413, description = "Upload too large"),
        (status = 422, description = "No text could be extracted from the PDF", body = ErrorRes),
        (status = 502, description = "Summary generation failed", body = ErrorRes)
    )
)]
/// Add a patient record from an uploaded PDF history
///
/// The PDF text is extracted and summarised before the record is stored. Submitting an
/// existing id replaces that record.
///
/// # Errors
/// Returns:
/// - `400 Bad Request` if required fields are missing or the upload is not a PDF,
/// - `422 Unprocessable Entity` if the PDF cannot be read or contains no text,
/// - `502 Bad Gateway` if the model call fails.
#[axum::debug_handler]
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatePatientRes>), ApiError> {
    let form = read_patient_form(multipart).await?;
    let record = state.service.add_patient(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePatientRes {
            message: patient_added_message(&record.name),
            patient: summary_res(&record),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Full patient record", body = PatientRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Read one patient record including its extracted text.
#[axum::debug_handler]
pub(crate) async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PatientRes>, ApiError> {
    let record = state.service.get_patient(&id).await?;
    Ok(Json(PatientRes {
        record: summary_res(&record),
        text: record.text,
    }))
}

#[utoipa::path(
    put,
    path = "/patients/{id}/prescription",
    params(("id" = String, Path, description = "Patient id")),
    request_body = UpdatePrescriptionReq,
    responses(
        (status = 200, description = "Prescription saved", body = UpdatePrescriptionRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Save the current prescription for a patient. An empty prescription is stored as given.
#[axum::debug_handler]
pub(crate) async fn update_prescription(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<UpdatePrescriptionReq>,
) -> Result<Json<UpdatePrescriptionRes>, ApiError> {
    state
        .service
        .update_prescription(&id, req.prescription)
        .await?;
    Ok(Json(UpdatePrescriptionRes {
        message: PRESCRIPTION_UPDATED.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/chat",
    responses(
        (status = 200, description = "Chat history, oldest first", body = ChatHistoryRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn chat_history(State(state): State<AppState>) -> Json<ChatHistoryRes> {
    let history = state
        .service
        .chat_history()
        .await
        .iter()
        .map(chat_entry_res)
        .collect();
    Json(ChatHistoryRes { history })
}

#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatReq,
    responses(
        (status = 200, description = "Assistant answer and updated history", body = ChatRes),
        (status = 400, description = "Empty question", body = ErrorRes),
        (status = 409, description = "No patient records yet", body = ErrorRes),
        (status = 502, description = "Model call failed", body = ErrorRes)
    )
)]
/// Ask the medical assistant a question about one patient or all patients
///
/// # Errors
/// Returns:
/// - `400 Bad Request` if the question is blank,
/// - `409 Conflict` if no patient records exist,
/// - `502 Bad Gateway` if the model call fails; the history is left unchanged.
#[axum::debug_handler]
pub(crate) async fn ask(
    State(state): State<AppState>,
    Json(req): Json<ChatReq>,
) -> Result<Json<ChatRes>, ApiError> {
    let selection = ContextSelection::from_choice(req.patient.as_deref());
    let answer = state.service.chat(&req.question, &selection).await?;
    let history = state
        .service
        .chat_history()
        .await
        .iter()
        .map(chat_entry_res)
        .collect();
    Ok(Json(ChatRes { answer, history }))
}

#[utoipa::path(
    delete,
    path = "/chat",
    responses(
        (status = 204, description = "Chat history cleared")
    )
)]
#[axum::debug_handler]
pub(crate) async fn clear_chat(State(state): State<AppState>) -> StatusCode {
    state.service.clear_chat().await;
    StatusCode::NO_CONTENT
}

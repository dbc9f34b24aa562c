use api_shared::ErrorRes;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use crms_core::PatientError;

/// An error returned to the client as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn status_for(err: &PatientError) -> StatusCode {
    match err {
        PatientError::MissingRequiredFields
        | PatientError::InvalidInput(_)
        | PatientError::InvalidGender(_)
        | PatientError::EmptyQuestion
        | PatientError::Upload(_) => StatusCode::BAD_REQUEST,
        PatientError::PatientNotFound(_) => StatusCode::NOT_FOUND,
        PatientError::NoRecords => StatusCode::CONFLICT,
        PatientError::Extraction(_) | PatientError::NoExtractableText => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PatientError::Summary(_) | PatientError::Chat(_) => StatusCode::BAD_GATEWAY,
        PatientError::InvalidConfig(_) | PatientError::ExtractionTask(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", err);
        } else {
            tracing::warn!(status = status.as_u16(), "request rejected: {}", err);
        }
        Self::new(status, err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        tracing::warn!("invalid multipart body: {}", err.body_text());
        Self::new(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorRes {
                error: self.message,
            }),
        )
            .into_response()
    }
}

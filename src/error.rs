use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to initialize OCR engine: {0}")]
    InitializationError(String),

    #[error("Buffer shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Preprocessing failed: could not decode image: {0}")]
    DecodeFailure(String),

    #[error("Preprocessing failed: could not encode image: {0}")]
    EncodingFailure(String),

    #[error("OCR failed: {0}")]
    RecognitionFailure(String),

    #[error("No image found in pasted data. Supported formats: {supported}")]
    UnsupportedPasteData { supported: String },

    #[error("Enable at least one reading mode (japanese, english, digits)")]
    NoEnabledReadingMode,

    #[error("Unknown OCR engine: {0}")]
    UnknownEngine(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Clipboard is not available: {0}")]
    ClipboardUnavailable(String),

    #[error("There is no text to copy")]
    NothingToCopy,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OcrError {
    /// Stable machine-readable code sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            OcrError::InitializationError(_) => "INIT_ERROR",
            OcrError::ShapeMismatch(_) => "SHAPE_MISMATCH",
            OcrError::DecodeFailure(_) | OcrError::EncodingFailure(_) => "PREPROCESSING_FAILED",
            OcrError::RecognitionFailure(_) => "OCR_FAILED",
            OcrError::UnsupportedPasteData { .. } => "UNSUPPORTED_PASTE_DATA",
            OcrError::NoEnabledReadingMode => "NO_READING_MODE",
            OcrError::UnknownEngine(_) => "UNKNOWN_ENGINE",
            OcrError::ImageTooLarge { .. } => "IMAGE_TOO_LARGE",
            OcrError::ClipboardUnavailable(_) => "CLIPBOARD_UNAVAILABLE",
            OcrError::NothingToCopy => "NOTHING_TO_COPY",
            OcrError::InvalidRequest(_) => "INVALID_REQUEST",
            OcrError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            OcrError::InitializationError(_)
            | OcrError::ShapeMismatch(_)
            | OcrError::RecognitionFailure(_)
            | OcrError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OcrError::DecodeFailure(_) | OcrError::EncodingFailure(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            OcrError::UnsupportedPasteData { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            OcrError::NoEnabledReadingMode
            | OcrError::NothingToCopy
            | OcrError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            OcrError::UnknownEngine(_) => StatusCode::NOT_FOUND,
            OcrError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            OcrError::ClipboardUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

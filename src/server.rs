use crate::clipboard::{self, ClipboardWriter, SystemClipboard};
use crate::config::Config;
use crate::engines::{EngineInfo, EngineRegistry};
use crate::error::OcrError;
use crate::paste::{self, PasteItem, SUPPORTED_IMAGE_TYPES};
use crate::preprocessing::{GridLineParams, Pipeline, PreprocessOptions, StepId, StepTiming};
use crate::recognition::{self, CharacterModes};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Response header listing the preprocessing steps that ran
pub const APPLIED_STEPS_HEADER: HeaderName = HeaderName::from_static("x-applied-steps");

/// Multipart text fields that switch a character mode or step
const TOGGLE_FIELDS: [&str; 5] = [
    "japanese",
    "english",
    "digits",
    "remove_background_color",
    "remove_table_grid_lines",
];

/// Room for multipart boundaries and the toggle fields on top of the image
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engines: Arc<EngineRegistry>,
    pub clipboard: Arc<dyn ClipboardWriter>,
    pub config: Arc<Config>,
}

/// OCR response
#[derive(Serialize)]
pub struct OcrResponse {
    pub text: String,
    pub confidence: f32,
    pub engine: String,
    pub applied_steps: Vec<StepId>,
    pub preprocessing_time_ms: u64,
    pub preprocessing_steps: Vec<StepTiming>,
    pub processing_time_ms: u64,
    pub warnings: Vec<String>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub default_engine: String,
    pub available_engines: Vec<EngineInfo>,
    pub supported_paste_types: Vec<&'static str>,
    pub max_file_size_bytes: usize,
    pub default_modes: CharacterModes,
    pub default_preprocess: PreprocessOptions,
    pub grid_lines: GridLineParams,
}

#[derive(Deserialize)]
pub struct CopyRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct CopyResponse {
    pub copied: bool,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engines = EngineRegistry::new(&config)?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "Engines available: {:?} (default: {})",
        engines.list(),
        engines.default_name()
    );

    let state = AppState {
        engines: Arc::new(engines),
        clipboard: Arc::new(SystemClipboard),
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Build the router; split out so tests can drive it without a socket
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route("/ocr", post(handle_ocr))
        .route("/ocr/:engine", post(handle_ocr_with_engine))
        .route("/preprocess", post(handle_preprocess))
        .route("/clipboard", post(handle_clipboard))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([APPLIED_STEPS_HEADER]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Fields of an `/ocr` or `/preprocess` form
#[derive(Debug)]
struct PasteForm {
    items: Vec<PasteItem>,
    modes: CharacterModes,
    options: PreprocessOptions,
}

/// Handle OCR requests with the default engine
async fn handle_ocr(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OcrResponse>, OcrError> {
    run_ocr(state, None, multipart).await
}

/// Handle OCR requests for a named engine
async fn handle_ocr_with_engine(
    State(state): State<AppState>,
    Path(engine): Path<String>,
    multipart: Multipart,
) -> Result<Json<OcrResponse>, OcrError> {
    run_ocr(state, Some(engine), multipart).await
}

async fn run_ocr(
    state: AppState,
    engine_name: Option<String>,
    multipart: Multipart,
) -> Result<Json<OcrResponse>, OcrError> {
    let start = Instant::now();

    let engine = state.engines.resolve(engine_name.as_deref())?;
    let form = read_paste_form(multipart, state.config.max_file_size).await?;

    if !form.modes.any_enabled() {
        return Err(OcrError::NoEnabledReadingMode);
    }
    let image = paste::select_pasted_image(&form.items)?;

    let pipeline = Pipeline::new(form.options).with_grid_lines(state.config.grid_lines);
    let preprocessed = run_blocking(move || pipeline.process(image)).await?;

    let modes = form.modes;
    let prepared = preprocessed.image.clone();
    let worker_engine = engine.clone();
    let result = run_blocking(move || {
        let mut on_progress = |percent: u8| tracing::debug!(percent, "Recognition progress");
        recognition::recognize_image(worker_engine.as_ref(), &prepared, modes, &mut on_progress)
    })
    .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "OCR completed in {}ms with {}, confidence: {:.2}, text length: {}",
        processing_time_ms,
        engine.name(),
        result.confidence,
        result.text.len()
    );

    Ok(Json(OcrResponse {
        text: result.text,
        confidence: result.confidence,
        engine: engine.name().to_string(),
        applied_steps: preprocessed.applied_steps,
        preprocessing_time_ms: preprocessed.total_time_ms,
        preprocessing_steps: preprocessed.steps,
        processing_time_ms,
        warnings: result.warnings,
    }))
}

/// Return the preprocessed image itself
async fn handle_preprocess(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, OcrError> {
    let form = read_paste_form(multipart, state.config.max_file_size).await?;
    let image = paste::select_pasted_image(&form.items)?;

    let pipeline = Pipeline::new(form.options).with_grid_lines(state.config.grid_lines);
    let result = run_blocking(move || pipeline.process(image)).await?;

    let applied = result
        .applied_steps
        .iter()
        .map(StepId::as_str)
        .collect::<Vec<_>>()
        .join(",");
    let content_type = HeaderValue::from_str(result.image.mime_type())
        .map_err(|e| OcrError::Internal(format!("Invalid content type: {}", e)))?;
    let applied = HeaderValue::from_str(&applied)
        .map_err(|e| OcrError::Internal(format!("Invalid step header: {}", e)))?;

    Ok((
        [(header::CONTENT_TYPE, content_type), (APPLIED_STEPS_HEADER, applied)],
        result.image.into_bytes(),
    )
        .into_response())
}

/// Copy text to the host clipboard
async fn handle_clipboard(
    State(state): State<AppState>,
    Json(request): Json<CopyRequest>,
) -> Result<Json<CopyResponse>, OcrError> {
    let writer = state.clipboard.clone();
    run_blocking(move || clipboard::copy_text(writer.as_ref(), &request.text)).await?;
    Ok(Json(CopyResponse { copied: true }))
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_engine: state.engines.default_name().to_string(),
        available_engines: state.engines.info(),
        supported_paste_types: SUPPORTED_IMAGE_TYPES.to_vec(),
        max_file_size_bytes: state.config.max_file_size,
        default_modes: CharacterModes::DEFAULT,
        default_preprocess: PreprocessOptions::DEFAULT,
        grid_lines: state.config.grid_lines,
    })
}

/// Collect paste items and toggles from a multipart body.
///
/// Toggle fields are matched by name; any other part that carries a content
/// type or file name is a pasted item, kept in submission order.
async fn read_paste_form(mut multipart: Multipart, max_file_size: usize) -> Result<PasteForm, OcrError> {
    let mut form = PasteForm {
        items: Vec::new(),
        modes: CharacterModes::DEFAULT,
        options: PreprocessOptions::DEFAULT,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| OcrError::InvalidRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if TOGGLE_FIELDS.contains(&name.as_str()) {
            let value = field
                .text()
                .await
                .map_err(|e| OcrError::InvalidRequest(format!("Invalid {}: {}", name, e)))?;
            let enabled = parse_toggle(&name, &value)?;
            match name.as_str() {
                "japanese" => form.modes.japanese = enabled,
                "english" => form.modes.english = enabled,
                "digits" => form.modes.digits = enabled,
                "remove_background_color" => form.options.remove_background_color = enabled,
                _ => form.options.remove_table_grid_lines = enabled,
            }
            continue;
        }

        if field.content_type().is_none() && field.file_name().is_none() {
            // Ignore unknown fields
            continue;
        }

        let mime_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            OcrError::InvalidRequest(format!("Failed to read file data: {}", e))
        })?;

        if data.len() > max_file_size {
            return Err(OcrError::ImageTooLarge {
                size: data.len(),
                max: max_file_size,
            });
        }

        form.items.push(PasteItem::new(mime_type, Some(data)));
    }

    Ok(form)
}

fn parse_toggle(name: &str, value: &str) -> Result<bool, OcrError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        other => Err(OcrError::InvalidRequest(format!(
            "{} must be true or false, got {:?}",
            name, other
        ))),
    }
}

/// Run CPU-bound work on the blocking pool
async fn run_blocking<T, F>(task: F) -> Result<T, OcrError>
where
    F: FnOnce() -> Result<T, OcrError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| OcrError::Internal(format!("Worker task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toggle_accepts_common_spellings() {
        for value in ["true", "1", "on", "YES", " True "] {
            assert!(parse_toggle("digits", value).unwrap(), "{}", value);
        }
        for value in ["false", "0", "off", "no"] {
            assert!(!parse_toggle("digits", value).unwrap(), "{}", value);
        }
    }

    #[test]
    fn test_parse_toggle_rejects_other_values() {
        let err = parse_toggle("digits", "maybe").unwrap_err();
        assert!(matches!(err, OcrError::InvalidRequest(_)));
        assert!(err.to_string().contains("digits"));
    }
}

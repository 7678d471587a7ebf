//! Request handlers.

use axum::{
    body::Bytes,
    extract::{Multipart, Query, State},
    Json,
};
use indexmap::IndexMap;
use lexdoc_core::{
    ingest_upload, persist_upload, truncate_with_ellipsis, upload_basename, DocumentFormat,
    DocumentSummary, QueryAnswer, Transcription,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::recording::RecordingError;
use crate::state::AppState;

const UPLOAD_PREVIEW_CHARS: usize = 500;
const DEFAULT_SPEECH_LANGUAGE: &str = "en-IN";

// ============================================================================
// Service info
// ============================================================================

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Legal Document Assistant",
        "version": env!("CARGO_PKG_VERSION"),
        "features": [
            "Multi-format document extraction",
            "OCR document processing",
            "Document-grounded question answering",
            "Legal domain classification",
            "Legal document drafting",
            "Voice interface"
        ]
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "lexdoc-server",
        "documents": state.store.count().await,
    }))
}

pub async fn features() -> Json<Value> {
    Json(json!({
        "advanced_features": {
            "document_analysis": "Text extraction from PDF, Word, image and text uploads",
            "rag_enhancement": "Answers grounded in uploaded documents",
            "voice_interface": "Speech-to-text questions and live recording",
            "domain_classification": "Keyword based legal domain tagging",
            "document_drafting": "Formal legal documents from a case description",
            "legal_summary_generation": "Summaries, key points and risk levels for legal texts"
        }
    }))
}

// ============================================================================
// Questions
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> ApiResult<Json<QueryAnswer>> {
    let answer = state
        .coordinator
        .ask(&request.query)
        .await
        .map_err(|error| ApiError::failed("Question", error))?;

    Ok(Json(answer))
}

// ============================================================================
// Documents
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ExtractionSummary {
    pub format: DocumentFormat,
    pub strategy: String,
    pub accepted: bool,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub response: String,
    pub filename: String,
    pub extracted_text: String,
    pub rag_status: String,
    pub extraction: ExtractionSummary,
}

/// Saves the raw file, extracts its text on the blocking pool and indexes it.
/// Extraction problems never fail the upload.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let file = read_file_field(multipart, "file").await?;
    let filename =
        upload_basename(&file.filename).map_err(|error| ApiError::BadRequest(error.to_string()))?;
    debug!(filename = %filename, bytes = file.bytes.len(), "processing upload");

    let path = persist_upload(&state.upload_dir, &filename, &file.bytes)
        .await
        .map_err(|error| ApiError::failed("Upload", error))?;

    let pipeline = Arc::clone(&state.pipeline);
    let ingested = tokio::task::spawn_blocking({
        let filename = filename.clone();
        move || ingest_upload(&pipeline, &filename, &file.bytes, &path)
    })
    .await
    .map_err(|error| ApiError::failed("Upload", error))?;

    let extracted_text = truncate_with_ellipsis(&ingested.document.content, UPLOAD_PREVIEW_CHARS);
    state.store.put(ingested.document).await;
    let documents = state.store.count().await;
    info!(filename = %filename, documents, "document stored");

    let message = "Document uploaded and analyzed successfully".to_string();
    Ok(Json(UploadResponse {
        response: message.clone(),
        message,
        rag_status: format!("Document {filename} uploaded and indexed for analysis"),
        filename,
        extracted_text,
        extraction: ExtractionSummary {
            format: ingested.outcome.format,
            strategy: ingested.outcome.strategy,
            accepted: ingested.outcome.accepted,
            diagnostics: ingested.outcome.diagnostics,
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct DocumentListing {
    pub documents: Vec<String>,
    pub count: usize,
    pub details: IndexMap<String, DocumentSummary>,
}

pub async fn list_documents(State(state): State<AppState>) -> Json<DocumentListing> {
    let details: IndexMap<String, DocumentSummary> =
        state.store.list_all().await.into_iter().collect();

    Json(DocumentListing {
        documents: details.keys().cloned().collect(),
        count: details.len(),
        details,
    })
}

// ============================================================================
// Speech
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SpeechQuery {
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_SPEECH_LANGUAGE.to_string()
}

pub async fn speech_to_text(
    State(state): State<AppState>,
    Query(params): Query<SpeechQuery>,
    multipart: Multipart,
) -> ApiResult<Json<Transcription>> {
    let file = read_file_field(multipart, "audio_file").await?;
    let transcription = transcribe_upload(&state, &file, &params.language)
        .await
        .map_err(|error| ApiError::failed("Speech-to-text", error))?;

    Ok(Json(transcription))
}

/// Transcribes an uploaded clip and answers it as a question.
pub async fn voice(State(state): State<AppState>, multipart: Multipart) -> ApiResult<Json<Value>> {
    let file = read_file_field(multipart, "file").await?;
    let fail = |error: String| ApiError::failed("Voice processing", error);

    let transcription = transcribe_upload(&state, &file, &state.speech_language)
        .await
        .map_err(fail)?;

    let text = match transcription.transcription.as_deref() {
        Some(text) if transcription.success => text,
        _ => {
            let error = transcription
                .error
                .unwrap_or_else(|| "Could not understand audio".to_string());
            return Ok(Json(json!({ "success": false, "error": error })));
        }
    };

    let response = state
        .answerer
        .answer(text)
        .await
        .map_err(|error| fail(error.to_string()))?;

    let mut features = transcription.features.clone();
    features.push("Legal context processing".to_string());
    features.push("Multi-modal integration".to_string());

    Ok(Json(json!({
        "success": true,
        "transcribed_text": text,
        "confidence": transcription.confidence,
        "legal_response": response,
        "features": features,
    })))
}

async fn transcribe_upload(
    state: &AppState,
    file: &UploadedFile,
    language: &str,
) -> Result<Transcription, String> {
    let filename = upload_basename(&file.filename).map_err(|error| error.to_string())?;
    persist_upload(&state.upload_dir, &filename, &file.bytes)
        .await
        .map_err(|error| error.to_string())?;

    state
        .speech
        .transcribe(&file.bytes, &filename, language)
        .await
        .map_err(|error| error.to_string())
}

pub async fn speech_languages(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let languages = state
        .speech
        .supported_languages()
        .await
        .map_err(|error| ApiError::failed("Language info", error))?;

    Ok(Json(json!({
        "supported_languages": languages,
        "default_language": state.speech_language,
    })))
}

// ============================================================================
// Live recording
// ============================================================================

pub async fn start_recording(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let status = state
        .recorder
        .start()
        .await
        .map_err(|error| ApiError::failed("Recording start", error))?;

    Ok(Json(json!({
        "success": true,
        "status": "recording",
        "session": status,
    })))
}

pub async fn append_recording(
    State(state): State<AppState>,
    chunk: Bytes,
) -> ApiResult<Json<Value>> {
    let status = state
        .recorder
        .append(&chunk)
        .await
        .map_err(|error| match error {
            RecordingError::AudioTooLarge { .. } => ApiError::PayloadTooLarge(error.to_string()),
            other => ApiError::failed("Recording chunk", other),
        })?;

    Ok(Json(json!({ "success": true, "session": status })))
}

/// Stops the session and checks the transcript slot once, without waiting.
/// A recording that is still being transcribed is reported as pending.
pub async fn stop_recording(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let stopped = state
        .recorder
        .stop()
        .await
        .map_err(|error| ApiError::failed("Recording stop", error))?;

    let (pending, transcription) = if stopped.transcribing {
        match state.recorder.poll().await {
            Some(ready) => (false, json!(ready.transcription)),
            None => (true, json!({ "ready": false })),
        }
    } else {
        (false, json!(Transcription::failed("No audio recorded")))
    };

    Ok(Json(json!({
        "success": true,
        "status": "stopped",
        "session": stopped.status,
        "transcription_pending": pending,
        "transcription": transcription,
    })))
}

pub async fn recording_result(State(state): State<AppState>) -> Json<Value> {
    match state.recorder.poll().await {
        Some(ready) => Json(json!({
            "ready": true,
            "session_id": ready.session_id,
            "transcription": ready.transcription,
        })),
        None => Json(json!({ "ready": false })),
    }
}

// ============================================================================
// Drafting and analysis
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateDocumentRequest {
    pub description: String,
    #[serde(default)]
    pub preferred_type: Option<String>,
}

pub async fn generate_document(
    State(state): State<AppState>,
    Json(request): Json<GenerateDocumentRequest>,
) -> ApiResult<Json<Value>> {
    if request.description.trim().is_empty() {
        return Err(ApiError::BadRequest("description must not be empty".to_string()));
    }

    let content = state
        .drafter
        .draft(&request.description, request.preferred_type.as_deref())
        .await
        .map_err(|error| ApiError::failed("Document generation", error))?;

    Ok(Json(json!({ "content": content })))
}

/// Either `text` or the `filename` of an uploaded document.
#[derive(Debug, Deserialize)]
pub struct AnalyzeDocumentRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

pub async fn analyze_document(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeDocumentRequest>,
) -> ApiResult<Json<Value>> {
    let text = match (request.text, request.filename) {
        (Some(text), _) if !text.trim().is_empty() => text,
        (_, Some(filename)) => state
            .store
            .get(&filename)
            .await
            .map(|document| document.content)
            .ok_or_else(|| ApiError::NotFound(format!("no document named {filename}")))?,
        _ => return Err(ApiError::BadRequest("provide `text` or `filename`".to_string())),
    };

    let analysis = state
        .analyzer
        .analyze(&text)
        .await
        .map_err(|error| ApiError::failed("Analysis", error))?;

    Ok(Json(json!({
        "analysis": analysis,
        "features_used": [
            "Legal summary",
            "Key point extraction",
            "Risk assessment",
            "Domain classification"
        ],
    })))
}

// ============================================================================
// Multipart helpers
// ============================================================================

pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

async fn read_file_field(mut multipart: Multipart, field_name: &str) -> ApiResult<UploadedFile> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest(format!("field `{field_name}` has no filename")))?;
        let bytes = field.bytes().await?;
        return Ok(UploadedFile { filename, bytes });
    }

    Err(ApiError::BadRequest(format!(
        "missing multipart field `{field_name}`"
    )))
}

//! API route definitions.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState, cors: CorsLayer, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/features", get(handlers::features))
        // Documents and questions
        .route("/upload", post(handlers::upload))
        .route("/documents", get(handlers::list_documents))
        .route("/ask", post(handlers::ask))
        // Speech
        .route("/speech-to-text", post(handlers::speech_to_text))
        .route("/voice", post(handlers::voice))
        .route("/start-recording", post(handlers::start_recording))
        .route("/recording/chunk", post(handlers::append_recording))
        .route("/stop-recording", post(handlers::stop_recording))
        .route("/recording/result", get(handlers::recording_result))
        .route("/speech-languages", get(handlers::speech_languages))
        // Drafting and analysis
        .route("/generate-document", post(handlers::generate_document))
        .route("/analyze-document", post(handlers::analyze_document))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn print_routes() {
    tracing::info!("Available API routes:");
    tracing::info!("  GET  /                  - Service information");
    tracing::info!("  GET  /health            - Health check");
    tracing::info!("  GET  /features          - Feature overview");
    tracing::info!("  POST /upload            - Upload and index a document (multipart `file`)");
    tracing::info!("  GET  /documents         - List indexed documents");
    tracing::info!("  POST /ask               - Ask a legal question");
    tracing::info!("  POST /speech-to-text    - Transcribe audio (multipart `audio_file`)");
    tracing::info!("  POST /voice             - Ask a question by voice (multipart `file`)");
    tracing::info!("  POST /start-recording   - Open a live recording session");
    tracing::info!("  POST /recording/chunk   - Append audio to the session");
    tracing::info!("  POST /stop-recording    - Close the session and start transcription");
    tracing::info!("  GET  /recording/result  - Poll for the latest transcription");
    tracing::info!("  GET  /speech-languages  - Supported speech languages");
    tracing::info!("  POST /generate-document - Draft a legal document from a description");
    tracing::info!("  POST /analyze-document  - Summarise a text or an uploaded document");
}

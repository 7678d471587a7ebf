use crate::config::ServerConfig;
use crate::recording::Recorder;
use lexdoc_core::{
    CollaboratorError, ContextAssembler, DocumentAnalyzer, DocumentDrafter, DocumentStore,
    EndpointConfig, ExtractionPipeline, HttpAnswerer, HttpDocumentAnalyzer, HttpDocumentDrafter,
    HttpSpeechRecognizer, LegalAnswerer, QueryCoordinator, SpeechRecognizer,
};
use std::path::PathBuf;
use std::sync::Arc;

/// The external models the server talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub answerer: Arc<dyn LegalAnswerer>,
    pub speech: Arc<dyn SpeechRecognizer>,
    pub drafter: Arc<dyn DocumentDrafter>,
    pub analyzer: Arc<dyn DocumentAnalyzer>,
}

impl Collaborators {
    pub fn from_config(config: &ServerConfig) -> Result<Self, CollaboratorError> {
        let qa = endpoint(
            "QA_ENDPOINT",
            config.qa_endpoint.as_deref(),
            config.qa_api_key.as_deref(),
        )?;
        let speech = endpoint(
            "SPEECH_ENDPOINT",
            config.speech_endpoint.as_deref(),
            config.speech_api_key.as_deref(),
        )?;
        let drafting = endpoint(
            "DRAFTING_ENDPOINT",
            config.drafting_endpoint.as_deref(),
            config.drafting_api_key.as_deref(),
        )?;
        let analysis = endpoint(
            "ANALYSIS_ENDPOINT",
            config.analysis_endpoint.as_deref(),
            config.analysis_api_key.as_deref(),
        )?;

        Ok(Self {
            answerer: Arc::new(HttpAnswerer::new(qa)),
            speech: Arc::new(HttpSpeechRecognizer::new(speech)),
            drafter: Arc::new(HttpDocumentDrafter::new(drafting)),
            analyzer: Arc::new(HttpDocumentAnalyzer::new(analysis)),
        })
    }
}

fn endpoint(
    name: &'static str,
    url: Option<&str>,
    api_key: Option<&str>,
) -> Result<Option<EndpointConfig>, CollaboratorError> {
    let parsed = EndpointConfig::parse(url, api_key)?;
    if parsed.is_none() {
        tracing::warn!(endpoint = name, "collaborator not configured, its routes will fail");
    }
    Ok(parsed)
}

/// Services shared by every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub pipeline: Arc<ExtractionPipeline>,
    pub coordinator: Arc<QueryCoordinator>,
    pub answerer: Arc<dyn LegalAnswerer>,
    pub speech: Arc<dyn SpeechRecognizer>,
    pub drafter: Arc<dyn DocumentDrafter>,
    pub analyzer: Arc<dyn DocumentAnalyzer>,
    pub recorder: Arc<Recorder>,
    pub upload_dir: PathBuf,
    pub speech_language: String,
}

impl AppState {
    /// `max_recording_bytes` caps the audio a live recording may collect.
    pub fn new(
        pipeline: ExtractionPipeline,
        collaborators: Collaborators,
        upload_dir: PathBuf,
        speech_language: &str,
        max_recording_bytes: usize,
    ) -> Self {
        let Collaborators {
            answerer,
            speech,
            drafter,
            analyzer,
        } = collaborators;

        let store = Arc::new(DocumentStore::new());
        let coordinator = QueryCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&answerer),
            ContextAssembler::default(),
        );
        let recorder = Recorder::new(Arc::clone(&speech), speech_language, max_recording_bytes);

        Self {
            store,
            pipeline: Arc::new(pipeline),
            coordinator: Arc::new(coordinator),
            answerer,
            speech,
            drafter,
            analyzer,
            recorder: Arc::new(recorder),
            upload_dir,
            speech_language: speech_language.to_string(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, CollaboratorError> {
        Ok(Self::new(
            ExtractionPipeline::standard(&config.extraction_config()),
            Collaborators::from_config(config)?,
            config.upload_dir.clone(),
            &config.speech_language,
            config.max_body_bytes(),
        ))
    }
}

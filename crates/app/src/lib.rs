pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod recording;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use cors::cors_layer;
pub use error::{ApiError, ApiResult};
pub use recording::{
    Recorder, RecordingError, RecordingStatus, SessionTranscript, StoppedRecording, TranscriptSlot,
};
pub use routes::{create_router, print_routes};
pub use state::{AppState, Collaborators};

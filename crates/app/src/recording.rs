use chrono::{DateTime, Utc};
use lexdoc_core::{SpeechRecognizer, Transcription};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordingError {
    #[error("already recording (session {0})")]
    AlreadyRecording(Uuid),

    #[error("no recording in progress")]
    NotRecording,

    #[error("recording would exceed {limit} bytes")]
    AudioTooLarge { limit: usize },
}

/// A finished transcription and the session it belongs to.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionTranscript {
    pub session_id: Uuid,
    pub transcription: Transcription,
}

/// Single-item handoff from a background transcription task to pollers.
///
/// Publishing replaces an unread result. Polling never waits: `None` means
/// no result is ready yet.
pub struct TranscriptSlot {
    sender: mpsc::Sender<SessionTranscript>,
    receiver: Mutex<mpsc::Receiver<SessionTranscript>>,
}

impl TranscriptSlot {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(1);
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    pub async fn publish(&self, transcript: SessionTranscript) {
        let mut receiver = self.receiver.lock().await;
        while receiver.try_recv().is_ok() {}
        if let Err(error) = self.sender.try_send(transcript) {
            warn!(%error, "transcript slot rejected result");
        }
    }

    pub async fn poll(&self) -> Option<SessionTranscript> {
        self.receiver.lock().await.try_recv().ok()
    }

    /// Drops any unread result.
    pub async fn clear(&self) {
        let mut receiver = self.receiver.lock().await;
        while receiver.try_recv().is_ok() {}
    }
}

impl Default for TranscriptSlot {
    fn default() -> Self {
        Self::new()
    }
}

struct RecordingSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    audio: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordingStatus {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub bytes_recorded: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoppedRecording {
    pub status: RecordingStatus,
    /// False when the session captured no audio.
    pub transcribing: bool,
}

/// Live recording: audio arrives in chunks while a session is open, and
/// stopping hands the whole clip to the speech recognizer in the background.
///
/// Only the most recently stopped session may publish. A slower transcription
/// of an earlier session is discarded when it finishes.
pub struct Recorder {
    session: Mutex<Option<RecordingSession>>,
    awaited: Arc<Mutex<Option<Uuid>>>,
    slot: Arc<TranscriptSlot>,
    recognizer: Arc<dyn SpeechRecognizer>,
    language: String,
    max_audio_bytes: usize,
}

impl Recorder {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        language: impl Into<String>,
        max_audio_bytes: usize,
    ) -> Self {
        Self {
            session: Mutex::new(None),
            awaited: Arc::new(Mutex::new(None)),
            slot: Arc::new(TranscriptSlot::new()),
            recognizer,
            language: language.into(),
            max_audio_bytes,
        }
    }

    pub async fn start(&self) -> Result<RecordingStatus, RecordingError> {
        let mut session = self.session.lock().await;
        if let Some(active) = session.as_ref() {
            return Err(RecordingError::AlreadyRecording(active.id));
        }

        let started = RecordingSession {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            audio: Vec::new(),
        };
        let status = status_of(&started);
        info!(session_id = %started.id, "recording started");
        *session = Some(started);
        Ok(status)
    }

    /// Appends a chunk. A chunk that would push the session past the size
    /// limit is rejected whole and the session keeps its earlier audio.
    pub async fn append(&self, chunk: &[u8]) -> Result<RecordingStatus, RecordingError> {
        let mut session = self.session.lock().await;
        let active = session.as_mut().ok_or(RecordingError::NotRecording)?;
        if active.audio.len().saturating_add(chunk.len()) > self.max_audio_bytes {
            return Err(RecordingError::AudioTooLarge {
                limit: self.max_audio_bytes,
            });
        }
        active.audio.extend_from_slice(chunk);
        Ok(status_of(active))
    }

    /// Closes the session and clears any earlier unread result. Non-empty
    /// audio is transcribed on a spawned task that publishes into the slot.
    pub async fn stop(&self) -> Result<StoppedRecording, RecordingError> {
        let finished = self
            .session
            .lock()
            .await
            .take()
            .ok_or(RecordingError::NotRecording)?;
        let status = status_of(&finished);
        let transcribing = !finished.audio.is_empty();
        info!(
            session_id = %finished.id,
            bytes = finished.audio.len(),
            "recording stopped"
        );

        {
            let mut awaited = self.awaited.lock().await;
            *awaited = transcribing.then_some(finished.id);
            self.slot.clear().await;
        }

        if transcribing {
            let recognizer = Arc::clone(&self.recognizer);
            let awaited = Arc::clone(&self.awaited);
            let slot = Arc::clone(&self.slot);
            let language = self.language.clone();
            let filename = format!("recording-{}.wav", finished.id);

            tokio::spawn(async move {
                let transcription = recognizer
                    .transcribe(&finished.audio, &filename, &language)
                    .await
                    .unwrap_or_else(|error| Transcription::failed(error.to_string()));

                let awaited = awaited.lock().await;
                if *awaited != Some(finished.id) {
                    debug!(session_id = %finished.id, "discarding superseded transcript");
                    return;
                }
                slot.publish(SessionTranscript {
                    session_id: finished.id,
                    transcription,
                })
                .await;
            });
        }

        Ok(StoppedRecording {
            status,
            transcribing,
        })
    }

    pub async fn poll(&self) -> Option<SessionTranscript> {
        self.slot.poll().await
    }
}

fn status_of(session: &RecordingSession) -> RecordingStatus {
    RecordingStatus {
        session_id: session.id,
        started_at: session.started_at,
        bytes_recorded: session.audio.len(),
    }
}

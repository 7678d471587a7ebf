use crate::error::ExtractionError;
use crate::extractor::ExtractionStrategy;
use crate::models::ExtractionConfig;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::time::timeout;
use tracing::debug;

/// Image OCR through the `tesseract` command line engine.
///
/// Image bytes are piped on stdin and the recognised text is read from stdout.
/// The child is killed when the time budget runs out.
///
/// `extract` drives the child on the ambient tokio runtime and must be called
/// from a blocking thread (`spawn_blocking`), never from async code directly.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: String,
    timeout: Duration,
    language: Option<String>,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        let ocr = Self::new(config.ocr_binary.clone(), config.ocr_timeout);
        match &config.ocr_language {
            Some(language) => ocr.with_language(language.clone()),
            None => ocr,
        }
    }

    async fn recognize(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut command = Command::new(&self.binary);
        command.arg("stdin").arg("stdout");
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => ExtractionError::OcrUnavailable(self.binary.clone()),
            _ => ExtractionError::OcrFailed(error.to_string()),
        })?;

        let run = async move {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(bytes).await?;
            }
            child.wait_with_output().await
        };

        let output = match timeout(self.timeout, run).await {
            Ok(output) => output?,
            Err(_) => return Err(ExtractionError::OcrTimeout(self.timeout.as_secs())),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ExtractionError::OcrFailed(format!(
                "{} exited with {}: {stderr}",
                self.binary, output.status
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(chars = text.chars().count(), "OCR processing completed");
        Ok(text)
    }
}

impl ExtractionStrategy for TesseractOcr {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let handle = Handle::try_current()
            .map_err(|error| ExtractionError::OcrFailed(format!("no async runtime: {error}")))?;
        handle.block_on(self.recognize(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes an executable stand-in for tesseract that never answers in time.
    #[cfg(unix)]
    fn stalled_engine(dir: &std::path::Path) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("stalled-tesseract");
        std::fs::write(&path, "#!/bin/sh\nsleep 5\n").expect("write engine script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("make engine executable");
        path.display().to_string()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_engine_reports_unavailable() {
        let ocr = TesseractOcr::new("lexdoc-no-such-ocr-engine", Duration::from_secs(2));

        let result = tokio::task::spawn_blocking(move || ocr.extract(b"\x89PNG\r\n"))
            .await
            .expect("blocking task should join");

        match result {
            Err(error @ ExtractionError::OcrUnavailable(_)) => {
                assert!(error.to_string().contains("not available"));
            }
            other => panic!("expected unavailable engine, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failing_engine_is_an_error_not_a_panic() {
        let ocr = TesseractOcr::new("false", Duration::from_secs(2));

        let result = tokio::task::spawn_blocking(move || ocr.extract(b"\x89PNG\r\n"))
            .await
            .expect("blocking task should join");

        assert!(result.is_err());
    }

    #[test]
    fn extraction_outside_runtime_fails_gracefully() {
        let ocr = TesseractOcr::new("tesseract", Duration::from_secs(1));
        assert!(matches!(
            ocr.extract(b"image"),
            Err(ExtractionError::OcrFailed(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "multi_thread")]
    async fn stalled_engine_is_killed_at_the_time_budget() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ocr = TesseractOcr::new(stalled_engine(dir.path()), Duration::from_secs(1));

        let started = std::time::Instant::now();
        let result = tokio::task::spawn_blocking(move || ocr.extract(b"\x89PNG\r\n"))
            .await
            .expect("blocking task should join");

        match result {
            Err(error @ ExtractionError::OcrTimeout(1)) => {
                assert_eq!(error.to_string(), "OCR processing timed out after 1 seconds");
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}

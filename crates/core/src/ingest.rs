use crate::{Document, ExtractionError, ExtractionOutcome, ExtractionPipeline};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct IngestedUpload {
    pub document: Document,
    pub outcome: ExtractionOutcome,
}

/// Reduces a client supplied name to its final path component.
pub fn upload_basename(filename: &str) -> Result<String, ExtractionError> {
    Path::new(filename.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ExtractionError::MissingFileName(filename.to_string()))
}

/// Writes the raw upload into the flat upload directory, replacing any
/// earlier file of the same name.
pub async fn persist_upload(
    upload_dir: &Path,
    filename: &str,
    bytes: &[u8],
) -> Result<PathBuf, ExtractionError> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let path = upload_dir.join(upload_basename(filename)?);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Runs extraction and builds the document to store. Blocking: call it from
/// a worker thread.
pub fn ingest_upload(
    pipeline: &ExtractionPipeline,
    filename: &str,
    bytes: &[u8],
    source_path: &Path,
) -> IngestedUpload {
    let outcome = pipeline.run(filename, bytes);
    info!(
        filename,
        strategy = %outcome.strategy,
        accepted = outcome.accepted,
        chars = outcome.text.chars().count(),
        "upload ingested"
    );

    let document = Document {
        filename: filename.to_string(),
        content: outcome.text.clone(),
        source_path: source_path.to_string_lossy().to_string(),
        uploaded_at: Utc::now(),
        checksum: digest_bytes(bytes),
        strategy: outcome.strategy.clone(),
    };

    IngestedUpload { document, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::placeholder_text;
    use crate::ExtractionConfig;
    use tempfile::tempdir;

    #[test]
    fn basename_strips_directories() {
        assert_eq!(upload_basename("../../etc/passwd").expect("name"), "passwd");
        assert_eq!(upload_basename("deed.pdf").expect("name"), "deed.pdf");
        assert!(upload_basename("..").is_err());
        assert!(upload_basename("  ").is_err());
    }

    #[test]
    fn checksum_is_reproducible() {
        assert_eq!(digest_bytes(b"abc"), digest_bytes(b"abc"));
        assert_ne!(digest_bytes(b"abc"), digest_bytes(b"abd"));
    }

    #[tokio::test]
    async fn persisted_upload_overwrites_previous_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let upload_dir = dir.path().join("uploads");

        persist_upload(&upload_dir, "a.txt", b"first").await?;
        let path = persist_upload(&upload_dir, "a.txt", b"second").await?;

        assert_eq!(path, upload_dir.join("a.txt"));
        assert_eq!(std::fs::read(&path)?, b"second");
        assert_eq!(std::fs::read_dir(&upload_dir)?.count(), 1);
        Ok(())
    }

    #[test]
    fn unreadable_upload_still_yields_a_document() {
        let pipeline = ExtractionPipeline::standard(&ExtractionConfig::default());

        let ingested = ingest_upload(
            &pipeline,
            "notice.docx",
            b"not a zip",
            Path::new("uploads/notice.docx"),
        );

        assert_eq!(ingested.document.content, placeholder_text("notice.docx"));
        assert_eq!(ingested.document.strategy, "placeholder");
        assert_eq!(ingested.document.source_path, "uploads/notice.docx");
        assert!(!ingested.outcome.accepted);
    }
}

use crate::models::{truncate_with_ellipsis, Document, DocumentSummary};
use indexmap::IndexMap;
use tokio::sync::RwLock;

pub const PREVIEW_CHARS: usize = 200;

/// In-memory index of extracted documents keyed by filename.
///
/// Re-uploading a filename replaces its document in place, keeping the
/// original position in iteration order. Concurrent writes to the same
/// filename are last-write-wins. Nothing is ever evicted.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: RwLock<IndexMap<String, Document>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, document: Document) {
        let mut documents = self.documents.write().await;
        documents.insert(document.filename.clone(), document);
    }

    pub async fn get(&self, filename: &str) -> Option<Document> {
        self.documents.read().await.get(filename).cloned()
    }

    pub async fn list_all(&self) -> Vec<(String, DocumentSummary)> {
        self.documents
            .read()
            .await
            .iter()
            .map(|(filename, document)| (filename.clone(), summarize(document)))
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    pub async fn filenames(&self) -> Vec<String> {
        self.documents.read().await.keys().cloned().collect()
    }

    /// Cloned documents in store order.
    pub async fn snapshot(&self) -> Vec<Document> {
        self.documents.read().await.values().cloned().collect()
    }
}

fn summarize(document: &Document) -> DocumentSummary {
    DocumentSummary {
        uploaded_at: document.uploaded_at,
        content_length: document.content.chars().count(),
        preview: truncate_with_ellipsis(&document.content, PREVIEW_CHARS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn document(filename: &str, content: &str) -> Document {
        Document {
            filename: filename.to_string(),
            content: content.to_string(),
            source_path: format!("uploads/{filename}"),
            uploaded_at: Utc::now(),
            checksum: "checksum".to_string(),
            strategy: "utf8".to_string(),
        }
    }

    #[tokio::test]
    async fn reupload_overwrites_instead_of_appending() {
        let store = DocumentStore::new();
        store.put(document("a.txt", "first payload")).await;
        store.put(document("a.txt", "second payload")).await;

        assert_eq!(store.count().await, 1);
        let stored = store.get("a.txt").await.expect("document stored");
        assert_eq!(stored.content, "second payload");
    }

    #[tokio::test]
    async fn overwrite_keeps_original_position() {
        let store = DocumentStore::new();
        store.put(document("first.txt", "one")).await;
        store.put(document("second.txt", "two")).await;
        store.put(document("first.txt", "one again")).await;

        assert_eq!(store.filenames().await, vec!["first.txt", "second.txt"]);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot[0].content, "one again");
    }

    #[tokio::test]
    async fn missing_filename_is_not_found() {
        let store = DocumentStore::new();
        assert!(store.get("absent.pdf").await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn preview_truncates_only_long_content() {
        let store = DocumentStore::new();
        let long = "x".repeat(250);
        let short = "y".repeat(150);
        store.put(document("long.txt", &long)).await;
        store.put(document("short.txt", &short)).await;

        let listed = store.list_all().await;
        assert_eq!(listed.len(), 2);

        let (name, summary) = &listed[0];
        assert_eq!(name, "long.txt");
        assert_eq!(summary.content_length, 250);
        assert_eq!(summary.preview, format!("{}...", "x".repeat(200)));

        let (name, summary) = &listed[1];
        assert_eq!(name, "short.txt");
        assert_eq!(summary.content_length, 150);
        assert_eq!(summary.preview, short);
    }

    #[tokio::test]
    async fn content_length_counts_characters() {
        let store = DocumentStore::new();
        store.put(document("hindi.txt", "धारा ३०२")).await;

        let listed = store.list_all().await;
        assert_eq!(listed[0].1.content_length, "धारा ३०२".chars().count());
    }
}

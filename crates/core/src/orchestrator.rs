use crate::classifier::classify;
use crate::context::{ContextAssembler, ContextMode};
use crate::traits::LegalAnswerer;
use crate::{CollaboratorError, DocumentStore, LegalDomain};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const CONFIDENCE_SCORE: f64 = 0.95;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryAnalysis {
    pub query: String,
    pub response: String,
    pub legal_domain: LegalDomain,
    pub confidence_score: f64,
    pub sources: Vec<String>,
    pub advanced_features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryAnswer {
    pub response: String,
    pub analysis: QueryAnalysis,
}

/// Answers questions against whatever documents are currently stored.
pub struct QueryCoordinator {
    store: Arc<DocumentStore>,
    answerer: Arc<dyn LegalAnswerer>,
    assembler: ContextAssembler,
}

impl QueryCoordinator {
    pub fn new(
        store: Arc<DocumentStore>,
        answerer: Arc<dyn LegalAnswerer>,
        assembler: ContextAssembler,
    ) -> Self {
        Self {
            store,
            answerer,
            assembler,
        }
    }

    pub async fn ask(&self, query: &str) -> Result<QueryAnswer, CollaboratorError> {
        let documents = self.store.snapshot().await;
        let context = self.assembler.assemble(&documents, query);
        info!(
            documents = context.document_count,
            mode = ?context.mode,
            prompt_chars = context.prompt.chars().count(),
            "question received"
        );

        let response = self.answerer.answer(&context.prompt).await?;
        debug!(response_chars = response.chars().count(), "answer received");

        let with_documents = context.mode == ContextMode::Documents;
        let analysis = QueryAnalysis {
            query: query.to_string(),
            response: response.clone(),
            legal_domain: classify(query),
            confidence_score: CONFIDENCE_SCORE,
            sources: sources(with_documents),
            advanced_features: advanced_features(with_documents),
        };

        Ok(QueryAnswer { response, analysis })
    }
}

fn sources(with_documents: bool) -> Vec<String> {
    let labels: &[&str] = if with_documents {
        &["Uploaded Documents"]
    } else {
        &["Indian Constitution", "IPC", "Civil Laws"]
    };
    labels.iter().map(|label| label.to_string()).collect()
}

fn advanced_features(with_documents: bool) -> Vec<String> {
    let knowledge = if with_documents {
        "RAG from uploaded documents"
    } else {
        "General legal knowledge"
    };
    vec![
        knowledge.to_string(),
        "Document context awareness".to_string(),
        "Multi-domain knowledge".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeAnswerer {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl LegalAnswerer for FakeAnswerer {
        async fn answer(&self, prompt: &str) -> Result<String, CollaboratorError> {
            self.prompts.lock().expect("prompt log").push(prompt.to_string());
            if self.fail {
                return Err(CollaboratorError::BackendResponse {
                    backend: "fake".to_string(),
                    details: "model offline".to_string(),
                });
            }
            Ok("Consult Article 21.".to_string())
        }
    }

    fn coordinator(store: Arc<DocumentStore>, answerer: Arc<FakeAnswerer>) -> QueryCoordinator {
        QueryCoordinator::new(store, answerer, ContextAssembler::default())
    }

    #[tokio::test]
    async fn empty_store_uses_general_knowledge() {
        let answerer = Arc::new(FakeAnswerer::default());
        let coordinator = coordinator(Arc::new(DocumentStore::new()), Arc::clone(&answerer));

        let answer = coordinator
            .ask("Is privacy one of the fundamental rights?")
            .await
            .expect("answer");

        assert_eq!(
            *answerer.prompts.lock().expect("prompt log"),
            vec!["Is privacy one of the fundamental rights?".to_string()]
        );
        assert_eq!(answer.response, "Consult Article 21.");
        assert_eq!(answer.analysis.legal_domain, LegalDomain::Constitutional);
        assert_eq!(
            answer.analysis.sources,
            vec!["Indian Constitution", "IPC", "Civil Laws"]
        );
        assert_eq!(answer.analysis.advanced_features[0], "General legal knowledge");
    }

    #[tokio::test]
    async fn stored_documents_feed_the_prompt() {
        let store = Arc::new(DocumentStore::new());
        store
            .put(Document {
                filename: "fir.txt".to_string(),
                content: "FIR registered under section 379".to_string(),
                source_path: "uploads/fir.txt".to_string(),
                uploaded_at: Utc::now(),
                checksum: String::new(),
                strategy: "utf8".to_string(),
            })
            .await;
        let answerer = Arc::new(FakeAnswerer::default());
        let coordinator = coordinator(store, Arc::clone(&answerer));

        let answer = coordinator.ask("What offence is charged?").await.expect("answer");

        let prompts = answerer.prompts.lock().expect("prompt log");
        assert!(prompts[0]
            .contains("Document: fir.txt\nContent: FIR registered under section 379"));
        assert_eq!(answer.analysis.sources, vec!["Uploaded Documents"]);
        assert_eq!(answer.analysis.confidence_score, CONFIDENCE_SCORE);
        assert_eq!(answer.analysis.legal_domain, LegalDomain::General);
    }

    #[tokio::test]
    async fn answerer_failure_propagates() {
        let answerer = Arc::new(FakeAnswerer {
            fail: true,
            ..Default::default()
        });
        let coordinator = coordinator(Arc::new(DocumentStore::new()), answerer);

        let error = coordinator.ask("anything").await.expect_err("should fail");
        assert!(error.to_string().contains("model offline"));
    }
}

use crate::models::{truncate_with_ellipsis, Document};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct ContextConfig {
    pub max_document_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_document_chars: 2_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    Documents,
    GeneralKnowledge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledContext {
    pub prompt: String,
    pub mode: ContextMode,
    pub document_count: usize,
}

/// Builds the prompt handed to the question answering collaborator.
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    config: ContextConfig,
}

impl ContextAssembler {
    pub fn new(config: ContextConfig) -> Self {
        Self { config }
    }

    /// With no documents the query goes out unchanged. Otherwise each document
    /// contributes one block capped at `max_document_chars` characters.
    pub fn assemble(&self, documents: &[Document], query: &str) -> AssembledContext {
        if documents.is_empty() {
            return AssembledContext {
                prompt: query.to_string(),
                mode: ContextMode::GeneralKnowledge,
                document_count: 0,
            };
        }

        let blocks = documents
            .iter()
            .map(|document| self.document_block(document))
            .collect::<Vec<_>>();

        AssembledContext {
            prompt: render_prompt(query, &blocks.join("\n\n")),
            mode: ContextMode::Documents,
            document_count: documents.len(),
        }
    }

    fn document_block(&self, document: &Document) -> String {
        format!(
            "Document: {}\nContent: {}",
            document.filename,
            truncate_with_ellipsis(&document.content, self.config.max_document_chars)
        )
    }
}

fn render_prompt(query: &str, context: &str) -> String {
    format!(
        "Question: {query}\n\n\
         Context from uploaded documents:\n\n\
         {context}\n\n\
         Please answer the question based on the uploaded documents. \
         If the documents don't contain relevant information, provide general Indian legal guidance."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn document(filename: &str, content: String) -> Document {
        Document {
            filename: filename.to_string(),
            content,
            source_path: format!("uploads/{filename}"),
            uploaded_at: Utc::now(),
            checksum: String::new(),
            strategy: "utf8".to_string(),
        }
    }

    #[test]
    fn empty_store_passes_query_through() {
        let assembled = ContextAssembler::default().assemble(&[], "What is bail?");

        assert_eq!(assembled.prompt, "What is bail?");
        assert_eq!(assembled.mode, ContextMode::GeneralKnowledge);
        assert_eq!(assembled.document_count, 0);
    }

    #[test]
    fn each_document_block_is_capped() {
        let documents = vec![
            document("big.txt", "a".repeat(2_500)),
            document("small.txt", "small lease deed".to_string()),
        ];

        let assembled = ContextAssembler::default().assemble(&documents, "Who is the lessee?");

        assert_eq!(assembled.mode, ContextMode::Documents);
        assert_eq!(assembled.document_count, 2);
        assert!(assembled.prompt.starts_with("Question: Who is the lessee?"));
        assert!(assembled
            .prompt
            .contains(&format!("Document: big.txt\nContent: {}...", "a".repeat(2_000))));
        assert!(!assembled.prompt.contains(&"a".repeat(2_001)));
        assert!(assembled
            .prompt
            .contains("Document: big.txt\nContent: "));
        assert!(assembled
            .prompt
            .contains("...\n\nDocument: small.txt\nContent: small lease deed\n\n"));
        assert!(assembled.prompt.ends_with("general Indian legal guidance."));
    }

    #[test]
    fn blocks_follow_document_order_without_deduplication() {
        let documents = vec![
            document("b.txt", "same clause text".to_string()),
            document("a.txt", "same clause text".to_string()),
        ];

        let prompt = ContextAssembler::new(ContextConfig {
            max_document_chars: 4,
        })
        .assemble(&documents, "q")
        .prompt;

        let first = prompt.find("Document: b.txt").expect("b block");
        let second = prompt.find("Document: a.txt").expect("a block");
        assert!(first < second);
        assert_eq!(prompt.matches("Content: same...").count(), 2);
    }

    #[test]
    fn assembly_is_deterministic() {
        let documents = vec![document("x.txt", "Section 13 of the Hindu Marriage Act".to_string())];
        let assembler = ContextAssembler::default();

        assert_eq!(
            assembler.assemble(&documents, "grounds for divorce"),
            assembler.assemble(&documents, "grounds for divorce")
        );
    }
}

//! Knowledge-base side of the RAG pipeline.
//!
//! Public API:
//! - [`loader`]: read raw text from a local file or a Google Docs export;
//! - [`markdown::text_to_markdown`]: turn section markers into headings;
//! - [`splitter::split`]: heading-aware chunking into [`Fragment`]s;
//! - [`vector_index::VectorIndex`]: embed fragments once, answer top-k queries.

pub mod embedding;
pub mod errors;
pub mod loader;
pub mod markdown;
pub mod splitter;
pub mod structs;
pub mod vector_index;

pub use embedding::{EmbeddingsProvider, HashingEmbedder, LlmEmbedder};
pub use errors::RagBaseError;
pub use loader::{KnowledgeBaseLoader, KnowledgeSource};
pub use structs::fragment::{Fragment, Heading};
pub use structs::rag_base_config::{EmbeddingBackend, RagConfig};
pub use vector_index::{IndexConfig, RetrievedFragment, VectorIndex};

/// Raw document text → fragments (`text_to_markdown` then `split`).
pub fn prepare_fragments(raw: &str) -> Vec<Fragment> {
    splitter::split(&markdown::text_to_markdown(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman_sections_and_emphasis_become_fragments() {
        let raw = "Игорь Волнухин\nI. Опыт\nPM в банке\n*Зарплата*\n2 500 000 тенге\nII. Навыки\nScrum";
        let frags = prepare_fragments(raw);

        assert_eq!(frags.len(), 4);
        assert!(frags[0].headings.is_empty());
        assert_eq!(frags[1].heading_path(), "Опыт");
        assert_eq!(frags[1].body, "Опыт\nPM в банке");
        assert_eq!(frags[2].heading_path(), "Опыт > Зарплата");
        assert_eq!(frags[2].body, "Зарплата\n2 500 000 тенге");
        assert_eq!(frags[3].heading_path(), "Навыки");
    }
}

//! Prompt templates for retrieval-augmented answers

use crate::providers::vector_store::ScoredChunk;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Concatenate retrieved chunk texts into the grounding context
    pub fn build_context(results: &[ScoredChunk]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!("[{}]\n{}\n\n---\n\n", i + 1, result.chunk.content));
        }

        context
    }

    /// Build the question-answering prompt.
    ///
    /// The instruction constrains the model to the supplied context; this
    /// reduces hallucination but does not guarantee grounding.
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Based on the following context, answer the question. Only use information from the context. If the answer is not in the context, say so.

Context:
{context}

Question: {question}

Answer:"#,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkMetadata};

    fn scored(content: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk::new(
                content.to_string(),
                ChunkMetadata::new("alice", "doc-1", "doc.pdf", None),
            ),
            similarity: 0.9,
        }
    }

    #[test]
    fn context_concatenates_chunks_in_order() {
        let context = PromptBuilder::build_context(&[scored("first part"), scored("second part")]);
        let first = context.find("first part").unwrap();
        let second = context.find("second part").unwrap();
        assert!(first < second);
    }

    #[test]
    fn prompt_embeds_question_and_context() {
        let prompt = PromptBuilder::build_qa_prompt("What is it?", "the context body");
        assert!(prompt.contains("What is it?"));
        assert!(prompt.contains("the context body"));
        assert!(prompt.contains("Only use information from the context"));
    }
}

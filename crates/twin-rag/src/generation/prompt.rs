//! Prompt templates for twin answers

/// Project description used when retrieval found nothing
pub const FALLBACK_CONTEXT: &str = "Green Hill Canarias is a sustainable development project \
focused on environmental conservation and renewable energy solutions in the Canary Islands.";

/// Prompt builder for twin queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved documents with newlines, falling back to the project
    /// description when the result is blank
    pub fn build_context(docs: &[String]) -> String {
        let context = docs.join("\n");
        if context.trim().is_empty() {
            FALLBACK_CONTEXT.to_string()
        } else {
            context
        }
    }

    /// User prompt for a grounded answer
    pub fn build_twin_prompt(context: &str, question: &str) -> String {
        format!(
            r#"Based on the following context, answer the user's question accurately and helpfully.

Context:
{context}

Question: {question}

Please provide a clear, informative answer based on the available information. If the context doesn't contain enough information to fully answer the question, acknowledge this and provide what relevant information you can."#,
            context = context,
            question = question,
        )
    }

    /// User prompt when answering without retrieval
    pub fn build_direct_prompt(question: &str) -> String {
        format!(
            r#"Question: {question}

Answer from what you know about the project. If you are not certain, say so rather than guessing."#,
            question = question,
        )
    }
}

//! Answer composition: build a grounded prompt from ranked chunks, call the
//! generative provider once, and normalize the output.
//!
//! This stage is optional enrichment. A missing provider or an upstream
//! failure degrades to a fixed message; it never aborts the response, so
//! retrieval results still reach the caller.

use std::fmt::Write;

use crate::llm::GenerativeClient;
use crate::models::RankedResult;

/// Returned when there is no usable context or no configured provider.
pub const NO_CONTEXT_ANSWER: &str =
    "No relevant information was found for this question. Try rephrasing it, \
     or ask about something covered by the uploaded reference material.";

/// Returned when the provider call fails mid-request.
pub const DEGRADED_ANSWER: &str =
    "The answer service is temporarily unavailable. The most relevant passages \
     are included in the results below.";

/// Compose an answer for `query` grounded in `context` (already ranked).
pub async fn compose(
    generator: &GenerativeClient,
    query: &str,
    context: &[RankedResult],
) -> String {
    if context.is_empty() || !generator.is_configured() {
        return NO_CONTEXT_ANSWER.to_string();
    }

    let prompt = build_prompt(query, &build_context_block(context));
    match generator.generate(&prompt).await {
        Ok(raw) => normalize_answer(&raw),
        Err(e) => {
            tracing::warn!("answer generation failed: {e}");
            DEGRADED_ANSWER.to_string()
        }
    }
}

/// Concatenate titles and texts in ranked order, separated by blank lines.
pub fn build_context_block(results: &[RankedResult]) -> String {
    let mut block = String::new();
    for result in results {
        let _ = writeln!(block, "{}", result.title);
        let _ = writeln!(block, "{}", result.text);
        block.push('\n');
    }
    block
}

/// Instruct the model to answer strictly from the supplied context.
pub fn build_prompt(query: &str, context_block: &str) -> String {
    format!(
        "You are answering questions about uploaded reference material.\n\
         Answer using ONLY the context below. Do not use outside knowledge.\n\
         Be concise: one or two sentences.\n\
         If the context does not contain the answer, say so plainly.\n\n\
         Context:\n{context_block}\n\
         Question: {query}"
    )
}

/// Cosmetic cleanup of model output: drop heading markers, emphasis markers,
/// and surrounding whitespace. Must not alter factual content.
pub fn normalize_answer(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for line in raw.lines() {
        let line = if line.trim_start().starts_with('#') {
            line.trim_start().trim_start_matches('#').trim_start()
        } else {
            line
        };
        out.push_str(line);
        out.push('\n');
    }

    out.replace("**", "")
        .replace("__", "")
        .replace('*', "")
        .replace('`', "")
        .trim()
        .to_string()
}

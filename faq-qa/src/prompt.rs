//! Prompt template for FAQ answers.

use faq_store::FaqHit;

/// Fixed template; `{context}` and `{question}` are substituted by [`render_prompt`].
pub const PROMPT_TEMPLATE: &str = "You are a helpful assistant. Use the following context to answer the question.

Context:
{context}

Question:
{question}

Answer in full, precise sentences.";

/// Renders retrieved FAQs as `Q:`/`A:` blocks separated by a blank line, nearest first.
///
/// # Example
/// ```
/// # use faq_qa::prompt::format_context;
/// assert_eq!(format_context(&[]), "");
/// ```
pub fn format_context(hits: &[FaqHit]) -> String {
    hits.iter()
        .map(|h| format!("Q: {}\nA: {}", h.record.question, h.record.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Substitutes both placeholders in one pass so text inside `context` is never
/// re-interpreted as a placeholder.
pub fn render_prompt(context: &str, question: &str) -> String {
    let mut out = String::with_capacity(PROMPT_TEMPLATE.len() + context.len() + question.len());
    let mut rest = PROMPT_TEMPLATE;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{context}") {
            out.push_str(context);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{question}") {
            out.push_str(question);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

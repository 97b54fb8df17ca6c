// src/prompt/template.rs — Prompt template variants
//
// Every `format_*` call returns a (training, metadata) pair: the training
// turn is what a fine-tuning dataset sees, the metadata turn is what
// evaluation and conversation history keep.

use serde_json::{json, Value};

use super::extract::extract_json;
use super::types::{ExtractedResponse, Fact, Turn};
use crate::util::preview;

/// Capability set shared by all template variants.
pub trait PromptTemplate: Send + Sync {
    fn name(&self) -> &'static str;

    /// System prompt used when none is configured.
    fn default_system_prompt(&self) -> &'static str;

    fn format_question(&self, question: &str) -> String {
        question.trim().to_string()
    }

    fn format_facts(&self, _facts: &[Fact]) -> String {
        String::new()
    }

    fn format_citations(&self, _citations: Option<Value>) -> Option<Value> {
        None
    }

    fn format_user(&self, question: &str, _facts: &[Fact]) -> (Turn, Turn) {
        let question = self.format_question(question);
        (Turn::user(question.clone()), Turn::user(question))
    }

    fn format_assistant(&self, content: &str, _citations: Option<Value>) -> (Turn, Turn) {
        (Turn::assistant(content), Turn::assistant(content))
    }

    fn extract_response(&self, raw: &str) -> ExtractedResponse {
        ExtractedResponse::verbatim(raw)
    }
}

/// Render `header` followed by one `[i] title` line per fact, numbered from 1.
pub fn render_facts(header: &str, facts: &[Fact]) -> String {
    let mut lines = Vec::with_capacity(facts.len() + 1);
    lines.push(header.to_string());
    for (i, fact) in facts.iter().enumerate() {
        lines.push(format!("[{}] {}", i + 1, fact.title));
    }
    lines.join("\n")
}

// ─── Base ───────────────────────────────────────────────────────

/// Question in, answer out. No facts, no citations.
#[derive(Debug, Clone, Default)]
pub struct Base;

impl PromptTemplate for Base {
    fn name(&self) -> &'static str {
        "base"
    }

    fn default_system_prompt(&self) -> &'static str {
        "You are a helpful assistant. Answer the user's question directly and concisely."
    }
}

// ─── Context ────────────────────────────────────────────────────

/// Appends a numbered facts block to the question.
#[derive(Debug, Clone)]
pub struct Context {
    facts_header: String,
}

impl Context {
    pub fn new() -> Self {
        Self {
            facts_header: "Facts:".into(),
        }
    }

    pub fn with_facts_header(mut self, header: impl Into<String>) -> Self {
        self.facts_header = header.into();
        self
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptTemplate for Context {
    fn name(&self) -> &'static str {
        "context"
    }

    fn default_system_prompt(&self) -> &'static str {
        "You are a helpful assistant. Answer the user's question using the numbered facts \
         that follow it. If the facts do not contain the answer, say so."
    }

    fn format_facts(&self, facts: &[Fact]) -> String {
        render_facts(&self.facts_header, facts)
    }

    fn format_user(&self, question: &str, facts: &[Fact]) -> (Turn, Turn) {
        let question = self.format_question(question);
        let block = self.format_facts(facts);

        let training = Turn::user(format!("{question}\n{block}").trim());
        let metadata = Turn::user(question).with_context(json!(facts));
        (training, metadata)
    }
}

// ─── ContextCitations ───────────────────────────────────────────

/// Facts in, JSON `{answer, citations}` out.
#[derive(Debug, Clone)]
pub struct ContextCitations {
    facts_header: String,
    question_label: String,
}

impl ContextCitations {
    pub fn new() -> Self {
        Self {
            facts_header: "Facts:".into(),
            question_label: "Question:".into(),
        }
    }

    pub fn with_facts_header(mut self, header: impl Into<String>) -> Self {
        self.facts_header = header.into();
        self
    }

    pub fn with_question_label(mut self, label: impl Into<String>) -> Self {
        self.question_label = label.into();
        self
    }
}

impl Default for ContextCitations {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptTemplate for ContextCitations {
    fn name(&self) -> &'static str {
        "contextcitations"
    }

    fn default_system_prompt(&self) -> &'static str {
        "You are a helpful assistant. Answer the user's question using the numbered facts \
         that follow it. Reply with a single JSON object of the form \
         {\"answer\": \"...\", \"citations\": [...]}, where citations lists the facts \
         the answer relies on."
    }

    fn format_facts(&self, facts: &[Fact]) -> String {
        render_facts(&self.facts_header, facts)
    }

    fn format_citations(&self, citations: Option<Value>) -> Option<Value> {
        citations
    }

    fn format_user(&self, question: &str, facts: &[Fact]) -> (Turn, Turn) {
        let question = self.format_question(question);
        let block = self.format_facts(facts);

        // Stored as a JSON string, not an array, so history stays flat.
        let context: Vec<Value> = facts
            .iter()
            .map(|f| json!({"fid": f.id, "text": f.title}))
            .collect();
        let context = Value::Array(context).to_string();

        let training = Turn::user(format!("{}\n{question}\n{block}", self.question_label).trim());
        let metadata = Turn::user(question).with_context(Value::String(context));
        (training, metadata)
    }

    fn format_assistant(&self, content: &str, citations: Option<Value>) -> (Turn, Turn) {
        let citations = self.format_citations(citations);

        let structured = json!({"answer": content, "citations": citations});
        let training = Turn::assistant(structured.to_string());
        let metadata = Turn::assistant(content).with_llm_citations(citations);
        (training, metadata)
    }

    fn extract_response(&self, raw: &str) -> ExtractedResponse {
        match extract_json(raw) {
            Ok(obj) => {
                let citations = obj
                    .get("citations")
                    .cloned()
                    .unwrap_or_else(|| Value::Array(Vec::new()));
                // No answer key: the object itself is the answer.
                let answer = obj
                    .get("answer")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(obj.clone()));
                ExtractedResponse {
                    answer,
                    citations: Some(citations),
                    raw_text: raw.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!("{e}; using raw reply as answer: {}", preview(raw, 120));
                ExtractedResponse::unparsed(raw)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn facts() -> Vec<Fact> {
        vec![
            Fact::new("f1", "The Eiffel Tower is in Paris."),
            Fact::new("f2", "It was completed in 1889."),
        ]
    }

    // ─── Base ───────────────────────────────────────────────────

    #[test]
    fn test_base_user_trims_and_ignores_facts() {
        let (training, metadata) = Base.format_user("  Where is it?\n", &facts());
        assert_eq!(training, Turn::user("Where is it?"));
        assert_eq!(metadata, Turn::user("Where is it?"));
    }

    #[test]
    fn test_base_assistant_drops_citations() {
        let (training, metadata) = Base.format_assistant("Paris", Some(json!(["f1"])));
        assert_eq!(training, Turn::assistant("Paris"));
        assert!(!metadata.has_side_channel());
    }

    #[test]
    fn test_base_extract_is_verbatim() {
        let r = Base.extract_response("{\"answer\": \"x\"}");
        assert_eq!(r.answer, json!("{\"answer\": \"x\"}"));
        assert!(r.citations.is_none());
    }

    #[test]
    fn test_base_facts_and_citations_are_empty() {
        assert_eq!(Base.format_facts(&facts()), "");
        assert!(Base.format_citations(Some(json!([1]))).is_none());
    }

    // ─── render_facts / Context ─────────────────────────────────

    #[test]
    fn test_render_facts_numbering() {
        assert_eq!(
            render_facts("Facts:", &facts()),
            "Facts:\n[1] The Eiffel Tower is in Paris.\n[2] It was completed in 1889."
        );
    }

    #[test]
    fn test_render_facts_empty() {
        assert_eq!(render_facts("Facts:", &[]), "Facts:");
    }

    #[test]
    fn test_context_user() {
        let (training, metadata) = Context::new().format_user("When was it built? ", &facts());
        assert_eq!(
            training.text(),
            "When was it built?\nFacts:\n[1] The Eiffel Tower is in Paris.\n[2] It was completed in 1889."
        );
        assert_eq!(metadata.text(), "When was it built?");
        assert_eq!(
            metadata.context,
            Some(json!([
                {"id": "f1", "title": "The Eiffel Tower is in Paris."},
                {"id": "f2", "title": "It was completed in 1889."}
            ]))
        );
        assert!(training.context.is_none());
    }

    #[test]
    fn test_context_custom_header() {
        let t = Context::new().with_facts_header("ข้อเท็จจริง:");
        let (training, _) = t.format_user("q", &facts()[..1]);
        assert_eq!(training.text(), "q\nข้อเท็จจริง:\n[1] The Eiffel Tower is in Paris.");
    }

    #[test]
    fn test_context_assistant_like_base() {
        let (training, metadata) = Context::new().format_assistant("1889", Some(json!(["f2"])));
        assert_eq!(training, Turn::assistant("1889"));
        assert_eq!(metadata, Turn::assistant("1889"));
    }

    // ─── ContextCitations ───────────────────────────────────────

    #[test]
    fn test_citations_user() {
        let t = ContextCitations::new();
        let (training, metadata) = t.format_user("Where is it?", &facts());
        assert_eq!(
            training.text(),
            "Question:\nWhere is it?\nFacts:\n[1] The Eiffel Tower is in Paris.\n[2] It was completed in 1889."
        );
        assert_eq!(metadata.text(), "Where is it?");
        let context = metadata.context.unwrap();
        let context: Value = serde_json::from_str(context.as_str().unwrap()).unwrap();
        assert_eq!(
            context,
            json!([
                {"fid": "f1", "text": "The Eiffel Tower is in Paris."},
                {"fid": "f2", "text": "It was completed in 1889."}
            ])
        );
    }

    #[test]
    fn test_citations_context_keeps_non_ascii() {
        let t = ContextCitations::new().with_question_label("คำถาม:");
        let (training, metadata) = t.format_user("อะไร", &[Fact::new(1, "กรุงเทพ")]);
        assert!(training.text().starts_with("คำถาม:\nอะไร\n"));
        assert_eq!(
            metadata.context,
            Some(json!("[{\"fid\":1,\"text\":\"กรุงเทพ\"}]"))
        );
    }

    #[test]
    fn test_citations_assistant() {
        let (training, metadata) =
            ContextCitations::new().format_assistant("42", Some(json!(["f1"])));
        let parsed: Value = serde_json::from_str(training.text()).unwrap();
        assert_eq!(parsed, json!({"answer": "42", "citations": ["f1"]}));
        assert_eq!(metadata.text(), "42");
        assert_eq!(metadata.llm_citations, Some(json!(["f1"])));
    }

    #[test]
    fn test_citations_assistant_without_citations() {
        let (training, metadata) = ContextCitations::new().format_assistant("42", None);
        let parsed: Value = serde_json::from_str(training.text()).unwrap();
        assert_eq!(parsed, json!({"answer": "42", "citations": null}));
        assert!(metadata.llm_citations.is_none());
    }

    #[test]
    fn test_citations_extract_structured() {
        let r = ContextCitations::new()
            .extract_response("Answer:\n```json\n{\"answer\": \"Paris\", \"citations\": [\"f1\"]}\n```");
        assert_eq!(r.answer, json!("Paris"));
        assert_eq!(r.citations, Some(json!(["f1"])));
        assert!(r.raw_text.starts_with("Answer:"));
    }

    #[test]
    fn test_citations_extract_missing_fields() {
        let r = ContextCitations::new().extract_response("{\"result\": \"Paris\"}");
        assert_eq!(r.answer, json!({"result": "Paris"}));
        assert_eq!(r.citations, Some(json!([])));

        let r = ContextCitations::new().extract_response("{\"answer\": \"Paris\"}");
        assert_eq!(r.answer, json!("Paris"));
        assert_eq!(r.citations, Some(json!([])));
    }

    #[test]
    fn test_citations_extract_fallback() {
        for raw in ["", "plain words", "{\"answer\": ", "}{", "```\n```"] {
            let r = ContextCitations::new().extract_response(raw);
            assert_eq!(r.answer, json!(raw));
            assert_eq!(r.citations, Some(json!([])));
            assert_eq!(r.raw_text, raw);
        }
    }
}

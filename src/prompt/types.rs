// src/prompt/types.rs — Conversation turns, facts, and extracted responses

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a conversation.
///
/// Training turns only ever set `role` and `content`. Metadata turns may also
/// carry `context` (the facts shown to the model) or `llm_citations` for
/// evaluation and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    /// Absent only for a system turn seeded without a prompt.
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_citations: Option<Value>,
}

impl Turn {
    fn new(role: Role, content: Option<String>) -> Self {
        Self {
            role,
            content,
            context: None,
            llm_citations: None,
        }
    }

    pub fn system(content: Option<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, Some(content.into()))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, Some(content.into()))
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_llm_citations(mut self, citations: Option<Value>) -> Self {
        self.llm_citations = citations;
        self
    }

    /// Content as text; an absent system prompt reads as empty.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Whether the turn carries any evaluation-only field.
    pub fn has_side_channel(&self) -> bool {
        self.context.is_some() || self.llm_citations.is_some()
    }
}

/// A supporting snippet supplied to the model. Fields beyond `id` and
/// `title` are kept as-is so metadata records round-trip the caller's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub id: Value,
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Fact {
    pub fn new(id: impl Into<Value>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            extra: Map::new(),
        }
    }
}

/// Structured view of a model reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedResponse {
    pub answer: Value,
    pub citations: Option<Value>,
    /// The model output exactly as received.
    #[serde(rename = "llm_response", alias = "raw_text")]
    pub raw_text: String,
}

impl ExtractedResponse {
    /// The reply taken verbatim as the answer, with no citations.
    pub fn verbatim(raw: &str) -> Self {
        Self {
            answer: Value::String(raw.to_string()),
            citations: None,
            raw_text: raw.to_string(),
        }
    }

    /// Fallback record used when a structured reply cannot be recovered.
    pub fn unparsed(raw: &str) -> Self {
        Self {
            citations: Some(Value::Array(Vec::new())),
            ..Self::verbatim(raw)
        }
    }

    /// The answer as plain text, suitable for `format_assistant`.
    pub fn answer_text(&self) -> String {
        match &self.answer {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

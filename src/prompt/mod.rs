// src/prompt/mod.rs — Prompt/response formatting for SFT datasets and eval logs

pub mod extract;
pub mod parity;
pub mod template;
pub mod types;

pub use parity::check_parity;
pub use template::{Base, Context, ContextCitations, PromptTemplate};
pub use types::{ExtractedResponse, Fact, Role, Turn};

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::infra::config::TemplateConfig;
use crate::infra::errors::{RagEvalError, Result};

/// The recognized template names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Base,
    Context,
    ContextCitations,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [Self::Base, Self::Context, Self::ContextCitations];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Context => "context",
            Self::ContextCitations => "contextcitations",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = RagEvalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| RagEvalError::UnknownTemplate(s.to_string()))
    }
}

/// Template selected by name, plus the system prompt that goes with it.
pub struct FormatPrompt {
    kind: TemplateKind,
    template: Box<dyn PromptTemplate>,
    system_prompt: Option<String>,
}

impl FormatPrompt {
    /// Select a template by name. Unknown names are an error, never a default.
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self::from_kind(name.parse()?))
    }

    pub fn from_kind(kind: TemplateKind) -> Self {
        let template: Box<dyn PromptTemplate> = match kind {
            TemplateKind::Base => Box::new(Base),
            TemplateKind::Context => Box::new(Context::new()),
            TemplateKind::ContextCitations => Box::new(ContextCitations::new()),
        };
        Self {
            kind,
            template,
            system_prompt: None,
        }
    }

    /// Build from the `[template]` config section, applying labels and prompt.
    pub fn from_config(config: &TemplateConfig) -> Result<Self> {
        let kind: TemplateKind = config.name.parse()?;
        let template: Box<dyn PromptTemplate> = match kind {
            TemplateKind::Base => Box::new(Base),
            TemplateKind::Context => {
                Box::new(Context::new().with_facts_header(config.facts_header.as_str()))
            }
            TemplateKind::ContextCitations => Box::new(
                ContextCitations::new()
                    .with_facts_header(config.facts_header.as_str())
                    .with_question_label(config.question_label.as_str()),
            ),
        };
        Ok(Self {
            kind,
            template,
            system_prompt: config.system_prompt.clone(),
        })
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn template(&self) -> &dyn PromptTemplate {
        self.template.as_ref()
    }

    /// (training, metadata) user turns.
    pub fn format_user(&self, question: &str, facts: &[Fact]) -> (Turn, Turn) {
        self.template.format_user(question, facts)
    }

    /// (training, metadata) assistant turns.
    pub fn format_assistant(&self, answer: &str, citations: Option<Value>) -> (Turn, Turn) {
        self.template.format_assistant(answer, citations)
    }

    /// Never fails; unparseable replies come back as the raw text.
    pub fn extract_response(&self, raw: &str) -> ExtractedResponse {
        self.template.extract_response(raw)
    }

    /// Configured system prompt, or the template's built-in one.
    pub fn get_system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or_else(|| self.template.default_system_prompt())
    }
}

impl fmt::Debug for FormatPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatPrompt")
            .field("kind", &self.kind)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

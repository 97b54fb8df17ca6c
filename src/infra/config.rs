// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::{RagEvalError, Result};
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub dialogue: DialogueConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// One of `base`, `context`, `contextcitations`.
    #[serde(default = "default_template_name")]
    pub name: String,
    /// Overrides the template's built-in system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Line placed above the question by the citations template.
    #[serde(default = "default_question_label")]
    pub question_label: String,
    #[serde(default = "default_facts_header")]
    pub facts_header: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            name: default_template_name(),
            system_prompt: None,
            question_label: default_question_label(),
            facts_header: default_facts_header(),
        }
    }
}

fn default_template_name() -> String {
    "contextcitations".into()
}

fn default_question_label() -> String {
    "Question:".into()
}

fn default_facts_header() -> String {
    "Facts:".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_cutoffs")]
    pub cutoffs: Vec<usize>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            cutoffs: default_cutoffs(),
        }
    }
}

fn default_cutoffs() -> Vec<usize> {
    vec![1, 3, 5, 10]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// Where `rageval format --log` writes when no path is given.
    pub log_path: Option<String>,
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| RagEvalError::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }
}

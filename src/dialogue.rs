// src/dialogue.rs — Conversation log with optional file mirror
//
// Every mutation rewrites the whole file. There is no locking and no atomic
// replace: one writer per file.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::infra::errors::{RagEvalError, Result};
use crate::prompt::{Role, Turn};

/// Ordered turns for one session, always starting with a single system turn.
#[derive(Debug, Clone)]
pub struct DialogueManager {
    path: Option<PathBuf>,
    system_prompt: Option<String>,
    data: Vec<Turn>,
}

impl DialogueManager {
    /// Seed a log with one system turn. Nothing is written until the first
    /// `add` or `reset`.
    pub fn new(system_prompt: Option<String>, log_path: Option<PathBuf>) -> Self {
        Self {
            path: log_path,
            data: vec![Turn::system(system_prompt.clone())],
            system_prompt,
        }
    }

    /// Resume a log previously written by [`DialogueManager::save`].
    ///
    /// Later mutations write back to the same file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let data: Vec<Turn> = serde_json::from_str(&content)?;

        let system_prompt = match data.first() {
            Some(first) if first.role == Role::System => first.content.clone(),
            Some(first) => {
                return Err(RagEvalError::InvalidLog(format!(
                    "{} starts with a {} turn",
                    path.display(),
                    first.role
                )))
            }
            None => {
                return Err(RagEvalError::InvalidLog(format!(
                    "{} is empty",
                    path.display()
                )))
            }
        };
        if let Some(pos) = data.iter().skip(1).position(|t| t.role == Role::System) {
            return Err(RagEvalError::InvalidLog(format!(
                "{} has a second system turn at index {}",
                path.display(),
                pos + 1
            )));
        }

        tracing::debug!(path = %path.display(), turns = data.len(), "conversation log loaded");
        Ok(Self {
            path: Some(path.to_path_buf()),
            system_prompt,
            data,
        })
    }

    /// Independent copy of the turns.
    pub fn data(&self) -> Vec<Turn> {
        self.data.clone()
    }

    /// Append turns in order, then persist.
    ///
    /// The log holds exactly one system turn, so a batch containing another
    /// is rejected whole and nothing is appended.
    pub fn add(&mut self, turns: impl IntoIterator<Item = Turn>) -> Result<()> {
        let turns: Vec<Turn> = turns.into_iter().collect();
        if turns.iter().any(|t| t.role == Role::System) {
            return Err(RagEvalError::InvalidLog(
                "system turns can only be set through the system prompt".into(),
            ));
        }
        self.data.extend(turns);
        self.save()
    }

    /// Back to the single system turn, then persist.
    pub fn reset(&mut self) -> Result<()> {
        self.data = vec![Turn::system(self.system_prompt.clone())];
        self.save()
    }

    /// Overwrite the backing file with the full sequence, if one is set.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.data.serialize(&mut ser)?;
        std::fs::write(path, buf)?;

        tracing::debug!(path = %path.display(), turns = self.data.len(), "conversation log saved");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when nothing follows the system turn.
    pub fn has_only_system_turn(&self) -> bool {
        self.data.len() <= 1
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }
}

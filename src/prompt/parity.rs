// src/prompt/parity.rs — Training/metadata consistency check

use serde_json::Value;

use super::types::{Role, Turn};
use crate::infra::errors::{RagEvalError, Result};

/// Verify that a training turn and its metadata twin say the same thing.
///
/// - roles must match
/// - user: the training content contains the metadata question
/// - assistant: the training content is the answer, or a JSON object whose
///   `answer` is the answer
/// - system: contents are equal
pub fn check_parity(training: &Turn, metadata: &Turn) -> Result<()> {
    if training.role != metadata.role {
        return Err(mismatch(
            metadata.role,
            format!("role {} vs {}", training.role, metadata.role),
        ));
    }

    let train = training.text();
    let meta = metadata.text();

    let consistent = match metadata.role {
        Role::User => train.contains(meta),
        Role::Assistant => train == meta || structured_answer(train).as_deref() == Some(meta),
        Role::System => train == meta,
    };

    if consistent {
        Ok(())
    } else {
        Err(mismatch(
            metadata.role,
            format!("training content does not carry {meta:?}"),
        ))
    }
}

fn structured_answer(text: &str) -> Option<String> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(mut obj) => match obj.remove("answer")? {
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        },
        _ => None,
    }
}

fn mismatch(role: Role, detail: String) -> RagEvalError {
    RagEvalError::ParityMismatch {
        role: role.to_string(),
        detail,
    }
}

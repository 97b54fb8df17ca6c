// src/cli/dialogue.rs — Conversation log maintenance

use super::DialogueAction;
use crate::dialogue::DialogueManager;
use crate::infra::paths;

pub fn run_dialogue(action: DialogueAction) -> anyhow::Result<()> {
    match action {
        DialogueAction::Show { log } => {
            let path = paths::resolve_log_path(&log);
            let dialogue = DialogueManager::load(&path)?;
            println!("{}", serde_json::to_string_pretty(&dialogue.data())?);
        }
        DialogueAction::Reset { log, system } => {
            let path = paths::resolve_log_path(&log);
            let mut dialogue = match system {
                Some(prompt) => {
                    paths::ensure_parent(&path)?;
                    DialogueManager::new(Some(prompt), Some(path))
                }
                None if path.exists() => DialogueManager::load(&path)?,
                None => anyhow::bail!(
                    "No conversation log at {}. Pass --system to create one.",
                    path.display()
                ),
            };
            dialogue.reset()?;
            println!("Reset {}", log);
        }
    }
    Ok(())
}

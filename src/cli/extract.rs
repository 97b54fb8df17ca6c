// src/cli/extract.rs — Structured extraction of a raw model reply

use std::io::Read;

use crate::infra::config::Config;
use crate::prompt::FormatPrompt;

pub fn run_extract(
    file: Option<&str>,
    template: Option<&str>,
    config: &Config,
) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let prompt = select_template(template, config)?;
    let record = prompt.extract_response(&raw);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// An explicit `--template` keeps the configured labels and prompt but swaps
/// the variant.
pub(crate) fn select_template(
    template: Option<&str>,
    config: &Config,
) -> anyhow::Result<FormatPrompt> {
    let mut section = config.template.clone();
    if let Some(name) = template {
        section.name = name.to_string();
    }
    Ok(FormatPrompt::from_config(&section)?)
}

// src/cli/format.rs — Turn formatting for SFT datasets and eval logs

use anyhow::Context;
use serde_json::{json, Value};

use super::extract::select_template;
use crate::dialogue::DialogueManager;
use crate::infra::config::Config;
use crate::infra::paths;
use crate::prompt::{check_parity, Fact, FormatPrompt, Turn};

pub struct FormatArgs<'a> {
    pub question: &'a str,
    pub facts: Option<&'a str>,
    pub answer: Option<&'a str>,
    pub citations: Option<Vec<String>>,
    pub template: Option<&'a str>,
    pub log: Option<&'a str>,
}

pub fn run_format(args: FormatArgs<'_>, config: &Config) -> anyhow::Result<()> {
    let prompt = select_template(args.template, config)?;

    let facts = match args.facts {
        Some(path) => load_facts(path)?,
        None => Vec::new(),
    };
    let citations = args
        .citations
        .map(|ids| Value::Array(ids.into_iter().map(Value::String).collect()));

    let (record, history) =
        build_record(&prompt, args.question, &facts, args.answer, citations)?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    let log = args.log.or(config.dialogue.log_path.as_deref());
    if let Some(raw) = log {
        let path = paths::resolve_log_path(raw);
        paths::ensure_parent(&path)?;
        let mut dialogue = if path.exists() {
            DialogueManager::load(&path)?
        } else {
            DialogueManager::new(Some(prompt.get_system_prompt().to_string()), Some(path))
        };
        dialogue.add(history)?;
        tracing::info!(turns = dialogue.len(), "conversation log updated");
    }

    Ok(())
}

/// Read a JSON array of facts.
pub fn load_facts(path: &str) -> anyhow::Result<Vec<Fact>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Cannot read facts from {path}"))?;
    let facts: Vec<Fact> = serde_json::from_str(&content)
        .with_context(|| format!("{path} must be a JSON array of {{id, title}} objects"))?;
    Ok(facts)
}

/// The printable record plus the metadata turns destined for history.
pub fn build_record(
    prompt: &FormatPrompt,
    question: &str,
    facts: &[Fact],
    answer: Option<&str>,
    citations: Option<Value>,
) -> anyhow::Result<(Value, Vec<Turn>)> {
    let (user_training, user_meta) = prompt.format_user(question, facts);
    check_parity(&user_training, &user_meta)?;

    let mut record = json!({
        "template": prompt.kind().as_str(),
        "system": prompt.get_system_prompt(),
        "user": {"training": user_training, "metadata": user_meta},
    });
    let mut history = vec![user_meta];

    if let Some(answer) = answer {
        let (asst_training, asst_meta) = prompt.format_assistant(answer, citations);
        check_parity(&asst_training, &asst_meta)?;
        record["assistant"] = json!({"training": asst_training, "metadata": asst_meta});
        history.push(asst_meta);
    }

    Ok((record, history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_build_record_question_only() {
        let fp = FormatPrompt::new("base").unwrap();
        let (record, history) = build_record(&fp, " hi ", &[], None, None).unwrap();
        assert_eq!(record["user"]["training"]["content"], json!("hi"));
        assert!(record.get("assistant").is_none());
        assert_eq!(history, vec![Turn::user("hi")]);
    }

    #[test]
    fn test_build_record_with_answer() {
        let fp = FormatPrompt::new("contextcitations").unwrap();
        let facts = vec![Fact::new("f1", "Paris is in France.")];
        let (record, history) =
            build_record(&fp, "Where is Paris?", &facts, Some("France"), Some(json!(["f1"])))
                .unwrap();

        assert_eq!(record["template"], json!("contextcitations"));
        let training = record["assistant"]["training"]["content"].as_str().unwrap();
        let parsed: Value = serde_json::from_str(training).unwrap();
        assert_eq!(parsed, json!({"answer": "France", "citations": ["f1"]}));
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].llm_citations, Some(json!(["f1"])));
    }

    #[test]
    fn test_load_facts() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("facts.json");
        std::fs::write(&path, r#"[{"id": "a", "title": "A"}, {"id": 2, "title": "B"}]"#).unwrap();
        let facts = load_facts(path.to_str().unwrap()).unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[1].id, json!(2));
    }

    #[test]
    fn test_load_facts_rejects_object() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("facts.json");
        std::fs::write(&path, r#"{"id": "a", "title": "A"}"#).unwrap();
        assert!(load_facts(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_run_format_appends_to_log() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("logs/session.json");
        let log_str = log.to_str().unwrap().to_string();

        for q in ["first?", "second?"] {
            let args = FormatArgs {
                question: q,
                facts: None,
                answer: Some("yes"),
                citations: None,
                template: Some("base"),
                log: Some(log_str.as_str()),
            };
            run_format(args, &Config::default()).unwrap();
        }

        let d = DialogueManager::load(&log).unwrap();
        let texts: Vec<String> = d.data().iter().map(|t| t.text().to_string()).collect();
        assert_eq!(texts.len(), 5);
        assert_eq!(&texts[1..], &["first?", "yes", "second?", "yes"]);
    }
}

// src/cli/score.rs — Batch retrieval scoring
//
// Reads JSONL {id?, gold, retrieved} records and prints one averaged
// summary per cutoff as JSON or YAML.

use anyhow::Context;

use crate::infra::config::Config;
use crate::metrics::{evaluate_many, MetricSummary, RetrievalQuery};

pub fn run_score(file: &str, ks: &[usize], format: &str, config: &Config) -> anyhow::Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("Cannot read {file}"))?;
    let queries = parse_queries(&content)?;

    let ks = if ks.is_empty() {
        config.metrics.cutoffs.as_slice()
    } else {
        ks
    };
    if ks.is_empty() {
        anyhow::bail!("No cutoffs given. Pass -k or set [metrics].cutoffs in config.toml");
    }

    tracing::info!(queries = queries.len(), cutoffs = ?ks, "scoring retrieval run");
    let summaries = evaluate_many(&queries, ks);
    println!("{}", render(&summaries, format)?);
    Ok(())
}

/// Parse JSONL, skipping blank lines. Errors name the 1-based line.
pub fn parse_queries(content: &str) -> anyhow::Result<Vec<RetrievalQuery>> {
    let mut queries = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let query: RetrievalQuery =
            serde_json::from_str(line).with_context(|| format!("Invalid query on line {}", i + 1))?;
        queries.push(query);
    }
    Ok(queries)
}

fn render(summaries: &[MetricSummary], format: &str) -> anyhow::Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(summaries)?),
        "yaml" | "yml" => Ok(serde_yml::to_string(summaries)?),
        other => anyhow::bail!("Unsupported format '{}'. Options: json, yaml", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_queries_skips_blank_lines() {
        let content = "{\"gold\":[\"a\"],\"retrieved\":[\"a\"]}\n\n{\"id\":\"q2\",\"gold\":[\"b\"],\"retrieved\":[]}\n";
        let queries = parse_queries(content).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].id.as_deref(), Some("q2"));
    }

    #[test]
    fn test_parse_queries_reports_line() {
        let content = "{\"gold\":[],\"retrieved\":[]}\nnot json\n";
        let err = parse_queries(content).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_render_formats() {
        let summaries = vec![MetricSummary {
            k: 3,
            queries: 1,
            hit_rate: 1.0,
            recall: 0.5,
            mrr: 0.5,
        }];
        let json = render(&summaries, "json").unwrap();
        assert!(json.contains("\"recall\": 0.5"));
        let yaml = render(&summaries, "yaml").unwrap();
        assert!(yaml.contains("k: 3"));
        assert!(yaml.contains("hit_rate:"));
        assert!(render(&summaries, "csv").is_err());
    }

    #[test]
    fn test_run_score_missing_file() {
        let err = run_score("/nonexistent/runs.jsonl", &[1], "json", &Config::default());
        assert!(err.is_err());
    }
}

// src/metrics/mod.rs — Single-query retrieval metrics and batch averaging

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// 1 if any of the first `k` retrieved items is in `gold`, else 0.
///
/// A `k` past the end of `retrieved` uses the whole sequence.
pub fn hit_rate_at_k<T: Eq + Hash>(gold: &[T], retrieved: &[T], k: usize) -> u32 {
    let gold: HashSet<&T> = gold.iter().collect();
    u32::from(retrieved.iter().take(k).any(|item| gold.contains(item)))
}

/// Recall@K = |set(gold) ∩ set(retrieved[..k])| / |set(gold)|.
///
/// Both sides are deduplicated. An empty gold set scores 0.0.
pub fn recall_at_k<T: Eq + Hash>(gold: &[T], retrieved: &[T], k: usize) -> f64 {
    let gold: HashSet<&T> = gold.iter().collect();
    if gold.is_empty() {
        tracing::debug!("recall_at_k called with an empty gold set, scoring 0.0");
        return 0.0;
    }

    let top_k: HashSet<&T> = retrieved.iter().take(k).collect();
    let found = gold.intersection(&top_k).count();

    found as f64 / gold.len() as f64
}

/// Reciprocal of the 1-based rank of the first gold item within the top `k`,
/// or 0.0 when there is none. Later hits are ignored.
pub fn mrr_at_k<T: Eq + Hash>(gold: &[T], retrieved: &[T], k: usize) -> f64 {
    let gold: HashSet<&T> = gold.iter().collect();
    retrieved
        .iter()
        .take(k)
        .position(|item| gold.contains(item))
        .map(|idx| 1.0 / (idx + 1) as f64)
        .unwrap_or(0.0)
}

/// One query's ground truth and ranked retrieval output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub gold: Vec<String>,
    pub retrieved: Vec<String>,
}

impl RetrievalQuery {
    pub fn new(gold: Vec<String>, retrieved: Vec<String>) -> Self {
        Self {
            id: None,
            gold,
            retrieved,
        }
    }
}

/// Metrics averaged over a query set at one cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub k: usize,
    pub queries: usize,
    pub hit_rate: f64,
    pub recall: f64,
    pub mrr: f64,
}

/// Average hit-rate, recall and MRR at `k` over all queries.
pub fn evaluate(queries: &[RetrievalQuery], k: usize) -> MetricSummary {
    if queries.is_empty() {
        return MetricSummary {
            k,
            queries: 0,
            hit_rate: 0.0,
            recall: 0.0,
            mrr: 0.0,
        };
    }

    let mut hits = 0u32;
    let mut recall = 0.0;
    let mut mrr = 0.0;
    for q in queries {
        hits += hit_rate_at_k(&q.gold, &q.retrieved, k);
        recall += recall_at_k(&q.gold, &q.retrieved, k);
        mrr += mrr_at_k(&q.gold, &q.retrieved, k);
    }

    let n = queries.len() as f64;
    MetricSummary {
        k,
        queries: queries.len(),
        hit_rate: f64::from(hits) / n,
        recall: recall / n,
        mrr: mrr / n,
    }
}

/// One summary per cutoff, in the order given.
pub fn evaluate_many(queries: &[RetrievalQuery], ks: &[usize]) -> Vec<MetricSummary> {
    ks.iter().map(|&k| evaluate(queries, k)).collect()
}

//! Best-value matching
//!
//! Reconciles a noisy query string against a small controlled vocabulary.
//! Cheap deterministic checks run first (value-map triggers, numeric
//! heel-height ranges); the chat model is the fallback, and its answer is
//! verified against the candidate list before it is trusted. Nothing outside
//! the supplied vocabulary is ever returned.

use crate::capability::{or_empty, ChatModel};
use crate::embedding;
use crate::prompts;
use crate::vocab::Vocabulary;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ValueMatcher {
    vocab: Arc<Vocabulary>,
    chat: Arc<dyn ChatModel>,
}

impl ValueMatcher {
    pub fn new(vocab: Arc<Vocabulary>, chat: Arc<dyn ChatModel>) -> Self {
        Self { vocab, chat }
    }

    /// Select the single best candidate for `query`.
    ///
    /// `attribute_type` names a value-map entry for table-assisted matching.
    /// Returns one of `candidates` or the empty string.
    pub async fn best_value(
        &self,
        query: &str,
        candidates: &[String],
        attribute_type: Option<&str>,
    ) -> String {
        if candidates.is_empty() {
            return String::new();
        }
        if candidates.len() == 1 {
            return candidates[0].clone();
        }

        if let Some(attribute) = attribute_type {
            if let Some(hit) = self.table_lookup(query, candidates, attribute) {
                debug!("value map hit: {query} -> {hit}");
                return hit;
            }
        }

        if let Some(hit) = numeric_taxonomy_lookup(query, candidates) {
            debug!("numeric taxonomy hit: {query} -> {hit}");
            return hit;
        }

        let answer = or_empty(
            self.chat
                .complete(&prompts::closest_value(query, candidates))
                .await,
            "value match",
        );
        debug!("model answer for {query:?}: {answer:?}");

        let resolved = if contains(candidates, &answer) {
            answer
        } else {
            // Ambiguous or verbose answer; fall back to embedding similarity
            // against the query (or the answer itself when the query is empty).
            let basis = if query.trim().is_empty() { answer.as_str() } else { query };
            if basis.trim().is_empty() {
                return String::new();
            }
            match embedding::closest(basis, candidates) {
                Some(candidate) => candidate.to_string(),
                None => return String::new(),
            }
        };

        if contains(candidates, &resolved) {
            resolved
        } else {
            String::new()
        }
    }

    /// Declared-order trigger lookup in the value map. The standard value
    /// must itself be a candidate.
    fn table_lookup(&self, query: &str, candidates: &[String], attribute: &str) -> Option<String> {
        if query.is_empty() {
            return None;
        }
        let entry = self.vocab.value_entries(attribute)?;
        for standard in &entry.values {
            if !contains(candidates, &standard.value) {
                continue;
            }
            for trigger in &standard.triggers {
                if query == trigger.as_str() || query.contains(trigger.as_str()) {
                    return Some(standard.value.clone());
                }
            }
        }
        None
    }
}

fn contains(candidates: &[String], value: &str) -> bool {
    !value.is_empty() && candidates.iter().any(|c| c == value)
}

/// Locally classify a centimeter measurement against the heel-height
/// taxonomy, instead of trusting model arithmetic.
fn numeric_taxonomy_lookup(query: &str, candidates: &[String]) -> Option<String> {
    let cm = parse_centimeters(query)?;
    let band = heel_band(cm);
    candidates
        .iter()
        .find(|c| c.contains(band) && (band != "高跟" || !c.contains("超高跟")))
        .cloned()
}

fn heel_band(cm: f32) -> &'static str {
    if cm < 1.0 {
        "平跟"
    } else if cm <= 3.0 {
        "低跟"
    } else if cm <= 5.0 {
        "中跟"
    } else if cm <= 8.0 {
        "高跟"
    } else {
        "超高跟"
    }
}

/// Parse a query that is a bare centimeter measurement ("6cm", "6.5 厘米",
/// "7"). Ranges and mixed text are left to the trigger table and the model.
fn parse_centimeters(query: &str) -> Option<f32> {
    let trimmed = query.trim();
    if trimmed.is_empty() || trimmed.contains('-') {
        return None;
    }
    let stripped = trimmed
        .trim_end_matches("厘米")
        .trim_end_matches("CM")
        .trim_end_matches("cm")
        .trim();
    if stripped.is_empty() || !stripped.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    stripped.parse::<f32>().ok()
}

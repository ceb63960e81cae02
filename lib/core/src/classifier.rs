//! Attribute-name classification
//!
//! Determines the canonical attribute name and the coarse category that
//! picks the resolution strategy. Canonicalization tries the alias table
//! first and asks the chat model once for unknown names; a hallucinated
//! answer falls back to the raw name.

use crate::capability::{or_empty, ChatModel};
use crate::prompts;
use crate::vocab::Vocabulary;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Coarse attribute category driving resolver selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Season,
    Material,
    Size,
    Closure,
    ToeStyle,
    HeelShape,
    OpeningDepth,
    Style,
    ShoeShape,
    General,
}

/// Result of classifying a raw attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub canonical: String,
    pub category: Category,
}

#[derive(Clone)]
pub struct AttributeClassifier {
    vocab: Arc<Vocabulary>,
    chat: Arc<dyn ChatModel>,
}

impl AttributeClassifier {
    pub fn new(vocab: Arc<Vocabulary>, chat: Arc<dyn ChatModel>) -> Self {
        Self { vocab, chat }
    }

    /// Canonicalize `raw_name` and detect its category.
    ///
    /// Category detection always runs on the trimmed raw name, not the
    /// canonicalized one, because the raw spelling carries the stronger
    /// signal (e.g. "上市年份季节" vs the canonical "季节").
    pub async fn classify(&self, raw_name: &str) -> Classified {
        let trimmed = raw_name.trim();
        let category = self.vocab.category_for(trimmed);
        let canonical = self.canonicalize(trimmed).await;
        debug!("classified {trimmed:?} as {canonical:?} ({category:?})");
        Classified { canonical, category }
    }

    async fn canonicalize(&self, name: &str) -> String {
        if let Some(canonical) = self.vocab.canonicalize(name) {
            return canonical.to_string();
        }

        let canonical_names = self.vocab.canonical_names();
        if canonical_names.is_empty() {
            return name.to_string();
        }

        let answer = or_empty(
            self.chat
                .complete(&prompts::closest_attribute(name, &canonical_names))
                .await,
            "attribute canonicalization",
        );
        if canonical_names.iter().any(|n| *n == answer) {
            answer
        } else {
            name.to_string()
        }
    }
}

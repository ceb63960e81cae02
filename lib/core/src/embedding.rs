//! Hashed text embeddings
//!
//! Local, deterministic sentence vectors used to disambiguate a verbose
//! model answer against the candidate list. Character trigrams and whole
//! words are hashed into a fixed-dimension vector, so the comparison needs
//! no model download and works across scripts.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Dimension of the hashed text vectors.
pub const TEXT_DIM: usize = 256;

/// Embed a text into a normalized hashed-trigram vector.
#[must_use]
pub fn embed_text(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; TEXT_DIM];
    let normalized = text.to_lowercase();

    for trigram in trigrams(&normalized) {
        let mut hasher = DefaultHasher::new();
        trigram.hash(&mut hasher);
        let pos = (hasher.finish() as usize) % TEXT_DIM;
        vector[pos] += 1.0;
    }

    // Whole words contribute more than their trigrams.
    for word in normalized.split_whitespace() {
        let mut hasher = DefaultHasher::new();
        word.hash(&mut hasher);
        let pos = (hasher.finish() as usize) % TEXT_DIM;
        vector[pos] += 2.0;
    }

    normalize(&mut vector);
    vector
}

/// Cosine similarity between two vectors of equal dimension.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// The candidate most similar to `query`, by cosine over hashed vectors.
/// Ties keep the earliest candidate.
#[must_use]
pub fn closest<'a>(query: &str, candidates: &'a [String]) -> Option<&'a str> {
    let query_vec = embed_text(query);
    let mut best: Option<(&str, f32)> = None;
    for candidate in candidates {
        let score = cosine_similarity(&query_vec, &embed_text(candidate));
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((candidate.as_str(), score)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();
    if chars.len() < 3 {
        return HashSet::new();
    }
    chars.windows(3).map(|w| w.iter().collect::<String>()).collect()
}

fn normalize(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for v in vector.iter_mut() {
            *v /= magnitude;
        }
    }
}

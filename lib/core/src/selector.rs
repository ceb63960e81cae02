//! Attribute selection orchestrator
//!
//! Wires classifier → category resolver → value matcher → fallback and
//! exposes the single public operation. The selector never fails: every
//! capability error degrades to an empty intermediate value, and an empty
//! final value means "could not determine".

use crate::capability::{ChatModel, FieldSource, VisionModel};
use crate::classifier::AttributeClassifier;
use crate::resolver::CategoryResolvers;
use crate::season::ResolutionDate;
use crate::vocab::Vocabulary;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// One attribute-resolution request. Immutable for the duration of a
/// resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRequest {
    pub product_id: String,
    pub attribute_name: String,
    /// The controlled vocabulary for this request, in caller order.
    pub candidates: Vec<String>,
    pub image: Option<PathBuf>,
}

/// Terminal output of a resolution. `selected_value` is one of the request
/// candidates or empty ("could not determine").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub product_id: String,
    pub selected_value: String,
}

pub struct AttributeSelector {
    vocab: Arc<Vocabulary>,
    classifier: AttributeClassifier,
    resolvers: CategoryResolvers,
}

impl AttributeSelector {
    pub fn new(
        vocab: Arc<Vocabulary>,
        fields: Arc<dyn FieldSource>,
        chat: Arc<dyn ChatModel>,
        vision: Arc<dyn VisionModel>,
    ) -> Self {
        let classifier = AttributeClassifier::new(vocab.clone(), chat.clone());
        let resolvers = CategoryResolvers::new(vocab.clone(), fields, chat, vision);
        Self {
            vocab,
            classifier,
            resolvers,
        }
    }

    /// Select the best-fit attribute value for a product.
    pub async fn select_attribute_value(&self, request: &AttributeRequest) -> ResolutionResult {
        self.select_at(request, ResolutionDate::today()).await
    }

    /// Same as [`select_attribute_value`](Self::select_attribute_value) with
    /// an explicit resolution date, so seasonal logic is testable.
    pub async fn select_at(
        &self,
        request: &AttributeRequest,
        date: ResolutionDate,
    ) -> ResolutionResult {
        info!(
            "resolving {} for product {} ({} candidates)",
            request.attribute_name,
            request.product_id,
            request.candidates.len()
        );

        let image = request.image.as_deref().filter(|p| self.admissible_image(p));
        let classified = self.classifier.classify(&request.attribute_name).await;
        info!(
            "attribute {} classified as {} ({:?})",
            request.attribute_name, classified.canonical, classified.category
        );

        let mut selected = self
            .resolvers
            .resolve(
                &classified,
                request.attribute_name.trim(),
                &request.product_id,
                &request.candidates,
                image,
                date,
            )
            .await;

        // No source of truth: let the matcher pick from the vocabulary alone.
        if selected.is_empty() && !request.candidates.is_empty() {
            info!("falling through to generic matching for {}", classified.canonical);
            let hint = self
                .vocab
                .value_entries(&classified.canonical)
                .map(|entry| entry.attribute.as_str());
            selected = self
                .resolvers
                .matcher()
                .best_value("", &request.candidates, hint)
                .await;
        }

        // Committed policy: an undeterminable attribute stays empty rather
        // than defaulting to the first candidate.
        if selected.is_empty() {
            warn!(
                "could not determine {} for product {}",
                request.attribute_name, request.product_id
            );
        } else {
            info!("selected {selected} for product {}", request.product_id);
        }

        ResolutionResult {
            product_id: request.product_id.clone(),
            selected_value: selected,
        }
    }

    /// An image is usable when it exists and carries a supported extension.
    fn admissible_image(&self, path: &Path) -> bool {
        if !path.exists() {
            warn!("image path does not exist: {}", path.display());
            return false;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.vocab.supports_image_extension(e));
        if !supported {
            warn!("unsupported image format: {}", path.display());
        }
        supported
    }
}

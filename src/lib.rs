//! # attrx
//!
//! Attribute-value resolution for e-commerce catalog enrichment.
//!
//! Given a product identifier, a raw attribute name, and the controlled
//! vocabulary a marketplace accepts for that attribute, attrx commits to the
//! single best-fit value - or to the empty string when no source of truth
//! supports a choice. Ground truth is pulled from a relational product
//! database, the seasonal calendar, or a product photo, and reconciled
//! against the vocabulary with alias tables, substring heuristics, hashed
//! text embeddings, and a language-model fallback.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install attrx
//! attrx --database-url mysql://... serve --http-port 14736
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! use attrx::prelude::*;
//! # async fn run(fields: Arc<dyn attrx_core::capability::FieldSource>,
//! #              chat: Arc<dyn attrx_core::capability::ChatModel>,
//! #              vision: Arc<dyn attrx_core::capability::VisionModel>) {
//!
//! let selector = AttributeSelector::new(Arc::new(Vocabulary::default()), fields, chat, vision);
//! let request = AttributeRequest {
//!     product_id: "P123".to_string(),
//!     attribute_name: "闭合方式".to_string(),
//!     candidates: vec!["系带".to_string(), "拉链".to_string(), "套脚".to_string()],
//!     image: Some("shoe.jpg".into()),
//! };
//! let result = selector.select_attribute_value(&request).await;
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! attrx is composed of several crates:
//!
//! - [`attrx-core`](https://docs.rs/attrx-core) - the resolution pipeline
//!   (classifier, resolvers, value matcher, vocabulary tables)
//! - [`attrx-storage`](https://docs.rs/attrx-storage) - product database
//!   adapter (MySQL)
//! - [`attrx-model`](https://docs.rs/attrx-model) - chat and vision model
//!   clients
//! - [`attrx-api`](https://docs.rs/attrx-api) - REST adapter

// Re-export core types
pub use attrx_core::{
    AttributeClassifier, AttributeRequest, AttributeSelector, CapabilityError, Category,
    CategoryResolvers, Classified, FieldValues, ResolutionDate, ResolutionResult, Season,
    ValueMatcher, Vocabulary,
};

// Re-export adapters
pub use attrx_api::RestApi;
pub use attrx_model::{ChatClient, ModelConfig, VisionClient};
pub use attrx_storage::ProductDatabase;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AttributeRequest, AttributeSelector, Category, ChatClient, ProductDatabase,
        ResolutionDate, ResolutionResult, RestApi, Season, ValueMatcher, VisionClient, Vocabulary,
    };
}

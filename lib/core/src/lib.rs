//! # attrx Core
//!
//! Core library for the attrx attribute-resolution engine.
//!
//! This crate implements the resolution pipeline:
//!
//! - [`Vocabulary`] - alias tables, value maps, and category keyword sets
//! - [`AttributeClassifier`] - canonical name + coarse category detection
//! - [`CategoryResolvers`] - per-category strategies (calendar, database,
//!   image analysis)
//! - [`ValueMatcher`] - best-value matching against a controlled vocabulary
//! - [`AttributeSelector`] - the orchestrator exposing the single public
//!   operation
//!
//! External collaborators (database, chat model, vision model) are consumed
//! through the traits in [`capability`], so the pipeline itself stays free
//! of I/O concerns.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use attrx_core::{AttributeSelector, AttributeRequest, Vocabulary};
//! # async fn run(fields: Arc<dyn attrx_core::capability::FieldSource>,
//! #              chat: Arc<dyn attrx_core::capability::ChatModel>,
//! #              vision: Arc<dyn attrx_core::capability::VisionModel>) {
//! let selector = AttributeSelector::new(Arc::new(Vocabulary::default()), fields, chat, vision);
//! let request = AttributeRequest {
//!     product_id: "P123".to_string(),
//!     attribute_name: "鞋面材质".to_string(),
//!     candidates: vec!["真皮".to_string(), "人造革".to_string()],
//!     image: None,
//! };
//! let result = selector.select_attribute_value(&request).await;
//! assert_eq!(result.product_id, "P123");
//! # }
//! ```

pub mod capability;
pub mod classifier;
pub mod embedding;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod prompts;
pub mod resolver;
pub mod season;
pub mod selector;
pub mod vocab;

pub use capability::{CapabilityError, CapabilityResult, FieldValues};
pub use classifier::{AttributeClassifier, Category, Classified};
pub use error::{Error, Result};
pub use matcher::ValueMatcher;
pub use normalize::{clean_attribute_value, extract_primary_material};
pub use resolver::CategoryResolvers;
pub use season::{ResolutionDate, Season};
pub use selector::{AttributeRequest, AttributeSelector, ResolutionResult};
pub use vocab::{AliasEntry, StandardValue, ValueMapEntry, Vocabulary};

//! # attrx Model Clients
//!
//! Chat and vision capabilities for the attrx resolution pipeline, spoken
//! over an OpenAI-compatible chat-completions endpoint.
//!
//! Both clients implement the core capability traits
//! ([`ChatModel`](attrx_core::capability::ChatModel),
//! [`VisionModel`](attrx_core::capability::VisionModel)) and surface every
//! transport or API failure as a capability error; the pipeline collapses
//! those to empty intermediate values.

pub mod chat;
pub mod vision;

pub use chat::{ChatClient, ModelConfig};
pub use vision::VisionClient;

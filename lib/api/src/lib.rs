//! # attrx API
//!
//! Thin REST adapter over the core's single operation. Transport concerns
//! only: request parsing, CORS, and HTTP status mapping. The core never
//! fails, so the one handler always answers 200 once the request passes
//! validation.

pub mod rest;

pub use rest::RestApi;

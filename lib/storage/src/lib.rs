//! # attrx Storage
//!
//! Product database adapter for the attrx resolution pipeline.
//!
//! Implements the core's [`FieldSource`](attrx_core::capability::FieldSource)
//! contract over the marketplace MySQL schema: a base-info table keyed by
//! product number, plus material and size tables hanging off it.

pub mod product_db;

pub use product_db::{ProductDatabase, StorageError};

pub type Result<T> = std::result::Result<T, StorageError>;

//! Coaxx Admin library.
//!
//! Catalog maintenance for the shop owner: products are edited in a draft
//! kept in a durable key-value slot, then exported as the published
//! `products.json` that the storefront reads.
//!
//! # Workflow
//!
//! 1. [`CatalogDraft::open`] resumes the saved draft, or starts from the
//!    published catalog.
//! 2. [`CatalogDraft::upsert`] and [`CatalogDraft::delete`] edit products;
//!    each edit saves the draft.
//! 3. [`CatalogDraft::publish`] writes the published file.
//!    [`CatalogDraft::reset`] throws the draft away instead.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod draft;
pub mod error;

pub use config::{AdminConfig, ConfigError};
pub use draft::{CatalogDraft, DEFAULT_DRAFT_KEY, DraftFilter, DraftSource, ProductInput, split_list};
pub use error::AdminError;

//! Coaxx Core - Shared types library.
//!
//! This crate provides common types used across all Coaxx components:
//! - `storefront` - Cart store, catalog queries and the checkout stub
//! - `admin` - Catalog curation (drafts, publishing)
//! - `cli` - Command-line front end over both
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, prices, products, and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

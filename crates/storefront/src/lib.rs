//! Coaxx Storefront library.
//!
//! The storefront's state lives here, independent of any UI:
//!
//! - [`cart`] - the `CartStore`: line items, persistence to a key-value
//!   slot, and synchronous change notification
//! - [`summary`] - subtotal, shipping, tax and total for the cart page
//! - [`catalog`] - read-only product catalog queries
//! - [`checkout`] - checkout stub turning a cart into a pending order
//! - [`config`] - environment-driven configuration
//!
//! # Architecture
//!
//! One `CartStore` is constructed per session and handed by reference to
//! whichever adapter renders it. Every mutation persists the whole cart and
//! then notifies subscribers, in that order, before returning.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod summary;

pub use cart::{CartLine, CartStore, LoadOutcome, Persistence, Subscription, Variant};
pub use catalog::{Catalog, CatalogQuery};
pub use checkout::{CheckoutReceipt, CustomerDetails, checkout};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{CartError, CatalogError, CheckoutError, SaveError};
pub use summary::{OrderSummary, PricingRules};

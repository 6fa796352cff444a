//! Core types for Coaxx.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;

pub use email::{Email, EmailError};
pub use id::*;
pub use order::{Order, OrderItem, OrderStatus};
pub use price::{CurrencyCode, Price, discount_percent, round_cents};
pub use product::{Product, Tag, slugify};

//! Shopping cart state.
//!
//! [`CartStore`] is the single source of truth for the session's cart. It
//! owns the line list, writes the whole cart to a durable slot after every
//! mutation, and then calls every subscriber with the new line list.

mod line;
mod store;
mod subscription;

pub use line::{CartLine, Variant};
pub use store::{CartStore, DEFAULT_CART_KEY, LoadOutcome, Persistence};
pub use subscription::Subscription;

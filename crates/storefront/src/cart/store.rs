//! The cart state container.

use coaxx_core::{Product, ProductId};
use coaxx_storage::KeyValueStore;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::line::{CartLine, Variant};
use super::subscription::{Listeners, Subscription};
use crate::error::{CartError, SaveError};

/// Slot key used when none is configured.
pub const DEFAULT_CART_KEY: &str = "coaxx-cart";

const RESET_NOTICE: &str = "Your saved cart could not be restored and has been emptied.";

/// What `CartStore::open` found in the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No saved cart.
    Empty,
    /// A saved cart was restored.
    Restored {
        /// Lines restored.
        lines: usize,
    },
    /// The slot held data that is not a cart; it was discarded.
    Corrupted {
        /// Parse error.
        reason: String,
    },
    /// The slot could not be read at all.
    Unreadable {
        /// Storage error.
        reason: String,
    },
}

impl LoadOutcome {
    /// Whether a previously saved cart was lost.
    #[must_use]
    pub const fn lost_data(&self) -> bool {
        matches!(self, Self::Corrupted { .. } | Self::Unreadable { .. })
    }
}

/// Result of writing the cart after a mutation.
///
/// The in-memory change is applied either way; `Unsaved` means the cart
/// will not survive a restart and the shopper should be warned.
#[derive(Debug)]
pub enum Persistence {
    /// The full cart was written to the slot.
    Saved,
    /// The write failed.
    Unsaved(SaveError),
}

impl Persistence {
    /// Whether the write succeeded.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }

    /// User-facing warning for a failed write.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Saved => None,
            Self::Unsaved(e) => Some(format!("Could not save your cart: {e}")),
        }
    }

    /// Convert into a `Result` for callers that treat a failed save as fatal.
    ///
    /// # Errors
    ///
    /// Returns the `SaveError` if the write failed.
    pub fn into_result(self) -> Result<(), SaveError> {
        match self {
            Self::Saved => Ok(()),
            Self::Unsaved(e) => Err(e),
        }
    }
}

/// Single source of truth for a session's cart.
///
/// Every mutating method writes the entire cart to the slot and then calls
/// each subscriber, in registration order, exactly once before returning.
/// Reads never write or notify.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    lines: Vec<CartLine>,
    listeners: Listeners,
    load_outcome: LoadOutcome,
    notice_pending: bool,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart saved under `key`, or start empty.
    ///
    /// Never fails: a missing, unreadable or corrupt slot yields an empty
    /// cart. The two failure cases are logged and reported once through
    /// [`take_load_notice`](Self::take_load_notice).
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let (lines, load_outcome) = load_lines(&storage, &key);

        match &load_outcome {
            LoadOutcome::Empty => debug!(%key, "No saved cart"),
            LoadOutcome::Restored { lines } => info!(%key, lines, "Restored saved cart"),
            LoadOutcome::Corrupted { reason } => {
                warn!(%key, %reason, "Discarded corrupt saved cart");
            }
            LoadOutcome::Unreadable { reason } => {
                warn!(%key, %reason, "Could not read saved cart");
            }
        }

        let notice_pending = load_outcome.lost_data();
        Self {
            storage,
            key,
            lines,
            listeners: Listeners::default(),
            load_outcome,
            notice_pending,
        }
    }

    /// Open the cart under [`DEFAULT_CART_KEY`].
    pub fn open_default(storage: S) -> Self {
        Self::open(storage, DEFAULT_CART_KEY)
    }

    /// What was found in the slot at construction.
    #[must_use]
    pub const fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// One-time notice for the shopper when a saved cart was lost.
    ///
    /// Returns `Some` at most once per store.
    pub fn take_load_notice(&mut self) -> Option<&'static str> {
        std::mem::take(&mut self.notice_pending).then_some(RESET_NOTICE)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`.
    ///
    /// Merges into the existing `(product, variant)` line if there is one,
    /// otherwise appends a new line with a snapshot of the product's name,
    /// effective price and thumbnail.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidQuantity` if `quantity` is zero
    /// - `CartError::OutOfStock` if the product is flagged unavailable
    /// - `CartError::InsufficientStock` if the product's known stock would be
    ///   exceeded across all of its lines
    ///
    /// A rejected add does not mutate, persist, or notify.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        variant: Option<Variant>,
    ) -> Result<Persistence, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if !product.is_available() {
            return Err(CartError::OutOfStock {
                product_id: product.id.clone(),
            });
        }
        if let Some(available) = product.stock_quantity {
            let requested = self.quantity_of(&product.id).saturating_add(quantity);
            if requested > available {
                return Err(CartError::InsufficientStock {
                    product_id: product.id.clone(),
                    requested,
                    available,
                });
            }
        }

        let variant = Variant::normalize(variant);
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(&product.id, variant.as_ref()))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            debug!(product_id = %product.id, quantity = line.quantity, "Increased cart line");
        } else {
            debug!(product_id = %product.id, quantity, "Added cart line");
            self.lines
                .push(CartLine::snapshot(product, quantity, variant));
        }

        Ok(self.commit())
    }

    /// Remove every line keyed by `(product_id, variant)`.
    ///
    /// Removing something that is not in the cart is not an error; the cart
    /// is still written and subscribers are still notified.
    pub fn remove_item(&mut self, product_id: &ProductId, variant: Option<&Variant>) -> Persistence {
        let variant = variant.filter(|v| !v.is_empty());
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(product_id, variant));
        debug!(%product_id, removed = before - self.lines.len(), "Removed cart lines");

        self.commit()
    }

    /// Set the quantity of the `(product_id, variant)` line.
    ///
    /// A quantity of zero or less removes the line. Setting the quantity of a
    /// line that does not exist changes nothing, but still writes and
    /// notifies.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        variant: Option<&Variant>,
    ) -> Persistence {
        if quantity <= 0 {
            return self.remove_item(product_id, variant);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let variant = variant.filter(|v| !v.is_empty());
        match self
            .lines
            .iter_mut()
            .find(|line| line.matches(product_id, variant))
        {
            Some(line) => {
                line.quantity = quantity;
                debug!(%product_id, quantity, "Updated cart line quantity");
            }
            None => debug!(%product_id, "No cart line to update"),
        }

        self.commit()
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) -> Persistence {
        self.lines.clear();
        debug!(key = %self.key, "Cleared cart");
        self.commit()
    }

    /// Register a listener called with the line list after every mutation.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&[CartLine]) + 'static,
    {
        self.listeners.add(listener)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The `(product_id, variant)` line, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId, variant: Option<&Variant>) -> Option<&CartLine> {
        let variant = variant.filter(|v| !v.is_empty());
        self.lines
            .iter()
            .find(|line| line.matches(product_id, variant))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines (the cart badge number).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Units of `product_id` across all of its variants.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.lines
            .iter()
            .filter(|line| line.product_id == *product_id)
            .fold(0, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Slot key this cart is saved under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the backing store.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutably borrow the backing store.
    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Drop the in-memory cart and return the backing store.
    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Persist, then notify.
    fn commit(&mut self) -> Persistence {
        let persistence = match self.save() {
            Ok(()) => Persistence::Saved,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to save cart; keeping in-memory changes");
                Persistence::Unsaved(e)
            }
        };
        self.listeners.notify(&self.lines);
        persistence
    }

    fn save(&mut self) -> Result<(), SaveError> {
        let json = serde_json::to_string(&self.lines)?;
        self.storage.set(&self.key, &json)?;
        Ok(())
    }
}

fn load_lines<S: KeyValueStore>(storage: &S, key: &str) -> (Vec<CartLine>, LoadOutcome) {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return (Vec::new(), LoadOutcome::Empty),
        Err(e) => {
            return (
                Vec::new(),
                LoadOutcome::Unreadable {
                    reason: e.to_string(),
                },
            );
        }
    };

    match serde_json::from_str::<Vec<CartLine>>(&raw) {
        Ok(mut lines) => {
            lines.retain(|line| line.quantity > 0);
            for line in &mut lines {
                line.variant = Variant::normalize(line.variant.take());
            }
            let count = lines.len();
            if count == 0 {
                (lines, LoadOutcome::Empty)
            } else {
                (lines, LoadOutcome::Restored { lines: count })
            }
        }
        Err(e) => (
            Vec::new(),
            LoadOutcome::Corrupted {
                reason: e.to_string(),
            },
        ),
    }
}

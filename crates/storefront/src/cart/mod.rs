//! Client-local shopping cart.
//!
//! The cart is an ordered list of [`CartLine`]s, one per distinct product,
//! persisted as a JSON array under a single storage key. Every operation
//! reads the whole list, transforms it, and writes it back; there is no
//! incremental update and no server-side mirror.
//!
//! # Invariants
//!
//! - product ids are unique within the cart
//! - every line has `1 <= quantity <= stock_limit`
//!
//! Both hold after every mutation, including `add` onto an existing line,
//! which caps the accumulated quantity at the line's stock limit.
//!
//! # Failure model
//!
//! Nothing here returns an error or panics. Unreadable stored data reads as
//! an empty cart, and individual undecodable lines are dropped. A backend
//! that cannot be read or written turns every operation into a no-op
//! returning empty/zero results. Failures are logged.
//!
//! # Example
//!
//! ```rust
//! use shophub_core::Price;
//! use shophub_storefront::cart::{CartStore, ProductSnapshot};
//! use shophub_storefront::storage::MemoryStorage;
//!
//! let cart = CartStore::new(MemoryStorage::new());
//! let lamp = ProductSnapshot::new("p1", "Desk Lamp", Price::from_cents(1000), 5);
//!
//! cart.add(&lamp, 1);
//! cart.add(&lamp, 2);
//! assert_eq!(cart.quantity_of(&lamp.id), 3);
//! assert_eq!(cart.total(), Price::from_cents(3000));
//! ```

mod line;
mod signal;

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use shophub_core::{Price, ProductId};

use crate::storage::Storage;

pub use line::{CartLine, ProductSnapshot};
pub use signal::{CartObserver, ChangeSignal, Subscription};

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "shopping_cart";

/// Cart backed by a [`Storage`].
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    signal: ChangeSignal,
}

impl<S: Storage> CartStore<S> {
    /// Create a store with its own change signal.
    pub fn new(storage: S) -> Self {
        Self::with_signal(storage, ChangeSignal::new())
    }

    /// Create a store that publishes on a shared change signal.
    pub const fn with_signal(storage: S, signal: ChangeSignal) -> Self {
        Self { storage, signal }
    }

    /// The signal this store publishes on.
    pub const fn signal(&self) -> &ChangeSignal {
        &self.signal
    }

    /// Shorthand for `self.signal().subscribe(observer)`.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, observer: impl CartObserver + 'static) -> Subscription {
        self.signal.subscribe(observer)
    }

    /// All lines, first-added first. Empty when nothing (readable) is stored.
    pub fn lines(&self) -> Vec<CartLine> {
        self.load()
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line accumulates quantity; a new product is appended as a
    /// line built from the snapshot. Either way the result is capped at the
    /// stock limit. Adding zero units, or a product with no stock, changes
    /// nothing. Returns the resulting lines.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add(&self, product: &ProductSnapshot, quantity: u32) -> Vec<CartLine> {
        let mut lines = self.load();
        if quantity == 0 {
            return lines;
        }

        if let Some(line) = lines.iter_mut().find(|l| l.product_id == product.id) {
            let capped = line.quantity.saturating_add(quantity).min(line.stock_limit);
            if capped == line.quantity {
                debug!(quantity = line.quantity, "line already at stock limit");
                return lines;
            }
            line.quantity = capped;
        } else {
            let capped = quantity.min(product.stock_limit);
            if capped == 0 {
                debug!("product out of stock, not added");
                return lines;
            }
            lines.push(product.clone().into_line(capped));
        }

        self.commit(lines)
    }

    /// Remove the line for `product_id`. Absent ids are a no-op.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove(&self, product_id: &ProductId) -> Vec<CartLine> {
        let mut lines = self.load();
        let before = lines.len();
        lines.retain(|l| &l.product_id != product_id);
        if lines.len() == before {
            return lines;
        }
        self.commit(lines)
    }

    /// Set a line's quantity.
    ///
    /// Zero or negative removes the line; larger values are clamped to the
    /// line's stock limit. Absent ids are a no-op.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn set_quantity(&self, product_id: &ProductId, quantity: i64) -> Vec<CartLine> {
        let mut lines = self.load();
        let Some(line) = lines.iter_mut().find(|l| &l.product_id == product_id) else {
            return lines;
        };

        if quantity <= 0 {
            return self.remove(product_id);
        }

        let clamped = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(line.stock_limit);
        if clamped == line.quantity {
            return lines;
        }
        line.quantity = clamped;

        self.commit(lines)
    }

    /// Sum of `unit_price * quantity` over all lines.
    pub fn total(&self) -> Price {
        self.load().iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines (not the number of lines).
    pub fn item_count(&self) -> u64 {
        self.load().iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Returns true if the product has a line.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.load().iter().any(|l| &l.product_id == product_id)
    }

    /// Quantity of the product in the cart, 0 if absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.load()
            .iter()
            .find(|l| &l.product_id == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.load().is_empty()
    }

    /// Delete all persisted cart state.
    #[instrument(skip(self))]
    pub fn clear(&self) {
        match self.storage.remove(CART_KEY) {
            Ok(()) => self.signal.publish(),
            Err(e) => warn!(error = %e, "failed to clear cart"),
        }
    }

    fn load(&self) -> Vec<CartLine> {
        let raw = match self.storage.get(CART_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "cart storage unreadable, treating cart as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
            Ok(entries) => normalize(decode_lines(entries)),
            Err(e) => {
                warn!(error = %e, "stored cart is corrupt, treating cart as empty");
                Vec::new()
            }
        }
    }

    /// Persist `lines` and notify observers. On a failed write the cart is
    /// unchanged, so the previously stored lines are returned.
    fn commit(&self, lines: Vec<CartLine>) -> Vec<CartLine> {
        let encoded = match serde_json::to_string(&lines) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode cart");
                return self.load();
            }
        };

        if let Err(e) = self.storage.set(CART_KEY, &encoded) {
            warn!(error = %e, "failed to save cart");
            return self.load();
        }

        debug!(lines = lines.len(), "cart saved");
        self.signal.publish();
        lines
    }
}

/// Decode stored entries one by one. Entries that are not a valid line are
/// dropped without losing the rest of the cart.
fn decode_lines(entries: Vec<serde_json::Value>) -> Vec<CartLine> {
    entries
        .into_iter()
        .filter_map(|entry| {
            serde_json::from_value::<CartLine>(entry)
                .inspect_err(|e| warn!(error = %e, "dropping undecodable cart line"))
                .ok()
        })
        .collect()
}

/// Re-establish the line invariants on data read from storage, which other
/// writers may have produced: drop duplicate ids (first wins), clamp to the
/// stock limit, and drop lines left with no quantity or whose line total
/// cannot be represented.
fn normalize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let before = lines.len();
    let mut seen = HashSet::new();

    let normalized: Vec<CartLine> = lines
        .into_iter()
        .filter(|l| seen.insert(l.product_id.clone()))
        .map(|mut l| {
            l.quantity = l.quantity.min(l.stock_limit);
            l
        })
        .filter(|l| l.quantity > 0)
        .filter(|l| l.unit_price.checked_times(l.quantity).is_some())
        .collect();

    if normalized.len() != before {
        warn!(
            dropped = before - normalized.len(),
            "stored cart had invalid lines"
        );
    }
    normalized
}

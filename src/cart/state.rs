//! Shopping Cart Session Storage
//!
//! One [`CartStore`] per browser session. A session is only stored while its
//! cart holds something; it goes away when the cart empties, when it sits
//! idle past the configured timeout, or when room is needed for a newer one.

use super::store::CartStore;
use dashmap::{mapref::entry::Entry, DashMap};
use std::time::{Duration, Instant};
use tracing::{debug, info};

struct Session {
    cart: CartStore,
    last_touched: Instant,
}

pub struct CartSessions {
    /// In-memory storage for carts, keyed by session id.
    /// DashMap allows concurrent access without external Mutexes.
    carts: DashMap<String, Session>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl CartSessions {
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            carts: DashMap::new(),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Runs `f` against the session's cart. The entry stays locked for the
    /// duration of `f`, so no half-applied update is ever visible to another
    /// request. A cart left empty by `f` is not kept.
    pub fn with_cart<R>(&self, session_id: &str, f: impl FnOnce(&mut CartStore) -> R) -> R {
        if !self.carts.contains_key(session_id) {
            self.make_room();
        }

        match self.carts.entry(session_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let session = entry.get_mut();
                session.last_touched = Instant::now();
                let result = f(&mut session.cart);
                if entry.get().cart.is_empty() {
                    entry.remove();
                    debug!(session = %session_id, "Cart emptied, session dropped");
                }
                result
            }
            Entry::Vacant(entry) => {
                let mut cart = CartStore::new();
                let result = f(&mut cart);
                if !cart.is_empty() {
                    entry.insert(Session {
                        cart,
                        last_touched: Instant::now(),
                    });
                }
                result
            }
        }
    }

    /// Copy of the session's cart; an unknown session reads as empty.
    pub fn snapshot(&self, session_id: &str) -> CartStore {
        match self.carts.get_mut(session_id) {
            Some(mut session) => {
                session.last_touched = Instant::now();
                session.cart.clone()
            }
            None => CartStore::new(),
        }
    }

    /// Ends the session's cart, returning what it held.
    pub fn end_session(&self, session_id: &str) -> Option<CartStore> {
        self.carts.remove(session_id).map(|(_, session)| session.cart)
    }

    pub fn session_count(&self) -> usize {
        self.carts.len()
    }

    /// How often a background sweep should call [`CartSessions::evict_idle`].
    pub fn sweep_period(&self) -> Duration {
        (self.idle_timeout / 2).max(Duration::from_secs(1))
    }

    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    /// Drops every session untouched for at least the idle timeout as of
    /// `now`. Returns how many were dropped.
    pub fn evict_idle_at(&self, now: Instant) -> usize {
        let before = self.carts.len();
        self.carts
            .retain(|_, session| now.saturating_duration_since(session.last_touched) < self.idle_timeout);

        let evicted = before.saturating_sub(self.carts.len());
        if evicted > 0 {
            info!(evicted, remaining = self.carts.len(), "Evicted idle carts");
        }
        evicted
    }

    /// Frees a slot for a new session, dropping idle ones first and then the
    /// least recently touched.
    fn make_room(&self) {
        if self.carts.len() < self.max_sessions {
            return;
        }
        self.evict_idle();

        while self.carts.len() >= self.max_sessions {
            let oldest = self
                .carts
                .iter()
                .min_by_key(|entry| entry.value().last_touched)
                .map(|entry| entry.key().clone());

            let Some(oldest) = oldest else { break };
            self.carts.remove(&oldest);
            info!(session = %oldest, "Session limit reached, evicted oldest cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{BrandRef, CategoryRef, Product, ProductImage};
    use std::collections::HashMap;

    const HOUR: Duration = Duration::from_secs(3600);

    fn product(id: u64) -> Product {
        Product {
            id,
            product_name: format!("Product {id}"),
            product_code: format!("P-{id}"),
            barcode: None,
            qr_code: None,
            brand: BrandRef { id: 1, brand_name: "Brand".into() },
            category: CategoryRef { id: 1, category_name: "Category".into() },
            model: None,
            description: None,
            selling_price: 10.0,
            is_active: Some(1),
            images: ProductImage::default(),
            extra: HashMap::new(),
        }
    }

    #[test]
    fn sessions_are_isolated_and_end_cleanly() {
        let sessions = CartSessions::new(HOUR, 100);

        sessions.with_cart("a", |cart| cart.add_item(product(1)));
        assert_eq!(sessions.snapshot("a").item_count(), 1);
        assert!(sessions.snapshot("b").is_empty());
        assert_eq!(sessions.session_count(), 1);

        assert!(sessions.end_session("a").is_some());
        assert!(sessions.end_session("a").is_none());
        assert_eq!(sessions.session_count(), 0);
    }

    #[test]
    fn noop_mutations_store_nothing() {
        let sessions = CartSessions::new(HOUR, 100);

        sessions.with_cart("a", |cart| cart.update_quantity(1, 3));
        sessions.with_cart("b", |cart| cart.remove_item(1));
        sessions.with_cart("c", |cart| cart.clear_cart());

        assert_eq!(sessions.session_count(), 0);
    }

    #[test]
    fn emptied_cart_drops_its_session() {
        let sessions = CartSessions::new(HOUR, 100);
        sessions.with_cart("a", |cart| {
            cart.add_item(product(1));
            cart.add_item(product(2));
        });

        sessions.with_cart("a", |cart| cart.remove_item(1));
        assert_eq!(sessions.session_count(), 1);

        sessions.with_cart("a", |cart| cart.update_quantity(2, 0));
        assert_eq!(sessions.session_count(), 0);
    }

    #[test]
    fn idle_sessions_are_evicted() {
        let sessions = CartSessions::new(HOUR, 100);
        sessions.with_cart("a", |cart| cart.add_item(product(1)));
        sessions.with_cart("b", |cart| cart.add_item(product(2)));

        assert_eq!(sessions.evict_idle_at(Instant::now() + HOUR / 2), 0);
        assert_eq!(sessions.evict_idle_at(Instant::now() + HOUR), 2);
        assert_eq!(sessions.session_count(), 0);
        assert!(sessions.snapshot("a").is_empty());
    }

    #[test]
    fn session_cap_evicts_least_recently_touched() {
        let sessions = CartSessions::new(HOUR, 2);
        sessions.with_cart("a", |cart| cart.add_item(product(1)));
        std::thread::sleep(Duration::from_millis(2));
        sessions.with_cart("b", |cart| cart.add_item(product(2)));
        std::thread::sleep(Duration::from_millis(2));

        // Reading "a" makes "b" the oldest.
        sessions.snapshot("a");
        std::thread::sleep(Duration::from_millis(2));
        sessions.with_cart("c", |cart| cart.add_item(product(3)));

        assert_eq!(sessions.session_count(), 2);
        assert!(!sessions.snapshot("a").is_empty());
        assert!(sessions.snapshot("b").is_empty());
        assert!(!sessions.snapshot("c").is_empty());
    }

    #[test]
    fn existing_session_is_never_evicted_for_itself() {
        let sessions = CartSessions::new(HOUR, 1);
        sessions.with_cart("a", |cart| cart.add_item(product(1)));
        sessions.with_cart("a", |cart| cart.add_item(product(1)));

        assert_eq!(sessions.snapshot("a").item_count(), 2);
    }
}

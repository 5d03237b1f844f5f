//! Cart state container.
//!
//! Line items are keyed by product id and kept in the order each product
//! was first added. `item_count` and `total` are always recomputed from the
//! lines and are never stored.

use super::models::CartLineItem;
use crate::catalog::models::{Product, ProductId};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartStore {
    lines: IndexMap<ProductId, CartLineItem>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `product` with quantity 1, or bumps the existing line by 1.
    pub fn add_item(&mut self, product: Product) {
        self.lines
            .entry(product.id)
            .and_modify(|line| line.quantity = line.quantity.saturating_add(1))
            .or_insert_with(|| CartLineItem::new(product));
    }

    /// Sets a line's quantity. Anything below 1 removes the line; unknown
    /// ids are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, new_quantity: i64) {
        if new_quantity < 1 {
            self.remove_item(product_id);
            return;
        }

        if let Some(line) = self.lines.get_mut(&product_id) {
            line.quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        }
    }

    pub fn remove_item(&mut self, product_id: ProductId) {
        // shift_remove keeps the remaining lines in insertion order
        self.lines.shift_remove(&product_id);
    }

    pub fn clear_cart(&mut self) {
        self.lines.clear();
    }

    pub fn items(&self) -> impl Iterator<Item = &CartLineItem> {
        self.lines.values()
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.lines.get(&product_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u64 {
        self.lines.values().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn total(&self) -> f64 {
        self.lines
            .values()
            .fold(0.0, |total, line| total + line.subtotal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{BrandRef, CategoryRef, ProductImage};
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use rstest::rstest;
    use std::collections::{HashMap, HashSet};

    fn product(id: u64, price: f64) -> Product {
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
            selling_price: price,
            is_active: Some(1),
            images: ProductImage::default(),
            extra: HashMap::new(),
        }
    }

    fn recomputed_total(cart: &CartStore) -> f64 {
        cart.items()
            .map(|l| l.product.selling_price * l.quantity as f64)
            .sum()
    }

    #[test]
    fn adding_same_product_increments_quantity() {
        let mut cart = CartStore::new();
        cart.add_item(product(1, 10000.0));
        cart.add_item(product(1, 10000.0));
        cart.add_item(product(2, 5000.0));

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), 25000.0);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(1).unwrap().quantity, 2);
        assert_eq!(cart.get(2).unwrap().quantity, 1);
    }

    #[test]
    fn items_keep_first_added_order() {
        let mut cart = CartStore::new();
        for id in [3, 1, 2, 1, 3] {
            cart.add_item(product(id, 1.0));
        }
        cart.remove_item(1);

        let ids: Vec<u64> = cart.items().map(|l| l.product.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn remove_then_add_starts_over_at_one() {
        let mut cart = CartStore::new();
        cart.add_item(product(1, 10.0));
        cart.add_item(product(1, 10.0));
        cart.remove_item(1);
        cart.add_item(product(1, 10.0));

        assert_eq!(cart.get(1).unwrap().quantity, 1);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::negative(-1)]
    #[case::very_negative(i64::MIN)]
    fn quantity_below_one_removes_line(#[case] quantity: i64) {
        let mut cart = CartStore::new();
        cart.add_item(product(1, 10.0));
        cart.add_item(product(2, 20.0));

        cart.update_quantity(1, quantity);

        assert!(cart.get(1).is_none());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), 20.0);
    }

    #[test]
    fn update_sets_quantity_and_ignores_unknown_ids() {
        let mut cart = CartStore::new();
        cart.add_item(product(1, 10.0));

        cart.update_quantity(1, 5);
        cart.update_quantity(99, 3);
        cart.remove_item(42);

        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.total(), 50.0);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn clear_empties_everything() {
        let mut cart = CartStore::new();
        cart.add_item(product(1, 10.0));
        cart.clear_cart();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn add_sequences_count_calls_and_distinct_ids() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let mut cart = CartStore::new();
            let calls = rng.gen_range(0..40);
            let mut distinct = HashSet::new();

            for _ in 0..calls {
                let id = rng.gen_range(1..=8u64);
                distinct.insert(id);
                cart.add_item(product(id, id as f64 * 100.0));
            }

            assert_eq!(cart.item_count(), calls as u64);
            assert_eq!(cart.len(), distinct.len());
        }
    }

    #[test]
    fn totals_match_recomputation_after_every_mutation() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..100 {
            let mut cart = CartStore::new();

            for _ in 0..60 {
                let id = rng.gen_range(1..=6u64);
                match rng.gen_range(0..10) {
                    0..=4 => cart.add_item(product(id, (id * 2500) as f64)),
                    5..=7 => cart.update_quantity(id, rng.gen_range(-2..=9)),
                    8 => cart.remove_item(id),
                    _ => cart.clear_cart(),
                }

                assert_eq!(cart.total(), recomputed_total(&cart));
                assert_eq!(
                    cart.item_count(),
                    cart.items().map(|l| u64::from(l.quantity)).sum::<u64>()
                );
                assert!(cart.items().all(|l| l.quantity >= 1));
            }
        }
    }
}

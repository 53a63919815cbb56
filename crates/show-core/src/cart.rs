//! Shopping Cart
//!
//! Client-owned line items for the current browser session. Totals are
//! derived on every read and never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{Product, cents_to_dollars};

/// A product in the cart with a quantity of at least one
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    product: Product,
    quantity: u32,
}

impl CartItem {
    fn new(product: Product) -> Self {
        Self { product, quantity: 1 }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity
    pub fn line_total(&self) -> Decimal {
        cents_to_dollars(self.product.price_cents) * Decimal::from(self.quantity)
    }
}

/// Ordered collection of cart items, one per product id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product, merging with an existing line
    pub fn add_item(&mut self, product: &Product) {
        if let Some(item) = self.find_mut(&product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem::new(product.clone()));
        }
        tracing::debug!(product_id = %product.id, lines = self.items.len(), "Added to cart");
    }

    /// Drop a line; absent ids are ignored
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|item| item.product.id != product_id);
    }

    /// Set a line's quantity, clamped to a minimum of one
    ///
    /// Never removes the line; use [`Cart::remove_item`] for that.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        if let Some(item) = self.find_mut(product_id) {
            item.quantity = quantity.max(1);
        }
    }

    /// The "+" button
    pub fn increment(&mut self, product_id: &str) {
        if let Some(quantity) = self.quantity_of(product_id) {
            self.update_quantity(product_id, quantity.saturating_add(1));
        }
    }

    /// The "-" button; stops at one
    pub fn decrement(&mut self, product_id: &str) {
        if let Some(quantity) = self.quantity_of(product_id) {
            self.update_quantity(product_id, quantity.saturating_sub(1));
        }
    }

    /// Sum of `price * quantity` over all lines, rounded to cents
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .sum::<Decimal>()
            .round_dp(2)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines (the badge count)
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn quantity_of(&self, product_id: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product.id == product_id)
            .map(|item| item.quantity)
    }

    fn find_mut(&mut self, product_id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.product.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlobRef;
    use rust_decimal_macros::dec;

    fn product(id: &str, price_cents: u64) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            description: String::new(),
            price_cents,
            image: BlobRef::from_url(format!("https://cdn.example.com/{id}.png")),
        }
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let p1 = product("p1", 1999);
        cart.add_item(&p1);
        cart.add_item(&p1);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of("p1"), Some(2));
        assert_eq!(cart.total_price(), dec!(39.98));
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 500));
        cart.update_quantity("p1", 0);

        assert_eq!(cart.quantity_of("p1"), Some(1));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 500));
        cart.remove_item("nope");
        cart.update_quantity("nope", 7);
        cart.increment("nope");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_decrement_stops_at_one() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 500));
        cart.increment("p1");
        cart.decrement("p1");
        cart.decrement("p1");
        cart.decrement("p1");

        assert_eq!(cart.quantity_of("p1"), Some(1));
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 500));
        cart.add_item(&product("p2", 250));
        cart.remove_item("p1");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].product().id, "p2");
        assert_eq!(cart.total_price(), dec!(2.50));
    }

    #[test]
    fn test_total_matches_exact_sum_in_any_order() {
        let a = product("a", 1999);
        let b = product("b", 333);
        let c = product("c", 1);

        let mut forward = Cart::new();
        forward.add_item(&a);
        forward.add_item(&b);
        forward.add_item(&c);
        forward.update_quantity("b", 3);

        let mut backward = Cart::new();
        backward.add_item(&c);
        backward.add_item(&b);
        backward.update_quantity("b", 3);
        backward.add_item(&a);

        // 19.99 + 3 * 3.33 + 0.01
        assert_eq!(forward.total_price(), dec!(29.99));
        assert_eq!(forward.total_price(), backward.total_price());
    }

    #[test]
    fn test_quantities_never_drop_below_one() {
        let mut cart = Cart::new();
        let products: Vec<_> = (0..4).map(|i| product(&format!("p{i}"), 100 + i)).collect();

        for step in 0u32..200 {
            let p = &products[(step % 4) as usize];
            match step % 5 {
                0 | 1 => cart.add_item(p),
                2 => cart.update_quantity(&p.id, step % 3),
                3 => cart.decrement(&p.id),
                _ => {
                    if step % 7 == 0 {
                        cart.remove_item(&p.id);
                    }
                }
            }
            assert!(cart.items().iter().all(|item| item.quantity() >= 1));
        }
    }
}

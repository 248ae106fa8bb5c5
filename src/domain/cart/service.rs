//! Cart Manager.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, watch};
use tracing::debug;

use crate::{
    catalog::Meal,
    codec::Codec,
    domain::cart::models::{Cart, CartAction, CartLine},
    reload::Refresh,
    storage::{KeyValueStore, StorageError},
};

const CART_KEY: &str = "currentCart";

/// Owns the single draft order.
///
/// Every mutation is a read-modify-write against the backend and persists the
/// whole cart before returning; only then are the in-memory mirror and the
/// change channel updated. The manager never writes notifications — pairing a
/// mutation with its log entry is the call site's job (see
/// [`AppContext`](crate::context::AppContext)).
pub struct CartManager {
    codec: Codec,
    mirror: RwLock<Cart>,
    changed: watch::Sender<u64>,
}

impl CartManager {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (changed, _) = watch::channel(0);

        Self {
            codec: Codec::new(store),
            mirror: RwLock::new(Cart::default()),
            changed,
        }
    }

    /// Refresh the mirror from the backend and return the live cart.
    ///
    /// Views call this on activation; the mirror from a previous visit is
    /// possibly stale the instant another view could have written.
    pub async fn reload(&self) -> Cart {
        let cart: Cart = self.codec.load(CART_KEY).await;

        *self.mirror.write().await = cart.clone();

        cart
    }

    /// The possibly-stale mirror, for renders between refreshes.
    pub async fn cached(&self) -> Cart {
        self.mirror.read().await.clone()
    }

    /// A channel bumped after every persisted mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    /// Remove the meal's line if present, otherwise append it with quantity 1.
    pub async fn toggle(&self, meal: &Meal) -> Result<(Cart, CartAction), StorageError> {
        let mut cart: Cart = self.codec.load(CART_KEY).await;

        let action = if cart.remove_line(meal.id).is_some() {
            CartAction::Removed
        } else {
            cart.push_line(CartLine::new(meal.clone()));
            CartAction::Added
        };

        let cart = self.persist(cart).await?;

        Ok((cart, action))
    }

    /// Shift a line's quantity by `delta`; the quantity floors at 1 and the
    /// line is never dropped here. Unknown ids are a no-op.
    pub async fn adjust_quantity(&self, meal_id: u32, delta: i64) -> Result<Cart, StorageError> {
        let mut cart: Cart = self.codec.load(CART_KEY).await;

        cart.adjust_quantity(meal_id, delta);

        self.persist(cart).await
    }

    /// Drop a line entirely.
    pub async fn remove_line(&self, meal_id: u32) -> Result<Cart, StorageError> {
        let mut cart: Cart = self.codec.load(CART_KEY).await;

        cart.remove_line(meal_id);

        self.persist(cart).await
    }

    /// Install a full new cart, e.g. from a reorder draft.
    pub async fn replace(
        &self,
        lines: impl IntoIterator<Item = CartLine> + Send,
    ) -> Result<Cart, StorageError> {
        self.persist(Cart::from_lines(lines)).await
    }

    /// Empty the cart (after a successful checkout or an explicit clear).
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.persist(Cart::default()).await?;

        Ok(())
    }

    /// Wake subscribers after a mutation that bypassed [`persist`](Self::persist),
    /// e.g. a whole-backend wipe.
    pub(crate) fn notify_changed(&self) {
        self.changed.send_modify(|revision| *revision += 1);
    }

    async fn persist(&self, cart: Cart) -> Result<Cart, StorageError> {
        self.codec.save(CART_KEY, &cart).await?;

        debug!(lines = cart.len(), "cart persisted");

        *self.mirror.write().await = cart.clone();
        self.changed.send_modify(|revision| *revision += 1);

        Ok(cart)
    }
}

#[async_trait]
impl Refresh for CartManager {
    async fn refresh(&self) {
        self.reload().await;
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn toggle_adds_then_removes_the_same_line() -> TestResult {
        let ctx = TestContext::new();
        let meal = TestContext::meal(7, "Pad Thai", "8.50");

        let (cart, action) = ctx.app.cart.toggle(&meal).await?;

        assert_eq!(action, CartAction::Added);
        assert_eq!(cart.line(7).map(|l| l.quantity), Some(1));

        let (cart, action) = ctx.app.cart.toggle(&meal).await?;

        assert_eq!(action, CartAction::Removed);
        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn toggle_keeps_insertion_order() -> TestResult {
        let ctx = TestContext::new();

        ctx.app
            .cart
            .toggle(&TestContext::meal(1, "Ramen", "9.00"))
            .await?;
        let (cart, _) = ctx
            .app
            .cart
            .toggle(&TestContext::meal(2, "Gyoza", "4.50"))
            .await?;

        let ids: Vec<u32> = cart.lines().iter().map(|l| l.meal.id).collect();

        assert_eq!(ids, vec![1, 2]);

        Ok(())
    }

    #[tokio::test]
    async fn adjust_quantity_floors_at_one() -> TestResult {
        let ctx = TestContext::new();
        let meal = TestContext::meal(3, "Margherita", "11.00");

        ctx.app.cart.toggle(&meal).await?;
        let cart = ctx.app.cart.adjust_quantity(3, -1000).await?;

        assert_eq!(cart.line(3).map(|l| l.quantity), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn adjust_quantity_increments() -> TestResult {
        let ctx = TestContext::new();
        let meal = TestContext::meal(3, "Margherita", "11.00");

        ctx.app.cart.toggle(&meal).await?;
        ctx.app.cart.adjust_quantity(3, 1).await?;
        let cart = ctx.app.cart.adjust_quantity(3, 1).await?;

        assert_eq!(cart.line(3).map(|l| l.quantity), Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn remove_line_drops_only_that_line() -> TestResult {
        let ctx = TestContext::new();

        ctx.app
            .cart
            .toggle(&TestContext::meal(1, "Ramen", "9.00"))
            .await?;
        ctx.app
            .cart
            .toggle(&TestContext::meal(2, "Gyoza", "4.50"))
            .await?;

        let cart = ctx.app.cart.remove_line(1).await?;

        assert!(!cart.contains(1));
        assert!(cart.contains(2));

        Ok(())
    }

    #[tokio::test]
    async fn replace_installs_lines_with_defaulted_quantities() -> TestResult {
        let ctx = TestContext::new();

        let cart = ctx
            .app
            .cart
            .replace([CartLine {
                meal: TestContext::meal(5, "Bibimbap", "10.00"),
                quantity: 0,
            }])
            .await?;

        assert_eq!(cart.line(5).map(|l| l.quantity), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn clear_persists_an_empty_cart() -> TestResult {
        let ctx = TestContext::new();

        ctx.app
            .cart
            .toggle(&TestContext::meal(1, "Ramen", "9.00"))
            .await?;
        ctx.app.cart.clear().await?;

        // A freshly opened instance over the same backend must see the clear.
        assert!(ctx.reopen().cart.reload().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn mutation_is_visible_to_a_fresh_reload() -> TestResult {
        let ctx = TestContext::new();
        let meal = TestContext::meal(9, "Falafel Wrap", "6.75");

        ctx.app.cart.toggle(&meal).await?;

        let other_view = ctx.reopen();
        let cart = other_view.cart.reload().await;

        assert!(cart.contains(9));

        Ok(())
    }

    #[tokio::test]
    async fn cached_reflects_the_last_persisted_mutation() -> TestResult {
        let ctx = TestContext::new();
        let meal = TestContext::meal(4, "Tacos", "7.25");

        ctx.app.cart.toggle(&meal).await?;

        assert!(ctx.app.cart.cached().await.contains(4));

        Ok(())
    }

    #[tokio::test]
    async fn subscribers_see_a_revision_bump_per_mutation() -> TestResult {
        let ctx = TestContext::new();
        let revisions = ctx.app.cart.subscribe();

        ctx.app
            .cart
            .toggle(&TestContext::meal(1, "Ramen", "9.00"))
            .await?;

        assert!(revisions.has_changed()?);

        Ok(())
    }
}

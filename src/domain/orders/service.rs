//! Order Ledger.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::{RwLock, watch};
use tracing::{Span, info};

use crate::{
    codec::Codec,
    domain::{
        cart::{Cart, CartLine},
        next_id,
        orders::{errors::OrdersServiceError, models::Order},
    },
    reload::Refresh,
    storage::{KeyValueStore, StorageError},
};

use super::models::Customer;

const ORDERS_KEY: &str = "orders";

/// Owns the append-only history of committed orders.
///
/// Orders are stored in insertion order, newest last; callers wanting recency
/// reverse at the presentation boundary. The only in-place mutation is a
/// one-shot rating; everything else is append or bulk clear. There is no
/// partial-record update primitive: every mutation rewrites the full history.
pub struct OrderLedger {
    codec: Codec,
    mirror: RwLock<Vec<Order>>,
    changed: watch::Sender<u64>,
}

impl OrderLedger {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (changed, _) = watch::channel(0);

        Self {
            codec: Codec::new(store),
            mirror: RwLock::new(Vec::new()),
            changed,
        }
    }

    /// Refresh the mirror from the backend and return the history.
    pub async fn reload(&self) -> Vec<Order> {
        let orders: Vec<Order> = self.codec.load(ORDERS_KEY).await;

        *self.mirror.write().await = orders.clone();

        orders
    }

    /// The possibly-stale mirror.
    pub async fn cached(&self) -> Vec<Order> {
        self.mirror.read().await.clone()
    }

    /// A channel bumped after every persisted mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    /// Turn a cart snapshot into a committed order.
    ///
    /// Validation happens before anything is persisted. On success the order is
    /// appended and returned for the confirmation view; clearing the cart and
    /// appending the checkout notification remain the caller's obligation (see
    /// [`AppContext::checkout`](crate::context::AppContext::checkout)).
    ///
    /// # Errors
    ///
    /// [`OrdersServiceError::EmptyCart`] for a cart with no lines,
    /// [`OrdersServiceError::Validation`] listing every blank customer field.
    #[tracing::instrument(skip_all, fields(order_id = tracing::field::Empty, lines = cart.len()))]
    pub async fn commit(
        &self,
        cart: &Cart,
        customer: &Customer,
    ) -> Result<Order, OrdersServiceError> {
        if cart.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let field_errors = customer.field_errors();
        if !field_errors.is_empty() {
            return Err(OrdersServiceError::Validation(field_errors));
        }

        let mut orders: Vec<Order> = self.codec.load(ORDERS_KEY).await;

        let order = Order {
            id: next_id(orders.iter().map(|o| o.id).max()),
            lines: cart.lines().to_vec(),
            total: cart.total(),
            created_at: Timestamp::now(),
            customer: customer.clone(),
            rating: None,
        };

        orders.push(order.clone());
        self.persist(orders).await?;

        Span::current().record("order_id", order.id);
        info!("order committed");

        Ok(order)
    }

    /// Rate an order, once.
    ///
    /// # Errors
    ///
    /// [`OrdersServiceError::RatingOutOfRange`] unless `stars` is in 1..=5,
    /// [`OrdersServiceError::NotFound`] for an unknown id (including an order
    /// removed by a concurrent [`clear_all`](Self::clear_all)), and
    /// [`OrdersServiceError::AlreadyRated`] if a rating is already set.
    pub async fn rate(&self, order_id: i64, stars: u8) -> Result<Order, OrdersServiceError> {
        if !(1..=5).contains(&stars) {
            return Err(OrdersServiceError::RatingOutOfRange(stars));
        }

        let mut orders: Vec<Order> = self.codec.load(ORDERS_KEY).await;

        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(OrdersServiceError::NotFound)?;

        if order.rating.is_some() {
            return Err(OrdersServiceError::AlreadyRated);
        }

        order.rating = Some(stars);
        let rated = order.clone();

        self.persist(orders).await?;

        Ok(rated)
    }

    /// A fresh line sequence copied from a past order, ready for
    /// [`CartManager::replace`](crate::domain::cart::CartManager::replace).
    /// Does not touch the cart itself.
    ///
    /// # Errors
    ///
    /// [`OrdersServiceError::NotFound`] for an unknown id.
    pub async fn reorder_draft(&self, order_id: i64) -> Result<Vec<CartLine>, OrdersServiceError> {
        let orders: Vec<Order> = self.codec.load(ORDERS_KEY).await;

        let order = orders
            .iter()
            .find(|o| o.id == order_id)
            .ok_or(OrdersServiceError::NotFound)?;

        let lines = order
            .lines
            .iter()
            .cloned()
            .map(|mut line| {
                line.quantity = line.quantity.max(1);
                line
            })
            .collect();

        Ok(lines)
    }

    /// Destructive, irreversible history wipe.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        self.codec.remove(ORDERS_KEY).await?;

        self.mirror.write().await.clear();
        self.changed.send_modify(|revision| *revision += 1);

        Ok(())
    }

    /// Wake subscribers after a mutation that bypassed [`persist`](Self::persist),
    /// e.g. a whole-backend wipe.
    pub(crate) fn notify_changed(&self) {
        self.changed.send_modify(|revision| *revision += 1);
    }

    async fn persist(&self, orders: Vec<Order>) -> Result<(), StorageError> {
        self.codec.save(ORDERS_KEY, &orders).await?;

        *self.mirror.write().await = orders;
        self.changed.send_modify(|revision| *revision += 1);

        Ok(())
    }
}

#[async_trait]
impl Refresh for OrderLedger {
    async fn refresh(&self) {
        self.reload().await;
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    async fn committed_order(ctx: &TestContext) -> Result<Order, OrdersServiceError> {
        let cart = Cart::from_lines([CartLine::new(TestContext::meal(1, "Ramen", "9.00"))]);

        ctx.app.orders.commit(&cart, &TestContext::customer()).await
    }

    #[tokio::test]
    async fn commit_rejects_an_empty_cart() {
        let ctx = TestContext::new();

        let result = ctx
            .app
            .orders
            .commit(&Cart::default(), &TestContext::customer())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );

        assert!(ctx.app.orders.reload().await.is_empty());
    }

    #[tokio::test]
    async fn commit_rejects_blank_customer_before_persisting() {
        let ctx = TestContext::new();
        let cart = Cart::from_lines([CartLine::new(TestContext::meal(1, "Ramen", "9.00"))]);

        let result = ctx.app.orders.commit(&cart, &Customer::default()).await;

        match result {
            Err(OrdersServiceError::Validation(fields)) => assert_eq!(fields.len(), 5),
            other => panic!("expected Validation, got {other:?}"),
        }

        assert!(ctx.app.orders.reload().await.is_empty());
    }

    #[tokio::test]
    async fn commit_snapshots_lines_and_recomputes_total() -> TestResult {
        let ctx = TestContext::new();
        let cart = Cart::from_lines([
            CartLine {
                meal: TestContext::meal(1, "Ramen", "9.00"),
                quantity: 2,
            },
            CartLine::new(TestContext::meal(2, "Gyoza", "4.50")),
        ]);

        let order = ctx
            .app
            .orders
            .commit(&cart, &TestContext::customer())
            .await?;

        assert_eq!(order.lines, cart.lines());
        assert_eq!(order.total, "22.50".parse::<rust_decimal::Decimal>()?);
        assert!(order.rating.is_none());

        let history = ctx.app.orders.reload().await;

        assert_eq!(history.len(), 1);
        assert_eq!(history[0], order);

        Ok(())
    }

    #[tokio::test]
    async fn back_to_back_commits_get_strictly_increasing_ids() -> TestResult {
        let ctx = TestContext::new();

        let first = committed_order(&ctx).await?;
        let second = committed_order(&ctx).await?;

        assert!(second.id > first.id);

        Ok(())
    }

    #[tokio::test]
    async fn rating_transitions_once_and_then_sticks() -> TestResult {
        let ctx = TestContext::new();
        let order = committed_order(&ctx).await?;

        let rated = ctx.app.orders.rate(order.id, 4).await?;

        assert_eq!(rated.rating, Some(4));

        let result = ctx.app.orders.rate(order.id, 5).await;

        assert!(
            matches!(result, Err(OrdersServiceError::AlreadyRated)),
            "expected AlreadyRated, got {result:?}"
        );

        let history = ctx.reopen().orders.reload().await;

        assert_eq!(history[0].rating, Some(4));

        Ok(())
    }

    #[tokio::test]
    async fn rate_unknown_order_returns_not_found() {
        let ctx = TestContext::new();

        let result = ctx.app.orders.rate(12345, 3).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn rate_out_of_range_is_rejected() -> TestResult {
        let ctx = TestContext::new();
        let order = committed_order(&ctx).await?;

        for stars in [0, 6] {
            let result = ctx.app.orders.rate(order.id, stars).await;

            assert!(
                matches!(result, Err(OrdersServiceError::RatingOutOfRange(s)) if s == stars),
                "expected RatingOutOfRange({stars}), got {result:?}"
            );
        }

        let history = ctx.app.orders.reload().await;

        assert!(history[0].rating.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn rate_after_history_clear_returns_not_found() -> TestResult {
        let ctx = TestContext::new();
        let order = committed_order(&ctx).await?;

        ctx.app.orders.clear_all().await?;

        let result = ctx.app.orders.rate(order.id, 5).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound after clear, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reorder_draft_copies_line_pairs() -> TestResult {
        let ctx = TestContext::new();
        let cart = Cart::from_lines([
            CartLine {
                meal: TestContext::meal(1, "Ramen", "9.00"),
                quantity: 3,
            },
            CartLine::new(TestContext::meal(2, "Gyoza", "4.50")),
        ]);

        let order = ctx
            .app
            .orders
            .commit(&cart, &TestContext::customer())
            .await?;

        let draft = ctx.app.orders.reorder_draft(order.id).await?;

        let pairs: Vec<(u32, u32)> = draft.iter().map(|l| (l.meal.id, l.quantity)).collect();

        assert_eq!(pairs, vec![(1, 3), (2, 1)]);

        Ok(())
    }

    #[tokio::test]
    async fn reorder_draft_unknown_order_returns_not_found() {
        let ctx = TestContext::new();

        let result = ctx.app.orders.reorder_draft(999).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn clear_all_empties_history_for_every_instance() -> TestResult {
        let ctx = TestContext::new();
        committed_order(&ctx).await?;

        ctx.app.orders.clear_all().await?;

        assert!(ctx.app.orders.cached().await.is_empty());
        assert!(ctx.reopen().orders.reload().await.is_empty());

        Ok(())
    }
}

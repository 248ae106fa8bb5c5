//! App Context

use std::sync::Arc;

use crate::{
    catalog::Meal,
    domain::{
        cart::{Cart, CartAction, CartManager},
        notifications::NotificationLog,
        orders::{Customer, Order, OrderLedger, OrdersServiceError},
    },
    reload::ViewBinding,
    settings::Settings,
    storage::{KeyValueStore, StorageError},
};

/// Explicit store instances over one shared backend, built once by the app
/// shell and passed to each view — no ambient globals.
///
/// The UI-event methods here are the call sites that pair every mutation with
/// exactly one notification; the managers themselves never log, so notification
/// policy stays in one place.
#[derive(Clone)]
pub struct AppContext {
    pub cart: Arc<CartManager>,
    pub orders: Arc<OrderLedger>,
    pub notifications: Arc<NotificationLog>,
    pub settings: Arc<Settings>,
    store: Arc<dyn KeyValueStore>,
}

impl AppContext {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            cart: Arc::new(CartManager::new(store.clone())),
            orders: Arc::new(OrderLedger::new(store.clone())),
            notifications: Arc::new(NotificationLog::new(store.clone())),
            settings: Arc::new(Settings::new(store.clone())),
            store,
        }
    }

    /// A binding over all three shared collections, for views that show
    /// everything (activation refreshes each store).
    #[must_use]
    pub fn binding(&self) -> ViewBinding {
        ViewBinding::new()
            .watch(self.cart.clone())
            .watch(self.orders.clone())
            .watch(self.notifications.clone())
    }

    /// Add or remove a meal from the cart, logging what happened.
    pub async fn toggle_meal(&self, meal: &Meal) -> Result<(Cart, CartAction), StorageError> {
        let (cart, action) = self.cart.toggle(meal).await?;

        let message = match action {
            CartAction::Added => format!("Added \"{}\" to cart", meal.name),
            CartAction::Removed => format!("Removed \"{}\" from cart", meal.name),
        };
        self.notifications.append(message).await?;

        Ok((cart, action))
    }

    /// Shift a line's quantity, logging the update.
    pub async fn adjust_quantity(&self, meal_id: u32, delta: i64) -> Result<Cart, StorageError> {
        let cart = self.cart.adjust_quantity(meal_id, delta).await?;

        self.notifications
            .append(format!("Updated quantity for item #{meal_id}"))
            .await?;

        Ok(cart)
    }

    /// Drop a cart line, logging the removal.
    pub async fn remove_from_cart(&self, meal_id: u32) -> Result<Cart, StorageError> {
        let cart = self.cart.remove_line(meal_id).await?;

        self.notifications
            .append(format!("Removed item #{meal_id} from cart"))
            .await?;

        Ok(cart)
    }

    /// Commit the live cart as an order, then clear the cart and log the
    /// checkout — the side-effect contract of a successful commit.
    ///
    /// The cart is re-read from the backend first, never taken from a view's
    /// mirror, so a checkout can never commit a stale snapshot.
    ///
    /// # Errors
    ///
    /// Propagates [`OrdersServiceError`] from the commit; nothing is persisted
    /// and no notification is logged when the commit fails.
    pub async fn checkout(&self, customer: &Customer) -> Result<Order, OrdersServiceError> {
        let cart = self.cart.reload().await;

        let order = self.orders.commit(&cart, customer).await?;

        self.cart.clear().await?;
        self.notifications
            .append(format!("Completed order on {}", order.created_at_display()))
            .await?;

        Ok(order)
    }

    /// Install a past order's lines as the new cart, logging the reorder.
    ///
    /// # Errors
    ///
    /// [`OrdersServiceError::NotFound`] for an unknown order id.
    pub async fn reorder(&self, order_id: i64) -> Result<Cart, OrdersServiceError> {
        let lines = self.orders.reorder_draft(order_id).await?;

        let cart = self.cart.replace(lines).await?;

        self.notifications
            .append(format!("Reordered order #{order_id}"))
            .await?;

        Ok(cart)
    }

    /// Rate a past order, logging the rating.
    pub async fn rate_order(&self, order_id: i64, stars: u8) -> Result<Order, OrdersServiceError> {
        let order = self.orders.rate(order_id, stars).await?;

        self.notifications
            .append(format!("Rated order #{order_id}: {stars} stars"))
            .await?;

        Ok(order)
    }

    /// Wipe all past orders. Irreversible; confirmation is the UI's problem.
    pub async fn clear_history(&self) -> Result<(), StorageError> {
        self.orders.clear_all().await
    }

    /// Reset the whole app: every backend key removed, every mirror refreshed
    /// and every subscriber woken. Irreversible.
    pub async fn reset(&self) -> Result<(), StorageError> {
        self.store.clear().await?;

        self.cart.reload().await;
        self.orders.reload().await;
        self.notifications.reload().await;

        // The wipe went around persist(), so bump the channels by hand.
        self.cart.notify_changed();
        self.orders.notify_changed();
        self.notifications.notify_changed();

        Ok(())
    }
}

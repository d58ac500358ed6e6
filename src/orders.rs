use std::sync::Arc;

use tracing::{error, info};

use crate::cart::CartStorage;
use crate::error::{Error, Result};
use crate::models::Order;
use crate::session;
use crate::store::{cart_key, read_collection, write_collection, KeyValueStore, ORDERS_KEY};

pub struct OrderStorage {
    store: Arc<dyn KeyValueStore>,
}

impl OrderStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Turns the logged-in user's cart into a new order and empties the
    /// cart. The order write and the cart clear hit two separate keys; when
    /// the clear fails the freshly appended order is rolled back so the two
    /// collections stay consistent.
    pub fn checkout(&self) -> Result<Order> {
        let user = session::require_user(self.store.as_ref())?;

        let items = CartStorage::new(self.store.clone()).items()?;
        if items.is_empty() {
            return Err(Error::validation("The cart is empty"));
        }

        let order = Order::new(&user, items);
        let mut orders = self.all()?;
        orders.push(order.clone());
        write_collection(self.store.as_ref(), ORDERS_KEY, &orders)?;

        if let Err(clear_err) = self.store.remove(&cart_key(&user.id)) {
            orders.pop();
            if let Err(rollback_err) = write_collection(self.store.as_ref(), ORDERS_KEY, &orders) {
                // The order is recorded but the cart survived; nothing more
                // can be done from here.
                error!(order_id = %order.id, %rollback_err, "checkout rollback failed");
            }
            return Err(clear_err);
        }

        info!(order_id = %order.id, total = order.total, "order placed");
        Ok(order)
    }

    /// The logged-in user's orders, most recent first.
    pub fn user_orders(&self) -> Result<Vec<Order>> {
        let user = session::require_user(self.store.as_ref())?;

        let mut orders: Vec<Order> = self
            .all()?
            .into_iter()
            .filter(|o| o.user_id == user.id)
            .collect();
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(orders)
    }

    /// Every order across all users, in insertion order.
    pub fn all(&self) -> Result<Vec<Order>> {
        read_collection(self.store.as_ref(), ORDERS_KEY)
    }
}

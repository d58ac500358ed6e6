use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{CartItem, Product};
use crate::session;
use crate::store::{cart_key, read_collection, write_collection, KeyValueStore};

/// Cart operations act on the logged-in user's cart; every call fails with
/// `NotLoggedIn` when there is no current user.
pub struct CartStorage {
    store: Arc<dyn KeyValueStore>,
}

impl CartStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Adds one unit of the product. An existing entry is bumped instead of
    /// duplicated; a new entry snapshots name, price and image as they are
    /// right now.
    pub fn add(&self, product: &Product) -> Result<()> {
        let user = session::require_user(self.store.as_ref())?;
        let mut items = self.load(&user.id)?;

        if let Some(item) = items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity += 1;
        } else {
            items.push(CartItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                quantity: 1,
                image: product.image.clone(),
            });
        }

        self.save(&user.id, &items)
    }

    /// Overwrites the quantity of an existing entry. Quantities below one
    /// are rejected and leave the cart untouched.
    pub fn update_quantity(&self, product_id: &str, quantity: u32) -> Result<()> {
        if quantity < 1 {
            return Err(Error::validation("Quantity must be at least 1"));
        }

        let user = session::require_user(self.store.as_ref())?;
        let mut items = self.load(&user.id)?;

        let Some(item) = items.iter_mut().find(|i| i.product_id == product_id) else {
            return Err(Error::NotFound("Cart item"));
        };
        item.quantity = quantity;

        self.save(&user.id, &items)
    }

    /// Removing something that is not in the cart is not an error.
    pub fn remove(&self, product_id: &str) -> Result<()> {
        let user = session::require_user(self.store.as_ref())?;
        let mut items = self.load(&user.id)?;
        items.retain(|i| i.product_id != product_id);
        self.save(&user.id, &items)
    }

    pub fn clear(&self) -> Result<()> {
        let user = session::require_user(self.store.as_ref())?;
        self.store.remove(&cart_key(&user.id))
    }

    pub fn items(&self) -> Result<Vec<CartItem>> {
        let user = session::require_user(self.store.as_ref())?;
        self.load(&user.id)
    }

    pub fn total(&self) -> Result<f64> {
        Ok(self
            .items()?
            .iter()
            .map(|i| i.price * f64::from(i.quantity))
            .sum())
    }

    pub fn item_count(&self) -> Result<u32> {
        Ok(self.items()?.iter().map(|i| i.quantity).sum())
    }

    fn load(&self, user_id: &str) -> Result<Vec<CartItem>> {
        read_collection(self.store.as_ref(), &cart_key(user_id))
    }

    fn save(&self, user_id: &str, items: &[CartItem]) -> Result<()> {
        write_collection(self.store.as_ref(), &cart_key(user_id), items)
    }
}

use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Product, ProductInput};
use crate::store::{read_collection, write_collection, KeyValueStore, PRODUCTS_KEY};

const MIN_DESCRIPTION_LENGTH: usize = 10;

pub struct ProductStorage {
    store: Arc<dyn KeyValueStore>,
}

impl ProductStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn create(&self, input: ProductInput) -> Result<Product> {
        validate_fields(&input)?;

        let mut products = self.list()?;
        if products
            .iter()
            .any(|p| p.name.to_lowercase() == input.name.to_lowercase())
        {
            return Err(Error::validation("A product with this name already exists"));
        }

        let product = Product::new(input);
        products.push(product.clone());
        self.save(&products)?;

        info!(name = %product.name, "product created");
        Ok(product)
    }

    /// Replaces every field except the id.
    pub fn update(&self, id: &str, input: ProductInput) -> Result<()> {
        validate_fields(&input)?;

        let mut products = self.list()?;
        if products
            .iter()
            .any(|p| p.id != id && p.name.to_lowercase() == input.name.to_lowercase())
        {
            return Err(Error::validation(
                "Another product with this name already exists",
            ));
        }

        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Err(Error::NotFound("Product"));
        };
        product.name = input.name;
        product.price = input.price;
        product.description = input.description;
        product.category_id = input.category_id;
        product.image = input.image;

        self.save(&products)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let mut products = self.list()?;
        let before = products.len();
        products.retain(|p| p.id != id);

        if products.len() == before {
            return Err(Error::NotFound("Product"));
        }

        self.save(&products)
    }

    pub fn list(&self) -> Result<Vec<Product>> {
        read_collection(self.store.as_ref(), PRODUCTS_KEY)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.list()?.into_iter().find(|p| p.id == id))
    }

    fn save(&self, products: &[Product]) -> Result<()> {
        write_collection(self.store.as_ref(), PRODUCTS_KEY, products)
    }
}

fn validate_fields(input: &ProductInput) -> Result<()> {
    if input.price <= 0.0 {
        return Err(Error::validation("Price must be a positive number"));
    }
    if let Some(description) = &input.description {
        if description.chars().count() < MIN_DESCRIPTION_LENGTH {
            return Err(Error::validation(
                "Description must be at least 10 characters long",
            ));
        }
    }
    Ok(())
}

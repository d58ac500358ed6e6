use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::models::Category;
use crate::store::{read_collection, write_collection, KeyValueStore, CATEGORIES_KEY};

pub struct CategoryStorage {
    store: Arc<dyn KeyValueStore>,
}

impl CategoryStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Category names are unique regardless of case.
    pub fn create(&self, name: &str) -> Result<Category> {
        let mut categories = self.list()?;

        if categories
            .iter()
            .any(|c| c.name.to_lowercase() == name.to_lowercase())
        {
            return Err(Error::validation("A category with this name already exists"));
        }

        let category = Category::new(name.to_string());
        categories.push(category.clone());
        self.save(&categories)?;

        info!(name = %category.name, "category created");
        Ok(category)
    }

    pub fn update(&self, id: &str, name: &str) -> Result<()> {
        let mut categories = self.list()?;

        // Uniqueness is checked against every other category
        if categories
            .iter()
            .any(|c| c.id != id && c.name.to_lowercase() == name.to_lowercase())
        {
            return Err(Error::validation(
                "Another category with this name already exists",
            ));
        }

        let Some(category) = categories.iter_mut().find(|c| c.id == id) else {
            return Err(Error::NotFound("Category"));
        };
        category.name = name.to_string();

        self.save(&categories)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let mut categories = self.list()?;
        let before = categories.len();
        categories.retain(|c| c.id != id);

        if categories.len() == before {
            return Err(Error::NotFound("Category"));
        }

        self.save(&categories)
    }

    pub fn list(&self) -> Result<Vec<Category>> {
        read_collection(self.store.as_ref(), CATEGORIES_KEY)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Category>> {
        Ok(self.list()?.into_iter().find(|c| c.id == id))
    }

    fn save(&self, categories: &[Category]) -> Result<()> {
        write_collection(self.store.as_ref(), CATEGORIES_KEY, categories)
    }
}

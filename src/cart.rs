use log::info;
use std::time::Duration;
use tokio::time::sleep;

use crate::model::Recipe;

/// Maximum number of recipes in one order.
pub const ORDER_CAPACITY: usize = 3;

/// Recipes picked for ordering. Lives for the process only.
#[derive(Debug, Clone)]
pub struct OrderCart {
    items: Vec<Recipe>,
    confirmation_delay: Duration,
}

impl Default for OrderCart {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl OrderCart {
    pub fn new(confirmation_delay: Duration) -> Self {
        Self {
            items: Vec::with_capacity(ORDER_CAPACITY),
            confirmation_delay,
        }
    }

    pub fn items(&self) -> &[Recipe] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn can_add(&self) -> bool {
        self.items.len() < ORDER_CAPACITY
    }

    /// Append a recipe. Fails when the cart is full or already holds this id.
    pub fn add(&mut self, recipe: &Recipe) -> bool {
        if !self.can_add() || self.items.iter().any(|r| r.id == recipe.id) {
            return false;
        }
        self.items.push(recipe.clone());
        true
    }

    pub fn remove(&mut self, recipe: &Recipe) {
        self.items.retain(|r| r.id != recipe.id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Place the order. There is no backend: after a short confirmation delay
    /// the cart is emptied and the order reported as accepted.
    pub async fn submit(&mut self) -> bool {
        sleep(self.confirmation_delay).await;
        self.confirm()
    }

    pub fn confirmation_delay(&self) -> Duration {
        self.confirmation_delay
    }

    /// Accept the order and empty the cart
    pub fn confirm(&mut self) -> bool {
        info!("Order of {} recipes confirmed", self.items.len());
        self.clear();
        true
    }
}

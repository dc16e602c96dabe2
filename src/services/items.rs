use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::db::{DbPool, TxScope};
use crate::entities::item::{self, ItemKind};
use crate::errors::ServiceError;
use crate::repositories::{ItemRepository, NewItem};

/// Fields an item edit may change. Everything else stays as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItem {
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

/// Service for the item catalogue
#[derive(Clone)]
pub struct ItemService {
    db: Arc<DbPool>,
    items: ItemRepository,
}

impl ItemService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            db,
            items: ItemRepository::new(),
        }
    }

    #[instrument(skip(self, item), fields(name = %item.name))]
    pub async fn save_item(&self, item: NewItem) -> Result<i64, ServiceError> {
        validate_item(&item.name, item.price, item.stock_quantity)?;

        let scope = TxScope::begin(&self.db).await?;
        let saved = self.items.save(&scope, item).await?;
        scope.commit().await?;

        info!(item_id = saved.id, "item saved");
        Ok(saved.id)
    }

    /// Loads the item and applies `changes` to it inside one transaction.
    #[instrument(skip(self, changes))]
    pub async fn update_item(
        &self,
        item_id: i64,
        changes: UpdateItem,
    ) -> Result<item::Model, ServiceError> {
        validate_item(&changes.name, changes.price, changes.stock_quantity)?;

        let scope = TxScope::begin(&self.db).await?;
        let mut item = self
            .items
            .find_one(&scope, item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("item", item_id))?
            .as_ref()
            .clone();

        item.name = changes.name;
        item.price = changes.price;
        item.stock_quantity = changes.stock_quantity;
        match item.kind() {
            ItemKind::Book { .. } => {
                item.author = changes.author;
                item.isbn = changes.isbn;
            }
        }

        let updated = self.items.update(&scope, item).await?;
        scope.commit().await?;

        info!(item_id, "item updated");
        Ok(updated.as_ref().clone())
    }

    #[instrument(skip(self))]
    pub async fn find_items(&self) -> Result<Vec<item::Model>, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let items = self.items.find_all(&scope).await?;
        scope.commit().await?;
        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, item_id: i64) -> Result<item::Model, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let item = self
            .items
            .find_one(&scope, item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("item", item_id))?;
        scope.commit().await?;
        Ok(item.as_ref().clone())
    }
}

fn validate_item(name: &str, price: Decimal, stock_quantity: i32) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "item name is required".to_string(),
        ));
    }
    if price.is_sign_negative() {
        return Err(ServiceError::ValidationError(
            "price must not be negative".to_string(),
        ));
    }
    if stock_quantity < 0 {
        return Err(ServiceError::ValidationError(
            "stock quantity must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("", dec!(1000), 1)]
    #[case("JPA", dec!(-1), 1)]
    #[case("JPA", dec!(1000), -5)]
    fn invalid_items_are_rejected(
        #[case] name: &str,
        #[case] price: Decimal,
        #[case] stock: i32,
    ) {
        assert_matches!(
            validate_item(name, price, stock),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn zero_price_and_stock_are_allowed() {
        assert!(validate_item("free book", Decimal::ZERO, 0).is_ok());
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use tracing::debug;

use crate::db::TxScope;
use crate::entities::item::{self, Entity as Item, ItemKind};
use crate::errors::ServiceError;

use super::{find_in_scope, id_batches, MAX_RESULTS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ItemRepository;

impl ItemRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn save(&self, scope: &TxScope, item: NewItem) -> Result<Arc<item::Model>, ServiceError> {
        scope.ensure_writable()?;
        let NewItem {
            name,
            price,
            stock_quantity,
            kind,
        } = item;
        let mut active = item::ActiveModel {
            dtype: Set(kind.item_type()),
            name: Set(name),
            price: Set(price),
            stock_quantity: Set(stock_quantity),
            ..Default::default()
        };
        apply_kind(&mut active, kind);

        let saved = active.insert(scope.conn()).await?;
        debug!(item_id = saved.id, "item inserted");
        Ok(scope.identity().register(saved.id, saved))
    }

    /// Writes every mutable column of `item` and refreshes the identity map entry.
    pub async fn update(
        &self,
        scope: &TxScope,
        item: item::Model,
    ) -> Result<Arc<item::Model>, ServiceError> {
        scope.ensure_writable()?;
        let kind = item.kind();
        let mut active = item::ActiveModel {
            id: ActiveValue::Unchanged(item.id),
            dtype: Set(item.dtype),
            name: Set(item.name),
            price: Set(item.price),
            stock_quantity: Set(item.stock_quantity),
            ..Default::default()
        };
        apply_kind(&mut active, kind);

        let updated = active.update(scope.conn()).await?;
        Ok(scope.identity().register(updated.id, updated))
    }

    pub async fn find_one(
        &self,
        scope: &TxScope,
        id: i64,
    ) -> Result<Option<Arc<item::Model>>, ServiceError> {
        find_in_scope::<Item>(scope, id).await
    }

    pub async fn find_all(&self, scope: &TxScope) -> Result<Vec<item::Model>, ServiceError> {
        Ok(Item::find()
            .order_by_asc(item::Column::Id)
            .limit(MAX_RESULTS)
            .all(scope.conn())
            .await?)
    }

    /// Loads the given items, skipping ids already held by the scope and
    /// fetching the rest with IN queries of at most `batch_size` ids.
    pub async fn find_by_ids(
        &self,
        scope: &TxScope,
        ids: &[i64],
        batch_size: usize,
    ) -> Result<HashMap<i64, Arc<item::Model>>, ServiceError> {
        let mut found = HashMap::with_capacity(ids.len());
        let mut missing = Vec::new();
        for &id in ids {
            match scope.identity().get::<item::Model>(id) {
                Some(cached) => {
                    found.insert(id, cached);
                }
                None if !missing.contains(&id) => missing.push(id),
                None => {}
            }
        }

        for batch in id_batches(&missing, batch_size) {
            let rows = Item::find()
                .filter(item::Column::Id.is_in(batch.iter().copied()))
                .all(scope.conn())
                .await?;
            for row in rows {
                let id = row.id;
                found.insert(id, scope.identity().register(id, row));
            }
        }

        Ok(found)
    }

    /// Like [`ItemRepository::find_by_ids`] but fails when any id is unknown,
    /// returning owned copies ready for mutation. No row lock is taken.
    pub async fn find_all_required(
        &self,
        scope: &TxScope,
        ids: &[i64],
        batch_size: usize,
    ) -> Result<HashMap<i64, item::Model>, ServiceError> {
        let found = self.find_by_ids(scope, ids, batch_size).await?;
        if let Some(&missing) = ids.iter().find(|id| !found.contains_key(id)) {
            return Err(ServiceError::not_found("item", missing));
        }
        Ok(found
            .into_iter()
            .map(|(id, item)| (id, item.as_ref().clone()))
            .collect())
    }
}

fn apply_kind(active: &mut item::ActiveModel, kind: ItemKind) {
    match kind {
        ItemKind::Book { author, isbn } => {
            active.author = Set(author);
            active.isbn = Set(isbn);
        }
    }
}

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};

use crate::db::TxScope;
use crate::entities::{category, category_item, item};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryRepository;

impl CategoryRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn save(&self, scope: &TxScope, name: &str) -> Result<category::Model, ServiceError> {
        scope.ensure_writable()?;
        Ok(category::ActiveModel {
            name: Set(name.to_string()),
            parent_id: Set(None),
            ..Default::default()
        }
        .insert(scope.conn())
        .await?)
    }

    /// Re-parents `child` under `parent`.
    pub async fn add_child_category(
        &self,
        scope: &TxScope,
        parent: &category::Model,
        child: &category::Model,
    ) -> Result<category::Model, ServiceError> {
        scope.ensure_writable()?;
        if parent.id == child.id {
            return Err(ServiceError::BadRequest(
                "a category cannot be its own parent".to_string(),
            ));
        }
        let mut active: category::ActiveModel = child.clone().into();
        active.parent_id = Set(Some(parent.id));
        Ok(active.update(scope.conn()).await?)
    }

    pub async fn add_item(
        &self,
        scope: &TxScope,
        category: &category::Model,
        item: &item::Model,
    ) -> Result<(), ServiceError> {
        scope.ensure_writable()?;
        category_item::Entity::insert(category_item::ActiveModel {
            category_id: Set(category.id),
            item_id: Set(item.id),
        })
        .exec_without_returning(scope.conn())
        .await?;
        Ok(())
    }

    pub async fn find_children(
        &self,
        scope: &TxScope,
        category_id: i64,
    ) -> Result<Vec<category::Model>, ServiceError> {
        Ok(category::Entity::find()
            .filter(category::Column::ParentId.eq(category_id))
            .order_by_asc(category::Column::Id)
            .all(scope.conn())
            .await?)
    }

    pub async fn find_items(
        &self,
        scope: &TxScope,
        category_id: i64,
    ) -> Result<Vec<item::Model>, ServiceError> {
        Ok(item::Entity::find()
            .join(JoinType::InnerJoin, item::Relation::CategoryItem.def())
            .filter(category_item::Column::CategoryId.eq(category_id))
            .order_by_asc(item::Column::Id)
            .all(scope.conn())
            .await?)
    }

    pub async fn find_categories_of_item(
        &self,
        scope: &TxScope,
        item_id: i64,
    ) -> Result<Vec<category::Model>, ServiceError> {
        Ok(category::Entity::find()
            .join(JoinType::InnerJoin, category::Relation::CategoryItem.def())
            .filter(category_item::Column::ItemId.eq(item_id))
            .order_by_asc(category::Column::Id)
            .all(scope.conn())
            .await?)
    }
}

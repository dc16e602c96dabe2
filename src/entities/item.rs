use crate::errors::ServiceError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Discriminator of the single-table item hierarchy.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(31))")]
pub enum ItemType {
    #[sea_orm(string_value = "B")]
    #[serde(rename = "B")]
    #[strum(serialize = "B")]
    Book,
}

/// Variant-specific attributes of an item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "dtype")]
pub enum ItemKind {
    #[serde(rename = "B")]
    Book {
        author: Option<String>,
        isbn: Option<String>,
    },
}

impl ItemKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemKind::Book { .. } => ItemType::Book,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "item")]
#[schema(as = Item)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub dtype: ItemType,
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
    #[sea_orm(has_many = "super::category_item::Entity")]
    CategoryItem,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_item::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_item::Relation::Item.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn kind(&self) -> ItemKind {
        match self.dtype {
            ItemType::Book => ItemKind::Book {
                author: self.author.clone(),
                isbn: self.isbn.clone(),
            },
        }
    }

    pub fn add_stock(&mut self, quantity: i32) -> Result<(), ServiceError> {
        ensure_non_negative(quantity)?;
        self.stock_quantity = self.stock_quantity.checked_add(quantity).ok_or_else(|| {
            ServiceError::BadRequest(format!("stock quantity of item {} overflows", self.id))
        })?;
        Ok(())
    }

    /// Fails without touching the stock when fewer than `quantity` units remain.
    pub fn remove_stock(&mut self, quantity: i32) -> Result<(), ServiceError> {
        ensure_non_negative(quantity)?;
        match self.stock_quantity.checked_sub(quantity) {
            Some(rest) if rest >= 0 => {
                self.stock_quantity = rest;
                Ok(())
            }
            _ => Err(ServiceError::InsufficientStock(format!(
                "need more stock: item {} has {}, requested {}",
                self.id, self.stock_quantity, quantity
            ))),
        }
    }
}

fn ensure_non_negative(quantity: i32) -> Result<(), ServiceError> {
    if quantity < 0 {
        return Err(ServiceError::ValidationError(format!(
            "stock quantity change must not be negative, got {}",
            quantity
        )));
    }
    Ok(())
}

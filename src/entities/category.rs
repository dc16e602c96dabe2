use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category tree node. Items are attached through `category_item`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Parent,
    #[sea_orm(has_many = "super::category_item::Entity")]
    CategoryItem,
}

impl Related<super::category_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryItem.def()
    }
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_item::Relation::Item.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_item::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

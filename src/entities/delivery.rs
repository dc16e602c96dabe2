use crate::models::Address;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum DeliveryStatus {
    #[sea_orm(string_value = "READY")]
    Ready,
    #[sea_orm(string_value = "COMP")]
    Comp,
}

/// Shipping record owned by exactly one order.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "delivery")]
#[schema(as = Delivery)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub city: Option<String>,
    pub street: Option<String>,
    pub zipcode: Option<String>,
    pub status: DeliveryStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::order::Entity")]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn address(&self) -> Option<Address> {
        Address::from_columns(
            self.city.as_deref(),
            self.street.as_deref(),
            self.zipcode.as_deref(),
        )
    }
}

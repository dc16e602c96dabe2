use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    EntityTrait, FromQueryResult, JoinType, QueryOrder, QuerySelect, RelationTrait, Select,
};
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::db::TxScope;
use crate::entities::{delivery, member, order, OrderStatus};
use crate::errors::ServiceError;
use crate::models::Address;

use super::Query;

/// Flat order summary selected column by column, without loading entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSimpleQueryDto {
    pub order_id: i64,
    pub name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub address: Option<Address>,
}

#[derive(Debug, FromQueryResult)]
pub(crate) struct OrderHeaderRow {
    pub order_id: i64,
    pub name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub city: Option<String>,
    pub street: Option<String>,
    pub zipcode: Option<String>,
}

impl OrderHeaderRow {
    pub(crate) fn address(&self) -> Option<Address> {
        Address::from_columns(
            self.city.as_deref(),
            self.street.as_deref(),
            self.zipcode.as_deref(),
        )
    }
}

impl From<OrderHeaderRow> for OrderSimpleQueryDto {
    fn from(row: OrderHeaderRow) -> Self {
        Self {
            address: row.address(),
            order_id: row.order_id,
            name: row.name,
            order_date: row.order_date,
            order_status: row.order_status,
        }
    }
}

/// Orders joined to their member and delivery, projected to the header columns.
pub(crate) fn order_header_select() -> Select<order::Entity> {
    order::Entity::find()
        .select_only()
        .column_as(order::Column::Id, "order_id")
        .column_as(member::Column::Name, "name")
        .column_as(order::Column::OrderDate, "order_date")
        .column_as(order::Column::Status, "order_status")
        .column_as(delivery::Column::City, "city")
        .column_as(delivery::Column::Street, "street")
        .column_as(delivery::Column::Zipcode, "zipcode")
        .join(JoinType::InnerJoin, order::Relation::Member.def())
        .join(JoinType::InnerJoin, order::Relation::Delivery.def())
        .order_by_asc(order::Column::Id)
}

pub(crate) async fn find_order_headers(
    scope: &TxScope,
) -> Result<Vec<OrderHeaderRow>, ServiceError> {
    Ok(order_header_select()
        .into_model::<OrderHeaderRow>()
        .all(scope.conn())
        .await?)
}

/// Lists every order as an [`OrderSimpleQueryDto`] in a single statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindOrderSimpleQueryDtos;

#[async_trait]
impl Query for FindOrderSimpleQueryDtos {
    type Result = Vec<OrderSimpleQueryDto>;

    #[instrument(skip(self, scope))]
    async fn execute(&self, scope: &TxScope) -> Result<Self::Result, ServiceError> {
        debug!("Executing FindOrderSimpleQueryDtos");
        let rows = find_order_headers(scope).await?;
        Ok(rows.into_iter().map(OrderSimpleQueryDto::from).collect())
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::db::TxScope;
use crate::entities::{delivery, item, member, order, order_item, OrderStatus};
use crate::errors::ServiceError;
use crate::models::Address;
use crate::repositories::id_batches;

use super::order_simple_queries::{find_order_headers, OrderHeaderRow};
use super::Query;

/// One order line projected to the columns a listing needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemQueryDto {
    #[serde(skip)]
    pub order_id: i64,
    pub item_name: String,
    pub order_price: Decimal,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderQueryDto {
    pub order_id: i64,
    pub name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub address: Option<Address>,
    pub order_items: Vec<OrderItemQueryDto>,
}

impl OrderQueryDto {
    fn from_header(header: OrderHeaderRow, order_items: Vec<OrderItemQueryDto>) -> Self {
        Self {
            address: header.address(),
            order_id: header.order_id,
            name: header.name,
            order_date: header.order_date,
            order_status: header.order_status,
            order_items,
        }
    }

    /// Folds flat join rows back into one DTO per order, keeping the order
    /// in which each order id first appears.
    pub fn regroup(rows: Vec<OrderFlatDto>) -> Vec<Self> {
        let mut grouped: Vec<Self> = Vec::new();
        let mut positions: HashMap<i64, usize> = HashMap::new();

        for row in rows {
            let line = OrderItemQueryDto {
                order_id: row.order_id,
                item_name: row.item_name.clone(),
                order_price: row.order_price,
                count: row.count,
            };
            match positions.get(&row.order_id) {
                Some(&pos) => grouped[pos].order_items.push(line),
                None => {
                    positions.insert(row.order_id, grouped.len());
                    grouped.push(Self {
                        address: row.address(),
                        order_id: row.order_id,
                        name: row.name,
                        order_date: row.order_date,
                        order_status: row.order_status,
                        order_items: vec![line],
                    });
                }
            }
        }
        grouped
    }
}

/// One row of the order × order line join.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct OrderFlatDto {
    pub order_id: i64,
    pub name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub city: Option<String>,
    pub street: Option<String>,
    pub zipcode: Option<String>,
    pub item_name: String,
    pub order_price: Decimal,
    pub count: i32,
}

impl OrderFlatDto {
    pub fn address(&self) -> Option<Address> {
        Address::from_columns(
            self.city.as_deref(),
            self.street.as_deref(),
            self.zipcode.as_deref(),
        )
    }
}

fn order_item_select() -> Select<order_item::Entity> {
    order_item::Entity::find()
        .select_only()
        .column_as(order_item::Column::OrderId, "order_id")
        .column_as(item::Column::Name, "item_name")
        .column_as(order_item::Column::OrderPrice, "order_price")
        .column_as(order_item::Column::Count, "count")
        .join(JoinType::InnerJoin, order_item::Relation::Item.def())
        .order_by_asc(order_item::Column::Id)
}

/// Order headers first, then one line query per order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindOrderQueryDtos;

#[async_trait]
impl Query for FindOrderQueryDtos {
    type Result = Vec<OrderQueryDto>;

    #[instrument(skip(self, scope))]
    async fn execute(&self, scope: &TxScope) -> Result<Self::Result, ServiceError> {
        let headers = find_order_headers(scope).await?;
        debug!(orders = headers.len(), "loading order lines per order");

        let mut result = Vec::with_capacity(headers.len());
        for header in headers {
            let order_items = order_item_select()
                .filter(order_item::Column::OrderId.eq(header.order_id))
                .into_model::<OrderItemQueryDto>()
                .all(scope.conn())
                .await?;
            result.push(OrderQueryDto::from_header(header, order_items));
        }
        Ok(result)
    }
}

/// Order headers first, then the lines of all orders with IN queries of at
/// most `batch_size` ids, grouped in memory.
#[derive(Debug, Clone, Copy)]
pub struct FindOrderQueryDtosBatched {
    pub batch_size: usize,
}

#[async_trait]
impl Query for FindOrderQueryDtosBatched {
    type Result = Vec<OrderQueryDto>;

    #[instrument(skip(self, scope), fields(batch_size = self.batch_size))]
    async fn execute(&self, scope: &TxScope) -> Result<Self::Result, ServiceError> {
        let headers = find_order_headers(scope).await?;
        let order_ids: Vec<i64> = headers.iter().map(|header| header.order_id).collect();

        let mut lines_by_order: HashMap<i64, Vec<OrderItemQueryDto>> = HashMap::new();
        for batch in id_batches(&order_ids, self.batch_size) {
            let lines = order_item_select()
                .filter(order_item::Column::OrderId.is_in(batch.iter().copied()))
                .into_model::<OrderItemQueryDto>()
                .all(scope.conn())
                .await?;
            for line in lines {
                lines_by_order.entry(line.order_id).or_default().push(line);
            }
        }

        Ok(headers
            .into_iter()
            .map(|header| {
                let order_items = lines_by_order.remove(&header.order_id).unwrap_or_default();
                OrderQueryDto::from_header(header, order_items)
            })
            .collect())
    }
}

/// Every order line joined with its order, member, delivery and item in
/// one statement. Rows repeat the order columns once per line and are not
/// row-limited, so every order keeps all of its lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindOrderFlatDtos;

#[async_trait]
impl Query for FindOrderFlatDtos {
    type Result = Vec<OrderFlatDto>;

    #[instrument(skip(self, scope))]
    async fn execute(&self, scope: &TxScope) -> Result<Self::Result, ServiceError> {
        Ok(order::Entity::find()
            .select_only()
            .column_as(order::Column::Id, "order_id")
            .column_as(member::Column::Name, "name")
            .column_as(order::Column::OrderDate, "order_date")
            .column_as(order::Column::Status, "order_status")
            .column_as(delivery::Column::City, "city")
            .column_as(delivery::Column::Street, "street")
            .column_as(delivery::Column::Zipcode, "zipcode")
            .column_as(item::Column::Name, "item_name")
            .column_as(order_item::Column::OrderPrice, "order_price")
            .column_as(order_item::Column::Count, "count")
            .join(JoinType::InnerJoin, order::Relation::Member.def())
            .join(JoinType::InnerJoin, order::Relation::Delivery.def())
            .join(JoinType::InnerJoin, order::Relation::OrderItem.def())
            .join(JoinType::InnerJoin, order_item::Relation::Item.def())
            .order_by_asc(order::Column::Id)
            .order_by_asc(order_item::Column::Id)
            .into_model::<OrderFlatDto>()
            .all(scope.conn())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flat(order_id: i64, name: &str, item_name: &str, count: i32) -> OrderFlatDto {
        OrderFlatDto {
            order_id,
            name: name.into(),
            order_date: Utc::now(),
            order_status: OrderStatus::Order,
            city: Some("Seoul".into()),
            street: Some("1".into()),
            zipcode: Some("1111".into()),
            item_name: item_name.into(),
            order_price: dec!(10000),
            count,
        }
    }

    #[test]
    fn regroup_folds_rows_per_order_in_first_seen_order() {
        let rows = vec![
            flat(2, "userB", "SPRING1", 1),
            flat(1, "userA", "JPA1", 1),
            flat(2, "userB", "SPRING2", 2),
        ];
        let grouped = OrderQueryDto::regroup(rows);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].order_id, 2);
        let names: Vec<&str> = grouped[0]
            .order_items
            .iter()
            .map(|line| line.item_name.as_str())
            .collect();
        assert_eq!(names, vec!["SPRING1", "SPRING2"]);
        assert_eq!(grouped[1].order_items.len(), 1);
        assert_eq!(grouped[1].address, Some(Address::new("Seoul", "1", "1111")));
    }

    #[test]
    fn regroup_of_nothing_is_empty() {
        assert!(OrderQueryDto::regroup(Vec::new()).is_empty());
    }

    #[test]
    fn line_order_id_is_not_serialized() {
        let line = OrderItemQueryDto {
            order_id: 3,
            item_name: "JPA1 BOOK".into(),
            order_price: dec!(10000),
            count: 1,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("orderId").is_none());
        assert_eq!(json["itemName"], "JPA1 BOOK");
    }
}

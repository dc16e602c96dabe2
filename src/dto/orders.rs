use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::OrderStatus;
use crate::models::Address;
use crate::repositories::{OrderGraph, OrderLineGraph, OrderWithMemberDelivery};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimpleOrderDto {
    pub order_id: i64,
    pub name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub address: Option<Address>,
}

impl From<OrderWithMemberDelivery> for SimpleOrderDto {
    fn from(order: OrderWithMemberDelivery) -> Self {
        Self {
            address: order.delivery.address(),
            order_id: order.order.id,
            name: order.member.name,
            order_date: order.order.order_date,
            order_status: order.order.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub item_name: String,
    pub order_price: Decimal,
    pub count: i32,
}

impl From<OrderLineGraph> for OrderItemDto {
    fn from(line: OrderLineGraph) -> Self {
        Self {
            item_name: line.item.name,
            order_price: line.order_item.order_price,
            count: line.order_item.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub order_id: i64,
    pub name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub address: Option<Address>,
    pub order_items: Vec<OrderItemDto>,
}

impl From<OrderGraph> for OrderDto {
    fn from(order: OrderGraph) -> Self {
        Self {
            address: order.delivery.address(),
            order_id: order.order.id,
            name: order.member.name,
            order_date: order.order.order_date,
            order_status: order.order.status,
            order_items: order.order_items.into_iter().map(OrderItemDto::from).collect(),
        }
    }
}

fn default_limit() -> u32 {
    100
}

/// Offset/limit paging for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    #[serde(default)]
    pub offset: u32,
    /// At most `MAX_RESULTS` orders are returned whatever the value.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_default_to_first_hundred() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PageParams::default());
        assert_eq!(params.limit, 100);
    }
}

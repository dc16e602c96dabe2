//! Order aggregate: an order owns its lines and its delivery; members and
//! items are referenced by id only.

use crate::entities::{delivery, item, member, order, order_item, DeliveryStatus, OrderStatus};
use crate::errors::ServiceError;
use crate::models::Address;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub id: Option<i64>,
    pub address: Option<Address>,
    pub status: DeliveryStatus,
}

impl Delivery {
    pub fn ready(address: Option<Address>) -> Self {
        Self {
            id: None,
            address,
            status: DeliveryStatus::Ready,
        }
    }

    pub fn complete(&mut self) {
        self.status = DeliveryStatus::Comp;
    }
}

impl From<delivery::Model> for Delivery {
    fn from(model: delivery::Model) -> Self {
        Self {
            id: Some(model.id),
            address: model.address(),
            status: model.status,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderItem {
    pub id: Option<i64>,
    pub item_id: i64,
    pub order_price: Decimal,
    pub count: i32,
}

impl OrderItem {
    /// Snapshots price and count and takes `count` units out of `item`'s stock.
    pub fn create(
        item: &mut item::Model,
        order_price: Decimal,
        count: i32,
    ) -> Result<Self, ServiceError> {
        item.remove_stock(count)?;
        Ok(Self {
            id: None,
            item_id: item.id,
            order_price,
            count,
        })
    }

    /// Puts the ordered units back into `item`'s stock.
    pub fn cancel(&self, item: &mut item::Model) -> Result<(), ServiceError> {
        item.add_stock(self.count)
    }

    pub fn total_price(&self) -> Decimal {
        self.order_price * Decimal::from(self.count)
    }
}

impl From<order_item::Model> for OrderItem {
    fn from(model: order_item::Model) -> Self {
        Self {
            id: Some(model.id),
            item_id: model.item_id,
            order_price: model.order_price,
            count: model.count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub id: Option<i64>,
    pub member_id: i64,
    pub delivery: Delivery,
    pub order_items: Vec<OrderItem>,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    pub fn create(member: &member::Model, delivery: Delivery, order_items: Vec<OrderItem>) -> Self {
        Self {
            id: None,
            member_id: member.id,
            delivery,
            order_items,
            order_date: Utc::now(),
            status: OrderStatus::Order,
        }
    }

    /// Rebuilds the aggregate from its persisted rows.
    pub fn from_models(
        order: order::Model,
        delivery: delivery::Model,
        order_items: Vec<order_item::Model>,
    ) -> Self {
        Self {
            id: Some(order.id),
            member_id: order.member_id,
            delivery: delivery.into(),
            order_items: order_items.into_iter().map(OrderItem::from).collect(),
            order_date: order.order_date,
            status: order.status,
        }
    }

    /// Cancels the order and restores the stock of every referenced item.
    ///
    /// `items` must contain every item referenced by the order; nothing is
    /// modified unless the whole cancellation can be applied.
    pub fn cancel(&mut self, items: &mut HashMap<i64, item::Model>) -> Result<(), ServiceError> {
        if self.delivery.status == DeliveryStatus::Comp {
            return Err(ServiceError::IllegalState(
                "orders whose delivery is complete cannot be cancelled".to_string(),
            ));
        }
        if self.status == OrderStatus::Cancel {
            return Err(ServiceError::IllegalState(
                "order is already cancelled".to_string(),
            ));
        }
        if let Some(missing) = self
            .order_items
            .iter()
            .find(|line| !items.contains_key(&line.item_id))
        {
            return Err(ServiceError::not_found("item", missing.item_id));
        }

        let mut restored = items.clone();
        for line in &self.order_items {
            if let Some(item) = restored.get_mut(&line.item_id) {
                line.cancel(item)?;
            }
        }

        *items = restored;
        self.status = OrderStatus::Cancel;
        Ok(())
    }

    pub fn total_price(&self) -> Decimal {
        self.order_items.iter().map(OrderItem::total_price).sum()
    }

    pub fn item_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.order_items.iter().map(|line| line.item_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{error, info, instrument};

use crate::db::{DbPool, TxScope};
use crate::entities::{DeliveryStatus, OrderStatus};
use crate::errors::ServiceError;
use crate::models::{Delivery, Order, OrderItem, OrderSearch};
use crate::repositories::{ItemRepository, MemberRepository, OrderLineGraph, OrderRepository};

/// One requested line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub item_id: i64,
    pub count: i32,
}

/// Order row of the order search page.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderListing {
    pub order_id: i64,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub delivery_status: DeliveryStatus,
    pub lines: Vec<OrderLineGraph>,
}

/// Service for placing and cancelling orders
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    members: MemberRepository,
    items: ItemRepository,
    orders: OrderRepository,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, batch_size: usize) -> Self {
        Self {
            db,
            members: MemberRepository::new(),
            items: ItemRepository::new(),
            orders: OrderRepository::new(batch_size),
        }
    }

    /// Places a single-line order at the item's current price.
    pub async fn order(
        &self,
        member_id: i64,
        item_id: i64,
        count: i32,
    ) -> Result<i64, ServiceError> {
        self.order_lines(member_id, &[OrderLine { item_id, count }])
            .await
    }

    /// Places an order with one line per entry of `lines`, taking the ordered
    /// units out of stock. Nothing is persisted if any line fails.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn order_lines(
        &self,
        member_id: i64,
        lines: &[OrderLine],
    ) -> Result<i64, ServiceError> {
        if lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "an order needs at least one line".to_string(),
            ));
        }
        if let Some(line) = lines.iter().find(|line| line.count < 1) {
            return Err(ServiceError::ValidationError(format!(
                "count must be at least 1, got {}",
                line.count
            )));
        }

        let scope = TxScope::begin(&self.db).await?;
        let member = self
            .members
            .find_one(&scope, member_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("member", member_id))?;

        let mut item_ids: Vec<i64> = lines.iter().map(|line| line.item_id).collect();
        item_ids.sort_unstable();
        item_ids.dedup();
        let mut items = self
            .items
            .find_all_required(&scope, &item_ids, self.orders.batch_size())
            .await?;

        let mut order_items = Vec::with_capacity(lines.len());
        for line in lines {
            let item = items
                .get_mut(&line.item_id)
                .ok_or_else(|| ServiceError::not_found("item", line.item_id))?;
            let price = item.price;
            let order_item = OrderItem::create(item, price, line.count).map_err(|e| {
                error!(item_id = line.item_id, error = %e, "order line rejected");
                e
            })?;
            order_items.push(order_item);
        }

        let delivery = Delivery::ready(member.address());
        let mut order = Order::create(&member, delivery, order_items);

        for id in &item_ids {
            if let Some(item) = items.remove(id) {
                self.items.update(&scope, item).await?;
            }
        }
        let order_id = self.orders.save(&scope, &mut order).await?;
        scope.commit().await?;

        counter!("bookshop.orders.placed", 1);
        info!(order_id, member_id, total = %order.total_price(), "order placed");
        Ok(order_id)
    }

    /// Cancels an order and restores the stock of its items.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: i64) -> Result<(), ServiceError> {
        let scope = TxScope::begin(&self.db).await?;
        let mut order = self
            .orders
            .find_one(&scope, order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order", order_id))?;

        let item_ids = order.item_ids();
        let mut items = self
            .items
            .find_all_required(&scope, &item_ids, self.orders.batch_size())
            .await?;
        order.cancel(&mut items)?;

        for id in &item_ids {
            if let Some(item) = items.remove(id) {
                self.items.update(&scope, item).await?;
            }
        }
        self.orders.save(&scope, &mut order).await?;
        scope.commit().await?;

        counter!("bookshop.orders.cancelled", 1);
        info!(order_id, "order cancelled");
        Ok(())
    }

    /// Marks the delivery of an order complete. Completing twice is a no-op.
    #[instrument(skip(self))]
    pub async fn complete_delivery(&self, order_id: i64) -> Result<(), ServiceError> {
        let scope = TxScope::begin(&self.db).await?;
        let mut order = self
            .orders
            .find_one(&scope, order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("order", order_id))?;

        if order.status == OrderStatus::Cancel {
            return Err(ServiceError::IllegalState(
                "cancelled orders cannot be delivered".to_string(),
            ));
        }
        if order.delivery.status == DeliveryStatus::Comp {
            return Ok(());
        }

        order.delivery.complete();
        self.orders.save(&scope, &mut order).await?;
        scope.commit().await?;

        info!(order_id, "delivery completed");
        Ok(())
    }

    /// Orders matching `search`, each with its member name and lines.
    #[instrument(skip(self))]
    pub async fn find_orders(&self, search: &OrderSearch) -> Result<Vec<OrderListing>, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let orders = self.orders.find_all(&scope, search).await?;

        let mut listings = Vec::with_capacity(orders.len());
        for order in orders {
            let member = self.orders.member_of(&scope, &order).await?;
            let delivery = self.orders.delivery_of(&scope, &order).await?;
            let lines = self.orders.order_lines_of(&scope, &order).await?;
            listings.push(OrderListing {
                order_id: order.id,
                member_name: member.name.clone(),
                order_date: order.order_date,
                status: order.status,
                delivery_status: delivery.status,
                lines,
            });
        }
        scope.commit().await?;
        Ok(listings)
    }
}

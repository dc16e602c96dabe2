//! Read strategies for order listings. Each method returns equivalent data
//! with a different number of statements.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::db::{DbPool, TxScope};
use crate::errors::ServiceError;
use crate::models::OrderSearch;
use crate::queries::{
    FindOrderFlatDtos, FindOrderQueryDtos, FindOrderQueryDtosBatched, FindOrderSimpleQueryDtos,
    OrderQueryDto, OrderSimpleQueryDto, Query,
};
use crate::repositories::{OrderGraph, OrderRepository, OrderWithMemberDelivery};

#[derive(Clone)]
pub struct OrderQueryService {
    db: Arc<DbPool>,
    orders: OrderRepository,
}

impl OrderQueryService {
    pub fn new(db: Arc<DbPool>, batch_size: usize) -> Self {
        Self {
            db,
            orders: OrderRepository::new(batch_size),
        }
    }

    /// Orders with member and delivery loaded one lookup at a time.
    #[instrument(skip(self))]
    pub async fn orders_with_member_delivery_lazy(
        &self,
    ) -> Result<Vec<OrderWithMemberDelivery>, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let orders = self.orders.find_all(&scope, &OrderSearch::default()).await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let member = self.orders.member_of(&scope, &order).await?;
            let delivery = self.orders.delivery_of(&scope, &order).await?;
            result.push(OrderWithMemberDelivery {
                order,
                member: member.as_ref().clone(),
                delivery: delivery.as_ref().clone(),
            });
        }
        scope.commit().await?;
        Ok(result)
    }

    /// Orders with member and delivery joined in one statement.
    #[instrument(skip(self))]
    pub async fn orders_with_member_delivery_joined(
        &self,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<OrderWithMemberDelivery>, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let orders = self
            .orders
            .find_all_with_member_delivery(&scope, offset, limit)
            .await?;
        scope.commit().await?;
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn order_simple_query_dtos(&self) -> Result<Vec<OrderSimpleQueryDto>, ServiceError> {
        self.run(FindOrderSimpleQueryDtos).await
    }

    /// Full order graphs with every association loaded lazily.
    #[instrument(skip(self))]
    pub async fn order_graphs_lazy(&self) -> Result<Vec<OrderGraph>, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let orders = self.orders.find_all(&scope, &OrderSearch::default()).await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let member = self.orders.member_of(&scope, &order).await?;
            let delivery = self.orders.delivery_of(&scope, &order).await?;
            let order_items = self.orders.order_lines_of(&scope, &order).await?;
            result.push(OrderGraph {
                order,
                member: member.as_ref().clone(),
                delivery: delivery.as_ref().clone(),
                order_items,
            });
        }
        scope.commit().await?;
        Ok(result)
    }

    /// Full order graphs from a single join over every association.
    #[instrument(skip(self))]
    pub async fn order_graphs_fetch_join(&self) -> Result<Vec<OrderGraph>, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let orders = self.orders.find_all_with_item(&scope).await?;
        scope.commit().await?;
        Ok(orders)
    }

    /// A page of order graphs: to-one associations joined, lines and items
    /// fetched in batches.
    #[instrument(skip(self))]
    pub async fn order_graphs_batched(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<OrderGraph>, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let page = self
            .orders
            .find_all_with_member_delivery(&scope, Some(offset), Some(limit))
            .await?;
        let order_ids: Vec<i64> = page.iter().map(|o| o.order.id).collect();
        let mut lines = self.orders.order_lines_batched(&scope, &order_ids).await?;
        scope.commit().await?;

        debug!(orders = page.len(), batch_size = self.orders.batch_size(), "page loaded");
        Ok(page
            .into_iter()
            .map(|o| OrderGraph {
                order_items: lines.remove(&o.order.id).unwrap_or_default(),
                order: o.order,
                member: o.member,
                delivery: o.delivery,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn order_query_dtos(&self) -> Result<Vec<OrderQueryDto>, ServiceError> {
        self.run(FindOrderQueryDtos).await
    }

    #[instrument(skip(self))]
    pub async fn order_query_dtos_batched(&self) -> Result<Vec<OrderQueryDto>, ServiceError> {
        self.run(FindOrderQueryDtosBatched {
            batch_size: self.orders.batch_size(),
        })
        .await
    }

    /// One flat join, regrouped into the same shape as
    /// [`OrderQueryService::order_query_dtos`].
    #[instrument(skip(self))]
    pub async fn order_query_dtos_flat(&self) -> Result<Vec<OrderQueryDto>, ServiceError> {
        let rows = self.run(FindOrderFlatDtos).await?;
        Ok(OrderQueryDto::regroup(rows))
    }

    async fn run<Q: Query>(&self, query: Q) -> Result<Q::Result, ServiceError> {
        let scope = TxScope::begin_read_only(&self.db).await?;
        let result = query.execute(&scope).await?;
        scope.commit().await?;
        Ok(result)
    }
}

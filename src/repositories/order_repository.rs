use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult,
    IdenStatic, Iterable, JoinType, QueryFilter, QueryOrder, QueryResult, QuerySelect, QueryTrait,
    RelationTrait, Select, Set,
};
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::db::TxScope;
use crate::entities::{delivery, item, member, order, order_item};
use crate::errors::ServiceError;
use crate::models::{Address, Order, OrderSearch};

use super::{find_in_scope, id_batches, ItemRepository, MAX_RESULTS};

const ORDER_PREFIX: &str = "o_";
const MEMBER_PREFIX: &str = "m_";
const DELIVERY_PREFIX: &str = "d_";
const LINE_PREFIX: &str = "oi_";
const ITEM_PREFIX: &str = "i_";

/// An order line together with the item it references.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderLineGraph {
    #[serde(flatten)]
    pub order_item: order_item::Model,
    pub item: item::Model,
}

/// An order with its to-one associations initialized.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderWithMemberDelivery {
    #[serde(flatten)]
    pub order: order::Model,
    pub member: member::Model,
    pub delivery: delivery::Model,
}

/// An order with every association initialized.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderGraph {
    #[serde(flatten)]
    pub order: order::Model,
    pub member: member::Model,
    pub delivery: delivery::Model,
    pub order_items: Vec<OrderLineGraph>,
}

#[derive(Debug, Clone, Copy)]
pub struct OrderRepository {
    items: ItemRepository,
    batch_size: usize,
}

impl OrderRepository {
    pub fn new(batch_size: usize) -> Self {
        Self {
            items: ItemRepository::new(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Persists a new aggregate (delivery, order, lines) or, for a loaded
    /// one, its order and delivery status. Returns the order id.
    pub async fn save(&self, scope: &TxScope, order: &mut Order) -> Result<i64, ServiceError> {
        scope.ensure_writable()?;
        match order.id {
            Some(id) => {
                self.update_status(scope, id, order).await?;
                Ok(id)
            }
            None => self.insert(scope, order).await,
        }
    }

    async fn insert(&self, scope: &TxScope, order: &mut Order) -> Result<i64, ServiceError> {
        let conn = scope.conn();
        let (city, street, zipcode) = Address::into_columns(order.delivery.address.clone());
        let delivery = delivery::ActiveModel {
            city: Set(city),
            street: Set(street),
            zipcode: Set(zipcode),
            status: Set(order.delivery.status),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        order.delivery.id = Some(delivery.id);

        let saved = order::ActiveModel {
            member_id: Set(order.member_id),
            delivery_id: Set(delivery.id),
            order_date: Set(order.order_date),
            status: Set(order.status),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        for line in order.order_items.iter_mut() {
            let saved_line = order_item::ActiveModel {
                order_id: Set(saved.id),
                item_id: Set(line.item_id),
                order_price: Set(line.order_price),
                count: Set(line.count),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            line.id = Some(saved_line.id);
        }

        order.id = Some(saved.id);
        debug!(order_id = saved.id, lines = order.order_items.len(), "order inserted");
        Ok(saved.id)
    }

    // Lines are immutable once created; only statuses change afterwards.
    async fn update_status(
        &self,
        scope: &TxScope,
        id: i64,
        order: &Order,
    ) -> Result<(), ServiceError> {
        let conn = scope.conn();
        order::ActiveModel {
            id: ActiveValue::Unchanged(id),
            status: Set(order.status),
            ..Default::default()
        }
        .update(conn)
        .await?;

        if let Some(delivery_id) = order.delivery.id {
            delivery::ActiveModel {
                id: ActiveValue::Unchanged(delivery_id),
                status: Set(order.delivery.status),
                ..Default::default()
            }
            .update(conn)
            .await?;
        }
        Ok(())
    }

    /// Loads the full aggregate for modification.
    pub async fn find_one(&self, scope: &TxScope, id: i64) -> Result<Option<Order>, ServiceError> {
        let conn = scope.conn();
        let Some(order) = order::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        let delivery = delivery::Entity::find_by_id(order.delivery_id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("delivery", order.delivery_id))?;
        let lines = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order.id))
            .order_by_asc(order_item::Column::Id)
            .all(conn)
            .await?;

        Ok(Some(Order::from_models(order, delivery, lines)))
    }

    /// Dynamic search: each filter is applied only when present.
    #[instrument(skip(self, scope))]
    pub async fn find_all(
        &self,
        scope: &TxScope,
        search: &OrderSearch,
    ) -> Result<Vec<order::Model>, ServiceError> {
        let mut query =
            order::Entity::find().join(JoinType::InnerJoin, order::Relation::Member.def());

        if let Some(status) = search.order_status {
            query = query.filter(order::Column::Status.eq(status));
        }
        if let Some(name) = search.member_name() {
            query = query.filter(member::Column::Name.contains(name));
        }

        Ok(query
            .order_by_asc(order::Column::Id)
            .limit(MAX_RESULTS)
            .all(scope.conn())
            .await?)
    }

    pub async fn member_of(
        &self,
        scope: &TxScope,
        order: &order::Model,
    ) -> Result<Arc<member::Model>, ServiceError> {
        find_in_scope::<member::Entity>(scope, order.member_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("member", order.member_id))
    }

    pub async fn delivery_of(
        &self,
        scope: &TxScope,
        order: &order::Model,
    ) -> Result<Arc<delivery::Model>, ServiceError> {
        find_in_scope::<delivery::Entity>(scope, order.delivery_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("delivery", order.delivery_id))
    }

    /// Lines of one order; each item is loaded on first touch.
    pub async fn order_lines_of(
        &self,
        scope: &TxScope,
        order: &order::Model,
    ) -> Result<Vec<OrderLineGraph>, ServiceError> {
        let lines = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order.id))
            .order_by_asc(order_item::Column::Id)
            .all(scope.conn())
            .await?;

        let mut graphs = Vec::with_capacity(lines.len());
        for line in lines {
            let item = self
                .items
                .find_one(scope, line.item_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("item", line.item_id))?;
            graphs.push(OrderLineGraph {
                item: item.as_ref().clone(),
                order_item: line,
            });
        }
        Ok(graphs)
    }

    /// Orders with member and delivery joined in a single statement.
    /// `limit` is capped at [`MAX_RESULTS`].
    #[instrument(skip(self, scope))]
    pub async fn find_all_with_member_delivery(
        &self,
        scope: &TxScope,
        offset: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<OrderWithMemberDelivery>, ServiceError> {
        let limit = limit.map_or(MAX_RESULTS, u64::from).min(MAX_RESULTS);
        let mut select = order::Entity::find()
            .select_only()
            .join(JoinType::InnerJoin, order::Relation::Member.def())
            .join(JoinType::InnerJoin, order::Relation::Delivery.def())
            .order_by_asc(order::Column::Id)
            .offset(offset.map(u64::from))
            .limit(limit);
        select = select_prefixed::<order::Entity>(select, ORDER_PREFIX);
        select = select_prefixed::<member::Entity>(select, MEMBER_PREFIX);
        select = select_prefixed::<delivery::Entity>(select, DELIVERY_PREFIX);

        let rows = query_rows(scope, select).await?;
        rows.iter()
            .map(|row| {
                Ok(OrderWithMemberDelivery {
                    order: order::Model::from_query_result(row, ORDER_PREFIX)?,
                    member: member::Model::from_query_result(row, MEMBER_PREFIX)?,
                    delivery: delivery::Model::from_query_result(row, DELIVERY_PREFIX)?,
                })
            })
            .collect()
    }

    /// Every association joined in one statement. The to-many join repeats
    /// each order once per line; rows are folded back per order id.
    #[instrument(skip(self, scope))]
    pub async fn find_all_with_item(&self, scope: &TxScope) -> Result<Vec<OrderGraph>, ServiceError> {
        let mut select = order::Entity::find()
            .select_only()
            .join(JoinType::InnerJoin, order::Relation::Member.def())
            .join(JoinType::InnerJoin, order::Relation::Delivery.def())
            .join(JoinType::InnerJoin, order::Relation::OrderItem.def())
            .join(JoinType::InnerJoin, order_item::Relation::Item.def())
            .order_by_asc(order::Column::Id)
            .order_by_asc(order_item::Column::Id);
        select = select_prefixed::<order::Entity>(select, ORDER_PREFIX);
        select = select_prefixed::<member::Entity>(select, MEMBER_PREFIX);
        select = select_prefixed::<delivery::Entity>(select, DELIVERY_PREFIX);
        select = select_prefixed::<order_item::Entity>(select, LINE_PREFIX);
        select = select_prefixed::<item::Entity>(select, ITEM_PREFIX);

        let rows = query_rows(scope, select).await?;
        let row_count = rows.len();

        let mut graphs: Vec<OrderGraph> = Vec::new();
        let mut positions: HashMap<i64, usize> = HashMap::new();
        for row in &rows {
            let line = OrderLineGraph {
                order_item: order_item::Model::from_query_result(row, LINE_PREFIX)?,
                item: item::Model::from_query_result(row, ITEM_PREFIX)?,
            };
            let order_id = line.order_item.order_id;
            match positions.get(&order_id) {
                Some(&pos) => graphs[pos].order_items.push(line),
                None => {
                    positions.insert(order_id, graphs.len());
                    graphs.push(OrderGraph {
                        order: order::Model::from_query_result(row, ORDER_PREFIX)?,
                        member: member::Model::from_query_result(row, MEMBER_PREFIX)?,
                        delivery: delivery::Model::from_query_result(row, DELIVERY_PREFIX)?,
                        order_items: vec![line],
                    });
                }
            }
        }

        debug!(rows = row_count, orders = graphs.len(), "folded fetch-join rows");
        Ok(graphs)
    }

    /// Lines and items of many orders with IN queries of at most
    /// `batch_size` ids each, keyed by order id.
    #[instrument(skip(self, scope, order_ids), fields(orders = order_ids.len()))]
    pub async fn order_lines_batched(
        &self,
        scope: &TxScope,
        order_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<OrderLineGraph>>, ServiceError> {
        let mut lines = Vec::new();
        for batch in id_batches(order_ids, self.batch_size) {
            let rows = order_item::Entity::find()
                .filter(order_item::Column::OrderId.is_in(batch.iter().copied()))
                .order_by_asc(order_item::Column::Id)
                .all(scope.conn())
                .await?;
            lines.extend(rows);
        }

        let mut item_ids: Vec<i64> = lines.iter().map(|line| line.item_id).collect();
        item_ids.sort_unstable();
        item_ids.dedup();
        let items = self
            .items
            .find_by_ids(scope, &item_ids, self.batch_size)
            .await?;

        let mut grouped: HashMap<i64, Vec<OrderLineGraph>> = HashMap::new();
        for line in lines {
            let item = items
                .get(&line.item_id)
                .ok_or_else(|| ServiceError::not_found("item", line.item_id))?;
            grouped.entry(line.order_id).or_default().push(OrderLineGraph {
                item: item.as_ref().clone(),
                order_item: line,
            });
        }
        Ok(grouped)
    }
}

/// Adds every column of `E` to `select`, aliased as `{prefix}{column}`.
fn select_prefixed<E>(select: Select<order::Entity>, prefix: &str) -> Select<order::Entity>
where
    E: EntityTrait,
{
    E::Column::iter().fold(select, |select, column| {
        select.column_as(column, format!("{}{}", prefix, column.as_str()))
    })
}

async fn query_rows(
    scope: &TxScope,
    select: Select<order::Entity>,
) -> Result<Vec<QueryResult>, ServiceError> {
    let statement = select.build(scope.backend());
    Ok(scope.conn().query_all(statement).await?)
}

use crate::db::TxScope;
use crate::errors::ServiceError;
use sea_orm::{EntityTrait, PrimaryKeyTrait};
use std::sync::Arc;

pub mod category_repository;
pub mod item_repository;
pub mod member_repository;
pub mod order_repository;

pub use category_repository::CategoryRepository;
pub use item_repository::{ItemRepository, NewItem};
pub use member_repository::{MemberRepository, NewMember};
pub use order_repository::{
    OrderGraph, OrderLineGraph, OrderRepository, OrderWithMemberDelivery,
};

/// Default cap on rows returned by unbounded list queries.
pub const MAX_RESULTS: u64 = 1000;

/// Loads an entity by id through the scope's identity map, so repeated
/// lookups within one scope return the same `Arc` without another query.
pub(crate) async fn find_in_scope<E>(
    scope: &TxScope,
    id: i64,
) -> Result<Option<Arc<E::Model>>, ServiceError>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    if let Some(cached) = scope.identity().get::<E::Model>(id) {
        return Ok(Some(cached));
    }

    let found = E::find_by_id(id).one(scope.conn()).await?;
    Ok(found.map(|model| scope.identity().register(id, model)))
}

/// Splits `ids` into IN-list sized chunks.
pub(crate) fn id_batches(ids: &[i64], batch_size: usize) -> impl Iterator<Item = &[i64]> {
    ids.chunks(batch_size.max(1))
}

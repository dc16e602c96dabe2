//! Read-side projections that bypass entities and map rows straight into
//! response-shaped DTOs.

use async_trait::async_trait;

use crate::db::TxScope;
use crate::errors::ServiceError;

pub mod order_queries;
pub mod order_simple_queries;

pub use order_queries::{
    FindOrderFlatDtos, FindOrderQueryDtos, FindOrderQueryDtosBatched, OrderFlatDto,
    OrderItemQueryDto, OrderQueryDto,
};
pub use order_simple_queries::{FindOrderSimpleQueryDtos, OrderSimpleQueryDto};

/// Trait representing a generic asynchronous query.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    /// Executes the query inside the given transaction scope
    async fn execute(&self, scope: &TxScope) -> Result<Self::Result, ServiceError>;
}

//! JSON API handlers. Each module exposes its routes; `AppServices` holds the
//! services they call.

pub mod members;
pub mod orders;
pub mod simple_orders;

use crate::db::DbPool;
use crate::services::{ItemService, MemberService, OrderQueryService, OrderService};
use axum::Router;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub members: Arc<MemberService>,
    pub items: Arc<ItemService>,
    pub orders: Arc<OrderService>,
    pub order_queries: Arc<OrderQueryService>,
}

impl AppServices {
    /// Builds every service over one shared pool. `batch_size` caps the ids
    /// per IN query of batched loads.
    pub fn new(db_pool: Arc<DbPool>, batch_size: usize) -> Self {
        Self {
            members: Arc::new(MemberService::new(db_pool.clone())),
            items: Arc::new(ItemService::new(db_pool.clone())),
            orders: Arc::new(OrderService::new(db_pool.clone(), batch_size)),
            order_queries: Arc::new(OrderQueryService::new(db_pool, batch_size)),
        }
    }
}

/// All `/api/...` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(members::member_routes())
        .merge(simple_orders::simple_order_routes())
        .merge(orders::order_routes())
}

//! Domain services. Each public method opens its own [`TxScope`](crate::db::TxScope):
//! read-write for state changes, read-only for lookups.

pub mod items;
pub mod members;
pub mod order_queries;
pub mod orders;

pub use items::{ItemService, UpdateItem};
pub use members::MemberService;
pub use order_queries::OrderQueryService;
pub use orders::{OrderLine, OrderListing, OrderService};

pub mod address;
pub mod order;
pub mod order_search;

pub use address::Address;
pub use order::{Delivery, Order, OrderItem};
pub use order_search::OrderSearch;

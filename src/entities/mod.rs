pub mod category;
pub mod category_item;
pub mod delivery;
pub mod item;
pub mod member;
pub mod order;
pub mod order_item;

pub use delivery::DeliveryStatus;
pub use item::{ItemKind, ItemType};
pub use order::OrderStatus;

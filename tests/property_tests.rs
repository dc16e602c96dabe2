//! Property-based tests for stock keeping and order totals.

use std::collections::HashMap;

use bookshop_api::{
    entities::{item, member, ItemType, OrderStatus},
    errors::ServiceError,
    models::{Delivery, Order, OrderItem},
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn book(id: i64, stock: i32) -> item::Model {
    item::Model {
        id,
        dtype: ItemType::Book,
        name: format!("book-{id}"),
        price: Decimal::new(10_000, 0),
        stock_quantity: stock,
        author: None,
        isbn: None,
    }
}

fn member() -> member::Model {
    member::Model {
        id: 1,
        name: "kim".into(),
        city: None,
        street: None,
        zipcode: None,
    }
}

fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000, 0u32..3).prop_map(|(units, scale)| Decimal::new(units, scale))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn removing_within_stock_then_adding_back_is_identity(
        stock in 0i32..100_000,
        taken in 0i32..100_000,
    ) {
        let taken = taken.min(stock);
        let mut item = book(1, stock);

        prop_assert!(item.remove_stock(taken).is_ok());
        prop_assert_eq!(item.stock_quantity, stock - taken);
        prop_assert!(item.add_stock(taken).is_ok());
        prop_assert_eq!(item.stock_quantity, stock);
    }

    #[test]
    fn overdraw_never_changes_stock(stock in 0i32..100_000, extra in 1i32..100_000) {
        let mut item = book(1, stock);
        let result = item.remove_stock(stock + extra);

        prop_assert!(matches!(result, Err(ServiceError::InsufficientStock(_))));
        prop_assert_eq!(item.stock_quantity, stock);
    }

    #[test]
    fn negative_changes_never_move_stock(stock in 0i32..100_000, quantity in i32::MIN..0) {
        let mut item = book(1, stock);

        prop_assert!(matches!(item.add_stock(quantity), Err(ServiceError::ValidationError(_))));
        prop_assert!(matches!(item.remove_stock(quantity), Err(ServiceError::ValidationError(_))));
        prop_assert_eq!(item.stock_quantity, stock);
    }

    #[test]
    fn order_total_is_sum_of_line_totals(
        lines in prop::collection::vec((price_strategy(), 1i32..50), 1..6),
    ) {
        let mut items: Vec<item::Model> = (0..lines.len() as i64).map(|id| book(id, 1_000)).collect();
        let order_items: Vec<OrderItem> = lines
            .iter()
            .zip(items.iter_mut())
            .map(|((price, count), item)| OrderItem::create(item, *price, *count).unwrap())
            .collect();

        let order = Order::create(&member(), Delivery::ready(None), order_items);
        let expected: Decimal = lines
            .iter()
            .map(|(price, count)| *price * Decimal::from(*count))
            .sum();
        prop_assert_eq!(order.total_price(), expected);
    }

    #[test]
    fn cancel_restores_every_line(counts in prop::collection::vec(1i32..50, 1..6)) {
        let mut stock: HashMap<i64, item::Model> = HashMap::new();
        let mut order_items = Vec::new();
        for (id, count) in counts.iter().enumerate() {
            let mut item = book(id as i64, 100);
            let price = item.price;
            order_items.push(OrderItem::create(&mut item, price, *count).unwrap());
            stock.insert(item.id, item);
        }

        let mut order = Order::create(&member(), Delivery::ready(None), order_items);
        prop_assert!(order.cancel(&mut stock).is_ok());
        prop_assert_eq!(order.status, OrderStatus::Cancel);
        prop_assert!(stock.values().all(|item| item.stock_quantity == 100));
        prop_assert!(order.cancel(&mut stock).is_err());
    }
}

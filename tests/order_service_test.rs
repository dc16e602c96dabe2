mod common;

use assert_matches::assert_matches;
use bookshop_api::{
    db::TxScope,
    entities::{DeliveryStatus, ItemKind, OrderStatus},
    errors::ServiceError,
    models::{Address, OrderSearch},
    repositories::{ItemRepository, NewItem, NewMember, OrderRepository},
    services::OrderLine,
};
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

async fn member(app: &TestApp, name: &str) -> i64 {
    app.services()
        .members
        .join(NewMember::new(name, Some(Address::new("Seoul", "river", "123-123"))))
        .await
        .unwrap()
}

async fn book(app: &TestApp, name: &str, price: Decimal, stock: i32) -> i64 {
    app.services()
        .items
        .save_item(NewItem {
            name: name.to_string(),
            price,
            stock_quantity: stock,
            kind: ItemKind::Book {
                author: Some("kim".into()),
                isbn: Some("12345".into()),
            },
        })
        .await
        .unwrap()
}

async fn load_order(app: &TestApp, order_id: i64) -> bookshop_api::models::Order {
    let scope = TxScope::begin_read_only(&app.state.db).await.unwrap();
    OrderRepository::new(10)
        .find_one(&scope, order_id)
        .await
        .unwrap()
        .expect("order exists")
}

#[tokio::test]
async fn ordering_takes_stock_and_snapshots_price() {
    let app = TestApp::new().await;
    let member_id = member(&app, "member1").await;
    let item_id = book(&app, "JPA", dec!(10000), 10).await;

    let order_id = app
        .services()
        .orders
        .order(member_id, item_id, 2)
        .await
        .unwrap();

    let order = load_order(&app, order_id).await;
    assert_eq!(order.status, OrderStatus::Order);
    assert_eq!(order.order_items.len(), 1);
    assert_eq!(order.total_price(), dec!(20000));
    assert_eq!(order.delivery.status, DeliveryStatus::Ready);
    assert_eq!(
        order.delivery.address,
        Some(Address::new("Seoul", "river", "123-123"))
    );

    let item = app.services().items.find_one(item_id).await.unwrap();
    assert_eq!(item.stock_quantity, 8);
}

#[tokio::test]
async fn insufficient_stock_persists_nothing() {
    let app = TestApp::new().await;
    let member_id = member(&app, "member1").await;
    let item_id = book(&app, "JPA", dec!(10000), 10).await;

    let err = app
        .services()
        .orders
        .order(member_id, item_id, 11)
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::InsufficientStock(_));
    let item = app.services().items.find_one(item_id).await.unwrap();
    assert_eq!(item.stock_quantity, 10);
    let orders = app
        .services()
        .orders
        .find_orders(&OrderSearch::default())
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn failing_second_line_rolls_back_the_first() {
    let app = TestApp::new().await;
    let member_id = member(&app, "member1").await;
    let plenty = book(&app, "JPA", dec!(10000), 10).await;
    let scarce = book(&app, "Spring", dec!(20000), 1).await;

    let err = app
        .services()
        .orders
        .order_lines(
            member_id,
            &[
                OrderLine { item_id: plenty, count: 3 },
                OrderLine { item_id: scarce, count: 2 },
            ],
        )
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::InsufficientStock(_));
    let item = app.services().items.find_one(plenty).await.unwrap();
    assert_eq!(item.stock_quantity, 10);
}

#[tokio::test]
async fn cancel_restores_stock() {
    let app = TestApp::new().await;
    let member_id = member(&app, "member1").await;
    let item_id = book(&app, "JPA", dec!(10000), 10).await;
    let order_id = app
        .services()
        .orders
        .order(member_id, item_id, 2)
        .await
        .unwrap();

    app.services().orders.cancel_order(order_id).await.unwrap();

    let order = load_order(&app, order_id).await;
    assert_eq!(order.status, OrderStatus::Cancel);
    let item = app.services().items.find_one(item_id).await.unwrap();
    assert_eq!(item.stock_quantity, 10);
}

#[tokio::test]
async fn cancel_twice_is_rejected() {
    let app = TestApp::new().await;
    let member_id = member(&app, "member1").await;
    let item_id = book(&app, "JPA", dec!(10000), 10).await;
    let order_id = app
        .services()
        .orders
        .order(member_id, item_id, 2)
        .await
        .unwrap();

    app.services().orders.cancel_order(order_id).await.unwrap();
    let err = app
        .services()
        .orders
        .cancel_order(order_id)
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::IllegalState(_));
    let item = app.services().items.find_one(item_id).await.unwrap();
    assert_eq!(item.stock_quantity, 10);
}

#[tokio::test]
async fn completed_delivery_blocks_cancel() {
    let app = TestApp::new().await;
    let member_id = member(&app, "member1").await;
    let item_id = book(&app, "JPA", dec!(10000), 10).await;
    let order_id = app
        .services()
        .orders
        .order(member_id, item_id, 2)
        .await
        .unwrap();

    app.services()
        .orders
        .complete_delivery(order_id)
        .await
        .unwrap();
    let err = app
        .services()
        .orders
        .cancel_order(order_id)
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::IllegalState(_));
    let order = load_order(&app, order_id).await;
    assert_eq!(order.status, OrderStatus::Order);
    assert_eq!(order.delivery.status, DeliveryStatus::Comp);
    let item = app.services().items.find_one(item_id).await.unwrap();
    assert_eq!(item.stock_quantity, 8);
}

#[tokio::test]
async fn cancelled_orders_cannot_be_delivered() {
    let app = TestApp::new().await;
    let member_id = member(&app, "member1").await;
    let item_id = book(&app, "JPA", dec!(10000), 10).await;
    let order_id = app
        .services()
        .orders
        .order(member_id, item_id, 1)
        .await
        .unwrap();
    app.services().orders.cancel_order(order_id).await.unwrap();

    assert_matches!(
        app.services().orders.complete_delivery(order_id).await,
        Err(ServiceError::IllegalState(_))
    );
}

#[tokio::test]
async fn unknown_ids_and_bad_counts_fail() {
    let app = TestApp::new().await;
    let member_id = member(&app, "member1").await;
    let item_id = book(&app, "JPA", dec!(10000), 10).await;
    let orders = &app.services().orders;

    assert_matches!(
        orders.order(member_id, 999, 1).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        orders.order(999, item_id, 1).await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        orders.order(member_id, item_id, 0).await,
        Err(ServiceError::ValidationError(_))
    );
    assert_matches!(orders.cancel_order(999).await, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn search_filters_by_name_and_status() {
    let app = TestApp::seeded().await;
    let orders = &app.services().orders;

    let all = orders.find_orders(&OrderSearch::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let by_name = orders
        .find_orders(&OrderSearch {
            member_name: Some("serA".into()),
            order_status: None,
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].member_name, "userA");
    assert_eq!(by_name[0].lines.len(), 2);

    orders.cancel_order(by_name[0].order_id).await.unwrap();
    let cancelled = orders
        .find_orders(&OrderSearch {
            member_name: None,
            order_status: Some(OrderStatus::Cancel),
        })
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].order_id, by_name[0].order_id);
}

#[tokio::test]
async fn item_update_changes_only_listed_fields() {
    let app = TestApp::new().await;
    let item_id = book(&app, "JPA", dec!(10000), 10).await;

    let updated = app
        .services()
        .items
        .update_item(
            item_id,
            bookshop_api::services::UpdateItem {
                name: "JPA 2nd".into(),
                price: dec!(12000),
                stock_quantity: 5,
                author: None,
                isbn: Some("999".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, item_id);
    assert_eq!(updated.name, "JPA 2nd");
    assert_eq!(updated.price, dec!(12000));
    assert_eq!(updated.stock_quantity, 5);
    assert_eq!(updated.author, None);
    assert_eq!(updated.isbn.as_deref(), Some("999"));
}

#[tokio::test]
async fn required_items_are_owned_copies_and_unknown_ids_fail() {
    let app = TestApp::new().await;
    let item_id = book(&app, "JPA", dec!(10000), 10).await;
    let repo = ItemRepository::new();
    let scope = TxScope::begin(&app.state.db).await.unwrap();

    let mut items = repo
        .find_all_required(&scope, &[item_id], 10)
        .await
        .unwrap();
    items.get_mut(&item_id).unwrap().remove_stock(3).unwrap();

    let cached = repo.find_one(&scope, item_id).await.unwrap().unwrap();
    assert_eq!(cached.stock_quantity, 10);
    assert_matches!(
        repo.find_all_required(&scope, &[item_id, 999], 10).await,
        Err(ServiceError::NotFound(_))
    );
}

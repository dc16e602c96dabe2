//! Demo data inserted at startup when `seed_demo_data` is set.

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::db::{DbPool, TxScope};
use crate::entities::ItemKind;
use crate::errors::ServiceError;
use crate::handlers::AppServices;
use crate::models::Address;
use crate::repositories::{CategoryRepository, ItemRepository, NewItem, NewMember};
use crate::services::OrderLine;

struct DemoBook {
    name: &'static str,
    price: i64,
    stock: i32,
    count: i32,
}

struct DemoOrder {
    member: &'static str,
    address: (&'static str, &'static str, &'static str),
    category: &'static str,
    books: [DemoBook; 2],
}

const DEMO_ORDERS: [DemoOrder; 2] = [
    DemoOrder {
        member: "userA",
        address: ("Seoul", "1", "1111"),
        category: "JPA",
        books: [
            DemoBook { name: "JPA1 BOOK", price: 10000, stock: 100, count: 1 },
            DemoBook { name: "JPA2 BOOK", price: 20000, stock: 200, count: 2 },
        ],
    },
    DemoOrder {
        member: "userB",
        address: ("Busan", "2", "2222"),
        category: "Spring",
        books: [
            DemoBook { name: "SPRING1 BOOK", price: 10000, stock: 100, count: 1 },
            DemoBook { name: "SPRING2 BOOK", price: 20000, stock: 100, count: 2 },
        ],
    },
];

/// Inserts two members, four books, two orders and a small category tree.
/// Does nothing when any member already exists.
#[instrument(skip_all)]
pub async fn seed_demo_data(db: &DbPool, services: &AppServices) -> Result<(), ServiceError> {
    if !services.members.find_members().await?.is_empty() {
        info!("demo data already present, skipping seed");
        return Ok(());
    }

    let mut book_ids = Vec::new();
    for demo in &DEMO_ORDERS {
        let (city, street, zipcode) = demo.address;
        let member_id = services
            .members
            .join(NewMember::new(
                demo.member,
                Some(Address::new(city, street, zipcode)),
            ))
            .await?;

        let mut lines = Vec::with_capacity(demo.books.len());
        let mut ids = Vec::with_capacity(demo.books.len());
        for book in &demo.books {
            let item_id = services
                .items
                .save_item(NewItem {
                    name: book.name.to_string(),
                    price: Decimal::from(book.price),
                    stock_quantity: book.stock,
                    kind: ItemKind::Book {
                        author: None,
                        isbn: None,
                    },
                })
                .await?;
            lines.push(OrderLine {
                item_id,
                count: book.count,
            });
            ids.push(item_id);
        }
        services.orders.order_lines(member_id, &lines).await?;
        book_ids.push((demo.category, ids));
    }

    seed_categories(db, &book_ids).await?;
    info!(orders = DEMO_ORDERS.len(), "demo data seeded");
    Ok(())
}

async fn seed_categories(db: &DbPool, books: &[(&str, Vec<i64>)]) -> Result<(), ServiceError> {
    let categories = CategoryRepository::new();
    let items = ItemRepository::new();

    let scope = TxScope::begin(db).await?;
    let root = categories.save(&scope, "Books").await?;
    for (name, item_ids) in books {
        let child = categories.save(&scope, name).await?;
        categories.add_child_category(&scope, &root, &child).await?;
        for &item_id in item_ids {
            let item = items
                .find_one(&scope, item_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("item", item_id))?;
            categories.add_item(&scope, &child, &item).await?;
        }
    }
    scope.commit().await
}

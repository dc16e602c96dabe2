mod common;

use assert_matches::assert_matches;
use bookshop_api::{db::TxScope, errors::ServiceError, repositories::CategoryRepository};
use common::TestApp;

#[tokio::test]
async fn seeded_tree_links_books_to_sub_categories() {
    let app = TestApp::seeded().await;
    let repo = CategoryRepository::new();
    let scope = TxScope::begin_read_only(&app.state.db).await.unwrap();

    let children = repo.find_children(&scope, 1).await.unwrap();
    let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["JPA", "Spring"]);

    let jpa_books = repo.find_items(&scope, children[0].id).await.unwrap();
    let titles: Vec<&str> = jpa_books.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(titles, vec!["JPA1 BOOK", "JPA2 BOOK"]);

    let categories = repo
        .find_categories_of_item(&scope, jpa_books[0].id)
        .await
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].parent_id, Some(1));
}

#[tokio::test]
async fn category_cannot_parent_itself() {
    let app = TestApp::new().await;
    let repo = CategoryRepository::new();
    let scope = TxScope::begin(&app.state.db).await.unwrap();

    let books = repo.save(&scope, "Books").await.unwrap();
    assert_matches!(
        repo.add_child_category(&scope, &books, &books).await,
        Err(ServiceError::BadRequest(_))
    );
    assert!(repo.find_children(&scope, books.id).await.unwrap().is_empty());
}

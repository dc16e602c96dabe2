//! Server-rendered pages. Every POST answers with a redirect so a browser
//! refresh does not resubmit the form.

pub mod home;
pub mod items;
pub mod members;
pub mod orders;
pub mod render;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use render::{escape, PageError};

pub fn web_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route(
            "/members/new",
            get(members::create_form).post(members::create),
        )
        .route("/members", get(members::list))
        .route("/items/new", get(items::create_form).post(items::create))
        .route("/items", get(items::list))
        .route(
            "/items/:item_id/edit",
            get(items::update_form).post(items::update),
        )
        .route("/order", get(orders::create_form).post(orders::create))
        .route("/orders", get(orders::list))
        .route("/orders/:order_id/cancle", post(orders::cancel))
        .route(
            "/orders/:order_id/complete-delivery",
            post(orders::complete_delivery),
        )
}

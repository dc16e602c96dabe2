use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;

use super::render::{escape, page, PageResult};
use crate::entities::{DeliveryStatus, OrderStatus};
use crate::models::OrderSearch;
use crate::services::OrderListing;
use crate::AppState;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    pub member_id: i64,
    pub item_id: i64,
    pub count: i32,
}

pub async fn create_form(State(state): State<AppState>) -> PageResult<Html<String>> {
    let members = state.services.members.find_members().await?;
    let items = state.services.items.find_items().await?;

    let member_options: String = members
        .iter()
        .map(|m| format!("<option value=\"{}\">{}</option>\n", m.id, escape(&m.name)))
        .collect();
    let item_options: String = items
        .iter()
        .map(|i| format!("<option value=\"{}\">{}</option>\n", i.id, escape(&i.name)))
        .collect();

    Ok(page(
        "Place order",
        &format!(
            "<h1>Place order</h1>\n<form method=\"post\" action=\"/order\">\n\
             <label>Member <select name=\"memberId\">\n{member_options}</select></label>\n\
             <label>Item <select name=\"itemId\">\n{item_options}</select></label>\n\
             <label>Count <input name=\"count\" type=\"number\" min=\"1\" value=\"1\"></label>\n\
             <button type=\"submit\">Submit</button>\n</form>"
        ),
    ))
}

pub async fn create(State(state): State<AppState>, Form(form): Form<OrderForm>) -> PageResult {
    state
        .services
        .orders
        .order(form.member_id, form.item_id, form.count)
        .await?;
    Ok(Redirect::to("/orders").into_response())
}

fn search_form(search: &OrderSearch) -> String {
    let selected = |status: Option<OrderStatus>| {
        if search.order_status == status {
            " selected"
        } else {
            ""
        }
    };
    format!(
        "<form method=\"get\" action=\"/orders\">\n\
         <input name=\"memberName\" placeholder=\"Member name\" value=\"{name}\">\n\
         <select name=\"orderStatus\">\n\
         <option value=\"\"{any}>Any status</option>\n\
         <option value=\"ORDER\"{ordered}>ORDER</option>\n\
         <option value=\"CANCEL\"{cancelled}>CANCEL</option>\n\
         </select>\n<button type=\"submit\">Search</button>\n</form>",
        name = escape(search.member_name.as_deref().unwrap_or_default()),
        any = selected(None),
        ordered = selected(Some(OrderStatus::Order)),
        cancelled = selected(Some(OrderStatus::Cancel)),
    )
}

fn listing_row(order: &OrderListing) -> String {
    let first = order.lines.first();
    let actions = match (order.status, order.delivery_status) {
        (OrderStatus::Order, DeliveryStatus::Ready) => format!(
            "<form method=\"post\" action=\"/orders/{id}/cancle\"><button>Cancel</button></form>\
             <form method=\"post\" action=\"/orders/{id}/complete-delivery\"><button>Delivered</button></form>",
            id = order.order_id
        ),
        _ => String::new(),
    };
    format!(
        "<tr><td>{id}</td><td>{member}</td><td>{item}</td><td>{price}</td><td>{count}</td>\
         <td>{status}</td><td>{delivery}</td><td>{date}</td><td>{actions}</td></tr>\n",
        id = order.order_id,
        member = escape(&order.member_name),
        item = first.map(|l| escape(&l.item.name)).unwrap_or_default(),
        price = first.map(|l| l.order_item.order_price.to_string()).unwrap_or_default(),
        count = first.map(|l| l.order_item.count.to_string()).unwrap_or_default(),
        status = order.status,
        delivery = order.delivery_status,
        date = order.order_date.format("%Y-%m-%d %H:%M"),
        actions = actions,
    )
}

pub async fn list(
    State(state): State<AppState>,
    Query(search): Query<OrderSearch>,
) -> PageResult<Html<String>> {
    let orders = state.services.orders.find_orders(&search).await?;
    let rows: String = orders.iter().map(listing_row).collect();

    Ok(page(
        "Orders",
        &format!(
            "<h1>Orders</h1>\n{search}\n<table>\n<thead><tr><th>#</th><th>Member</th>\
             <th>Item</th><th>Price</th><th>Count</th><th>Status</th><th>Delivery</th>\
             <th>Date</th><th></th></tr></thead>\n<tbody>\n{rows}</tbody>\n</table>",
            search = search_form(&search),
        ),
    ))
}

pub async fn cancel(State(state): State<AppState>, Path(order_id): Path<i64>) -> PageResult {
    state.services.orders.cancel_order(order_id).await?;
    Ok(Redirect::to("/orders").into_response())
}

pub async fn complete_delivery(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> PageResult {
    state.services.orders.complete_delivery(order_id).await?;
    Ok(Redirect::to("/orders").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_form_marks_selected_status() {
        let search = OrderSearch {
            member_name: Some("kim".into()),
            order_status: Some(OrderStatus::Cancel),
        };
        let html = search_form(&search);
        assert!(html.contains("value=\"CANCEL\" selected"));
        assert!(html.contains("value=\"kim\""));
        assert!(!html.contains("value=\"ORDER\" selected"));
    }
}

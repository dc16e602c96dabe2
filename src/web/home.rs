use axum::response::Html;
use tracing::info;

use super::render::page;

pub async fn home() -> Html<String> {
    info!("home page");
    page(
        "Bookshop",
        "<h1>Bookshop</h1>\n<ul>\n\
         <li><a href=\"/members/new\">Register member</a></li>\n\
         <li><a href=\"/members\">Members</a></li>\n\
         <li><a href=\"/items/new\">Register book</a></li>\n\
         <li><a href=\"/items\">Items</a></li>\n\
         <li><a href=\"/order\">Place order</a></li>\n\
         <li><a href=\"/orders\">Orders</a></li>\n\
         </ul>",
    )
}

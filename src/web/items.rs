use axum::{
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Redirect},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::render::{escape, page, PageResult};
use crate::entities::item::{self, ItemKind};
use crate::repositories::NewItem;
use crate::services::UpdateItem;
use crate::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl From<BookForm> for NewItem {
    fn from(form: BookForm) -> Self {
        NewItem {
            kind: ItemKind::Book {
                author: non_blank(&form.author),
                isbn: non_blank(&form.isbn),
            },
            name: form.name.trim().to_string(),
            price: form.price,
            stock_quantity: form.stock_quantity,
        }
    }
}

impl From<BookForm> for UpdateItem {
    fn from(form: BookForm) -> Self {
        UpdateItem {
            author: non_blank(&form.author),
            isbn: non_blank(&form.isbn),
            name: form.name.trim().to_string(),
            price: form.price,
            stock_quantity: form.stock_quantity,
        }
    }
}

impl From<&item::Model> for BookForm {
    fn from(item: &item::Model) -> Self {
        BookForm {
            name: item.name.clone(),
            price: item.price,
            stock_quantity: item.stock_quantity,
            author: item.author.clone().unwrap_or_default(),
            isbn: item.isbn.clone().unwrap_or_default(),
        }
    }
}

fn form_body(heading: &str, action: &str, form: &BookForm) -> String {
    format!(
        "<h1>{heading}</h1>\n<form method=\"post\" action=\"{action}\">\n\
         <label>Name <input name=\"name\" value=\"{name}\"></label>\n\
         <label>Price <input name=\"price\" value=\"{price}\"></label>\n\
         <label>Stock <input name=\"stockQuantity\" value=\"{stock}\"></label>\n\
         <label>Author <input name=\"author\" value=\"{author}\"></label>\n\
         <label>ISBN <input name=\"isbn\" value=\"{isbn}\"></label>\n\
         <button type=\"submit\">Submit</button>\n</form>",
        heading = escape(heading),
        action = escape(action),
        name = escape(&form.name),
        price = form.price,
        stock = form.stock_quantity,
        author = escape(&form.author),
        isbn = escape(&form.isbn),
    )
}

pub async fn create_form() -> Html<String> {
    page(
        "Register book",
        &form_body("Register book", "/items/new", &BookForm::default()),
    )
}

pub async fn create(State(state): State<AppState>, Form(form): Form<BookForm>) -> PageResult {
    state.services.items.save_item(form.into()).await?;
    Ok(Redirect::to("/").into_response())
}

pub async fn list(State(state): State<AppState>) -> PageResult<Html<String>> {
    let items = state.services.items.find_items().await?;

    let rows: String = items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{id}</td><td>{name}</td><td>{price}</td><td>{stock}</td>\
                 <td><a href=\"/items/{id}/edit\">Edit</a></td></tr>\n",
                id = item.id,
                name = escape(&item.name),
                price = item.price,
                stock = item.stock_quantity,
            )
        })
        .collect();

    Ok(page(
        "Items",
        &format!(
            "<h1>Items</h1>\n<table>\n<thead><tr><th>#</th><th>Name</th><th>Price</th>\
             <th>Stock</th><th></th></tr></thead>\n<tbody>\n{rows}</tbody>\n</table>"
        ),
    ))
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> PageResult<Html<String>> {
    let item = state.services.items.find_one(item_id).await?;
    let action = format!("/items/{}/edit", item_id);
    Ok(page(
        "Edit book",
        &form_body("Edit book", &action, &BookForm::from(&item)),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Form(form): Form<BookForm>,
) -> PageResult {
    state.services.items.update_item(item_id, form.into()).await?;
    Ok(Redirect::to("/items").into_response())
}

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshop API",
        version = "0.1.0",
        description = r#"
# Bookshop API

Members, books and orders of a small online bookstore.

The order listings are served by several versions of the same endpoint. All
versions return equivalent data and differ in how they load it:

- `/api/v1/simple-orders`, `/api/v2/simple-orders`: one lookup per association
- `/api/v3/simple-orders`: a single join
- `/api/v4/simple-orders`: a single column projection
- `/api/v1/orders`, `/api/v2/orders`: one lookup per association and line
- `/api/v3/orders`: a single join including order lines
- `/api/v3.1/orders`: a paged join plus batched IN queries for the lines
- `/api/v4/orders`, `/api/v5/orders`, `/api/v6/orders`: projections

## Error Handling

Errors use one response shape:

```json
{
  "error": "Conflict",
  "message": "Illegal state: order is already cancelled",
  "request_id": "4f1c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "members", description = "Member registration"),
        (name = "simple-orders", description = "Orders with member and delivery"),
        (name = "orders", description = "Orders with order lines")
    ),
    paths(
        // Members
        crate::handlers::members::members_v1,
        crate::handlers::members::members_v2,
        crate::handlers::members::save_member_v1,
        crate::handlers::members::save_member_v2,
        crate::handlers::members::update_member_v2,

        // Simple orders
        crate::handlers::simple_orders::simple_orders_v1,
        crate::handlers::simple_orders::simple_orders_v2,
        crate::handlers::simple_orders::simple_orders_v3,
        crate::handlers::simple_orders::simple_orders_v4,

        // Orders
        crate::handlers::orders::orders_v1,
        crate::handlers::orders::orders_v2,
        crate::handlers::orders::orders_v3,
        crate::handlers::orders::orders_v3_page,
        crate::handlers::orders::orders_v4,
        crate::handlers::orders::orders_v5,
        crate::handlers::orders::orders_v6,
    ),
    components(
        schemas(
            crate::entities::OrderStatus,
            crate::entities::DeliveryStatus,
            crate::models::Address,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_order_strategy() {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("Bookshop API"));
        for path in [
            "/api/v2/members/{id}",
            "/api/v4/simple-orders",
            "/api/v3.1/orders",
            "/api/v6/orders",
        ] {
            assert!(json.contains(path), "missing {path}");
        }
    }
}

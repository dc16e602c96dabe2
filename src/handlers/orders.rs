//! Orders with their order lines, one route per loading strategy.

use axum::{
    extract::{Json, Query, State},
    routing::get,
    Router,
};
use tracing::instrument;

use super::AppState;
use crate::dto::{OrderDto, PageParams};
use crate::errors::ServiceError;
use crate::queries::OrderQueryDto;
use crate::repositories::OrderGraph;

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "Order entity graphs, associations loaded lazily",
    responses((status = 200, description = "Orders", body = [OrderGraph])),
    tag = "orders"
)]
pub async fn orders_v1(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderGraph>>, ServiceError> {
    Ok(Json(state.services.order_queries.order_graphs_lazy().await?))
}

#[utoipa::path(
    get,
    path = "/api/v2/orders",
    summary = "Order DTOs, associations loaded lazily",
    responses((status = 200, description = "Orders", body = [OrderDto])),
    tag = "orders"
)]
pub async fn orders_v2(State(state): State<AppState>) -> Result<Json<Vec<OrderDto>>, ServiceError> {
    let orders = state.services.order_queries.order_graphs_lazy().await?;
    Ok(Json(orders.into_iter().map(OrderDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v3/orders",
    summary = "Order DTOs from one fetch join including order lines",
    responses((status = 200, description = "Orders", body = [OrderDto])),
    tag = "orders"
)]
pub async fn orders_v3(State(state): State<AppState>) -> Result<Json<Vec<OrderDto>>, ServiceError> {
    let orders = state.services.order_queries.order_graphs_fetch_join().await?;
    Ok(Json(orders.into_iter().map(OrderDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v3.1/orders",
    summary = "A page of order DTOs, order lines fetched in batches",
    params(PageParams),
    responses((status = 200, description = "Orders", body = [OrderDto])),
    tag = "orders"
)]
#[instrument(skip(state))]
pub async fn orders_v3_page(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<OrderDto>>, ServiceError> {
    let orders = state
        .services
        .order_queries
        .order_graphs_batched(page.offset, page.limit)
        .await?;
    Ok(Json(orders.into_iter().map(OrderDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v4/orders",
    summary = "Order projections, one line query per order",
    responses((status = 200, description = "Orders", body = [OrderQueryDto])),
    tag = "orders"
)]
pub async fn orders_v4(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderQueryDto>>, ServiceError> {
    Ok(Json(state.services.order_queries.order_query_dtos().await?))
}

#[utoipa::path(
    get,
    path = "/api/v5/orders",
    summary = "Order projections, order lines fetched with one IN query",
    responses((status = 200, description = "Orders", body = [OrderQueryDto])),
    tag = "orders"
)]
pub async fn orders_v5(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderQueryDto>>, ServiceError> {
    Ok(Json(
        state.services.order_queries.order_query_dtos_batched().await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v6/orders",
    summary = "Order projections from one flat join, regrouped per order",
    responses((status = 200, description = "Orders", body = [OrderQueryDto])),
    tag = "orders"
)]
pub async fn orders_v6(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderQueryDto>>, ServiceError> {
    Ok(Json(state.services.order_queries.order_query_dtos_flat().await?))
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/orders", get(orders_v1))
        .route("/api/v2/orders", get(orders_v2))
        .route("/api/v3/orders", get(orders_v3))
        .route("/api/v3.1/orders", get(orders_v3_page))
        .route("/api/v4/orders", get(orders_v4))
        .route("/api/v5/orders", get(orders_v5))
        .route("/api/v6/orders", get(orders_v6))
}

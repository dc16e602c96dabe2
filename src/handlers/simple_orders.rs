//! Orders with their to-one associations (member, delivery).

use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};

use super::AppState;
use crate::dto::SimpleOrderDto;
use crate::errors::ServiceError;
use crate::queries::OrderSimpleQueryDto;
use crate::repositories::OrderWithMemberDelivery;

#[utoipa::path(
    get,
    path = "/api/v1/simple-orders",
    summary = "Order entities, associations loaded lazily",
    responses((status = 200, description = "Orders", body = [OrderWithMemberDelivery])),
    tag = "simple-orders"
)]
pub async fn simple_orders_v1(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderWithMemberDelivery>>, ServiceError> {
    Ok(Json(
        state
            .services
            .order_queries
            .orders_with_member_delivery_lazy()
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v2/simple-orders",
    summary = "Order DTOs, associations loaded lazily",
    responses((status = 200, description = "Orders", body = [SimpleOrderDto])),
    tag = "simple-orders"
)]
pub async fn simple_orders_v2(
    State(state): State<AppState>,
) -> Result<Json<Vec<SimpleOrderDto>>, ServiceError> {
    let orders = state
        .services
        .order_queries
        .orders_with_member_delivery_lazy()
        .await?;
    Ok(Json(orders.into_iter().map(SimpleOrderDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v3/simple-orders",
    summary = "Order DTOs from one fetch join",
    responses((status = 200, description = "Orders", body = [SimpleOrderDto])),
    tag = "simple-orders"
)]
pub async fn simple_orders_v3(
    State(state): State<AppState>,
) -> Result<Json<Vec<SimpleOrderDto>>, ServiceError> {
    let orders = state
        .services
        .order_queries
        .orders_with_member_delivery_joined(None, None)
        .await?;
    Ok(Json(orders.into_iter().map(SimpleOrderDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v4/simple-orders",
    summary = "Order projections selected column by column",
    responses((status = 200, description = "Orders", body = [OrderSimpleQueryDto])),
    tag = "simple-orders"
)]
pub async fn simple_orders_v4(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderSimpleQueryDto>>, ServiceError> {
    Ok(Json(
        state.services.order_queries.order_simple_query_dtos().await?,
    ))
}

pub fn simple_order_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/simple-orders", get(simple_orders_v1))
        .route("/api/v2/simple-orders", get(simple_orders_v2))
        .route("/api/v3/simple-orders", get(simple_orders_v3))
        .route("/api/v4/simple-orders", get(simple_orders_v4))
}

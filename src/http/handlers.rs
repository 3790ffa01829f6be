//! Order endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::orders::{CreateOrder, Order, OrderFilter, OrderQuery, UpdateOrder};

pub async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<OrderQuery>, QueryRejection>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let Query(query) = query?;
    let filter = OrderFilter::try_from(query)?;
    Ok(Json(state.orders.list(&filter)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.get(&id)?))
}

pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<CreateOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(request) = body?;
    let order = state.orders.create(request);
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateOrder>, JsonRejection>,
) -> Result<Json<Order>, ApiError> {
    let Json(changes) = body?;
    Ok(Json(state.orders.update(&id, changes)?))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.orders.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

use anyhow::Context;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Local;
use diesel::{ExpressionMethods, QueryDsl, QueryResult};
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

use crate::core::aliases::DieselError;
use crate::core::app_error::{AppError, StdResponse};
use crate::core::app_state::AppState;
use crate::core::middleware;
use crate::domain::status::{ActingUser, OrderStatus, Role};
use crate::engine::{OrderEngine, PlaceOrderItem, PlaceOrderRequest};
use crate::models::OrderEntity;
use crate::schema::orders;
use crate::store::pg::PgStore;

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/orders",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(create_order))
            .routes(utoipa_axum::routes!(get_order))
            .routes(utoipa_axum::routes!(get_my_orders))
            .routes(utoipa_axum::routes!(get_restaurant_orders))
            .routes(utoipa_axum::routes!(update_order_status))
            .routes(utoipa_axum::routes!(delete_order))
            .route_layer(axum::middleware::from_fn(middleware::identity)),
    )
}

fn engine(state: &AppState) -> OrderEngine<PgStore> {
    OrderEngine::new(PgStore::new(state.db_pool.clone()))
}

#[derive(Deserialize, ToSchema)]
struct CreateOrderReq {
    order_id: Uuid,
    restaurant_id: Uuid,
    payment_method: String,
    items: Vec<PlaceOrderItem>,
}

/// Place a new order for the authenticated customer.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Orders"],
    request_body = CreateOrderReq,
    responses(
        (status = 201, description = "Order placed successfully", body = StdResponse<OrderEntity, String>),
        (status = 400, description = "Validation, stock, or availability rejection")
    )
)]
async fn create_order(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Json(body): Json<CreateOrderReq>,
) -> Result<impl IntoResponse, AppError> {
    let order = engine(&state)
        .place_order(
            &acting,
            PlaceOrderRequest {
                order_id: body.order_id,
                restaurant_id: body.restaurant_id,
                payment_method: body.payment_method,
                items: body.items,
            },
            Local::now().naive_local(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        StdResponse {
            data: Some(order),
            message: Some("Order placed successfully"),
        },
    ))
}

/// Fetch a specific order. Customers can only see their own orders.
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Orders"],
    params(
        ("id" = Uuid, Path, description = "Order ID to fetch")
    ),
    responses(
        (status = 200, description = "Get order successfully", body = StdResponse<OrderEntity, String>)
    )
)]
async fn get_order(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let order: QueryResult<OrderEntity> = orders::table.find(id).get_result(conn).await;

    let order = match order {
        Ok(order) => order,
        Err(DieselError::NotFound) => return Err(AppError::NotFound),
        Err(err) => return Err(AppError::Other(err.into())),
    };

    if acting.role == Role::Customer && order.user_id != acting.id {
        return Err(AppError::NotFound);
    }

    Ok(StdResponse {
        data: Some(order),
        message: Some("Get order successfully"),
    })
}

/// Fetch all orders belonging to the authenticated customer, newest first.
#[utoipa::path(
    get,
    path = "/my-orders",
    tags = ["Orders"],
    responses(
        (status = 200, description = "List my orders", body = StdResponse<Vec<OrderEntity>, String>)
    )
)]
async fn get_my_orders(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let orders: Vec<OrderEntity> = orders::table
        .filter(orders::user_id.eq(&acting.id))
        .order_by(orders::created_at.desc())
        .get_results(conn)
        .await
        .context("Failed to get my orders")?;

    Ok(StdResponse {
        data: Some(orders),
        message: Some("Get my orders successfully"),
    })
}

/// Fetch a restaurant's orders for fulfillment, newest first.
#[utoipa::path(
    get,
    path = "/restaurant/{restaurant_id}",
    tags = ["Orders"],
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant to list orders for")
    ),
    responses(
        (status = 200, description = "List restaurant orders", body = StdResponse<Vec<OrderEntity>, String>)
    )
)]
async fn get_restaurant_orders(
    Path(restaurant_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<impl IntoResponse, AppError> {
    if !acting.role.is_restaurant_side() {
        return Err(AppError::Forbidden(
            "only restaurant staff can view restaurant orders".to_string(),
        ));
    }

    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let orders: Vec<OrderEntity> = orders::table
        .filter(orders::restaurant_id.eq(restaurant_id))
        .order_by(orders::created_at.desc())
        .get_results(conn)
        .await
        .context("Failed to get restaurant orders")?;

    Ok(StdResponse {
        data: Some(orders),
        message: Some("Get restaurant orders successfully"),
    })
}

#[derive(Deserialize, ToSchema)]
struct UpdateOrderStatusReq {
    status: OrderStatus,
}

/// Move an order to the requested status. Kitchen advances, cancellations,
/// and the customer's pickup confirmation all go through this endpoint; the
/// state machine decides which edges the caller's role may take.
#[utoipa::path(
    put,
    path = "/{id}/status",
    tags = ["Orders"],
    params(
        ("id" = Uuid, Path, description = "Order ID to update")
    ),
    request_body = UpdateOrderStatusReq,
    responses(
        (status = 200, description = "Order status updated", body = StdResponse<OrderEntity, String>),
        (status = 400, description = "Illegal transition"),
        (status = 409, description = "Order changed concurrently")
    )
)]
async fn update_order_status(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Json(body): Json<UpdateOrderStatusReq>,
) -> Result<impl IntoResponse, AppError> {
    let order = engine(&state)
        .transition_order(&acting, id, body.status)
        .await?;

    Ok(StdResponse {
        data: Some(order),
        message: Some("Order status updated successfully"),
    })
}

/// Hard-delete an unconfirmed (still 'Placed') order.
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Orders"],
    params(
        ("id" = Uuid, Path, description = "Order ID to delete")
    ),
    responses(
        (status = 200, description = "Order deleted", body = StdResponse<OrderEntity, String>),
        (status = 400, description = "Order is no longer 'Placed'")
    )
)]
async fn delete_order(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<impl IntoResponse, AppError> {
    let order = engine(&state).delete_order(&acting, id).await?;

    Ok(StdResponse {
        data: Some(order),
        message: Some("Order deleted successfully"),
    })
}

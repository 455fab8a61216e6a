use anyhow::Context;
use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, QueryResult, SelectableHelper};
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

use crate::core::aliases::DieselError;
use crate::core::app_error::{AppError, StdResponse};
use crate::core::app_state::AppState;
use crate::core::middleware;
use crate::domain::status::{ActingUser, Role};
use crate::models::{
    CartEntity, CartItemEntity, CreateCartEntity, CreateCartItemEntity, MenuItemEntity,
    RestaurantEntity,
};
use crate::schema::{cart_items, carts, menu_items, restaurants};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/carts",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_my_cart))
            .routes(utoipa_axum::routes!(put_my_cart))
            .routes(utoipa_axum::routes!(delete_my_cart))
            .route_layer(axum::middleware::from_fn(middleware::identity)),
    )
}

#[derive(Deserialize, ToSchema)]
struct CartQuery {
    restaurant_id: Uuid,
}

#[derive(Serialize, ToSchema)]
struct CartRes {
    cart: CartEntity,
    cart_items: Vec<CartItemEntity>,
    total_price: f32,
}

/// Fetch the customer's open cart for a restaurant.
#[utoipa::path(
    get,
    path = "/my-cart",
    tags = ["Carts"],
    params(
        ("restaurant_id" = Uuid, Query, description = "Restaurant the cart belongs to")
    ),
    responses(
        (status = 200, description = "Get cart successfully", body = StdResponse<CartRes, String>)
    )
)]
async fn get_my_cart(
    Query(query): Query<CartQuery>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let cart: QueryResult<CartEntity> = carts::table
        .filter(carts::user_id.eq(&acting.id))
        .filter(carts::restaurant_id.eq(query.restaurant_id))
        .first(conn)
        .await;

    let cart = match cart {
        Ok(cart) => cart,
        Err(DieselError::NotFound) => return Err(AppError::NotFound),
        Err(err) => return Err(AppError::Other(err.into())),
    };

    let cart_items: Vec<CartItemEntity> = cart_items::table
        .filter(cart_items::cart_id.eq(cart.id))
        .get_results(conn)
        .await
        .context("Failed to get cart items")?;

    let total_price: f32 = cart_items
        .iter()
        .map(|item| item.quantity as f32 * item.unit_price)
        .sum();

    Ok(StdResponse {
        data: Some(CartRes {
            cart,
            cart_items,
            total_price,
        }),
        message: Some("Get cart successfully"),
    })
}

#[derive(Deserialize, ToSchema)]
struct PutCartReq {
    restaurant_id: Uuid,
    cart_items: Vec<PutCartReqItem>,
}

#[derive(Deserialize, ToSchema)]
struct PutCartReqItem {
    item_id: Uuid,
    size: String,
    quantity: i32,
}

/// Replace the customer's cart for a restaurant with the given lines.
/// Names and unit prices are snapshotted from the live menu.
#[utoipa::path(
    put,
    path = "/my-cart",
    tags = ["Carts"],
    request_body = PutCartReq,
    responses(
        (status = 200, description = "Cart saved", body = StdResponse<CartRes, String>)
    )
)]
async fn put_my_cart(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Json(body): Json<PutCartReq>,
) -> Result<impl IntoResponse, AppError> {
    if acting.role != Role::Customer {
        return Err(AppError::Forbidden(
            "only customers have carts".to_string(),
        ));
    }

    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let restaurant: QueryResult<RestaurantEntity> = restaurants::table
        .find(body.restaurant_id)
        .get_result(conn)
        .await;
    let restaurant = match restaurant {
        Ok(restaurant) => restaurant,
        Err(DieselError::NotFound) => return Err(AppError::NotFound),
        Err(err) => return Err(AppError::Other(err.into())),
    };
    if !restaurant.is_approved() {
        return Err(AppError::NotFound);
    }

    let user_id = acting.id.clone();
    let (cart, saved_items) = conn
        .transaction(move |conn| {
            Box::pin(async move {
                let cart: CartEntity = diesel::insert_into(carts::table)
                    .values(CreateCartEntity {
                        user_id,
                        restaurant_id: body.restaurant_id,
                    })
                    .on_conflict((carts::user_id, carts::restaurant_id))
                    .do_update()
                    .set(carts::updated_at.eq(diesel::dsl::now))
                    .returning(CartEntity::as_returning())
                    .get_result(conn)
                    .await
                    .context("Failed to upsert cart")?;

                let mut new_items: Vec<CreateCartItemEntity> = Vec::new();
                for item in body.cart_items.into_iter().filter(|item| item.quantity > 0) {
                    let menu_item: QueryResult<MenuItemEntity> = menu_items::table
                        .find(item.item_id)
                        .filter(menu_items::restaurant_id.eq(body.restaurant_id))
                        .filter(menu_items::availability.eq(true))
                        .get_result(conn)
                        .await;
                    let menu_item = match menu_item {
                        Ok(menu_item) => menu_item,
                        Err(DieselError::NotFound) => {
                            return Err(AppError::BadRequest(format!(
                                "menu item {} is not available",
                                item.item_id
                            )));
                        }
                        Err(err) => return Err(AppError::Other(err.into())),
                    };
                    let sizes = menu_item
                        .size_options()
                        .context("Failed to parse menu item sizes")?;
                    let Some(size) = sizes.iter().find(|s| s.size == item.size) else {
                        return Err(AppError::BadRequest(format!(
                            "{} has no size {:?}",
                            menu_item.name, item.size
                        )));
                    };
                    new_items.push(CreateCartItemEntity {
                        cart_id: cart.id,
                        item_id: menu_item.id,
                        size: size.size.clone(),
                        name: menu_item.name.clone(),
                        quantity: item.quantity,
                        unit_price: size.price,
                    });
                }

                diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart.id)))
                    .execute(conn)
                    .await
                    .context("Failed to clear previous cart items")?;

                let saved_items: Vec<CartItemEntity> = diesel::insert_into(cart_items::table)
                    .values(new_items)
                    .returning(CartItemEntity::as_returning())
                    .get_results(conn)
                    .await
                    .context("Failed to save cart items")?;

                Ok::<(CartEntity, Vec<CartItemEntity>), AppError>((cart, saved_items))
            })
        })
        .await?;

    let total_price: f32 = saved_items
        .iter()
        .map(|item| item.quantity as f32 * item.unit_price)
        .sum();

    Ok(StdResponse {
        data: Some(CartRes {
            cart,
            cart_items: saved_items,
            total_price,
        }),
        message: Some("Cart saved successfully"),
    })
}

/// Drop the customer's cart for a restaurant.
#[utoipa::path(
    delete,
    path = "/my-cart",
    tags = ["Carts"],
    params(
        ("restaurant_id" = Uuid, Query, description = "Restaurant the cart belongs to")
    ),
    responses(
        (status = 200, description = "Cart deleted", body = StdResponse<CartEntity, String>)
    )
)]
async fn delete_my_cart(
    Query(query): Query<CartQuery>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let cart: QueryResult<CartEntity> = diesel::delete(
        carts::table
            .filter(carts::user_id.eq(&acting.id))
            .filter(carts::restaurant_id.eq(query.restaurant_id)),
    )
    .returning(CartEntity::as_returning())
    .get_result(conn)
    .await;

    match cart {
        Ok(cart) => Ok(StdResponse {
            data: Some(cart),
            message: Some("Cart deleted successfully"),
        }),
        Err(DieselError::NotFound) => Err(AppError::NotFound),
        Err(err) => Err(AppError::Other(err.into())),
    }
}

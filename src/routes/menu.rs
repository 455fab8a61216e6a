use anyhow::Context;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::{ExpressionMethods, QueryDsl, QueryResult, SelectableHelper};
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

use crate::core::aliases::DieselError;
use crate::core::app_error::{AppError, StdResponse};
use crate::core::app_state::AppState;
use crate::core::middleware;
use crate::domain::status::{ActingUser, Role};
use crate::models::{
    CreateMenuItemEntity, MenuItemEntity, RestaurantEntity, SizeOption, UpdateMenuItemEntity,
};
use crate::routes::restaurants::load_editable_restaurant;
use crate::schema::{menu_items, restaurants};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/restaurants/{restaurant_id}/menu",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_menu))
            .routes(utoipa_axum::routes!(create_menu_item))
            .routes(utoipa_axum::routes!(update_menu_item))
            .routes(utoipa_axum::routes!(delete_menu_item))
            .route_layer(axum::middleware::from_fn(middleware::identity)),
    )
}

fn validate_sizes(sizes: &[SizeOption]) -> Result<(), AppError> {
    if sizes.is_empty() {
        return Err(AppError::BadRequest(
            "an item needs at least one size".to_string(),
        ));
    }
    for (index, size) in sizes.iter().enumerate() {
        if size.size.is_empty() {
            return Err(AppError::BadRequest("a size label is required".to_string()));
        }
        if size.price < 0.0 {
            return Err(AppError::BadRequest(format!(
                "size {:?} cannot have a negative price",
                size.size
            )));
        }
        if sizes[..index].iter().any(|other| other.size == size.size) {
            return Err(AppError::BadRequest(format!(
                "duplicate size {:?}",
                size.size
            )));
        }
    }
    Ok(())
}

/// List a restaurant's menu. Customers only see items the owner has made
/// visible; the restaurant side sees everything.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Menu"],
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant whose menu to list")
    ),
    responses(
        (status = 200, description = "List menu items", body = StdResponse<Vec<MenuItemEntity>, String>)
    )
)]
async fn get_menu(
    Path(restaurant_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let restaurant: QueryResult<RestaurantEntity> =
        restaurants::table.find(restaurant_id).get_result(conn).await;

    let restaurant = match restaurant {
        Ok(restaurant) => restaurant,
        Err(DieselError::NotFound) => return Err(AppError::NotFound),
        Err(err) => return Err(AppError::Other(err.into())),
    };

    let is_owner = acting.role == Role::RestaurantOwner && restaurant.owner_id == acting.id;
    if !restaurant.is_approved() && !is_owner && acting.role != Role::Admin {
        return Err(AppError::NotFound);
    }

    let mut query = menu_items::table
        .filter(menu_items::restaurant_id.eq(restaurant_id))
        .order_by(menu_items::name.asc())
        .into_boxed();
    if acting.role == Role::Customer {
        query = query.filter(menu_items::availability.eq(true));
    }

    let items: Vec<MenuItemEntity> = query
        .get_results(conn)
        .await
        .context("Failed to get menu items")?;

    Ok(StdResponse {
        data: Some(items),
        message: Some("Get menu successfully"),
    })
}

#[derive(Deserialize, ToSchema)]
struct CreateMenuItemReq {
    name: String,
    sizes: Vec<SizeOption>,
    available_quantity: i32,
    availability: bool,
}

/// Add an item to the restaurant's menu.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Menu"],
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant to add the item to")
    ),
    request_body = CreateMenuItemReq,
    responses(
        (status = 201, description = "Menu item created", body = StdResponse<MenuItemEntity, String>)
    )
)]
async fn create_menu_item(
    Path(restaurant_id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Json(body): Json<CreateMenuItemReq>,
) -> Result<impl IntoResponse, AppError> {
    if body.name.is_empty() {
        return Err(AppError::BadRequest("a name is required".to_string()));
    }
    validate_sizes(&body.sizes)?;
    if body.available_quantity < 0 {
        return Err(AppError::BadRequest(
            "available quantity cannot be negative".to_string(),
        ));
    }

    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    load_editable_restaurant(conn, restaurant_id, &acting).await?;

    let sizes = serde_json::to_value(&body.sizes).context("Failed to serialize sizes")?;
    let item: MenuItemEntity = diesel::insert_into(menu_items::table)
        .values(CreateMenuItemEntity {
            id: Uuid::new_v4(),
            restaurant_id,
            name: body.name,
            sizes,
            available_quantity: body.available_quantity,
            availability: body.availability,
        })
        .returning(MenuItemEntity::as_returning())
        .get_result(conn)
        .await
        .context("Failed to create menu item")?;

    Ok((
        StatusCode::CREATED,
        StdResponse {
            data: Some(item),
            message: Some("Menu item created successfully"),
        },
    ))
}

#[derive(Deserialize, ToSchema)]
struct UpdateMenuItemReq {
    name: Option<String>,
    sizes: Option<Vec<SizeOption>>,
    available_quantity: Option<i32>,
    availability: Option<bool>,
}

/// Update an item's name, sizes, stock, or visibility.
#[utoipa::path(
    patch,
    path = "/{item_id}",
    tags = ["Menu"],
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant the item belongs to"),
        ("item_id" = Uuid, Path, description = "Menu item to update")
    ),
    request_body = UpdateMenuItemReq,
    responses(
        (status = 200, description = "Menu item updated", body = StdResponse<MenuItemEntity, String>)
    )
)]
async fn update_menu_item(
    Path((restaurant_id, item_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Json(body): Json<UpdateMenuItemReq>,
) -> Result<impl IntoResponse, AppError> {
    if body.name.is_none()
        && body.sizes.is_none()
        && body.available_quantity.is_none()
        && body.availability.is_none()
    {
        return Err(AppError::BadRequest("nothing to update".to_string()));
    }
    if let Some(sizes) = &body.sizes {
        validate_sizes(sizes)?;
    }
    if body.available_quantity.is_some_and(|quantity| quantity < 0) {
        return Err(AppError::BadRequest(
            "available quantity cannot be negative".to_string(),
        ));
    }

    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    load_editable_restaurant(conn, restaurant_id, &acting).await?;

    let sizes = match body.sizes {
        Some(sizes) => Some(serde_json::to_value(sizes).context("Failed to serialize sizes")?),
        None => None,
    };

    let updated: QueryResult<MenuItemEntity> = diesel::update(
        menu_items::table
            .find(item_id)
            .filter(menu_items::restaurant_id.eq(restaurant_id)),
    )
    .set((
        UpdateMenuItemEntity {
            name: body.name,
            sizes,
            available_quantity: body.available_quantity,
            availability: body.availability,
        },
        menu_items::updated_at.eq(diesel::dsl::now),
    ))
    .returning(MenuItemEntity::as_returning())
    .get_result(conn)
    .await;

    match updated {
        Ok(item) => Ok(StdResponse {
            data: Some(item),
            message: Some("Menu item updated successfully"),
        }),
        Err(DieselError::NotFound) => Err(AppError::NotFound),
        Err(err) => Err(AppError::Other(err.into())),
    }
}

/// Remove an item from the menu.
#[utoipa::path(
    delete,
    path = "/{item_id}",
    tags = ["Menu"],
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant the item belongs to"),
        ("item_id" = Uuid, Path, description = "Menu item to delete")
    ),
    responses(
        (status = 200, description = "Menu item deleted", body = StdResponse<MenuItemEntity, String>)
    )
)]
async fn delete_menu_item(
    Path((restaurant_id, item_id)): Path<(Uuid, Uuid)>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    load_editable_restaurant(conn, restaurant_id, &acting).await?;

    let deleted: QueryResult<MenuItemEntity> = diesel::delete(
        menu_items::table
            .find(item_id)
            .filter(menu_items::restaurant_id.eq(restaurant_id)),
    )
    .returning(MenuItemEntity::as_returning())
    .get_result(conn)
    .await;

    match deleted {
        Ok(item) => Ok(StdResponse {
            data: Some(item),
            message: Some("Menu item deleted successfully"),
        }),
        Err(DieselError::NotFound) => Err(AppError::NotFound),
        Err(err) => Err(AppError::Other(err.into())),
    }
}

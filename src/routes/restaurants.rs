use anyhow::Context;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Local;
use diesel::{ExpressionMethods, QueryDsl, QueryResult, SelectableHelper};
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

use crate::core::aliases::{DbConn, DieselError};
use crate::core::app_error::{AppError, StdResponse};
use crate::core::app_state::AppState;
use crate::core::middleware;
use crate::domain::availability::{ManualOverride, OpeningHours, OperationalStatus};
use crate::domain::status::{ActingUser, Role};
use crate::models::{
    APPROVAL_APPROVED, APPROVAL_PENDING, APPROVAL_REJECTED, CreateRestaurantEntity,
    RestaurantEntity, UpdateRestaurantEntity,
};
use crate::schema::restaurants;

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/restaurants",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(create_restaurant))
            .routes(utoipa_axum::routes!(get_restaurants))
            .routes(utoipa_axum::routes!(get_restaurant))
            .routes(utoipa_axum::routes!(get_restaurant_status))
            .routes(utoipa_axum::routes!(update_restaurant))
            .routes(utoipa_axum::routes!(set_manual_override))
            .routes(utoipa_axum::routes!(set_approval_status))
            .route_layer(axum::middleware::from_fn(middleware::identity)),
    )
}

/// Loads a restaurant and checks the caller may administer it: its owner,
/// or an admin.
pub(crate) async fn load_editable_restaurant(
    conn: &mut DbConn<'_>,
    id: Uuid,
    acting: &ActingUser,
) -> Result<RestaurantEntity, AppError> {
    let restaurant: QueryResult<RestaurantEntity> =
        restaurants::table.find(id).get_result(conn).await;

    let restaurant = match restaurant {
        Ok(restaurant) => restaurant,
        Err(DieselError::NotFound) => return Err(AppError::NotFound),
        Err(err) => return Err(AppError::Other(err.into())),
    };

    let is_owner = acting.role == Role::RestaurantOwner && restaurant.owner_id == acting.id;
    if !is_owner && acting.role != Role::Admin {
        return Err(AppError::Forbidden(
            "you do not manage this restaurant".to_string(),
        ));
    }

    Ok(restaurant)
}

/// A restaurant not yet approved is never shown to customers.
fn visible_to(acting: &ActingUser, restaurant: &RestaurantEntity) -> bool {
    restaurant.is_approved()
        || acting.role == Role::Admin
        || (acting.role == Role::RestaurantOwner && restaurant.owner_id == acting.id)
}

#[derive(Serialize, ToSchema)]
struct RestaurantWithStatus {
    restaurant: RestaurantEntity,
    operational_status: OperationalStatus,
}

#[derive(Deserialize, ToSchema)]
struct CreateRestaurantReq {
    name: String,
    phone: String,
    address: String,
    opening_hours: Option<OpeningHours>,
}

/// Register a new restaurant. It stays hidden from customers until an admin
/// approves it.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Restaurants"],
    request_body = CreateRestaurantReq,
    responses(
        (status = 201, description = "Restaurant registered", body = StdResponse<RestaurantEntity, String>)
    )
)]
async fn create_restaurant(
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Json(body): Json<CreateRestaurantReq>,
) -> Result<impl IntoResponse, AppError> {
    if acting.role != Role::RestaurantOwner {
        return Err(AppError::Forbidden(
            "only restaurant owners can register restaurants".to_string(),
        ));
    }
    if body.name.is_empty() {
        return Err(AppError::BadRequest("a name is required".to_string()));
    }

    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let opening_hours = serde_json::to_value(body.opening_hours.unwrap_or_default())
        .context("Failed to serialize opening hours")?;

    let restaurant: RestaurantEntity = diesel::insert_into(restaurants::table)
        .values(CreateRestaurantEntity {
            id: Uuid::new_v4(),
            owner_id: acting.id,
            name: body.name,
            phone: body.phone,
            address: body.address,
            opening_hours,
            manual_status_override: ManualOverride::Auto.as_str().to_string(),
            approval_status: APPROVAL_PENDING.to_string(),
        })
        .returning(RestaurantEntity::as_returning())
        .get_result(conn)
        .await
        .context("Failed to create restaurant")?;

    Ok((
        StatusCode::CREATED,
        StdResponse {
            data: Some(restaurant),
            message: Some("Restaurant registered successfully"),
        },
    ))
}

/// List approved restaurants with their current operational status.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Restaurants"],
    responses(
        (status = 200, description = "List restaurants", body = StdResponse<Vec<RestaurantWithStatus>, String>)
    )
)]
async fn get_restaurants(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let restaurants: Vec<RestaurantEntity> = restaurants::table
        .filter(restaurants::approval_status.eq(APPROVAL_APPROVED))
        .order_by(restaurants::name.asc())
        .get_results(conn)
        .await
        .context("Failed to get restaurants")?;

    let now = Local::now().naive_local();
    let listed: Vec<RestaurantWithStatus> = restaurants
        .into_iter()
        .map(|restaurant| RestaurantWithStatus {
            operational_status: restaurant.operational_status(now),
            restaurant,
        })
        .collect();

    Ok(StdResponse {
        data: Some(listed),
        message: Some("Get restaurants successfully"),
    })
}

/// Fetch a single restaurant with its current operational status.
#[utoipa::path(
    get,
    path = "/{restaurant_id}",
    tags = ["Restaurants"],
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID to fetch")
    ),
    responses(
        (status = 200, description = "Get restaurant successfully", body = StdResponse<RestaurantWithStatus, String>)
    )
)]
async fn get_restaurant(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let restaurant: QueryResult<RestaurantEntity> =
        restaurants::table.find(id).get_result(conn).await;

    let restaurant = match restaurant {
        Ok(restaurant) => restaurant,
        Err(DieselError::NotFound) => return Err(AppError::NotFound),
        Err(err) => return Err(AppError::Other(err.into())),
    };

    if !visible_to(&acting, &restaurant) {
        return Err(AppError::NotFound);
    }

    Ok(StdResponse {
        data: Some(RestaurantWithStatus {
            operational_status: restaurant.operational_status(Local::now().naive_local()),
            restaurant,
        }),
        message: Some("Get restaurant successfully"),
    })
}

#[derive(Serialize, ToSchema)]
struct RestaurantStatusRes {
    operational_status: OperationalStatus,
}

/// Resolve a restaurant's operational status right now.
#[utoipa::path(
    get,
    path = "/{restaurant_id}/status",
    tags = ["Restaurants"],
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID to resolve")
    ),
    responses(
        (status = 200, description = "Resolved status", body = StdResponse<RestaurantStatusRes, String>)
    )
)]
async fn get_restaurant_status(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
) -> Result<impl IntoResponse, AppError> {
    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let restaurant: QueryResult<RestaurantEntity> =
        restaurants::table.find(id).get_result(conn).await;

    let restaurant = match restaurant {
        Ok(restaurant) => restaurant,
        Err(DieselError::NotFound) => return Err(AppError::NotFound),
        Err(err) => return Err(AppError::Other(err.into())),
    };

    if !visible_to(&acting, &restaurant) {
        return Err(AppError::NotFound);
    }

    Ok(StdResponse {
        data: Some(RestaurantStatusRes {
            operational_status: restaurant.operational_status(Local::now().naive_local()),
        }),
        message: Some("Get restaurant status successfully"),
    })
}

#[derive(Deserialize, ToSchema)]
struct UpdateRestaurantReq {
    name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    opening_hours: Option<OpeningHours>,
}

/// Update a restaurant's contact details or weekly schedule.
#[utoipa::path(
    patch,
    path = "/{restaurant_id}",
    tags = ["Restaurants"],
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID to update")
    ),
    request_body = UpdateRestaurantReq,
    responses(
        (status = 200, description = "Restaurant updated", body = StdResponse<RestaurantEntity, String>)
    )
)]
async fn update_restaurant(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Json(body): Json<UpdateRestaurantReq>,
) -> Result<impl IntoResponse, AppError> {
    if body.name.is_none()
        && body.phone.is_none()
        && body.address.is_none()
        && body.opening_hours.is_none()
    {
        return Err(AppError::BadRequest("nothing to update".to_string()));
    }

    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    load_editable_restaurant(conn, id, &acting).await?;

    let opening_hours = match body.opening_hours {
        Some(hours) => {
            Some(serde_json::to_value(hours).context("Failed to serialize opening hours")?)
        }
        None => None,
    };

    let updated: RestaurantEntity = diesel::update(restaurants::table.find(id))
        .set((
            UpdateRestaurantEntity {
                name: body.name,
                phone: body.phone,
                address: body.address,
                opening_hours,
            },
            restaurants::updated_at.eq(diesel::dsl::now),
        ))
        .returning(RestaurantEntity::as_returning())
        .get_result(conn)
        .await
        .context("Failed to update restaurant")?;

    Ok(StdResponse {
        data: Some(updated),
        message: Some("Restaurant updated successfully"),
    })
}

#[derive(Deserialize, ToSchema)]
struct SetManualOverrideReq {
    manual_status_override: String,
}

/// Set the owner's manual status override ("auto", "open", "busy" or
/// "closed").
#[utoipa::path(
    put,
    path = "/{restaurant_id}/override",
    tags = ["Restaurants"],
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID to update")
    ),
    request_body = SetManualOverrideReq,
    responses(
        (status = 200, description = "Override updated", body = StdResponse<RestaurantEntity, String>)
    )
)]
async fn set_manual_override(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Json(body): Json<SetManualOverrideReq>,
) -> Result<impl IntoResponse, AppError> {
    let Some(manual_override) = ManualOverride::parse(&body.manual_status_override) else {
        return Err(AppError::BadRequest(format!(
            "{:?} is not a valid status override",
            body.manual_status_override
        )));
    };

    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    load_editable_restaurant(conn, id, &acting).await?;

    let updated: RestaurantEntity = diesel::update(restaurants::table.find(id))
        .set((
            restaurants::manual_status_override.eq(manual_override.as_str()),
            restaurants::updated_at.eq(diesel::dsl::now),
        ))
        .returning(RestaurantEntity::as_returning())
        .get_result(conn)
        .await
        .context("Failed to update status override")?;

    Ok(StdResponse {
        data: Some(updated),
        message: Some("Status override updated successfully"),
    })
}

#[derive(Deserialize, ToSchema)]
struct SetApprovalStatusReq {
    approval_status: String,
}

/// Admin-only: approve or reject a restaurant.
#[utoipa::path(
    put,
    path = "/{restaurant_id}/approval",
    tags = ["Restaurants"],
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID to update")
    ),
    request_body = SetApprovalStatusReq,
    responses(
        (status = 200, description = "Approval status updated", body = StdResponse<RestaurantEntity, String>)
    )
)]
async fn set_approval_status(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Extension(acting): Extension<ActingUser>,
    Json(body): Json<SetApprovalStatusReq>,
) -> Result<impl IntoResponse, AppError> {
    if acting.role != Role::Admin {
        return Err(AppError::Forbidden(
            "only admins can change approval status".to_string(),
        ));
    }
    if ![APPROVAL_PENDING, APPROVAL_APPROVED, APPROVAL_REJECTED]
        .contains(&body.approval_status.as_str())
    {
        return Err(AppError::BadRequest(format!(
            "{:?} is not a valid approval status",
            body.approval_status
        )));
    }

    let conn = &mut state
        .db_pool
        .get()
        .await
        .context("Failed to obtain a DB connection pool")?;

    let updated: QueryResult<RestaurantEntity> = diesel::update(restaurants::table.find(id))
        .set((
            restaurants::approval_status.eq(&body.approval_status),
            restaurants::updated_at.eq(diesel::dsl::now),
        ))
        .returning(RestaurantEntity::as_returning())
        .get_result(conn)
        .await;

    match updated {
        Ok(restaurant) => Ok(StdResponse {
            data: Some(restaurant),
            message: Some("Approval status updated successfully"),
        }),
        Err(DieselError::NotFound) => Err(AppError::NotFound),
        Err(err) => Err(AppError::Other(err.into())),
    }
}

use axum::{extract::Request, middleware::Next, response::Response};

use crate::core::app_error::AppError;
use crate::domain::status::{ActingUser, Role};

/// Resolves the acting user from the gateway-verified identity headers and
/// makes it available to handlers as an `Extension<ActingUser>`. The
/// upstream identity provider authenticates the caller; this service only
/// trusts the forwarded id and role.
pub async fn identity(mut req: Request, next: Next) -> Result<Response, AppError> {
    let user_id = header_value(&req, "x-user-id").ok_or(AppError::Unauthorized)?;
    let role = header_value(&req, "x-user-role")
        .as_deref()
        .and_then(Role::parse)
        .ok_or(AppError::Unauthorized)?;
    let name = header_value(&req, "x-user-name").unwrap_or_else(|| user_id.clone());

    req.extensions_mut().insert(ActingUser {
        id: user_id,
        name,
        role,
    });

    Ok(next.run(req).await)
}

fn header_value(req: &Request, key: &str) -> Option<String> {
    req.headers()
        .get(key)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

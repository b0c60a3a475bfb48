use crate::api::ErrorResponse;
use crate::api::extract::Json;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::images;
use crate::schema::users;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;
use foodgram_core::ValidationError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AvatarRequest {
    /// `data:image/<type>;base64,<payload>`
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvatarResponse {
    /// Absolute avatar URL
    pub avatar: String,
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar/",
    tag = "users",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar replaced", body = AvatarResponse),
        (status = 400, description = "Missing or invalid image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn set_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<AvatarRequest>,
) -> Result<Json<AvatarResponse>, ApiError> {
    let data_url = request
        .avatar
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ValidationError::single("avatar", "This field is required."))?;

    let mut conn = state.conn()?;

    let avatar_id = conn.transaction::<Uuid, ApiError, _>(|conn| {
        let avatar_id = images::store_data_url(conn, "avatar", &data_url)?;
        diesel::update(users::table.find(user.id))
            .set(users::avatar_id.eq(Some(avatar_id)))
            .execute(conn)?;
        if let Some(old) = user.avatar_id {
            images::delete(conn, old)?;
        }
        Ok(avatar_id)
    })?;

    Ok(Json(AvatarResponse {
        avatar: state.config.media_url(avatar_id),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar/",
    tag = "users",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_avatar(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let Some(old) = user.avatar_id else {
        return Ok(StatusCode::NO_CONTENT);
    };

    let mut conn = state.conn()?;
    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::update(users::table.find(user.id))
            .set(users::avatar_id.eq(None::<Uuid>))
            .execute(conn)?;
        images::delete(conn, old)
    })?;

    Ok(StatusCode::NO_CONTENT)
}

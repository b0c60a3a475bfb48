use crate::api::ErrorResponse;
use crate::api::extract::Json;
use crate::auth::hash_password;
use crate::db::lower;
use crate::error::ApiError;
use crate::models::{NewUser, User};
use crate::schema::users;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::dsl::exists;
use diesel::prelude::*;
use foodgram_core::validation::{self, MAX_PERSON_NAME_LEN};
use foodgram_core::FieldErrors;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateUserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

fn check_fields(request: &CreateUserRequest, email: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    validation::email(&mut errors, email);
    validation::username(&mut errors, request.username.trim());
    validation::required_text(
        &mut errors,
        "first_name",
        &request.first_name,
        Some(MAX_PERSON_NAME_LEN),
    );
    validation::required_text(
        &mut errors,
        "last_name",
        &request.last_name,
        Some(MAX_PERSON_NAME_LEN),
    );
    validation::password(&mut errors, "password", &request.password);
    errors
}

#[utoipa::path(
    post,
    path = "/api/users/",
    tag = "users",
    request_body(content = CreateUserRequest, example = json!({
        "email": "cook@example.com",
        "username": "cook",
        "first_name": "Julia",
        "last_name": "Child",
        "password": "password"
    })),
    responses(
        (status = 201, description = "User created successfully", body = CreateUserResponse),
        (status = 400, description = "Invalid request or email/username taken", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let email = validation::normalize_email(&request.email);
    let username = request.username.trim();
    let mut errors = check_fields(&request, &email);

    let mut conn = state.conn()?;

    if !errors.contains("email") {
        let taken: bool = diesel::select(exists(
            users::table.filter(lower(users::email).eq(email.to_lowercase())),
        ))
        .get_result(&mut conn)?;
        if taken {
            errors.add("email", "A user with that email already exists.");
        }
    }
    if !errors.contains("username") {
        let taken: bool =
            diesel::select(exists(users::table.filter(users::username.eq(username))))
                .get_result(&mut conn)?;
        if taken {
            errors.add("username", "A user with that username already exists.");
        }
    }
    errors.into_result()?;

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;

    let user: User = diesel::insert_into(users::table)
        .values(NewUser {
            email: &email,
            username,
            first_name: request.first_name.trim(),
            last_name: request.last_name.trim(),
            password_hash: &password_hash,
        })
        .returning(User::as_returning())
        .get_result(&mut conn)?;

    tracing::info!("Registered user {} ({})", user.id, user.username);

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            email: "cook@example.com".to_string(),
            username: "cook".to_string(),
            first_name: "Julia".to_string(),
            last_name: "Child".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let request = request();
        assert!(check_fields(&request, &request.email).is_empty());
    }

    #[test]
    fn test_reports_every_bad_field() {
        let request = CreateUserRequest {
            email: "not-an-email".to_string(),
            username: "me".to_string(),
            first_name: "".to_string(),
            last_name: "x".repeat(151),
            password: "".to_string(),
        };
        let errors = check_fields(&request, &request.email);
        for field in ["email", "username", "first_name", "last_name", "password"] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
    }
}

pub mod avatar;
pub mod create;
pub mod get;
pub mod list;
pub mod me;
pub mod recipes;
pub mod set_password;
pub mod subscribe;
pub mod subscriptions;
pub mod view;

use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use diesel::prelude::*;
use foodgram_core::Page;
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

/// Returns the router for /api/users endpoints (mounted at /api/users)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_users).post(create::create_user))
        .route("/me", get(me::get_me))
        .route(
            "/me/avatar",
            put(avatar::set_avatar).delete(avatar::delete_avatar),
        )
        .route("/set_password", post(set_password::set_password))
        .route("/subscriptions", get(subscriptions::list_subscriptions))
        .route("/{id}", get(get::get_user))
        .route(
            "/{id}/subscribe",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
        .route("/{id}/recipes", get(recipes::list_user_recipes))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_users,
        create::create_user,
        get::get_user,
        me::get_me,
        avatar::set_avatar,
        avatar::delete_avatar,
        set_password::set_password,
        subscriptions::list_subscriptions,
        subscribe::subscribe,
        subscribe::unsubscribe,
        recipes::list_user_recipes,
    ),
    components(schemas(
        view::UserResponse,
        view::UserPage,
        view::AuthorWithRecipes,
        view::SubscriptionPage,
        create::CreateUserRequest,
        create::CreateUserResponse,
        avatar::AvatarRequest,
        avatar::AvatarResponse,
        set_password::SetPasswordRequest,
    ))
)]
pub struct ApiDoc;

/// `?page=&limit=` on plain paginated lists.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Page size (default: 6, max: 100)
    pub limit: Option<i64>,
    /// Alias for `limit`; wins when both are given
    pub page_size: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.page_size.or(self.limit))
    }
}

/// Pagination plus the number of recipes to preview per author.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubscriptionParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Alias for `limit`; wins when both are given
    pub page_size: Option<i64>,
    /// Maximum number of recipes listed per author
    pub recipes_limit: Option<i64>,
}

impl SubscriptionParams {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.page_size.or(self.limit))
    }
}

pub(crate) fn find_user(conn: &mut PgConnection, id: i32) -> Result<User, ApiError> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("User"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::extract::Query;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    async fn query<T: serde::de::DeserializeOwned>(uri: &str) -> T {
        let (mut parts, _) = Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        let Query(params) = Query::<T>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        params
    }

    #[tokio::test]
    async fn test_page_size_accepted() {
        let params: PageParams = query("/?page=2&page_size=1").await;
        let page = params.page();
        assert_eq!((page.number, page.limit), (2, 1));
    }

    #[tokio::test]
    async fn test_page_size_wins_over_limit() {
        let params: SubscriptionParams =
            query("/?limit=20&page_size=4&recipes_limit=2").await;
        assert_eq!(params.page().limit, 4);
        assert_eq!(params.recipes_limit, Some(2));

        let params: SubscriptionParams = query("/?limit=20").await;
        assert_eq!(params.page().limit, 20);
    }

    #[test]
    fn test_defaults_without_params() {
        let page = PageParams::default().page();
        assert_eq!((page.number, page.limit), (1, 6));
    }
}

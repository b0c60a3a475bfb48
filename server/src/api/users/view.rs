//! User representations shared by the user, subscription and recipe endpoints.

use crate::api::recipes::view::RecipeShort;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::{recipes, subscriptions};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Array, BigInt, Integer, Nullable, Text, Uuid as SqlUuid};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the requesting user follows this user. Always false for
    /// anonymous requests.
    pub is_subscribed: bool,
    /// Absolute avatar URL
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<UserResponse>,
}

/// An author as seen from the subscriptions list: the user plus a preview of
/// their newest recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorWithRecipes {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeShort>,
    pub recipes_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<AuthorWithRecipes>,
}

fn to_response(config: &Config, user: User, is_subscribed: bool) -> UserResponse {
    UserResponse {
        id: user.id,
        avatar: user.avatar_id.map(|id| config.media_url(id)),
        email: user.email,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        is_subscribed,
    }
}

/// Build responses for `users`, resolving `is_subscribed` for `viewer` in a
/// single query.
pub fn user_responses(
    conn: &mut PgConnection,
    config: &Config,
    users: Vec<User>,
    viewer: Option<i32>,
) -> Result<Vec<UserResponse>, ApiError> {
    let followed: HashSet<i32> = match viewer {
        Some(viewer_id) if !users.is_empty() => {
            let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
            subscriptions::table
                .filter(subscriptions::user_id.eq(viewer_id))
                .filter(subscriptions::author_id.eq_any(ids))
                .select(subscriptions::author_id)
                .load::<i32>(conn)?
                .into_iter()
                .collect()
        }
        _ => HashSet::new(),
    };

    Ok(users
        .into_iter()
        .map(|user| {
            let is_subscribed = followed.contains(&user.id);
            to_response(config, user, is_subscribed)
        })
        .collect())
}

pub fn user_response(
    conn: &mut PgConnection,
    config: &Config,
    user: User,
    viewer: Option<i32>,
) -> Result<UserResponse, ApiError> {
    let mut responses = user_responses(conn, config, vec![user], viewer)?;
    responses
        .pop()
        .ok_or_else(|| ApiError::Internal("User response missing".to_string()))
}

/// Each author's recipes, newest first, numbered per author so the
/// preview limit applies to every author in one pass. `$2` NULL means no
/// limit.
const NEWEST_RECIPES_QUERY: &str = "\
SELECT id, author_id, name, cooking_time, image_id FROM (
    SELECT id, author_id, name, cooking_time, image_id,
           ROW_NUMBER() OVER (
               PARTITION BY author_id ORDER BY pub_date DESC, id DESC
           ) AS preview_rank
    FROM recipes
    WHERE author_id = ANY($1)
) ranked
WHERE $2::bigint IS NULL OR preview_rank <= $2::bigint
ORDER BY author_id, preview_rank";

#[derive(QueryableByName)]
struct PreviewRow {
    #[diesel(sql_type = Integer)]
    id: i32,
    #[diesel(sql_type = Integer)]
    author_id: i32,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Integer)]
    cooking_time: i32,
    #[diesel(sql_type = SqlUuid)]
    image_id: Uuid,
}

/// Group already-ordered preview rows by author, keeping their order.
fn group_previews(
    config: &Config,
    rows: Vec<PreviewRow>,
) -> HashMap<i32, Vec<RecipeShort>> {
    let mut previews: HashMap<i32, Vec<RecipeShort>> = HashMap::new();
    for row in rows {
        previews.entry(row.author_id).or_default().push(RecipeShort {
            id: row.id,
            name: row.name,
            image: config.media_url(row.image_id),
            cooking_time: row.cooking_time,
        });
    }
    previews
}

/// Attach each author's newest recipes (at most `recipes_limit` when given)
/// and total recipe count.
pub fn authors_with_recipes(
    conn: &mut PgConnection,
    config: &Config,
    authors: Vec<User>,
    viewer: Option<i32>,
    recipes_limit: Option<i64>,
) -> Result<Vec<AuthorWithRecipes>, ApiError> {
    if authors.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = authors.iter().map(|u| u.id).collect();

    let counts: HashMap<i32, i64> = recipes::table
        .filter(recipes::author_id.eq_any(ids.clone()))
        .group_by(recipes::author_id)
        .select((recipes::author_id, count_star()))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect();

    let rows: Vec<PreviewRow> = sql_query(NEWEST_RECIPES_QUERY)
        .bind::<Array<Integer>, _>(ids)
        .bind::<Nullable<BigInt>, _>(recipes_limit.filter(|l| *l >= 0))
        .load(conn)?;
    let mut previews = group_previews(config, rows);

    let users = user_responses(conn, config, authors, viewer)?;
    Ok(users
        .into_iter()
        .map(|user| AuthorWithRecipes {
            recipes_count: counts.get(&user.id).copied().unwrap_or(0),
            recipes: previews.remove(&user.id).unwrap_or_default(),
            user,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: String::new(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            public_url: "http://testserver".to_string(),
            session_ttl_days: 30,
        }
    }

    fn row(id: i32, author_id: i32) -> PreviewRow {
        PreviewRow {
            id,
            author_id,
            name: format!("Recipe {}", id),
            cooking_time: 10,
            image_id: Uuid::nil(),
        }
    }

    #[test]
    fn test_previews_grouped_in_order() {
        let previews = group_previews(&config(), vec![row(9, 1), row(4, 1), row(7, 2)]);

        let ids = |author: i32| -> Vec<i32> {
            previews[&author].iter().map(|r| r.id).collect()
        };
        assert_eq!(ids(1), vec![9, 4]);
        assert_eq!(ids(2), vec![7]);
        assert!(!previews.contains_key(&3));
        assert_eq!(previews[&2][0].image, config().media_url(Uuid::nil()));
    }
}

//! Filtered, paginated recipe queries shared by the recipe list, an
//! author's recipe list and the subscription feed.

use crate::models::Recipe;
use crate::schema::{favorites, recipe_tags, recipes, shopping_cart_items, subscriptions, tags};
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use foodgram_core::filters::RecipeOrdering;
use foodgram_core::Page;

#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    pub author: Option<i32>,
    /// Tag slugs; a recipe matches if it carries any of them.
    pub tags: Vec<String>,
    /// `(user, include)`: keep only (or drop) that user's favorites.
    pub favorited_by: Option<(i32, bool)>,
    /// `(user, include)`: keep only (or drop) recipes in that user's cart.
    pub in_cart_of: Option<(i32, bool)>,
    /// Only recipes whose author this user follows.
    pub followed_by: Option<i32>,
    pub ordering: RecipeOrdering,
}

fn filtered(filter: &RecipeFilter) -> recipes::BoxedQuery<'_, Pg> {
    let mut query = recipes::table.into_boxed();

    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    if !filter.tags.is_empty() {
        query = query.filter(
            recipes::id.eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(filter.tags.clone()))
                    .select(recipe_tags::recipe_id),
            ),
        );
    }

    if let Some((user_id, include)) = filter.favorited_by {
        let favorited = favorites::table
            .filter(favorites::user_id.eq(user_id))
            .select(favorites::recipe_id);
        query = if include {
            query.filter(recipes::id.eq_any(favorited))
        } else {
            query.filter(recipes::id.ne_all(favorited))
        };
    }

    if let Some((user_id, include)) = filter.in_cart_of {
        let carted = shopping_cart_items::table
            .filter(shopping_cart_items::user_id.eq(user_id))
            .select(shopping_cart_items::recipe_id);
        query = if include {
            query.filter(recipes::id.eq_any(carted))
        } else {
            query.filter(recipes::id.ne_all(carted))
        };
    }

    if let Some(user_id) = filter.followed_by {
        query = query.filter(
            recipes::author_id.eq_any(
                subscriptions::table
                    .filter(subscriptions::user_id.eq(user_id))
                    .select(subscriptions::author_id),
            ),
        );
    }

    query
}

/// One page of matching recipes plus the total number of matches.
pub fn load_page(
    conn: &mut PgConnection,
    filter: &RecipeFilter,
    page: Page,
) -> QueryResult<(Vec<Recipe>, i64)> {
    let query = match filter.ordering {
        RecipeOrdering::PubDateDesc => filtered(filter).order(recipes::pub_date.desc()),
        RecipeOrdering::PubDateAsc => filtered(filter).order(recipes::pub_date.asc()),
        RecipeOrdering::NameAsc => filtered(filter).order(recipes::name.asc()),
        RecipeOrdering::NameDesc => filtered(filter).order(recipes::name.desc()),
    };

    // COUNT(*) OVER() computes the total count across all matching rows
    let rows: Vec<(Recipe, i64)> = query
        .then_order_by(recipes::id.desc())
        .select((Recipe::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .limit(page.limit)
        .offset(page.offset())
        .load(conn)?;

    let total = match rows.first() {
        Some((_, total)) => *total,
        // Past the last page the window function has no row to report on
        None if page.number > 1 => filtered(filter).count().get_result(conn)?,
        None => 0,
    };

    Ok((rows.into_iter().map(|(recipe, _)| recipe).collect(), total))
}

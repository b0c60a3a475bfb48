use crate::api::extract::{Json, Query};
use crate::api::{page_links, ErrorResponse};
use crate::auth::MaybeUser;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{OriginalUri, State};
use foodgram_core::filters::{parse_flag, RecipeOrdering};
use foodgram_core::Page;
use serde::Deserialize;
use utoipa::IntoParams;

use super::query::{load_page, RecipeFilter};
use super::view::{hydrate, RecipePage};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecipesParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Page size (default: 6, max: 100)
    pub limit: Option<i64>,
    /// Alias for `limit`; wins when both are given
    pub page_size: Option<i64>,
    /// Only recipes by this author id
    pub author: Option<i32>,
    /// Tag slugs; repeat the parameter to match any of several tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// `1` for only favorited recipes, `0` to exclude them. Ignored for
    /// anonymous requests.
    pub is_favorited: Option<String>,
    /// `1` for only recipes in the cart, `0` to exclude them. Ignored for
    /// anonymous requests.
    pub is_in_shopping_cart: Option<String>,
    /// One of `name`, `-name`, `pub_date`, `-pub_date` (default)
    pub ordering: Option<String>,
}

impl ListRecipesParams {
    fn page(&self) -> Page {
        Page::new(self.page, self.page_size.or(self.limit))
    }

    fn filter(&self, viewer: Option<i32>) -> RecipeFilter {
        let flag_for = |value: &Option<String>| {
            let viewer = viewer?;
            let include = value.as_deref().and_then(parse_flag)?;
            Some((viewer, include))
        };

        RecipeFilter {
            author: self.author,
            tags: self
                .tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            favorited_by: flag_for(&self.is_favorited),
            in_cart_of: flag_for(&self.is_in_shopping_cart),
            followed_by: None,
            ordering: RecipeOrdering::parse(self.ordering.as_deref()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Page of recipes", body = RecipePage),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    viewer: MaybeUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ListRecipesParams>,
) -> Result<Json<RecipePage>, ApiError> {
    let page = params.page();
    let filter = params.filter(viewer.id());

    let mut conn = state.conn()?;
    let (recipes, count) = load_page(&mut conn, &filter, page)?;
    let results = hydrate(&mut conn, &state.config, recipes, viewer.id())?;
    let (next, previous) = page_links(&state.config, &uri, page, count);

    Ok(Json(RecipePage {
        count,
        next,
        previous,
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListRecipesParams {
        ListRecipesParams {
            page: None,
            limit: None,
            page_size: None,
            author: None,
            tags: Vec::new(),
            is_favorited: None,
            is_in_shopping_cart: None,
            ordering: None,
        }
    }

    #[test]
    fn test_tags_and_author() {
        let filter = ListRecipesParams {
            tags: vec!["breakfast".into(), " lunch ".into(), "".into()],
            author: Some(3),
            ..params()
        }
        .filter(None);
        assert_eq!(filter.tags, vec!["breakfast", "lunch"]);
        assert_eq!(filter.author, Some(3));
    }

    #[test]
    fn test_flags_ignored_for_anonymous() {
        let filter = ListRecipesParams {
            is_favorited: Some("1".into()),
            is_in_shopping_cart: Some("0".into()),
            ..params()
        }
        .filter(None);
        assert_eq!(filter.favorited_by, None);
        assert_eq!(filter.in_cart_of, None);
    }

    #[test]
    fn test_flags_for_viewer() {
        let filter = ListRecipesParams {
            is_favorited: Some("1".into()),
            is_in_shopping_cart: Some("0".into()),
            ..params()
        }
        .filter(Some(7));
        assert_eq!(filter.favorited_by, Some((7, true)));
        assert_eq!(filter.in_cart_of, Some((7, false)));
    }

    #[test]
    fn test_unknown_flag_means_no_filter() {
        let filter = ListRecipesParams {
            is_favorited: Some("maybe".into()),
            ..params()
        }
        .filter(Some(7));
        assert_eq!(filter.favorited_by, None);
    }

    #[test]
    fn test_ordering() {
        let filter = ListRecipesParams {
            ordering: Some("name".into()),
            ..params()
        }
        .filter(None);
        assert_eq!(filter.ordering, RecipeOrdering::NameAsc);
        assert_eq!(params().filter(None).ordering, RecipeOrdering::PubDateDesc);
    }

    #[test]
    fn test_page_size_overrides_limit() {
        let page = ListRecipesParams {
            page: Some(2),
            limit: Some(10),
            page_size: Some(3),
            ..params()
        }
        .page();
        assert_eq!((page.number, page.limit), (2, 3));

        let page = ListRecipesParams {
            limit: Some(10),
            ..params()
        }
        .page();
        assert_eq!(page.limit, 10);
    }
}

//! Request body shared by recipe create and update, and its validation.

use crate::error::ApiError;
use crate::schema::{ingredients, tags};
use diesel::prelude::*;
use foodgram_core::validation::{self, MAX_RECIPE_NAME_LEN, MIN_AMOUNT, MIN_COOKING_TIME};
use foodgram_core::{decode_data_url, DecodedImage, FieldErrors};
use serde::Deserialize;
use std::collections::HashSet;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeIngredientInput {
    /// Ingredient id
    pub id: i32,
    pub amount: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "ingredients": [{"id": 1123, "amount": 10}],
    "tags": [1, 2],
    "image": "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==",
    "name": "Omelette",
    "text": "Beat the eggs, fry.",
    "cooking_time": 5
}))]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<RecipeIngredientInput>>,
    /// Tag ids
    pub tags: Option<Vec<i32>>,
    /// `data:image/<type>;base64,<payload>`
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

/// A request that passed validation. `None` fields are left unchanged on
/// update; on create every field is present.
#[derive(Debug)]
pub struct ValidRecipe {
    pub ingredients: Vec<(i32, i32)>,
    pub tags: Vec<i32>,
    pub image: Option<DecodedImage>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

const REQUIRED: &str = "This field is required.";

/// Checks that need no database: presence, lengths, ranges, duplicates and
/// the image payload.
fn check_fields(
    request: &RecipeRequest,
    mode: Mode,
    errors: &mut FieldErrors,
) -> Option<DecodedImage> {
    match &request.ingredients {
        None => errors.add("ingredients", REQUIRED),
        Some(items) => {
            let ids: Vec<i32> = items.iter().map(|i| i.id).collect();
            validation::unique_non_empty(errors, "ingredients", &ids);
            for item in items {
                validation::min_value(errors, "ingredients", item.amount, MIN_AMOUNT);
            }
        }
    }

    match &request.tags {
        None => errors.add("tags", REQUIRED),
        Some(tags) => validation::unique_non_empty(errors, "tags", tags),
    }

    let image = match request.image.as_deref() {
        None | Some("") if mode == Mode::Create => {
            errors.add("image", REQUIRED);
            None
        }
        None | Some("") => None,
        Some(value) => match decode_data_url(value) {
            Ok(image) => Some(image),
            Err(e) => {
                errors.add("image", e);
                None
            }
        },
    };

    match request.name.as_deref() {
        Some(name) => {
            validation::required_text(errors, "name", name, Some(MAX_RECIPE_NAME_LEN))
        }
        None if mode == Mode::Create => errors.add("name", REQUIRED),
        None => {}
    }

    match request.text.as_deref() {
        Some(text) => validation::required_text(errors, "text", text, None),
        None if mode == Mode::Create => errors.add("text", REQUIRED),
        None => {}
    }

    match request.cooking_time {
        Some(minutes) => {
            validation::min_value(errors, "cooking_time", minutes, MIN_COOKING_TIME)
        }
        None if mode == Mode::Create => errors.add("cooking_time", REQUIRED),
        None => {}
    }

    image
}

/// Ids from `wanted` that have no row in the table.
fn missing_ids(wanted: &[i32], found: Vec<i32>) -> Vec<i32> {
    let found: HashSet<i32> = found.into_iter().collect();
    wanted.iter().copied().filter(|id| !found.contains(id)).collect()
}

pub fn validate(
    conn: &mut PgConnection,
    request: RecipeRequest,
    mode: Mode,
) -> Result<ValidRecipe, ApiError> {
    let mut errors = FieldErrors::new();
    let image = check_fields(&request, mode, &mut errors);

    let ingredient_pairs: Vec<(i32, i32)> = request
        .ingredients
        .unwrap_or_default()
        .into_iter()
        .map(|i| (i.id, i.amount))
        .collect();
    let tag_ids = request.tags.unwrap_or_default();

    if !errors.contains("ingredients") {
        let wanted: Vec<i32> = ingredient_pairs.iter().map(|(id, _)| *id).collect();
        let found = ingredients::table
            .filter(ingredients::id.eq_any(&wanted))
            .select(ingredients::id)
            .load::<i32>(conn)?;
        for id in missing_ids(&wanted, found) {
            errors.add("ingredients", format!("Ingredient {} does not exist.", id));
        }
    }

    if !errors.contains("tags") {
        let found = tags::table
            .filter(tags::id.eq_any(&tag_ids))
            .select(tags::id)
            .load::<i32>(conn)?;
        for id in missing_ids(&tag_ids, found) {
            errors.add("tags", format!("Tag {} does not exist.", id));
        }
    }

    errors.into_result()?;

    Ok(ValidRecipe {
        ingredients: ingredient_pairs,
        tags: tag_ids,
        image,
        name: request.name.map(|n| n.trim().to_string()),
        text: request.text,
        cooking_time: request.cooking_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn full_request() -> RecipeRequest {
        RecipeRequest {
            ingredients: Some(vec![
                RecipeIngredientInput { id: 1, amount: 10 },
                RecipeIngredientInput { id: 2, amount: 1 },
            ]),
            tags: Some(vec![1]),
            image: Some(PNG.to_string()),
            name: Some("Omelette".to_string()),
            text: Some("Beat the eggs.".to_string()),
            cooking_time: Some(5),
        }
    }

    fn errors_for(request: &RecipeRequest, mode: Mode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_fields(request, mode, &mut errors);
        errors
    }

    #[test]
    fn test_valid_create_request() {
        let request = full_request();
        let mut errors = FieldErrors::new();
        let image = check_fields(&request, Mode::Create, &mut errors);
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(image.unwrap().content_type, "image/png");
    }

    #[test]
    fn test_create_requires_every_field() {
        let request = RecipeRequest {
            ingredients: None,
            tags: None,
            image: None,
            name: None,
            text: None,
            cooking_time: None,
        };
        let errors = errors_for(&request, Mode::Create);
        for field in ["ingredients", "tags", "image", "name", "text", "cooking_time"] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_update_only_requires_relations() {
        let request = RecipeRequest {
            image: None,
            name: None,
            text: None,
            cooking_time: None,
            ..full_request()
        };
        assert!(errors_for(&request, Mode::Update).is_empty());

        let request = RecipeRequest {
            tags: None,
            ..full_request()
        };
        let errors = errors_for(&request, Mode::Update);
        assert!(errors.contains("tags"));
        assert!(!errors.contains("image"));
    }

    #[test]
    fn test_rejects_duplicates_and_bad_amounts() {
        let request = RecipeRequest {
            ingredients: Some(vec![
                RecipeIngredientInput { id: 1, amount: 0 },
                RecipeIngredientInput { id: 1, amount: 2 },
            ]),
            tags: Some(vec![3, 3]),
            ..full_request()
        };
        let errors = errors_for(&request, Mode::Create);
        assert_eq!(errors.fields()["ingredients"].len(), 2);
        assert!(errors.contains("tags"));
    }

    #[test]
    fn test_rejects_empty_lists_and_low_cooking_time() {
        let request = RecipeRequest {
            ingredients: Some(vec![]),
            tags: Some(vec![]),
            cooking_time: Some(0),
            ..full_request()
        };
        let errors = errors_for(&request, Mode::Create);
        assert!(errors.contains("ingredients"));
        assert!(errors.contains("tags"));
        assert!(errors.contains("cooking_time"));
    }

    #[test]
    fn test_rejects_non_image_payload() {
        let request = RecipeRequest {
            image: Some("data:image/png;base64,aGVsbG8gd29ybGQ=".to_string()),
            ..full_request()
        };
        assert!(errors_for(&request, Mode::Create).contains("image"));
    }

    #[test]
    fn test_missing_ids() {
        assert_eq!(missing_ids(&[1, 2, 3], vec![3, 1]), vec![2]);
        assert!(missing_ids(&[1], vec![1]).is_empty());
    }
}

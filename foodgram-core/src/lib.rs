pub mod error;
pub mod filters;
pub mod image;
pub mod import;
pub mod pagination;
pub mod shopping;
pub mod short_link;
pub mod validation;

pub use crate::image::{decode_data_url, validate_image, DecodedImage, MAX_FILE_SIZE};
pub use error::{FieldErrors, ImportError, ShortLinkError, ValidationError};
pub use import::{parse_ingredients, ImportFormat, IngredientRecord};
pub use pagination::{Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use shopping::{aggregate, render, CartLine, ShoppingItem};

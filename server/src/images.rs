//! Storage for uploaded images. Recipes and avatars reference rows here by
//! UUID; bytes are served back from `/media/{id}`.

use crate::error::ApiError;
use crate::models::NewImage;
use crate::schema::images;
use diesel::prelude::*;
use foodgram_core::{decode_data_url, DecodedImage, ValidationError};
use uuid::Uuid;

/// Decode a data URL submitted in `field` and store it.
///
/// Invalid images are reported as a validation error on that field.
pub fn store_data_url(
    conn: &mut PgConnection,
    field: &str,
    value: &str,
) -> Result<Uuid, ApiError> {
    let image = decode_data_url(value).map_err(|e| ValidationError::single(field, e))?;
    store(conn, &image)
}

pub fn store(conn: &mut PgConnection, image: &DecodedImage) -> Result<Uuid, ApiError> {
    let id = diesel::insert_into(images::table)
        .values(NewImage {
            content_type: &image.content_type,
            data: &image.data,
        })
        .returning(images::id)
        .get_result(conn)?;

    tracing::debug!(
        "Stored {} image {} ({} bytes)",
        image.content_type,
        id,
        image.data.len()
    );
    Ok(id)
}

/// Delete an image that nothing points at anymore.
pub fn delete(conn: &mut PgConnection, id: Uuid) -> Result<(), ApiError> {
    diesel::delete(images::table.find(id)).execute(conn)?;
    Ok(())
}

/// Content type and bytes of a stored image.
pub fn load(conn: &mut PgConnection, id: Uuid) -> Result<Option<(String, Vec<u8>)>, ApiError> {
    Ok(images::table
        .find(id)
        .select((images::content_type, images::data))
        .first(conn)
        .optional()?)
}

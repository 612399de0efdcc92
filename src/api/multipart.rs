//! Reading listing forms from `multipart/form-data` requests.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

use crate::error::MarketError;
use crate::service::FormFields;
use crate::store::ImageUpload;

/// Name of the multipart field carrying image files.
pub const IMAGES_FIELD: &str = "images";

fn malformed(err: &MultipartError) -> MarketError {
    MarketError::validation_with("Malformed form data", err.body_text())
}

/// Splits a multipart body into text fields and image files.
///
/// # Errors
///
/// Returns [`MarketError::Validation`] if the body is malformed, a file is
/// sent under a field other than `images`, or more than `max_images` files
/// are sent.
pub async fn read_listing_form(
    mut multipart: Multipart,
    max_images: usize,
) -> Result<(FormFields, Vec<ImageUpload>), MarketError> {
    let mut fields = FormFields::new();
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| malformed(&e))? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(ToString::to_string) {
            if name != IMAGES_FIELD {
                return Err(MarketError::validation_with(
                    "Unexpected file field",
                    format!("Files must be sent as '{IMAGES_FIELD}', got '{name}'"),
                ));
            }
            if images.len() >= max_images {
                return Err(MarketError::validation_with(
                    "Too many images",
                    format!("At most {max_images} images may be uploaded"),
                ));
            }
            let content_type = field.content_type().map(ToString::to_string);
            let bytes = field.bytes().await.map_err(|e| malformed(&e))?;
            images.push(ImageUpload {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field.text().await.map_err(|e| malformed(&e))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, images))
}

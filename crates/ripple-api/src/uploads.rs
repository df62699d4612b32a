use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ApiError;
use crate::storage::Storage;

/// The field name file uploads arrive under.
const PICTURE_FIELD: &str = "picture";

/// A collected multipart form: text fields plus the stored filename of the
/// optional picture upload.
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub picture_path: Option<String>,
}

impl UploadForm {
    /// Drain a multipart request, writing the picture field (if any) to
    /// the upload directory and gathering everything else as text.
    pub async fn collect(mut multipart: Multipart, storage: &Storage) -> Result<Self, ApiError> {
        let mut fields = HashMap::new();
        let mut picture_path = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == PICTURE_FIELD {
                // A picture part without a filename counts as no upload.
                let Some(file_name) = field.file_name().map(str::to_owned) else {
                    continue;
                };
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
                picture_path = Some(storage.save(&file_name, &data).await?);
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("malformed field {name}: {e}")))?;
                fields.insert(name, value);
            }
        }

        Ok(Self {
            fields,
            picture_path,
        })
    }

    pub fn require(&self, name: &str) -> Result<&str, ApiError> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::BadRequest(format!("missing field: {name}")))
    }

    pub fn optional(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .filter(|v| !v.is_empty())
            .cloned()
    }
}

// SPDX-License-Identifier: MIT

//! Firebase Storage client for avatar objects.
//!
//! Uploads go to `avatars/{file_name}` in the configured bucket and
//! return the tokenized download URL that gets stored on the user
//! document. Replacing an avatar deletes the previous object by its
//! download URL.

use crate::error::AppError;
use serde::Deserialize;

/// Firebase Storage REST client.
#[derive(Clone)]
pub struct AvatarStorage {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    #[serde(rename = "downloadTokens")]
    download_tokens: Option<String>,
}

impl AvatarStorage {
    pub fn new(bucket: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://firebasestorage.googleapis.com/v0/b".to_string(),
            bucket,
        }
    }

    /// Client against a different base URL (tests).
    pub fn with_base_url(bucket: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            bucket,
        }
    }

    /// Upload avatar bytes, returning the download URL.
    pub async fn upload_avatar(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        let object = format!("avatars/{}", file_name);
        let encoded = urlencoding::encode(&object).into_owned();
        let url = format!(
            "{}/{}/o?uploadType=media&name={}",
            self.base_url, self.bucket, encoded
        );

        let total_bytes = bytes.len();
        tracing::debug!(object = %object, total_bytes, "Uploading avatar");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Avatar upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Avatar upload failed: HTTP {}: {}",
                status, body
            )));
        }

        let meta: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| AppError::Storage(format!("Invalid upload response: {}", e)))?;

        let token = meta
            .download_tokens
            .and_then(|t| t.split(',').next().map(str::to_string))
            .unwrap_or_default();

        tracing::info!(object = %object, total_bytes, "Avatar upload complete");

        Ok(format!(
            "{}/{}/o/{}?alt=media&token={}",
            self.base_url, self.bucket, encoded, token
        ))
    }

    /// Delete a previously uploaded object by its download URL.
    ///
    /// URLs that do not point into this bucket are ignored.
    pub async fn delete_by_url(&self, download_url: &str) -> Result<(), AppError> {
        let Some(object) = Self::object_path(download_url) else {
            tracing::warn!(url = download_url, "Not a storage download URL, skipping delete");
            return Ok(());
        };

        let url = format!("{}/{}/o/{}", self.base_url, self.bucket, object);

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Avatar delete failed: {}", e)))?;

        // A missing object is fine; the goal is that it is gone.
        if !response.status().is_success() && response.status().as_u16() != 404 {
            let status = response.status();
            return Err(AppError::Storage(format!(
                "Avatar delete failed: HTTP {}",
                status
            )));
        }

        tracing::debug!(object = %object, "Avatar object deleted");
        Ok(())
    }

    /// Extract the url-encoded object path from a download URL.
    fn object_path(download_url: &str) -> Option<String> {
        let after = download_url.split("/o/").nth(1)?;
        let object = after.split('?').next()?;
        if object.is_empty() {
            None
        } else {
            Some(object.to_string())
        }
    }
}

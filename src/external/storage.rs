use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use std::time::Duration;
use uuid::Uuid;

/// Thin client for the hosted object store. Uploads land under
/// `{base_url}/object/{bucket}/{path}` and are served back from the public
/// URL returned by `public_url`.
#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    config: StorageConfig,
}

impl StorageClient {
    pub fn new(config: StorageConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    /// Build a unique object path under the given folder, keeping the
    /// original file extension when there is one.
    pub fn object_path(folder: &str, file_name: &str) -> String {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.len() <= 8);

        match ext {
            Some(ext) => format!("{folder}/{}.{ext}", Uuid::new_v4()),
            None => format!("{folder}/{}", Uuid::new_v4()),
        }
    }

    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String> {
        let url = format!(
            "{}/object/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.bucket,
            path
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApiError(format!(
                "storage upload failed with {status}: {body}"
            )));
        }

        Ok(self.public_url(path))
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.bucket,
            path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StorageClient {
        StorageClient::new(StorageConfig {
            base_url: "https://media.chowhub.test/storage/v1/".to_string(),
            bucket: "chowhub-media".to_string(),
            api_key: "secret".to_string(),
        })
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            client().public_url("dishes/abc.png"),
            "https://media.chowhub.test/storage/v1/object/public/chowhub-media/dishes/abc.png"
        );
    }

    #[test]
    fn test_object_path_keeps_extension() {
        let path = StorageClient::object_path("avatars", "me.jpeg");
        assert!(path.starts_with("avatars/"));
        assert!(path.ends_with(".jpeg"));
    }

    #[test]
    fn test_object_path_without_extension() {
        let path = StorageClient::object_path("avatars", "noext");
        assert!(path.starts_with("avatars/"));
        assert!(!path.contains('.'));
    }
}

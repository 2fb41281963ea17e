//! Object storage for evidence files
//!
//! Handlers and services depend on the [`ObjectStorage`] trait; the MinIO
//! client is wired in at startup.

use async_trait::async_trait;

use crate::core::error::AppError;

mod minio_client;

pub use minio_client::MinIOClient;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `path` below the public prefix and return its
    /// anonymously readable URL
    async fn upload_public(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError>;
}

//! Port for the disk-backed catalog service.

use async_trait::async_trait;
use placekit_core::{Item, ItemKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a catalog service call.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service exists but cannot answer right now.
    #[error("catalog service unavailable: {0}")]
    Unavailable(String),
    /// Reading the backing store failed.
    #[error("catalog service I/O failure: {0}")]
    Io(#[from] std::io::Error),
    /// The listing task did not complete.
    #[error("catalog listing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Image record as returned by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImageRecord {
    /// Service-assigned id.
    pub id: String,
    /// Display name.
    pub file_name: String,
    /// Primary locator.
    pub url: String,
    /// Secondary locator.
    #[serde(default)]
    pub file_path: Option<String>,
    /// Preview locator.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// Model record as returned by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModelRecord {
    /// Service-assigned id.
    pub id: String,
    /// Display name.
    pub file_name: String,
    /// Primary locator.
    pub url: String,
    /// Secondary locator.
    #[serde(default)]
    pub file_path: Option<String>,
    /// Preview locator.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl RawImageRecord {
    /// Convert into a catalog item.
    pub fn into_item(self) -> Item {
        build_item(
            ItemKind::Image,
            self.id,
            self.file_name,
            self.url,
            self.file_path,
            self.thumbnail_url,
            self.file_size,
        )
    }
}

impl RawModelRecord {
    /// Convert into a catalog item.
    pub fn into_item(self) -> Item {
        build_item(
            ItemKind::Model,
            self.id,
            self.file_name,
            self.url,
            self.file_path,
            self.thumbnail_url,
            self.file_size,
        )
    }
}

fn build_item(
    kind: ItemKind,
    id: String,
    file_name: String,
    url: String,
    file_path: Option<String>,
    thumbnail_url: Option<String>,
    file_size: Option<u64>,
) -> Item {
    let mut item = Item::new(id, kind, file_name, url);
    item.file_path = file_path;
    item.thumbnail_url = thumbnail_url;
    item.file_size = file_size;
    item
}

/// Result of `list_images_from_disk`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageListing {
    /// False when the service answered but could not list images.
    pub success: bool,
    /// Listed images, in service order.
    pub images: Vec<RawImageRecord>,
}

/// Result of `list_models_from_disk`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelListing {
    /// False when the service answered but could not list models.
    pub success: bool,
    /// Listed models, in service order.
    pub models: Vec<RawModelRecord>,
}

/// Disk-backed catalog service.
///
/// Whether a service exists at all is decided once by the host when it
/// builds the [`crate::CatalogAggregator`]; implementations never need to
/// signal "not present".
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List stored images.
    async fn list_images_from_disk(&self) -> Result<ImageListing, ServiceError>;

    /// List stored models.
    async fn list_models_from_disk(&self) -> Result<ModelListing, ServiceError>;
}

use std::time::Duration;

use async_trait::async_trait;
use placekit_catalog::{
    CatalogService, ImageListing, ModelListing, RawImageRecord, RawModelRecord, ServiceError,
};
use tracing::debug;

#[derive(Debug, Clone)]
enum Reply<T> {
    Listing(T),
    Rejected,
    Errored,
}

/// Scriptable catalog service.
///
/// Each call can succeed, answer `success: false`, or error, optionally
/// after a delay so tests can force either call to settle first.
#[derive(Debug, Clone)]
pub struct StubCatalogService {
    images: Reply<Vec<RawImageRecord>>,
    models: Reply<Vec<RawModelRecord>>,
    image_delay: Duration,
    model_delay: Duration,
}

impl Default for StubCatalogService {
    fn default() -> Self {
        Self {
            images: Reply::Listing(Vec::new()),
            models: Reply::Listing(Vec::new()),
            image_delay: Duration::ZERO,
            model_delay: Duration::ZERO,
        }
    }
}

impl StubCatalogService {
    /// Service answering with empty listings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `list_images_from_disk` with these records.
    pub fn with_images(mut self, images: Vec<RawImageRecord>) -> Self {
        self.images = Reply::Listing(images);
        self
    }

    /// Answer `list_models_from_disk` with these records.
    pub fn with_models(mut self, models: Vec<RawModelRecord>) -> Self {
        self.models = Reply::Listing(models);
        self
    }

    /// Make `list_images_from_disk` return an error.
    pub fn failing_images(mut self) -> Self {
        self.images = Reply::Errored;
        self
    }

    /// Make `list_models_from_disk` return an error.
    pub fn failing_models(mut self) -> Self {
        self.models = Reply::Errored;
        self
    }

    /// Make `list_images_from_disk` answer `success: false`.
    pub fn rejecting_images(mut self) -> Self {
        self.images = Reply::Rejected;
        self
    }

    /// Delay the image listing.
    pub fn images_after(mut self, delay: Duration) -> Self {
        self.image_delay = delay;
        self
    }

    /// Delay the model listing.
    pub fn models_after(mut self, delay: Duration) -> Self {
        self.model_delay = delay;
        self
    }
}

#[async_trait]
impl CatalogService for StubCatalogService {
    async fn list_images_from_disk(&self) -> Result<ImageListing, ServiceError> {
        tokio::time::sleep(self.image_delay).await;
        debug!("stub service answering image listing");
        match &self.images {
            Reply::Listing(images) => Ok(ImageListing {
                success: true,
                images: images.clone(),
            }),
            Reply::Rejected => Ok(ImageListing::default()),
            Reply::Errored => Err(ServiceError::Unavailable("stubbed image failure".into())),
        }
    }

    async fn list_models_from_disk(&self) -> Result<ModelListing, ServiceError> {
        tokio::time::sleep(self.model_delay).await;
        debug!("stub service answering model listing");
        match &self.models {
            Reply::Listing(models) => Ok(ModelListing {
                success: true,
                models: models.clone(),
            }),
            Reply::Rejected => Ok(ModelListing::default()),
            Reply::Errored => Err(ServiceError::Unavailable("stubbed model failure".into())),
        }
    }
}

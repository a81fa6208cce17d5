//! One load cycle: fetch, concatenate in source order, deduplicate,
//! categorize.

use std::sync::Arc;

use placekit_core::{category_set, Item, ItemId};
use placekit_scene::{SceneItemRecord, SceneRegistry};
use tracing::{debug, info, warn};

use crate::dedup::dedupe;
use crate::service::{CatalogService, RawImageRecord, RawModelRecord};

/// A source contributing candidates to a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSource {
    /// `list_images_from_disk`.
    DiskImages,
    /// `list_models_from_disk`.
    DiskModels,
    /// Items known to the live scene.
    SceneRegistry,
}

/// Deduplicated, categorized result of one load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    /// Final items; earliest source record wins identity.
    pub items: Vec<Item>,
    /// Browsable categories, built-ins first.
    pub categories: Vec<String>,
    /// Sources that failed and contributed nothing.
    pub failed_sources: Vec<CatalogSource>,
    /// Set when no primary source could be read; displayable, never fatal.
    pub error: Option<String>,
}

impl CatalogSnapshot {
    /// Empty catalog with the built-in categories.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            categories: category_set(std::iter::empty::<&Item>()),
            failed_sources: Vec::new(),
            error: None,
        }
    }

    /// Whether every primary source failed. Items read from the scene
    /// registry may still be present.
    pub fn is_total_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Look up an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Aggregates the disk-backed catalog service and the scene registry.
///
/// The service capability is fixed at construction: `None` means this host
/// has no disk-backed service and the scene registry is the only source.
#[derive(Clone)]
pub struct CatalogAggregator {
    service: Option<Arc<dyn CatalogService>>,
    scene: Arc<dyn SceneRegistry>,
    scene_supplement: bool,
}

impl CatalogAggregator {
    /// Create an aggregator. Scene items supplement disk items by default.
    pub fn new(service: Option<Arc<dyn CatalogService>>, scene: Arc<dyn SceneRegistry>) -> Self {
        Self {
            service,
            scene,
            scene_supplement: true,
        }
    }

    /// Whether scene items are appended after disk items when a disk
    /// service exists. Without a service they are always read.
    pub fn with_scene_supplement(mut self, enabled: bool) -> Self {
        self.scene_supplement = enabled;
        self
    }

    /// Whether a disk-backed service is present.
    pub fn has_disk_service(&self) -> bool {
        self.service.is_some()
    }

    /// The scene registry consulted by the fallback path.
    pub fn scene_registry(&self) -> &Arc<dyn SceneRegistry> {
        &self.scene
    }

    /// Run one load cycle. Never fails: source failures are logged and
    /// recorded on the snapshot.
    pub async fn load_catalog(&self) -> CatalogSnapshot {
        let mut candidates = Vec::new();
        let mut failed = Vec::new();

        if let Some(service) = &self.service {
            // Both calls settle before anything is merged so the tie-break
            // order stays images-then-models.
            let (images, models) = tokio::join!(
                service.list_images_from_disk(),
                service.list_models_from_disk()
            );

            match images {
                Ok(listing) if listing.success => {
                    candidates.extend(listing.images.into_iter().map(RawImageRecord::into_item));
                }
                Ok(_) => {
                    warn!("catalog service could not list images; continuing without them");
                    failed.push(CatalogSource::DiskImages);
                }
                Err(err) => {
                    warn!("listing images from disk failed: {err}; continuing without them");
                    failed.push(CatalogSource::DiskImages);
                }
            }

            match models {
                Ok(listing) if listing.success => {
                    candidates.extend(listing.models.into_iter().map(RawModelRecord::into_item));
                }
                Ok(_) => {
                    warn!("catalog service could not list models; continuing without them");
                    failed.push(CatalogSource::DiskModels);
                }
                Err(err) => {
                    warn!("listing models from disk failed: {err}; continuing without them");
                    failed.push(CatalogSource::DiskModels);
                }
            }
        }

        if self.service.is_none() || self.scene_supplement {
            match self.scene.scene_items() {
                Ok(records) => candidates.extend(records.iter().map(SceneItemRecord::to_item)),
                Err(err) => {
                    warn!("reading scene items failed: {err:#}");
                    failed.push(CatalogSource::SceneRegistry);
                }
            }
        }

        let primary_failed = match self.service {
            Some(_) => {
                failed.contains(&CatalogSource::DiskImages)
                    && failed.contains(&CatalogSource::DiskModels)
            }
            None => failed.contains(&CatalogSource::SceneRegistry),
        };
        let error = primary_failed.then(|| {
            warn!(
                scene_candidates = candidates.len(),
                "catalog load failed for every primary source"
            );
            "Could not load the item catalog".to_string()
        });

        let candidate_count = candidates.len();
        let outcome = dedupe(candidates);
        debug!(
            candidates = candidate_count,
            merged = outcome.merged,
            skipped = outcome.skipped,
            "deduplicated catalog candidates"
        );

        let categories = category_set(&outcome.items);
        info!(
            items = outcome.items.len(),
            categories = categories.len(),
            "catalog loaded"
        );

        CatalogSnapshot {
            items: outcome.items,
            categories,
            failed_sources: failed,
            error,
        }
    }
}

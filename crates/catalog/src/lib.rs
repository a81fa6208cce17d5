#![warn(missing_docs)]
//! Catalog aggregation: pulls raw item lists from the disk-backed catalog
//! service and the scene registry, merges them and deduplicates by identity.

mod aggregator;
mod dedup;
mod fs_service;
mod service;

pub use aggregator::{CatalogAggregator, CatalogSnapshot, CatalogSource};
pub use dedup::{dedupe, DedupOutcome};
pub use fs_service::{FsCatalogService, IMAGE_EXTENSIONS, MODEL_EXTENSIONS};
pub use service::{
    CatalogService, ImageListing, ModelListing, RawImageRecord, RawModelRecord, ServiceError,
};

//! Catalog service backed by a local library directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use placekit_core::normalize_path;
use tracing::debug;
use walkdir::WalkDir;

use crate::service::{
    CatalogService, ImageListing, ModelListing, RawImageRecord, RawModelRecord, ServiceError,
};

/// File extensions listed as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// File extensions listed as models.
pub const MODEL_EXTENSIONS: &[&str] = &["glb", "gltf", "obj", "fbx"];

/// Suffix marking generated previews; these are never listed themselves.
const THUMBNAIL_SUFFIX: &str = ".thumb.png";

/// Length of the hex id derived from a file's normalized path.
const ID_HEX_LEN: usize = 16;

#[derive(Debug, Clone)]
struct ScannedFile {
    id: String,
    file_name: String,
    url: String,
    file_path: String,
    thumbnail_url: Option<String>,
    file_size: Option<u64>,
}

/// Lists images and models stored under a library directory.
///
/// Ids are derived from the normalized path, so they stay stable across
/// restarts as long as files are not moved.
#[derive(Debug, Clone)]
pub struct FsCatalogService {
    root: PathBuf,
}

impl FsCatalogService {
    /// Create a service rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn scan(
        &self,
        extensions: &'static [&'static str],
    ) -> Result<Vec<ScannedFile>, ServiceError> {
        let root = self.root.clone();
        let files = tokio::task::spawn_blocking(move || scan_dir(&root, extensions)).await??;
        Ok(files)
    }
}

#[async_trait]
impl CatalogService for FsCatalogService {
    async fn list_images_from_disk(&self) -> Result<ImageListing, ServiceError> {
        let images = self
            .scan(IMAGE_EXTENSIONS)
            .await?
            .into_iter()
            .map(|f| RawImageRecord {
                id: f.id,
                file_name: f.file_name,
                url: f.url,
                file_path: Some(f.file_path),
                thumbnail_url: f.thumbnail_url,
                file_size: f.file_size,
            })
            .collect();
        Ok(ImageListing {
            success: true,
            images,
        })
    }

    async fn list_models_from_disk(&self) -> Result<ModelListing, ServiceError> {
        let models = self
            .scan(MODEL_EXTENSIONS)
            .await?
            .into_iter()
            .map(|f| RawModelRecord {
                id: f.id,
                file_name: f.file_name,
                url: f.url,
                file_path: Some(f.file_path),
                thumbnail_url: f.thumbnail_url,
                file_size: f.file_size,
            })
            .collect();
        Ok(ModelListing {
            success: true,
            models,
        })
    }
}

fn scan_dir(root: &Path, extensions: &[&str]) -> Result<Vec<ScannedFile>, ServiceError> {
    if !root.is_dir() {
        return Err(ServiceError::Unavailable(format!(
            "library directory {} does not exist",
            root.display()
        )));
    }

    let mut files = Vec::new();
    // Sorted so listings are deterministic across platforms.
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !has_extension(path, extensions) || is_thumbnail(path) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let file_path = path.to_string_lossy().into_owned();
        let url = file_path.replace('\\', "/");
        let file_size = entry.metadata().ok().map(|m| m.len());

        files.push(ScannedFile {
            id: stable_id(&file_path),
            file_name,
            url,
            file_path,
            thumbnail_url: thumbnail_for(path),
            file_size,
        });
    }

    debug!(root = %root.display(), count = files.len(), "scanned library directory");
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

fn is_thumbnail(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(THUMBNAIL_SUFFIX))
}

fn thumbnail_for(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let candidate = path.with_file_name(format!("{stem}{THUMBNAIL_SUFFIX}"));
    candidate
        .is_file()
        .then(|| candidate.to_string_lossy().replace('\\', "/"))
}

fn stable_id(file_path: &str) -> String {
    let normalized = normalize_path(Some(file_path)).unwrap_or_default();
    let hex = blake3::hash(normalized.as_bytes()).to_hex();
    hex.as_str()[..ID_HEX_LEN].to_string()
}

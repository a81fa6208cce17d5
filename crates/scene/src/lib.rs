#![warn(missing_docs)]
//! Boundary to the rendering/scene collaborator.
//!
//! The catalog subsystem calls out of itself only through [`SceneBridge`];
//! the scene is consulted inward only through [`SceneRegistry`], which backs
//! the catalog fallback path when no disk-backed service exists.

mod leases;
mod memory;

pub use leases::LocatorLeases;
pub use memory::MemoryScene;

use glam::{Quat, Vec3};
use placekit_core::{DragItemData, DragPayload, Item, ItemId, ItemKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of an entity instantiated in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlacedEntityId(pub u64);

impl fmt::Display for PlacedEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Desired pose of a placed entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    /// World-space position.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Non-uniform scale.
    pub scale: Vec3,
}

impl SceneTransform {
    /// Transform at `position` with identity rotation and unit scale.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for SceneTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Item-like request to instantiate content in the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRequest {
    /// Catalog id of the placed item.
    pub item_id: ItemId,
    /// Image or model.
    pub kind: ItemKind,
    /// Locator the scene loads content from.
    pub url: String,
    /// Display name.
    pub file_name: String,
    /// Preview locator.
    pub thumbnail_url: Option<String>,
    /// Browse category.
    pub category: String,
}

impl From<&Item> for PlacementRequest {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.id.clone(),
            kind: item.kind,
            url: item.url.clone(),
            file_name: item.file_name.clone(),
            thumbnail_url: item.thumbnail_url.clone(),
            category: item.category.clone(),
        }
    }
}

impl From<DragItemData> for PlacementRequest {
    fn from(data: DragItemData) -> Self {
        Self {
            item_id: data.id,
            kind: data.kind,
            url: data.url,
            file_name: data.file_name,
            thumbnail_url: data.thumbnail_url,
            category: data.category,
        }
    }
}

impl From<DragPayload> for PlacementRequest {
    fn from(payload: DragPayload) -> Self {
        payload.item_data.into()
    }
}

/// Item currently known to the live scene.
///
/// Scene records carry no file path or size, so items synthesized from them
/// only deduplicate by url and by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneItemRecord {
    /// Scene-side id.
    pub id: String,
    /// Image or model.
    pub kind: ItemKind,
    /// Display name.
    pub name: String,
    /// Content locator.
    pub url: String,
    /// Preview locator.
    pub thumbnail_url: Option<String>,
}

impl SceneItemRecord {
    /// Synthesize a catalog item from the scene record.
    pub fn to_item(&self) -> Item {
        let item = Item::new(self.id.as_str(), self.kind, self.name.as_str(), self.url.as_str());
        match &self.thumbnail_url {
            Some(thumbnail) => item.with_thumbnail(thumbnail.as_str()),
            None => item,
        }
    }
}

/// Callback invoked with the scene's item list whenever it changes.
pub type SceneItemsListener = Box<dyn Fn(&[SceneItemRecord]) + Send + Sync>;

/// Outward calls into the scene collaborator.
pub trait SceneBridge: Send + Sync {
    /// Instantiate content; returns the handle of the placed entity.
    fn place_in_scene(
        &self,
        request: &PlacementRequest,
        transform: Option<SceneTransform>,
    ) -> anyhow::Result<PlacedEntityId>;

    /// Remove a previously placed entity.
    fn remove_from_scene(&self, entity: PlacedEntityId) -> anyhow::Result<()>;
}

/// Inward view of the items the scene currently knows about.
pub trait SceneRegistry: Send + Sync {
    /// Images and models known to the live scene, in scene order.
    fn scene_items(&self) -> anyhow::Result<Vec<SceneItemRecord>>;

    /// Register a listener notified whenever the scene's item list changes.
    fn on_scene_items_changed(&self, listener: SceneItemsListener);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_record_synthesizes_item_without_path_or_size() {
        let record = SceneItemRecord {
            id: "scene-7".into(),
            kind: ItemKind::Model,
            name: "armchair.glb".into(),
            url: "blob:session/42".into(),
            thumbnail_url: Some("blob:session/42-thumb".into()),
        };
        let item = record.to_item();
        assert_eq!(item.id.as_str(), "scene-7");
        assert_eq!(item.category, "furniture");
        assert_eq!(item.thumbnail_url.as_deref(), Some("blob:session/42-thumb"));
        assert_eq!(item.file_path, None);
        assert_eq!(item.file_size, None);
    }

    #[test]
    fn placement_request_from_payload_keeps_fields() {
        let item = Item::new("i", ItemKind::Image, "logo_icon.png", "/lib/logo_icon.png");
        let request = PlacementRequest::from(DragPayload::for_item(&item));
        assert_eq!(request, PlacementRequest::from(&item));
        assert_eq!(request.category, "icons");
    }
}

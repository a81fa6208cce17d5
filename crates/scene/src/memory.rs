//! In-process scene used by the headless host and tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::bail;
use tracing::debug;

use crate::{
    PlacedEntityId, PlacementRequest, SceneBridge, SceneItemRecord, SceneItemsListener,
    SceneRegistry, SceneTransform,
};

/// An entity instantiated in a [`MemoryScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEntity {
    /// Handle returned by `place_in_scene`.
    pub id: PlacedEntityId,
    /// What was placed.
    pub request: PlacementRequest,
    /// Where it was placed.
    pub transform: SceneTransform,
}

#[derive(Default)]
struct SceneState {
    next_id: u64,
    entities: BTreeMap<PlacedEntityId, PlacedEntity>,
    items: Vec<SceneItemRecord>,
    listeners: Vec<SceneItemsListener>,
}

impl SceneState {
    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.items);
        }
    }

    /// Register a placed item as a scene item; false if it is already known.
    fn track(&mut self, request: &PlacementRequest) -> bool {
        if self.items.iter().any(|r| r.id == request.item_id.as_str()) {
            return false;
        }
        self.items.push(SceneItemRecord {
            id: request.item_id.to_string(),
            kind: request.kind,
            name: request.file_name.clone(),
            url: request.url.clone(),
            thumbnail_url: request.thumbnail_url.clone(),
        });
        true
    }
}

/// Scene collaborator that keeps placed entities in memory.
///
/// Placing an item also registers it as a scene item, so the catalog
/// fallback path sees everything that was placed. Listeners run while the
/// scene is locked and must not call back into it.
#[derive(Default)]
pub struct MemoryScene {
    state: Mutex<SceneState>,
}

impl MemoryScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene that already knows some items.
    pub fn with_items(items: Vec<SceneItemRecord>) -> Self {
        let scene = Self::new();
        scene.lock().items = items;
        scene
    }

    /// Make an item known to the scene without placing it.
    pub fn register_item(&self, record: SceneItemRecord) {
        let mut state = self.lock();
        state.items.retain(|r| r.id != record.id);
        state.items.push(record);
        state.notify();
    }

    /// Snapshot of all placed entities, ordered by handle.
    pub fn entities(&self) -> Vec<PlacedEntity> {
        self.lock().entities.values().cloned().collect()
    }

    /// Number of placed entities.
    pub fn entity_count(&self) -> usize {
        self.lock().entities.len()
    }

    fn lock(&self) -> MutexGuard<'_, SceneState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SceneBridge for MemoryScene {
    fn place_in_scene(
        &self,
        request: &PlacementRequest,
        transform: Option<SceneTransform>,
    ) -> anyhow::Result<PlacedEntityId> {
        if request.url.is_empty() {
            bail!("cannot place {}: empty locator", request.item_id);
        }

        let mut state = self.lock();
        state.next_id += 1;
        let id = PlacedEntityId(state.next_id);
        let transform = transform.unwrap_or_default();
        debug!(entity = %id, item = %request.item_id, "placed item in scene");
        state.entities.insert(
            id,
            PlacedEntity {
                id,
                request: request.clone(),
                transform,
            },
        );
        if state.track(request) {
            state.notify();
        }
        Ok(id)
    }

    fn remove_from_scene(&self, entity: PlacedEntityId) -> anyhow::Result<()> {
        let mut state = self.lock();
        if state.entities.remove(&entity).is_none() {
            bail!("no entity {entity} in scene");
        }
        debug!(entity = %entity, "removed entity from scene");
        Ok(())
    }
}

impl SceneRegistry for MemoryScene {
    fn scene_items(&self) -> anyhow::Result<Vec<SceneItemRecord>> {
        Ok(self.lock().items.clone())
    }

    fn on_scene_items_changed(&self, listener: SceneItemsListener) {
        self.lock().listeners.push(listener);
    }
}

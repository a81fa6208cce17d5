//! The catalog view session: one catalog, one hotbar, one selection, one
//! drag, wired to the scene.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use placekit_catalog::{CatalogAggregator, CatalogSnapshot};
use placekit_core::{
    filter_items, DragPayload, DragTransfer, Item, ItemId, PayloadError, CATEGORY_ALL,
    HOTBAR_SIZE,
};
use placekit_hotbar::{AssignOutcome, HotbarEvent, QuickAccessStore};
use placekit_input::{CatalogAction, KeyContext, Keymap};
use placekit_scene::{
    LocatorLeases, PlacedEntityId, PlacementRequest, SceneBridge, SceneItemRecord, SceneTransform,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::keyboard::KeyCode;

use crate::drag::{DragDropCoordinator, DragState};
use crate::selection::{SelectionController, SelectionMode, SelectionState};

/// Errors returned by session operations driven by user input.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No item with this id in the current catalog.
    #[error("no item {0} in the catalog")]
    UnknownItem(ItemId),
    /// Slot index outside the bar.
    #[error("slot index {0} is out of range (0-{max})", max = HOTBAR_SIZE - 1)]
    SlotOutOfRange(usize),
    /// Category not offered by the current catalog.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    /// Drag payload could not be built or read.
    #[error(transparent)]
    Payload(#[from] PayloadError),
    /// The scene refused a call.
    #[error("scene call failed: {0:#}")]
    Scene(anyhow::Error),
    /// The entity was not placed by this session.
    #[error("entity {0} was not placed from the catalog")]
    UnknownEntity(PlacedEntityId),
}

/// Stamp of one reload; only the newest issued stamp may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReloadToken(u64);

/// What the host should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// The key was consumed.
    Handled,
    /// The key does nothing here.
    Ignored,
    /// The host should close the catalog view.
    CloseCatalog,
}

/// A placed entity and the item it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedRecord {
    /// Item placed.
    pub item_id: ItemId,
    /// Locator the scene loaded.
    pub url: String,
}

/// Catalog view state and the operations the UI drives it with.
pub struct CatalogSession {
    aggregator: CatalogAggregator,
    scene: Arc<dyn SceneBridge>,
    hotbar: QuickAccessStore,
    selection: SelectionController,
    drag: DragDropCoordinator,
    keymap: Keymap,
    snapshot: CatalogSnapshot,
    active_category: String,
    search: String,
    catalog_open: bool,
    issued: u64,
    placed: BTreeMap<PlacedEntityId, PlacedRecord>,
    leases: LocatorLeases,
    reload_requested: Arc<AtomicBool>,
}

impl CatalogSession {
    /// Build a session. Without a disk service the session listens for
    /// scene item changes and flags a reload when they happen.
    pub fn new(
        aggregator: CatalogAggregator,
        scene: Arc<dyn SceneBridge>,
        hotbar: QuickAccessStore,
        keymap: Keymap,
    ) -> Self {
        let reload_requested = Arc::new(AtomicBool::new(false));
        if !aggregator.has_disk_service() {
            let flag = Arc::clone(&reload_requested);
            aggregator
                .scene_registry()
                .on_scene_items_changed(Box::new(move |items: &[SceneItemRecord]| {
                    debug!(count = items.len(), "scene items changed");
                    flag.store(true, Ordering::SeqCst);
                }));
        }

        Self {
            aggregator,
            scene,
            hotbar,
            selection: SelectionController::new(),
            drag: DragDropCoordinator::new(),
            keymap,
            snapshot: CatalogSnapshot::empty(),
            active_category: CATEGORY_ALL.to_string(),
            search: String::new(),
            catalog_open: true,
            issued: 0,
            placed: BTreeMap::new(),
            leases: LocatorLeases::new(),
            reload_requested,
        }
    }

    /// The aggregator, for running loads outside the session.
    pub fn aggregator(&self) -> &CatalogAggregator {
        &self.aggregator
    }

    /// Issue a token for a load about to start.
    pub fn begin_reload(&mut self) -> ReloadToken {
        self.issued += 1;
        ReloadToken(self.issued)
    }

    /// Install a finished load. Returns false when a newer load was issued
    /// in the meantime and this result was discarded.
    ///
    /// Drag state is left alone. A total failure keeps pending slots pending;
    /// a partial load keeps slots it cannot resolve pending.
    pub fn commit_catalog(&mut self, token: ReloadToken, snapshot: CatalogSnapshot) -> bool {
        if token.0 != self.issued {
            debug!(token = token.0, newest = self.issued, "discarding stale catalog load");
            return false;
        }

        if let Some(error) = &snapshot.error {
            warn!("catalog unavailable: {error}");
        } else if !snapshot.failed_sources.is_empty() {
            debug!(
                failed = ?snapshot.failed_sources,
                "partial catalog; unresolved slots stay pending"
            );
            self.hotbar.resolve_partial(&snapshot.items);
        } else {
            self.hotbar.resolve_against(&snapshot.items);
        }
        self.selection.refresh(&snapshot.items);
        if !snapshot.categories.contains(&self.active_category) {
            self.active_category = CATEGORY_ALL.to_string();
        }
        info!(
            items = snapshot.len(),
            failed = snapshot.failed_sources.len(),
            "catalog committed"
        );
        self.snapshot = snapshot;
        true
    }

    /// Load and commit in one step.
    pub async fn reload(&mut self) -> bool {
        let token = self.begin_reload();
        let aggregator = self.aggregator.clone();
        let snapshot = aggregator.load_catalog().await;
        self.commit_catalog(token, snapshot)
    }

    /// Whether the scene asked for a reload since the last call.
    pub fn take_reload_request(&self) -> bool {
        self.reload_requested.swap(false, Ordering::SeqCst)
    }

    /// Current catalog.
    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    /// Displayable load error, if the last load failed entirely.
    pub fn catalog_error(&self) -> Option<&str> {
        self.snapshot.error.as_deref()
    }

    /// Active category tab.
    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    /// Current search query.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Items under the active tab matching the search query.
    pub fn visible_items(&self) -> Vec<&Item> {
        filter_items(&self.snapshot.items, &self.active_category, &self.search)
    }

    /// Switch category tab; the selected item is dropped.
    pub fn set_category(&mut self, category: &str) -> Result<(), SessionError> {
        if !self.snapshot.categories.iter().any(|c| c == category) {
            return Err(SessionError::UnknownCategory(category.to_string()));
        }
        if self.active_category != category {
            self.active_category = category.to_string();
            self.selection.reset_for_context_change();
        }
        Ok(())
    }

    /// Set the file-name search query.
    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_string();
    }

    /// Whether the catalog view is open.
    pub fn is_open(&self) -> bool {
        self.catalog_open
    }

    /// Show or hide the catalog view.
    pub fn set_open(&mut self, open: bool) {
        self.catalog_open = open;
    }

    /// Selection state.
    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    /// Click a catalog item; in assign mode this may assign it.
    pub fn click_item(&mut self, id: &ItemId) -> Result<Option<AssignOutcome>, SessionError> {
        let item = self
            .snapshot
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownItem(id.clone()))?;
        Ok(self.selection.select_item(&item, &mut self.hotbar))
    }

    /// Activate a slot: select it and place its occupant, if any.
    pub fn click_slot(&mut self, slot: usize) -> Result<Option<PlacedEntityId>, SessionError> {
        if slot >= HOTBAR_SIZE {
            return Err(SessionError::SlotOutOfRange(slot));
        }
        match self.selection.select_slot(slot, &self.hotbar) {
            Some(request) => self.place(&request, None).map(Some),
            None => Ok(None),
        }
    }

    /// Switch selection mode.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.selection.set_mode(mode);
    }

    /// Clear selected item and slot.
    pub fn deselect(&mut self) {
        self.selection.deselect();
    }

    /// Key bindings in effect.
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Handle a key press from the host.
    pub fn handle_key(&mut self, key: KeyCode, text_input_focused: bool) -> SessionSignal {
        let context = KeyContext {
            catalog_open: self.catalog_open,
            text_input_focused,
        };
        match self.keymap.action_for(key, context) {
            Some(action) => self.apply_action(action),
            None => SessionSignal::Ignored,
        }
    }

    /// Perform a catalog action.
    pub fn apply_action(&mut self, action: CatalogAction) -> SessionSignal {
        match action {
            CatalogAction::ActivateSlot(slot) => {
                if let Err(err) = self.click_slot(usize::from(slot)) {
                    warn!("slot activation failed: {err}");
                }
                SessionSignal::Handled
            }
            CatalogAction::CloseCatalog => {
                self.catalog_open = false;
                SessionSignal::CloseCatalog
            }
            CatalogAction::ToggleMode => {
                let mode = self.selection.toggle_mode();
                debug!(mode = mode.as_str(), "selection mode toggled");
                SessionSignal::Handled
            }
            CatalogAction::Deselect => {
                self.selection.deselect();
                SessionSignal::Handled
            }
        }
    }

    /// The quick-access bar.
    pub fn hotbar(&self) -> &QuickAccessStore {
        &self.hotbar
    }

    /// Assign a catalog item to a slot directly.
    pub fn assign_to_slot(
        &mut self,
        id: &ItemId,
        slot: usize,
    ) -> Result<AssignOutcome, SessionError> {
        if slot >= HOTBAR_SIZE {
            return Err(SessionError::SlotOutOfRange(slot));
        }
        let item = self
            .snapshot
            .get(id)
            .ok_or_else(|| SessionError::UnknownItem(id.clone()))?;
        Ok(self.hotbar.assign(item, slot))
    }

    /// Empty a slot.
    pub fn clear_slot(&mut self, slot: usize) -> Result<Option<ItemId>, SessionError> {
        if slot >= HOTBAR_SIZE {
            return Err(SessionError::SlotOutOfRange(slot));
        }
        Ok(self.hotbar.clear(slot))
    }

    /// Take queued hotbar change notifications.
    pub fn drain_hotbar_events(&mut self) -> Vec<HotbarEvent> {
        self.hotbar.drain_events()
    }

    /// Drag state.
    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Start dragging a catalog item.
    pub fn drag_start(&mut self, id: &ItemId) -> Result<DragTransfer, SessionError> {
        let item = self
            .snapshot
            .get(id)
            .ok_or_else(|| SessionError::UnknownItem(id.clone()))?;
        Ok(self.drag.drag_start(item)?)
    }

    /// Pointer over a slot.
    pub fn drag_over(&mut self, slot: usize) {
        self.drag.drag_over(slot);
    }

    /// Pointer left a slot.
    pub fn drag_leave(&mut self, slot: usize) {
        self.drag.drag_leave(slot);
    }

    /// Drop on a slot.
    pub fn drop_on_slot(&mut self, slot: usize) -> Option<AssignOutcome> {
        self.drag.drop_on_slot(slot, &mut self.hotbar)
    }

    /// Drag ended anywhere.
    pub fn drag_end(&mut self) {
        self.drag.drag_end();
    }

    /// Drop outside the bar: forward the payload to the scene.
    pub fn drop_on_scene(
        &mut self,
        payload_json: &str,
        transform: Option<SceneTransform>,
    ) -> Result<PlacedEntityId, SessionError> {
        let payload = DragPayload::from_json(payload_json)?;
        let request = PlacementRequest::from(payload);
        self.place(&request, transform)
    }

    /// Entities placed through this session.
    pub fn placed(&self) -> &BTreeMap<PlacedEntityId, PlacedRecord> {
        &self.placed
    }

    /// Remove a placed entity and release its locator lease.
    pub fn remove_placed(&mut self, entity: PlacedEntityId) -> Result<(), SessionError> {
        if !self.placed.contains_key(&entity) {
            return Err(SessionError::UnknownEntity(entity));
        }
        self.scene
            .remove_from_scene(entity)
            .map_err(SessionError::Scene)?;
        self.placed.remove(&entity);
        if let Some(url) = self.leases.release(entity) {
            debug!(%url, "locator no longer used by any entity");
        }
        Ok(())
    }

    /// Whether some placed entity still uses `url`.
    pub fn is_locator_live(&self, url: &str) -> bool {
        self.leases.is_live(url)
    }

    fn place(
        &mut self,
        request: &PlacementRequest,
        transform: Option<SceneTransform>,
    ) -> Result<PlacedEntityId, SessionError> {
        let entity = self
            .scene
            .place_in_scene(request, transform)
            .map_err(SessionError::Scene)?;
        self.leases.acquire(&request.url, entity);
        self.placed.insert(
            entity,
            PlacedRecord {
                item_id: request.item_id.clone(),
                url: request.url.clone(),
            },
        );
        info!(entity = %entity, item = %request.item_id, "placed catalog item");
        Ok(entity)
    }
}

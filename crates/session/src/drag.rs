//! Drag gestures from the catalog onto slots.

use placekit_core::{DragTransfer, Item, PayloadError, HOTBAR_SIZE};
use placekit_hotbar::{AssignOutcome, QuickAccessStore};
use tracing::debug;

/// Transient state of one drag gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    /// Item being dragged.
    pub dragged_item: Option<Item>,
    /// Slot currently hovered.
    pub hover_slot: Option<usize>,
}

/// Tracks drag state and turns slot drops into assignments.
#[derive(Debug, Clone, Default)]
pub struct DragDropCoordinator {
    state: DragState,
}

impl DragDropCoordinator {
    /// No drag in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether an item is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.state.dragged_item.is_some()
    }

    /// Start dragging `item`; returns what travels with the gesture.
    pub fn drag_start(&mut self, item: &Item) -> Result<DragTransfer, PayloadError> {
        let transfer = DragTransfer::for_item(item)?;
        self.state = DragState {
            dragged_item: Some(item.clone()),
            hover_slot: None,
        };
        debug!(item = %item.id, "drag started");
        Ok(transfer)
    }

    /// Pointer entered `slot`.
    pub fn drag_over(&mut self, slot: usize) {
        if slot < HOTBAR_SIZE {
            self.state.hover_slot = Some(slot);
        }
    }

    /// Pointer left `slot`; a newer hover is kept.
    pub fn drag_leave(&mut self, slot: usize) {
        if self.state.hover_slot == Some(slot) {
            self.state.hover_slot = None;
        }
    }

    /// Drop on `slot`: assign the dragged item, then end the gesture.
    pub fn drop_on_slot(
        &mut self,
        slot: usize,
        hotbar: &mut QuickAccessStore,
    ) -> Option<AssignOutcome> {
        let state = std::mem::take(&mut self.state);
        let item = state.dragged_item?;
        debug!(item = %item.id, slot, "dropped on quick-access slot");
        Some(hotbar.assign(&item, slot))
    }

    /// Gesture finished, dropped or not.
    pub fn drag_end(&mut self) {
        self.state = DragState::default();
    }
}

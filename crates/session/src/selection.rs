//! Browse / assign-to-slot state machine.

use placekit_core::{Item, HOTBAR_SIZE};
use placekit_hotbar::{AssignOutcome, QuickAccessStore};
use placekit_scene::PlacementRequest;
use tracing::{debug, warn};

/// What clicking a catalog item does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// Selecting only selects.
    #[default]
    Browse,
    /// Selecting also assigns to the selected slot.
    AssignToSlot,
}

impl SelectionMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            SelectionMode::Browse => SelectionMode::AssignToSlot,
            SelectionMode::AssignToSlot => SelectionMode::Browse,
        }
    }

    /// Console name.
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionMode::Browse => "browse",
            SelectionMode::AssignToSlot => "assign",
        }
    }

    /// Parse a console name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "browse" => Some(SelectionMode::Browse),
            "assign" | "assigntoslot" | "assign-to-slot" => Some(SelectionMode::AssignToSlot),
            _ => None,
        }
    }
}

/// Current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Active mode.
    pub mode: SelectionMode,
    /// Selected catalog item.
    pub selected_item: Option<Item>,
    /// Selected quick-access slot.
    pub selected_slot: Option<usize>,
}

/// Owns [`SelectionState`] and applies the selection rules.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    /// Browse mode, nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Active mode.
    pub fn mode(&self) -> SelectionMode {
        self.state.mode
    }

    /// Select a catalog item. In assign mode with a slot selected, the item
    /// is assigned to that slot as well.
    pub fn select_item(
        &mut self,
        item: &Item,
        hotbar: &mut QuickAccessStore,
    ) -> Option<AssignOutcome> {
        self.state.selected_item = Some(item.clone());
        match (self.state.mode, self.state.selected_slot) {
            (SelectionMode::AssignToSlot, Some(slot)) => Some(hotbar.assign(item, slot)),
            _ => None,
        }
    }

    /// Select a slot. An occupied slot also selects its item and yields the
    /// placement request for it.
    pub fn select_slot(
        &mut self,
        index: usize,
        hotbar: &QuickAccessStore,
    ) -> Option<PlacementRequest> {
        if index >= HOTBAR_SIZE {
            warn!(slot = index, "ignoring selection of out-of-range slot");
            return None;
        }
        self.state.selected_slot = Some(index);
        let item = hotbar.item_at(index)?;
        debug!(slot = index, item = %item.id, "activated quick-access slot");
        self.state.selected_item = Some(item.clone());
        Some(PlacementRequest::from(item))
    }

    /// Switch mode; the selected slot is kept either way.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.state.mode = mode;
    }

    /// Flip between the two modes.
    pub fn toggle_mode(&mut self) -> SelectionMode {
        self.state.mode = self.state.mode.toggled();
        self.state.mode
    }

    /// Clear item and slot selection; the mode stays.
    pub fn deselect(&mut self) {
        self.state.selected_item = None;
        self.state.selected_slot = None;
    }

    /// Tab or category switch: the selected item no longer applies.
    pub fn reset_for_context_change(&mut self) {
        self.state.selected_item = None;
    }

    /// Re-point the selected item at its copy in a new catalog, or drop it.
    pub fn refresh(&mut self, catalog: &[Item]) {
        if let Some(selected) = &self.state.selected_item {
            self.state.selected_item = catalog.iter().find(|item| item.id == selected.id).cloned();
        }
    }
}

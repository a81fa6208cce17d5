#![warn(missing_docs)]
//! Keyboard surface of the catalog view.
//!
//! Maps physical keys to [`CatalogAction`]s. Defaults can be replaced per
//! action through [`BindingOverrides`].

mod bindings;

pub use bindings::{action_name, parse_action, parse_key_code, BindingError, BindingOverrides};

use std::collections::HashMap;

use tracing::warn;
use winit::keyboard::KeyCode;

/// Something the catalog view does in response to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogAction {
    /// Activate quick-access slot (0-based).
    ActivateSlot(u8),
    /// Close the catalog view.
    CloseCatalog,
    /// Toggle between browsing and assigning to a slot.
    ToggleMode,
    /// Clear the selected item and slot.
    Deselect,
}

impl CatalogAction {
    /// Every action, in binding order.
    pub const ALL: [CatalogAction; 12] = [
        CatalogAction::ActivateSlot(0),
        CatalogAction::ActivateSlot(1),
        CatalogAction::ActivateSlot(2),
        CatalogAction::ActivateSlot(3),
        CatalogAction::ActivateSlot(4),
        CatalogAction::ActivateSlot(5),
        CatalogAction::ActivateSlot(6),
        CatalogAction::ActivateSlot(7),
        CatalogAction::ActivateSlot(8),
        CatalogAction::CloseCatalog,
        CatalogAction::ToggleMode,
        CatalogAction::Deselect,
    ];
}

/// Focus state deciding whether keys reach the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// The catalog view is open.
    pub catalog_open: bool,
    /// A text field (search box) has keyboard focus.
    pub text_input_focused: bool,
}

impl KeyContext {
    /// Catalog open, no text field focused.
    pub fn open() -> Self {
        Self {
            catalog_open: true,
            text_input_focused: false,
        }
    }
}

/// Key → action table.
#[derive(Debug, Clone)]
pub struct Keymap {
    keys: HashMap<KeyCode, CatalogAction>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self {
            keys: HashMap::new(),
        };
        for (action, keys) in default_bindings() {
            keymap.bind(action, &keys);
        }
        keymap
    }
}

impl Keymap {
    /// Defaults with `overrides` applied; unknown names are logged and
    /// skipped.
    pub fn from_overrides(overrides: &BindingOverrides) -> Self {
        let mut keymap = Self::default();
        for (action_name, tokens) in sorted(overrides) {
            let Some(action) = parse_action(action_name) else {
                warn!("Unknown action '{}' in catalog bindings", action_name);
                continue;
            };
            let keys: Vec<KeyCode> = tokens
                .iter()
                .filter_map(|token| {
                    parse_key_code(token).or_else(|| {
                        warn!("Unknown binding token '{}'; ignoring", token);
                        None
                    })
                })
                .collect();
            keymap.rebind(action, &keys);
        }
        keymap
    }

    /// Defaults with `overrides` applied; the first unknown name is an
    /// error.
    pub fn from_overrides_strict(overrides: &BindingOverrides) -> Result<Self, BindingError> {
        let mut keymap = Self::default();
        for (name, tokens) in sorted(overrides) {
            let action =
                parse_action(name).ok_or_else(|| BindingError::UnknownAction(name.clone()))?;
            let keys = tokens
                .iter()
                .map(|token| {
                    parse_key_code(token).ok_or_else(|| BindingError::UnknownKey {
                        action: name.clone(),
                        token: token.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            keymap.rebind(action, &keys);
        }
        Ok(keymap)
    }

    /// Action bound to `key`, if the context lets keys through.
    pub fn action_for(&self, key: KeyCode, context: KeyContext) -> Option<CatalogAction> {
        if !context.catalog_open || context.text_input_focused {
            return None;
        }
        self.keys.get(&key).copied()
    }

    /// Keys currently bound to `action`, in a stable order.
    pub fn keys_for(&self, action: CatalogAction) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> = self
            .keys
            .iter()
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| *key)
            .collect();
        keys.sort_by_key(|key| format!("{key:?}"));
        keys
    }

    fn rebind(&mut self, action: CatalogAction, keys: &[KeyCode]) {
        self.keys.retain(|_, bound| *bound != action);
        self.bind(action, keys);
    }

    fn bind(&mut self, action: CatalogAction, keys: &[KeyCode]) {
        for key in keys {
            if let Some(previous) = self.keys.insert(*key, action) {
                if previous != action {
                    warn!(
                        "Key {:?} moved from {} to {}",
                        key,
                        action_name(previous),
                        action_name(action)
                    );
                }
            }
        }
    }
}

// Deterministic override order so key conflicts resolve the same way on
// every run.
fn sorted(overrides: &BindingOverrides) -> Vec<(&String, &Vec<String>)> {
    let mut entries: Vec<_> = overrides.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

fn default_bindings() -> Vec<(CatalogAction, Vec<KeyCode>)> {
    use CatalogAction::*;
    vec![
        (ActivateSlot(0), vec![KeyCode::Digit1]),
        (ActivateSlot(1), vec![KeyCode::Digit2]),
        (ActivateSlot(2), vec![KeyCode::Digit3]),
        (ActivateSlot(3), vec![KeyCode::Digit4]),
        (ActivateSlot(4), vec![KeyCode::Digit5]),
        (ActivateSlot(5), vec![KeyCode::Digit6]),
        (ActivateSlot(6), vec![KeyCode::Digit7]),
        (ActivateSlot(7), vec![KeyCode::Digit8]),
        (ActivateSlot(8), vec![KeyCode::Digit9]),
        (CloseCatalog, vec![KeyCode::KeyE, KeyCode::Escape]),
        (ToggleMode, vec![KeyCode::KeyB]),
        (Deselect, vec![KeyCode::KeyX]),
    ]
}

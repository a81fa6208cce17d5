//! Textual key and action tokens, as written in `placekit.toml`.

use std::collections::HashMap;

use thiserror::Error;
use winit::keyboard::KeyCode;

use crate::CatalogAction;

/// Action name → key tokens, replacing the default keys of that action.
pub type BindingOverrides = HashMap<String, Vec<String>>;

/// Errors raised by strict binding parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Action name not recognised.
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    /// Key token not recognised.
    #[error("unknown key token '{token}' for action '{action}'")]
    UnknownKey {
        /// Action the token was bound to.
        action: String,
        /// Offending token.
        token: String,
    },
}

/// Parse an action name: `Hotbar1`..`Hotbar9`, `CloseCatalog`,
/// `ToggleMode`, `Deselect`.
pub fn parse_action(name: &str) -> Option<CatalogAction> {
    match name {
        "CloseCatalog" => Some(CatalogAction::CloseCatalog),
        "ToggleMode" => Some(CatalogAction::ToggleMode),
        "Deselect" => Some(CatalogAction::Deselect),
        _ => {
            if let Some(rest) = name.strip_prefix("Hotbar") {
                if let Ok(idx) = rest.parse::<u8>() {
                    if (1..=9).contains(&idx) {
                        return Some(CatalogAction::ActivateSlot(idx - 1));
                    }
                }
            }
            None
        }
    }
}

/// Canonical name of an action, the inverse of [`parse_action`].
pub fn action_name(action: CatalogAction) -> String {
    match action {
        CatalogAction::ActivateSlot(slot) => format!("Hotbar{}", slot + 1),
        CatalogAction::CloseCatalog => "CloseCatalog".to_string(),
        CatalogAction::ToggleMode => "ToggleMode".to_string(),
        CatalogAction::Deselect => "Deselect".to_string(),
    }
}

/// Parse a key token.
///
/// Accepts winit key names (`KeyE`, `Digit1`, `Escape`) and the short
/// forms typed at a console (`e`, `1`, `esc`).
pub fn parse_key_code(token: &str) -> Option<KeyCode> {
    if let Some(key) = parse_named_key(token) {
        return Some(key);
    }
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return parse_char_key(c.to_ascii_uppercase());
    }
    match token.to_ascii_lowercase().as_str() {
        "esc" | "escape" => Some(KeyCode::Escape),
        "space" => Some(KeyCode::Space),
        "tab" => Some(KeyCode::Tab),
        "enter" | "return" => Some(KeyCode::Enter),
        _ => None,
    }
}

fn parse_named_key(name: &str) -> Option<KeyCode> {
    if let Some(letter) = name.strip_prefix("Key") {
        let mut chars = letter.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => parse_char_key(c),
            _ => None,
        };
    }
    if let Some(digit) = name.strip_prefix("Digit") {
        let mut chars = digit.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => parse_char_key(c),
            _ => None,
        };
    }
    Some(match name {
        "Escape" => KeyCode::Escape,
        "Space" => KeyCode::Space,
        "Tab" => KeyCode::Tab,
        "Enter" => KeyCode::Enter,
        "Backspace" => KeyCode::Backspace,
        "Delete" => KeyCode::Delete,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        "F3" => KeyCode::F3,
        "F4" => KeyCode::F4,
        _ => return None,
    })
}

fn parse_char_key(c: char) -> Option<KeyCode> {
    Some(match c {
        'A' => KeyCode::KeyA,
        'B' => KeyCode::KeyB,
        'C' => KeyCode::KeyC,
        'D' => KeyCode::KeyD,
        'E' => KeyCode::KeyE,
        'F' => KeyCode::KeyF,
        'G' => KeyCode::KeyG,
        'H' => KeyCode::KeyH,
        'I' => KeyCode::KeyI,
        'J' => KeyCode::KeyJ,
        'K' => KeyCode::KeyK,
        'L' => KeyCode::KeyL,
        'M' => KeyCode::KeyM,
        'N' => KeyCode::KeyN,
        'O' => KeyCode::KeyO,
        'P' => KeyCode::KeyP,
        'Q' => KeyCode::KeyQ,
        'R' => KeyCode::KeyR,
        'S' => KeyCode::KeyS,
        'T' => KeyCode::KeyT,
        'U' => KeyCode::KeyU,
        'V' => KeyCode::KeyV,
        'W' => KeyCode::KeyW,
        'X' => KeyCode::KeyX,
        'Y' => KeyCode::KeyY,
        'Z' => KeyCode::KeyZ,
        '0' => KeyCode::Digit0,
        '1' => KeyCode::Digit1,
        '2' => KeyCode::Digit2,
        '3' => KeyCode::Digit3,
        '4' => KeyCode::Digit4,
        '5' => KeyCode::Digit5,
        '6' => KeyCode::Digit6,
        '7' => KeyCode::Digit7,
        '8' => KeyCode::Digit8,
        '9' => KeyCode::Digit9,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotbar_actions_are_one_based() {
        assert_eq!(parse_action("Hotbar1"), Some(CatalogAction::ActivateSlot(0)));
        assert_eq!(parse_action("Hotbar9"), Some(CatalogAction::ActivateSlot(8)));
        assert_eq!(parse_action("Hotbar0"), None);
        assert_eq!(parse_action("Hotbar10"), None);
        assert_eq!(parse_action("Jump"), None);
    }

    #[test]
    fn action_names_round_trip() {
        for action in CatalogAction::ALL {
            assert_eq!(parse_action(&action_name(action)), Some(action));
        }
    }

    #[test]
    fn key_tokens_accept_named_and_short_forms() {
        assert_eq!(parse_key_code("KeyE"), Some(KeyCode::KeyE));
        assert_eq!(parse_key_code("e"), Some(KeyCode::KeyE));
        assert_eq!(parse_key_code("Digit7"), Some(KeyCode::Digit7));
        assert_eq!(parse_key_code("7"), Some(KeyCode::Digit7));
        assert_eq!(parse_key_code("esc"), Some(KeyCode::Escape));
        assert_eq!(parse_key_code("Escape"), Some(KeyCode::Escape));
        assert_eq!(parse_key_code("Keye"), None);
        assert_eq!(parse_key_code("Hyper"), None);
    }
}

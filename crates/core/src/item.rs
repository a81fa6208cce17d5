//! Catalog items - placeable images and 3D models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::category_for;

/// Stable identifier of a catalog item.
///
/// Only the id is persisted by the hotbar; everything else is re-resolved
/// from the latest catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap a raw id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of placeable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A flat image (texture, icon, background...).
    Image,
    /// A 3D model.
    Model,
}

impl ItemKind {
    /// Wire name used by the drag payload (`"image"` / `"model"`).
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Image => "image",
            ItemKind::Model => "model",
        }
    }

    /// Parse a wire name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "image" | "images" => Some(ItemKind::Image),
            "model" | "models" => Some(ItemKind::Model),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a loaded catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Stable id, unique within one snapshot.
    pub id: ItemId,
    /// Image or model.
    pub kind: ItemKind,
    /// Display name; last-resort identity signal.
    pub file_name: String,
    /// Primary locator.
    pub url: String,
    /// Secondary locator, may be normalized differently from `url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Preview locator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Size in bytes, only used as a tie-break identity signal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Derived browse category.
    pub category: String,
}

impl Item {
    /// Create an item; the category is derived from the file name.
    pub fn new(
        id: impl Into<ItemId>,
        kind: ItemKind,
        file_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let file_name = file_name.into();
        let category = category_for(kind, &file_name).to_string();
        Self {
            id: id.into(),
            kind,
            file_name,
            url: url.into(),
            file_path: None,
            thumbnail_url: None,
            file_size: None,
            category,
        }
    }

    /// Set the secondary locator.
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Set the preview locator.
    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(thumbnail_url.into());
        self
    }

    /// Set the file size.
    pub fn with_file_size(mut self, size: u64) -> Self {
        self.file_size = Some(size);
        self
    }

    /// Whether a non-empty thumbnail is known.
    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail_url.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_derives_category() {
        let item = Item::new("a", ItemKind::Image, "brick_texture.png", "/lib/brick_texture.png");
        assert_eq!(item.category, "textures");

        let item = Item::new("b", ItemKind::Model, "Office Chair.glb", "/lib/chair.glb");
        assert_eq!(item.category, "furniture");
    }

    #[test]
    fn kind_parse_accepts_plural_and_case() {
        assert_eq!(ItemKind::parse("Image"), Some(ItemKind::Image));
        assert_eq!(ItemKind::parse("models"), Some(ItemKind::Model));
        assert_eq!(ItemKind::parse("video"), None);
    }

    #[test]
    fn empty_thumbnail_is_not_a_thumbnail() {
        let item = Item::new("a", ItemKind::Image, "a.png", "/a.png").with_thumbnail("");
        assert!(!item.has_thumbnail());
    }

    #[test]
    fn item_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ItemId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}

//! Drag transfer payload.
//!
//! Set on drag start and read back by whatever receives the drop: a hotbar
//! slot or the live scene. The structured payload travels as JSON alongside
//! a plain-text fallback (the file name) for targets that cannot read it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{Item, ItemId, ItemKind};

/// Discriminator carried in every payload produced by the catalog.
pub const DRAG_PAYLOAD_TYPE: &str = "inventory-item";

/// Errors raised while decoding a drag payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The payload is not valid JSON or misses required fields.
    #[error("malformed drag payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The payload was produced by something other than the catalog.
    #[error("unexpected drag payload type {0:?}")]
    UnexpectedType(String),
}

/// Item fields carried by a drag payload; enough to build a placement
/// request without re-querying the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragItemData {
    /// Item id.
    pub id: ItemId,
    /// Item kind, serialized as `"image"` / `"model"`.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Primary locator.
    pub url: String,
    /// Display name.
    pub file_name: String,
    /// Preview locator, omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Browse category.
    pub category: String,
}

impl From<&Item> for DragItemData {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            kind: item.kind,
            url: item.url.clone(),
            file_name: item.file_name.clone(),
            thumbnail_url: item.thumbnail_url.clone(),
            category: item.category.clone(),
        }
    }
}

/// Structured drag payload: `{"type": "inventory-item", "itemData": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    /// Always [`DRAG_PAYLOAD_TYPE`] for catalog drags.
    #[serde(rename = "type")]
    pub payload_type: String,
    /// The dragged item.
    pub item_data: DragItemData,
}

impl DragPayload {
    /// Build the payload for a catalog item.
    pub fn for_item(item: &Item) -> Self {
        Self {
            payload_type: DRAG_PAYLOAD_TYPE.to_string(),
            item_data: DragItemData::from(item),
        }
    }

    /// Decode a payload read back from a drop event.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        let payload: DragPayload = serde_json::from_str(json)?;
        if payload.payload_type != DRAG_PAYLOAD_TYPE {
            return Err(PayloadError::UnexpectedType(payload.payload_type));
        }
        Ok(payload)
    }

    /// Encode the payload as JSON.
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Everything attached to a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragTransfer {
    /// Structured payload as JSON.
    pub json: String,
    /// Plain-text fallback (the file name).
    pub text: String,
}

impl DragTransfer {
    /// Build both representations for an item.
    pub fn for_item(item: &Item) -> Result<Self, PayloadError> {
        Ok(Self {
            json: DragPayload::for_item(item).to_json()?,
            text: item.file_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_wire_shape() {
        let item = Item::new("img-1", ItemKind::Image, "cat.png", "/lib/cat.png");
        let json = DragPayload::for_item(&item).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "inventory-item");
        assert_eq!(value["itemData"]["id"], "img-1");
        assert_eq!(value["itemData"]["type"], "image");
        assert_eq!(value["itemData"]["fileName"], "cat.png");
        assert_eq!(value["itemData"]["category"], "images");
        assert!(value["itemData"].get("thumbnailUrl").is_none());
    }

    #[test]
    fn transfer_carries_plain_text_fallback() {
        let item = Item::new("m", ItemKind::Model, "sofa.glb", "/lib/sofa.glb")
            .with_thumbnail("/lib/sofa.thumb.png");
        let transfer = DragTransfer::for_item(&item).unwrap();
        assert_eq!(transfer.text, "sofa.glb");

        let decoded = DragPayload::from_json(&transfer.json).unwrap();
        assert_eq!(decoded.item_data.thumbnail_url.as_deref(), Some("/lib/sofa.thumb.png"));
        assert_eq!(decoded.item_data.kind, ItemKind::Model);
    }

    #[test]
    fn foreign_payload_type_is_rejected() {
        let json = r#"{"type":"file","itemData":{"id":"x","type":"image","url":"/x","fileName":"x","category":"images"}}"#;
        assert!(matches!(
            DragPayload::from_json(json),
            Err(PayloadError::UnexpectedType(t)) if t == "file"
        ));
    }

    #[test]
    fn plain_text_is_not_a_payload() {
        assert!(matches!(
            DragPayload::from_json("cat.png"),
            Err(PayloadError::Malformed(_))
        ));
    }
}

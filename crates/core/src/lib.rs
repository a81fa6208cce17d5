#![warn(missing_docs)]
//! Core primitives shared across the workspace: catalog items, identity
//! normalization, category derivation and the drag transfer payload.

pub mod category;
pub mod identity;
pub mod item;
pub mod payload;

// Re-export commonly used types
pub use category::{category_for, category_set, filter_items, CATEGORY_ALL, CATEGORY_IMAGES, CATEGORY_MODELS};
pub use identity::{identity_triple, normalize_path, normalize_url, IdentityTriple};
pub use item::{Item, ItemId, ItemKind};
pub use payload::{DragItemData, DragPayload, DragTransfer, PayloadError, DRAG_PAYLOAD_TYPE};

/// Number of quick-access (hotbar) slots.
pub const HOTBAR_SIZE: usize = 9;

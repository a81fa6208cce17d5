#![warn(missing_docs)]
//! Catalog view session: selection, drag and drop, keyboard handling and
//! reload ordering on top of the catalog, hotbar and scene crates.

pub mod drag;
pub mod selection;
mod session;

pub use drag::{DragDropCoordinator, DragState};
pub use selection::{SelectionController, SelectionMode, SelectionState};
pub use session::{CatalogSession, PlacedRecord, ReloadToken, SessionError, SessionSignal};

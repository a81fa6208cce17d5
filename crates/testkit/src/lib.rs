#![warn(missing_docs)]
//! Shared fixtures for catalog, hotbar and session tests.

mod stub_service;

pub use stub_service::StubCatalogService;

use placekit_catalog::{RawImageRecord, RawModelRecord};
use placekit_core::{Item, ItemKind};
use placekit_scene::SceneItemRecord;

/// Image item with derived category.
pub fn image(id: &str, file_name: &str, url: &str) -> Item {
    Item::new(id, ItemKind::Image, file_name, url)
}

/// Model item with derived category.
pub fn model(id: &str, file_name: &str, url: &str) -> Item {
    Item::new(id, ItemKind::Model, file_name, url)
}

/// Raw image record as a catalog service would return it.
pub fn raw_image(id: &str, file_name: &str, url: &str) -> RawImageRecord {
    RawImageRecord {
        id: id.to_string(),
        file_name: file_name.to_string(),
        url: url.to_string(),
        file_path: None,
        thumbnail_url: None,
        file_size: None,
    }
}

/// Raw model record as a catalog service would return it.
pub fn raw_model(id: &str, file_name: &str, url: &str) -> RawModelRecord {
    RawModelRecord {
        id: id.to_string(),
        file_name: file_name.to_string(),
        url: url.to_string(),
        file_path: None,
        thumbnail_url: None,
        file_size: None,
    }
}

/// Item record known to the live scene.
pub fn scene_record(id: &str, kind: ItemKind, name: &str, url: &str) -> SceneItemRecord {
    SceneItemRecord {
        id: id.to_string(),
        kind,
        name: name.to_string(),
        url: url.to_string(),
        thumbnail_url: None,
    }
}

/// A small catalog with one item per category rule.
pub fn sample_catalog() -> Vec<Item> {
    vec![
        image("img-brick", "brick_texture.png", "/lib/brick_texture.png"),
        image("img-sky", "sky_background.jpg", "/lib/sky_background.jpg"),
        image("img-photo", "holiday.png", "/lib/holiday.png"),
        model("mdl-hero", "hero_character.glb", "/lib/hero_character.glb"),
        model("mdl-chair", "chair.glb", "/lib/chair.glb"),
        model("mdl-rock", "rock.glb", "/lib/rock.glb"),
    ]
}

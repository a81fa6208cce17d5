//! Browse categories derived from file names.

use crate::item::{Item, ItemKind};

/// Pseudo-category matching every item.
pub const CATEGORY_ALL: &str = "all";
/// Fallback category for images.
pub const CATEGORY_IMAGES: &str = "images";
/// Fallback category for models.
pub const CATEGORY_MODELS: &str = "models";

/// Ordered substring rules; the first match wins.
type CategoryRule = (&'static [&'static str], &'static str);

const IMAGE_RULES: &[CategoryRule] = &[
    (&["texture", "pattern"], "textures"),
    (&["background", "bg"], "backgrounds"),
    (&["icon"], "icons"),
];

const MODEL_RULES: &[CategoryRule] = &[
    (&["character", "person"], "characters"),
    (&["furniture", "chair", "table"], "furniture"),
    (&["vehicle", "car"], "vehicles"),
];

/// Derive the category tag for a file name.
pub fn category_for(kind: ItemKind, file_name: &str) -> &'static str {
    let name = file_name.to_lowercase();
    let (rules, fallback) = match kind {
        ItemKind::Image => (IMAGE_RULES, CATEGORY_IMAGES),
        ItemKind::Model => (MODEL_RULES, CATEGORY_MODELS),
    };

    rules
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| name.contains(needle)))
        .map(|(_, category)| *category)
        .unwrap_or(fallback)
}

/// Distinct browsable categories.
///
/// `"all"`, `"images"` and `"models"` always come first in that order; other
/// categories follow in first-seen order.
pub fn category_set<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<String> {
    let mut categories: Vec<String> = [CATEGORY_ALL, CATEGORY_IMAGES, CATEGORY_MODELS]
        .iter()
        .map(|c| c.to_string())
        .collect();

    for item in items {
        if !categories.iter().any(|c| c == &item.category) {
            categories.push(item.category.clone());
        }
    }

    categories
}

/// Items visible under a category tab and a search query.
///
/// The `"images"` and `"models"` tabs list every item of that kind, derived
/// category or not. The query matches file names case-insensitively; an
/// empty query matches everything.
pub fn filter_items<'a>(items: &'a [Item], category: &str, query: &str) -> Vec<&'a Item> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| in_category(item, category))
        .filter(|item| query.is_empty() || item.file_name.to_lowercase().contains(&query))
        .collect()
}

fn in_category(item: &Item, category: &str) -> bool {
    match category {
        CATEGORY_ALL => true,
        CATEGORY_IMAGES => item.kind == ItemKind::Image,
        CATEGORY_MODELS => item.kind == ItemKind::Model,
        other => item.category == other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_has_builtin_categories_only() {
        let empty: Vec<Item> = Vec::new();
        assert_eq!(category_set(&empty), vec!["all", "images", "models"]);
    }

    #[test]
    fn rule_order_is_precedence() {
        // Matches both "texture" and "bg"; textures is checked first.
        assert_eq!(category_for(ItemKind::Image, "bg_texture.png"), "textures");
        assert_eq!(category_for(ItemKind::Image, "Sky_BG.jpg"), "backgrounds");
        assert_eq!(category_for(ItemKind::Image, "app-icon.png"), "icons");
        assert_eq!(category_for(ItemKind::Image, "photo.png"), "images");

        // Matches both the character and vehicle rules.
        assert_eq!(category_for(ItemKind::Model, "character_car.glb"), "characters");
        assert_eq!(category_for(ItemKind::Model, "dining_table.obj"), "furniture");
        assert_eq!(category_for(ItemKind::Model, "race_car.glb"), "vehicles");
        assert_eq!(category_for(ItemKind::Model, "rock.glb"), "models");
    }

    #[test]
    fn image_rules_do_not_apply_to_models() {
        assert_eq!(category_for(ItemKind::Model, "texture_pack.glb"), "models");
    }

    #[test]
    fn category_set_keeps_first_seen_order() {
        let items = vec![
            Item::new("1", ItemKind::Model, "sports_car.glb", "/1"),
            Item::new("2", ItemKind::Image, "wood_texture.png", "/2"),
            Item::new("3", ItemKind::Model, "old_car.glb", "/3"),
            Item::new("4", ItemKind::Image, "photo.png", "/4"),
        ];
        assert_eq!(
            category_set(&items),
            vec!["all", "images", "models", "vehicles", "textures"]
        );
    }

    #[test]
    fn filter_combines_category_and_query() {
        let items = vec![
            Item::new("1", ItemKind::Image, "Wood_Texture.png", "/1"),
            Item::new("2", ItemKind::Image, "stone_texture.png", "/2"),
            Item::new("3", ItemKind::Model, "wooden_chair.glb", "/3"),
        ];

        let all_wood: Vec<_> = filter_items(&items, CATEGORY_ALL, "WOOD")
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(all_wood, vec!["1", "3"]);

        let textures: Vec<_> = filter_items(&items, "textures", "")
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(textures, vec!["1", "2"]);

        let images: Vec<_> = filter_items(&items, CATEGORY_IMAGES, "")
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(images, vec!["1", "2"]);

        assert!(filter_items(&items, "vehicles", "").is_empty());
    }
}

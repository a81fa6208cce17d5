use std::sync::Arc;
use std::time::Duration;

use placekit_catalog::{CatalogAggregator, CatalogService, CatalogSource};
use placekit_core::ItemKind;
use placekit_scene::{MemoryScene, SceneRegistry};
use placekit_testkit::{raw_image, raw_model, scene_record, StubCatalogService};

fn aggregator(service: StubCatalogService, scene: MemoryScene) -> CatalogAggregator {
    let service: Arc<dyn CatalogService> = Arc::new(service);
    let scene: Arc<dyn SceneRegistry> = Arc::new(scene);
    CatalogAggregator::new(Some(service), scene)
}

#[tokio::test]
async fn disk_and_scene_copies_merge_into_one_item() {
    let service = StubCatalogService::new()
        .with_images(vec![raw_image("disk-1", "Cat.PNG", "C:\\a\\Cat.PNG")]);
    let mut scene_copy = scene_record("scene-1", ItemKind::Image, "cat", "c:/a/cat.png");
    scene_copy.thumbnail_url = Some("blob:thumb".into());
    let scene = MemoryScene::with_items(vec![scene_copy]);

    let snapshot = aggregator(service, scene).load_catalog().await;
    assert_eq!(snapshot.len(), 1);
    let item = &snapshot.items[0];
    assert_eq!(item.id.as_str(), "disk-1");
    assert_eq!(item.file_name, "Cat.PNG");
    assert_eq!(item.thumbnail_url.as_deref(), Some("blob:thumb"));
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn images_win_ties_even_when_models_settle_first() {
    // Same url in both listings; images must still be merged first.
    let service = StubCatalogService::new()
        .with_images(vec![raw_image("img", "shared.png", "/lib/shared")])
        .with_models(vec![raw_model("mdl", "shared.glb", "/lib/shared")])
        .images_after(Duration::from_millis(30));

    let snapshot = aggregator(service, MemoryScene::new()).load_catalog().await;
    let ids: Vec<_> = snapshot.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["img"]);
}

#[tokio::test]
async fn one_failing_listing_keeps_the_other() {
    let service = StubCatalogService::new()
        .failing_images()
        .with_models(vec![raw_model("m", "oak_table.glb", "/lib/oak_table.glb")]);

    let snapshot = aggregator(service, MemoryScene::new()).load_catalog().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.items[0].category, "furniture");
    assert_eq!(snapshot.failed_sources, vec![CatalogSource::DiskImages]);
    assert!(!snapshot.is_total_failure());
    assert!(snapshot.categories.contains(&"furniture".to_string()));
}

#[tokio::test]
async fn unsuccessful_answer_counts_as_failure() {
    let service = StubCatalogService::new()
        .rejecting_images()
        .with_models(vec![raw_model("m", "rock.glb", "/lib/rock.glb")]);

    let snapshot = aggregator(service, MemoryScene::new()).load_catalog().await;
    assert_eq!(snapshot.failed_sources, vec![CatalogSource::DiskImages]);
    assert_eq!(snapshot.len(), 1);
}

#[tokio::test]
async fn both_listings_failing_keeps_scene_items_and_flags_error() {
    let service = StubCatalogService::new().failing_images().failing_models();
    let scene = MemoryScene::with_items(vec![scene_record(
        "s",
        ItemKind::Image,
        "sky.png",
        "/sky.png",
    )]);

    let snapshot = aggregator(service, scene).load_catalog().await;
    assert!(snapshot.is_total_failure());
    assert_eq!(
        snapshot.failed_sources,
        vec![CatalogSource::DiskImages, CatalogSource::DiskModels]
    );
    let ids: Vec<_> = snapshot.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["s"]);
    assert_eq!(snapshot.categories, vec!["all", "images", "models"]);
}

#[tokio::test]
async fn both_listings_failing_with_empty_scene_yields_empty_catalog() {
    let service = StubCatalogService::new().rejecting_images().failing_models();
    let snapshot = aggregator(service, MemoryScene::new()).load_catalog().await;
    assert!(snapshot.is_total_failure());
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.categories, vec!["all", "images", "models"]);
}

#[tokio::test]
async fn scene_registry_is_the_only_source_without_a_service() {
    let scene = MemoryScene::with_items(vec![
        scene_record("s1", ItemKind::Model, "hero_character.glb", "blob:1"),
        scene_record("s2", ItemKind::Model, "hero_character.glb", "blob:1"),
        scene_record("s3", ItemKind::Image, "grass_texture.png", "blob:2"),
    ]);
    let scene: Arc<dyn SceneRegistry> = Arc::new(scene);
    let aggregator = CatalogAggregator::new(None, scene);
    assert!(!aggregator.has_disk_service());

    let snapshot = aggregator.load_catalog().await;
    let ids: Vec<_> = snapshot.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s3"]);
    assert_eq!(
        snapshot.categories,
        vec!["all", "images", "models", "characters", "textures"]
    );
}

#[tokio::test]
async fn scene_supplement_can_be_disabled() {
    let service = StubCatalogService::new()
        .with_images(vec![raw_image("d", "a.png", "/a.png")]);
    let scene = MemoryScene::with_items(vec![scene_record(
        "s",
        ItemKind::Image,
        "b.png",
        "/b.png",
    )]);

    let snapshot = aggregator(service, scene)
        .with_scene_supplement(false)
        .load_catalog()
        .await;
    let ids: Vec<_> = snapshot.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["d"]);
}

use placekit_core::{Item, HOTBAR_SIZE};
use placekit_hotbar::{FileStore, QuickAccessStore, SlotView, HOTBAR_STORAGE_KEY};
use placekit_testkit::{image, model};
use proptest::prelude::*;

fn pool() -> Vec<Item> {
    vec![
        image("a", "a.png", "/a.png"),
        image("b", "b_icon.png", "/b.png"),
        model("c", "c.glb", "/c.glb"),
        model("d", "d_car.glb", "/d.glb"),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Assign { item: usize, slot: usize },
    Clear { slot: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 0usize..HOTBAR_SIZE + 1).prop_map(|(item, slot)| Op::Assign { item, slot }),
        (0usize..HOTBAR_SIZE).prop_map(|slot| Op::Clear { slot }),
    ]
}

proptest! {
    #[test]
    fn an_item_never_occupies_two_slots(ops in prop::collection::vec(arb_op(), 0..40)) {
        let dir = tempfile::tempdir().unwrap();
        let items = pool();
        let mut bar = QuickAccessStore::open(Box::new(FileStore::new(dir.path())));

        for op in ops {
            match op {
                Op::Assign { item, slot } => {
                    bar.assign(&items[item], slot);
                }
                Op::Clear { slot } => {
                    bar.clear(slot);
                }
            }
            let record = bar.persisted_record();
            let ids: Vec<_> = record.0.iter().flatten().collect();
            let mut unique = ids.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(ids.len(), unique.len());
        }
    }
}

#[test]
fn slots_survive_a_restart_through_the_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let items = pool();

    let mut bar = QuickAccessStore::open(Box::new(FileStore::new(dir.path())));
    bar.assign(&items[0], 0);
    bar.assign(&items[2], 8);
    let before = bar.persisted_record();
    drop(bar);

    let raw = std::fs::read_to_string(dir.path().join(format!("{HOTBAR_STORAGE_KEY}.json")))
        .unwrap();
    assert_eq!(raw, r#"["a",null,null,null,null,null,null,null,"c"]"#);

    let mut reopened = QuickAccessStore::open(Box::new(FileStore::new(dir.path())));
    assert_eq!(reopened.persisted_record(), before);
    assert!(matches!(reopened.slot(8), Some(SlotView::Pending(_))));

    reopened.resolve_against(&items);
    assert_eq!(reopened.item_at(8).map(|i| i.category.as_str()), Some("models"));
}

#[test]
fn resolving_against_a_shrunk_catalog_empties_stale_slots() {
    let dir = tempfile::tempdir().unwrap();
    let items = pool();
    let mut bar = QuickAccessStore::open(Box::new(FileStore::new(dir.path())));
    bar.assign(&items[1], 3);
    bar.assign(&items[3], 4);

    bar.resolve_against(&items[..2]);
    assert_eq!(bar.item_at(3).map(|i| i.id.as_str()), Some("b"));
    assert_eq!(bar.slot(4), Some(SlotView::Empty));
}

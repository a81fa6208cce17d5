//! Slot state, assignment rules, persistence and resolution.

use std::collections::HashSet;

use placekit_core::{Item, ItemId, HOTBAR_SIZE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

/// Storage key of the persisted slot record.
pub const HOTBAR_STORAGE_KEY: &str = "hotbar-slots";

/// Persisted form of the bar: exactly [`HOTBAR_SIZE`] ids or nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotRecord(pub [Option<ItemId>; HOTBAR_SIZE]);

impl Serialize for SlotRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(HOTBAR_SIZE))?;
        for slot in &self.0 {
            seq.serialize_element(slot)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SlotRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let slots: Vec<Option<ItemId>> = Vec::deserialize(deserializer)?;
        if slots.len() != HOTBAR_SIZE {
            return Err(serde::de::Error::custom(format!(
                "expected {} slots, got {}",
                HOTBAR_SIZE,
                slots.len()
            )));
        }
        let slots: [Option<ItemId>; HOTBAR_SIZE] = slots
            .try_into()
            .map_err(|_| serde::de::Error::custom("failed to convert to array"))?;
        Ok(SlotRecord(slots))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Slot {
    #[default]
    Empty,
    /// Id read back from storage, not yet checked against a catalog.
    Pending(ItemId),
    Occupied(Item),
}

impl Slot {
    fn id(&self) -> Option<&ItemId> {
        match self {
            Slot::Empty => None,
            Slot::Pending(id) => Some(id),
            Slot::Occupied(item) => Some(&item.id),
        }
    }
}

/// Read-only view of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotView<'a> {
    /// Nothing assigned.
    Empty,
    /// Restored id awaiting the first catalog resolution.
    Pending(&'a ItemId),
    /// Resolved item.
    Occupied(&'a Item),
}

impl<'a> SlotView<'a> {
    /// The occupying item, if resolved.
    pub fn item(self) -> Option<&'a Item> {
        match self {
            SlotView::Occupied(item) => Some(item),
            _ => None,
        }
    }
}

/// Change notification drained by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotbarEvent {
    /// `item_id` now occupies `slot`.
    Assigned {
        /// Slot index.
        slot: usize,
        /// New occupant.
        item_id: ItemId,
    },
    /// `slot` was emptied.
    Cleared {
        /// Slot index.
        slot: usize,
    },
    /// Every slot was re-derived from a new catalog.
    Resolved,
}

/// Result of [`QuickAccessStore::assign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// The item now occupies the slot.
    Assigned {
        /// Previous occupant of the target slot, now unassigned.
        replaced: Option<ItemId>,
        /// Slot the item was moved away from.
        moved_from: Option<usize>,
    },
    /// The item already occupied the slot.
    Unchanged,
    /// Slot index outside the bar.
    OutOfRange,
}

/// The nine quick-access slots.
///
/// An item id occupies at most one slot. Every mutation writes the full
/// record to storage before returning; a failed write is logged and kept in
/// [`QuickAccessStore::last_persist_error`] while memory stays authoritative.
pub struct QuickAccessStore {
    slots: [Slot; HOTBAR_SIZE],
    storage: Box<dyn KeyValueStore>,
    events: Vec<HotbarEvent>,
    last_persist_error: Option<String>,
}

impl std::fmt::Debug for QuickAccessStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickAccessStore")
            .field("slots", &self.slots)
            .field("events", &self.events.len())
            .field("last_persist_error", &self.last_persist_error)
            .finish()
    }
}

impl QuickAccessStore {
    /// Restore the bar from `storage`.
    ///
    /// Stored ids come back pending. A missing or malformed record gives an
    /// empty bar.
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let record = match storage.read(HOTBAR_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<SlotRecord>(&raw) {
                Ok(record) => record,
                Err(err) => {
                    warn!("ignoring malformed quick-access record: {err}");
                    SlotRecord::default()
                }
            },
            Ok(None) => {
                debug!("no quick-access record stored yet");
                SlotRecord::default()
            }
            Err(err) => {
                warn!("failed to read quick-access record: {err}");
                SlotRecord::default()
            }
        };

        let slots = record.0.map(|id| id.map_or(Slot::Empty, Slot::Pending));
        Self {
            slots,
            storage,
            events: Vec::new(),
            last_persist_error: None,
        }
    }

    /// View of slot `index`; `None` when out of range.
    pub fn slot(&self, index: usize) -> Option<SlotView<'_>> {
        self.slots.get(index).map(|slot| match slot {
            Slot::Empty => SlotView::Empty,
            Slot::Pending(id) => SlotView::Pending(id),
            Slot::Occupied(item) => SlotView::Occupied(item),
        })
    }

    /// Views of all slots in order.
    pub fn slots(&self) -> impl Iterator<Item = SlotView<'_>> + '_ {
        (0..HOTBAR_SIZE).filter_map(move |index| self.slot(index))
    }

    /// Resolved occupant of slot `index`.
    pub fn item_at(&self, index: usize) -> Option<&Item> {
        self.slot(index).and_then(SlotView::item)
    }

    /// Id held by slot `index`, pending or resolved.
    pub fn id_at(&self, index: usize) -> Option<&ItemId> {
        self.slots.get(index).and_then(Slot::id)
    }

    /// Whether any slot still waits for resolution.
    pub fn is_pending(&self) -> bool {
        self.slots.iter().any(|slot| matches!(slot, Slot::Pending(_)))
    }

    /// Slot currently holding `id`.
    pub fn slot_of(&self, id: &ItemId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id() == Some(id))
    }

    /// Put `item` into `slot`, moving it out of any other slot.
    pub fn assign(&mut self, item: &Item, slot: usize) -> AssignOutcome {
        if slot >= HOTBAR_SIZE {
            warn!(slot, "ignoring assignment to out-of-range slot");
            return AssignOutcome::OutOfRange;
        }
        if self.slots[slot].id() == Some(&item.id) {
            // Refresh a pending slot in place without a write.
            self.slots[slot] = Slot::Occupied(item.clone());
            return AssignOutcome::Unchanged;
        }

        let moved_from = self.slot_of(&item.id);
        if let Some(from) = moved_from {
            self.slots[from] = Slot::Empty;
            self.events.push(HotbarEvent::Cleared { slot: from });
        }
        let replaced = std::mem::replace(&mut self.slots[slot], Slot::Occupied(item.clone()))
            .id()
            .cloned();
        self.events.push(HotbarEvent::Assigned {
            slot,
            item_id: item.id.clone(),
        });
        debug!(slot, item = %item.id, ?moved_from, "assigned quick-access slot");
        self.persist();

        AssignOutcome::Assigned {
            replaced,
            moved_from,
        }
    }

    /// Empty `slot`, returning the id it held.
    pub fn clear(&mut self, slot: usize) -> Option<ItemId> {
        if slot >= HOTBAR_SIZE {
            warn!(slot, "ignoring clear of out-of-range slot");
            return None;
        }
        let previous = std::mem::take(&mut self.slots[slot]).id().cloned();
        self.events.push(HotbarEvent::Cleared { slot });
        self.persist();
        previous
    }

    /// Re-derive every slot from `catalog` by id.
    ///
    /// Ids missing from the catalog become empty. If the same id appears in
    /// several slots the first one keeps it. The cleaned record is written
    /// back only when something was dropped.
    pub fn resolve_against(&mut self, catalog: &[Item]) {
        self.resolve(catalog, false);
    }

    /// Resolve against a catalog that is missing some of its sources.
    ///
    /// Found ids become occupied; missing ids stay pending until a complete
    /// catalog arrives, so a source that is briefly down evicts nothing.
    /// Only duplicate ids are dropped.
    pub fn resolve_partial(&mut self, catalog: &[Item]) {
        self.resolve(catalog, true);
    }

    fn resolve(&mut self, catalog: &[Item], keep_missing: bool) {
        let mut seen = HashSet::new();
        let mut dropped = 0usize;

        for slot in &mut self.slots {
            let Some(id) = slot.id().cloned() else {
                continue;
            };
            if !seen.insert(id.clone()) {
                debug!(item = %id, "dropping duplicate quick-access id");
                dropped += 1;
                *slot = Slot::Empty;
                continue;
            }
            *slot = match catalog.iter().find(|item| item.id == id) {
                Some(item) => Slot::Occupied(item.clone()),
                None if keep_missing => Slot::Pending(id),
                None => {
                    debug!(item = %id, "quick-access slot no longer resolves");
                    dropped += 1;
                    Slot::Empty
                }
            };
        }

        self.events.push(HotbarEvent::Resolved);
        if dropped > 0 {
            self.persist();
        }
    }

    /// Take the queued change notifications.
    pub fn drain_events(&mut self) -> Vec<HotbarEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record as it is written to storage.
    pub fn persisted_record(&self) -> SlotRecord {
        SlotRecord(std::array::from_fn(|index| self.slots[index].id().cloned()))
    }

    /// Error of the most recent failed write, cleared by the next success.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.persisted_record()) {
            Ok(json) => json,
            Err(err) => {
                warn!("failed to encode quick-access record: {err}");
                self.last_persist_error = Some(err.to_string());
                return;
            }
        };
        match self.storage.write(HOTBAR_STORAGE_KEY, &json) {
            Ok(()) => self.last_persist_error = None,
            Err(err) => {
                warn!("failed to persist quick-access slots: {err}");
                self.last_persist_error = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use placekit_core::ItemKind;

    fn item(id: &str) -> Item {
        Item::new(id, ItemKind::Image, format!("{id}.png"), format!("/{id}.png"))
    }

    fn stored(store: &MemoryStore) -> serde_json::Value {
        let raw = store.get(HOTBAR_STORAGE_KEY).expect("record written");
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn assigning_moves_item_out_of_previous_slot() {
        let backing = MemoryStore::new();
        let mut bar = QuickAccessStore::open(Box::new(backing.clone()));
        let a = item("A");

        assert!(matches!(bar.assign(&a, 2), AssignOutcome::Assigned { .. }));
        let outcome = bar.assign(&a, 5);
        assert_eq!(
            outcome,
            AssignOutcome::Assigned {
                replaced: None,
                moved_from: Some(2)
            }
        );
        assert_eq!(bar.slot(2), Some(SlotView::Empty));
        assert_eq!(bar.item_at(5).map(|i| i.id.as_str()), Some("A"));
        assert_eq!(
            stored(&backing),
            serde_json::json!([null, null, null, null, null, "A", null, null, null])
        );
    }

    #[test]
    fn reassigning_same_slot_is_a_no_op() {
        let mut bar = QuickAccessStore::open(Box::new(MemoryStore::new()));
        let a = item("A");
        bar.assign(&a, 0);
        bar.drain_events();
        assert_eq!(bar.assign(&a, 0), AssignOutcome::Unchanged);
        assert!(bar.drain_events().is_empty());
    }

    #[test]
    fn overwriting_reports_replaced_occupant() {
        let mut bar = QuickAccessStore::open(Box::new(MemoryStore::new()));
        bar.assign(&item("A"), 1);
        let outcome = bar.assign(&item("B"), 1);
        assert_eq!(
            outcome,
            AssignOutcome::Assigned {
                replaced: Some(ItemId::new("A")),
                moved_from: None
            }
        );
        assert_eq!(bar.slot_of(&ItemId::new("A")), None);
    }

    #[test]
    fn out_of_range_slots_are_rejected() {
        let mut bar = QuickAccessStore::open(Box::new(MemoryStore::new()));
        assert_eq!(bar.assign(&item("A"), HOTBAR_SIZE), AssignOutcome::OutOfRange);
        assert_eq!(bar.clear(HOTBAR_SIZE), None);
        assert!(bar.slot(HOTBAR_SIZE).is_none());
    }

    #[test]
    fn restored_ids_stay_pending_until_resolved() {
        let backing = MemoryStore::with_value(
            HOTBAR_STORAGE_KEY,
            r#"["A",null,"gone",null,null,null,null,null,null]"#,
        );
        let mut bar = QuickAccessStore::open(Box::new(backing.clone()));
        assert!(bar.is_pending());
        assert_eq!(bar.slot(0), Some(SlotView::Pending(&ItemId::new("A"))));

        bar.resolve_against(&[item("A")]);
        assert!(!bar.is_pending());
        assert_eq!(bar.item_at(0).map(|i| i.file_name.as_str()), Some("A.png"));
        assert_eq!(bar.slot(2), Some(SlotView::Empty));
        assert_eq!(
            stored(&backing),
            serde_json::json!(["A", null, null, null, null, null, null, null, null])
        );
    }

    #[test]
    fn duplicate_persisted_ids_keep_the_first_slot() {
        let backing = MemoryStore::with_value(
            HOTBAR_STORAGE_KEY,
            r#"["A","A",null,null,null,null,null,null,null]"#,
        );
        let mut bar = QuickAccessStore::open(Box::new(backing));
        bar.resolve_against(&[item("A")]);
        assert_eq!(bar.item_at(0).map(|i| i.id.as_str()), Some("A"));
        assert_eq!(bar.slot(1), Some(SlotView::Empty));
    }

    #[test]
    fn partial_resolution_keeps_missing_ids_pending() {
        let backing = MemoryStore::with_value(
            HOTBAR_STORAGE_KEY,
            r#"["A","B","B",null,null,null,null,null,null]"#,
        );
        let mut bar = QuickAccessStore::open(Box::new(backing.clone()));
        bar.resolve_partial(&[item("B")]);

        assert_eq!(bar.slot(0), Some(SlotView::Pending(&ItemId::new("A"))));
        assert_eq!(bar.item_at(1).map(|i| i.id.as_str()), Some("B"));
        assert_eq!(bar.slot(2), Some(SlotView::Empty));
        assert_eq!(
            stored(&backing),
            serde_json::json!(["A", "B", null, null, null, null, null, null, null])
        );

        bar.resolve_against(&[item("A"), item("B")]);
        assert!(!bar.is_pending());
        assert_eq!(bar.item_at(0).map(|i| i.id.as_str()), Some("A"));
    }

    #[test]
    fn malformed_or_short_records_give_an_empty_bar() {
        for raw in ["not json", "[null, null]", r#"{"slots":[]}"#] {
            let bar = QuickAccessStore::open(Box::new(MemoryStore::with_value(
                HOTBAR_STORAGE_KEY,
                raw,
            )));
            assert!(!bar.is_pending(), "{raw}");
            assert!(bar.slots().all(|view| view == SlotView::Empty));
        }
    }

    #[test]
    fn failed_write_keeps_memory_authoritative() {
        let backing = MemoryStore::new();
        backing.set_fail_writes(true);
        let mut bar = QuickAccessStore::open(Box::new(backing.clone()));

        bar.assign(&item("A"), 4);
        assert_eq!(bar.item_at(4).map(|i| i.id.as_str()), Some("A"));
        assert!(bar.last_persist_error().is_some());
        assert_eq!(backing.get(HOTBAR_STORAGE_KEY), None);

        backing.set_fail_writes(false);
        bar.clear(4);
        assert!(bar.last_persist_error().is_none());
    }

    #[test]
    fn events_describe_each_change() {
        let mut bar = QuickAccessStore::open(Box::new(MemoryStore::new()));
        let a = item("A");
        bar.assign(&a, 0);
        bar.assign(&a, 3);
        bar.clear(3);
        assert_eq!(
            bar.drain_events(),
            vec![
                HotbarEvent::Assigned {
                    slot: 0,
                    item_id: a.id.clone()
                },
                HotbarEvent::Cleared { slot: 0 },
                HotbarEvent::Assigned {
                    slot: 3,
                    item_id: a.id.clone()
                },
                HotbarEvent::Cleared { slot: 3 },
            ]
        );
    }
}

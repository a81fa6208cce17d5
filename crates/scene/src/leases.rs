//! Locator leases held by placed scene entities.

use std::collections::{BTreeSet, HashMap};

use crate::PlacedEntityId;

/// Ownership map for content locators held alive by placed entities.
///
/// A locator stays live while at least one placed entity holds it; removing
/// the last holder releases it so the host can drop whatever backs it
/// (session-local object urls, decoded buffers...).
#[derive(Debug, Default)]
pub struct LocatorLeases {
    holders: HashMap<String, BTreeSet<PlacedEntityId>>,
    by_entity: HashMap<PlacedEntityId, String>,
}

impl LocatorLeases {
    /// Create an empty lease map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `entity` keeps `locator` alive.
    pub fn acquire(&mut self, locator: &str, entity: PlacedEntityId) {
        if let Some(previous) = self.by_entity.insert(entity, locator.to_string()) {
            if previous != locator {
                self.drop_holder(&previous, entity);
            }
        }
        self.holders
            .entry(locator.to_string())
            .or_default()
            .insert(entity);
    }

    /// Release the lease held by `entity`.
    ///
    /// Returns the locator if this was its last holder.
    pub fn release(&mut self, entity: PlacedEntityId) -> Option<String> {
        let locator = self.by_entity.remove(&entity)?;
        if self.drop_holder(&locator, entity) {
            Some(locator)
        } else {
            None
        }
    }

    /// Whether any placed entity still holds `locator`.
    pub fn is_live(&self, locator: &str) -> bool {
        self.holders.contains_key(locator)
    }

    /// Number of placed entities holding `locator`.
    pub fn holder_count(&self, locator: &str) -> usize {
        self.holders.get(locator).map_or(0, BTreeSet::len)
    }

    /// Number of live locators.
    pub fn len(&self) -> usize {
        self.holders.len()
    }

    /// Whether no locator is live.
    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    fn drop_holder(&mut self, locator: &str, entity: PlacedEntityId) -> bool {
        let Some(set) = self.holders.get_mut(locator) else {
            return false;
        };
        set.remove(&entity);
        if set.is_empty() {
            self.holders.remove(locator);
            true
        } else {
            false
        }
    }
}

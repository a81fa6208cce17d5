//! First-match-wins deduplication over the ordered candidate sequence.

use std::collections::{HashMap, HashSet};

use placekit_core::{identity_triple, normalize_path, normalize_url, IdentityTriple, Item, ItemId};

/// Result of one deduplication pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupOutcome {
    /// Accepted items, in input order of their first occurrence.
    pub items: Vec<Item>,
    /// Candidates folded into an earlier item through an identity signal.
    pub merged: usize,
    /// Candidates dropped because their id was already accepted.
    pub skipped: usize,
}

#[derive(Default)]
struct IdentityIndex {
    ids: HashSet<ItemId>,
    by_url: HashMap<String, usize>,
    by_path: HashMap<String, usize>,
    by_triple: HashMap<IdentityTriple, usize>,
}

impl IdentityIndex {
    fn find(
        &self,
        url: Option<&String>,
        path: Option<&String>,
        triple: &IdentityTriple,
    ) -> Option<usize> {
        url.and_then(|key| self.by_url.get(key))
            .or_else(|| path.and_then(|key| self.by_path.get(key)))
            .or_else(|| self.by_triple.get(triple))
            .copied()
    }
}

/// Deduplicate candidates processed strictly in input order.
///
/// The earliest record wins identity; a later duplicate only contributes a
/// thumbnail the winner lacks. Running this on its own output is a no-op.
pub fn dedupe(candidates: impl IntoIterator<Item = Item>) -> DedupOutcome {
    let mut index = IdentityIndex::default();
    let mut outcome = DedupOutcome::default();

    for candidate in candidates {
        if index.ids.contains(&candidate.id) {
            outcome.skipped += 1;
            continue;
        }

        let url = normalize_url(Some(candidate.url.as_str()));
        let path = normalize_path(candidate.file_path.as_deref());
        let triple = identity_triple(&candidate);

        if let Some(existing) = index.find(url.as_ref(), path.as_ref(), &triple) {
            enrich(&mut outcome.items[existing], candidate);
            outcome.merged += 1;
            continue;
        }

        let slot = outcome.items.len();
        index.ids.insert(candidate.id.clone());
        if let Some(url) = url {
            index.by_url.insert(url, slot);
        }
        if let Some(path) = path {
            index.by_path.insert(path, slot);
        }
        if !triple.0.is_empty() {
            index.by_triple.insert(triple, slot);
        }
        outcome.items.push(candidate);
    }

    outcome
}

fn enrich(winner: &mut Item, duplicate: Item) {
    if !winner.has_thumbnail() && duplicate.has_thumbnail() {
        winner.thumbnail_url = duplicate.thumbnail_url;
    }
}

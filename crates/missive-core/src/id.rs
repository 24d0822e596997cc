//! Block id allocation.

use std::collections::HashSet;

use smol_str::format_smolstr;

use crate::block::{Block, BlockId};

/// Source of fresh block ids.
///
/// Implementations must not hand out the same id twice. Callers still skip
/// ids that are already present in the document, so a source does not need
/// to know about blocks it did not create.
pub trait IdSource {
    fn next_id(&mut self) -> BlockId;

    /// Called for every block adopted from outside (decoded state), so the
    /// source can avoid handing out an id that was already in use.
    fn observe(&mut self, _id: &BlockId) {}
}

/// Produces `block-1`, `block-2`, ...
#[derive(Clone, Debug)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub const PREFIX: &'static str = "block-";

    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> BlockId {
        let id = BlockId::new(format_smolstr!("{}{}", Self::PREFIX, self.next));
        self.next += 1;
        id
    }

    fn observe(&mut self, id: &BlockId) {
        let seen = id
            .as_str()
            .strip_prefix(Self::PREFIX)
            .and_then(|n| n.parse::<u64>().ok());
        if let Some(n) = seen {
            self.next = self.next.max(n.saturating_add(1));
        }
    }
}

impl<I: IdSource + ?Sized> IdSource for &mut I {
    fn next_id(&mut self) -> BlockId {
        (**self).next_id()
    }

    fn observe(&mut self, id: &BlockId) {
        (**self).observe(id)
    }
}

/// Draw ids from `ids` until one is not `taken`.
pub fn fresh_id<I: IdSource + ?Sized>(ids: &mut I, taken: impl Fn(&BlockId) -> bool) -> BlockId {
    loop {
        let id = ids.next_id();
        if !taken(&id) {
            return id;
        }
    }
}

/// Make block ids unique in place.
///
/// The first occurrence of an id keeps it; later duplicates get a fresh id.
/// Returns how many blocks were renamed.
pub fn ensure_unique_ids<I: IdSource + ?Sized>(blocks: &mut [Block], ids: &mut I) -> usize {
    for block in blocks.iter() {
        ids.observe(&block.id);
    }

    let mut seen: HashSet<BlockId> = HashSet::with_capacity(blocks.len());
    let mut duplicates = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        if !seen.insert(block.id.clone()) {
            duplicates.push(index);
        }
    }

    for &index in &duplicates {
        let id = fresh_id(ids, |candidate| seen.contains(candidate));
        tracing::debug!(old = %blocks[index].id, new = %id, "reassigned duplicate block id");
        seen.insert(id.clone());
        blocks[index].id = id;
    }

    duplicates.len()
}

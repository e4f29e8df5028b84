/// Cross-category exclusion of factions already committed to a role.
use rustc_hash::FxHashSet;

use crate::schema::catalog::FactionId;

/// Factions claimed by earlier stages of the current generation run.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    claimed: FxHashSet<FactionId>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a faction as taken. Claiming twice has no further effect.
    pub fn claim(&mut self, faction: FactionId) {
        self.claimed.insert(faction);
    }

    pub fn is_claimed(&self, faction: FactionId) -> bool {
        self.claimed.contains(&faction)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    /// The catalog ids not yet claimed, in catalog order.
    pub fn eligible<'a>(
        &'a self,
        catalog_ids: &'a [FactionId],
    ) -> impl Iterator<Item = FactionId> + 'a {
        catalog_ids
            .iter()
            .copied()
            .filter(move |id| !self.is_claimed(*id))
    }
}

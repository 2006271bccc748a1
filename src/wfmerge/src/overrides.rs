//! Override resolution
//!
//! Precedence, later steps winning per field:
//!
//! 1. primary export values (with scraped metadata filling gaps only)
//! 2. polarity fallback table, used only when no polarities are known
//! 3. manual override table, field by field
//!
//! Rank-30 values are derived last, from the final base (see
//! [`resolve_rank30`]). Every step is last-writer-wins per field, so
//! re-applying the same inputs to already resolved data changes nothing.

use crate::entity::{Stat, StatBlock};
use crate::sources::{BaseOverride, PolarityEntry, SupplementEntry};
use crate::stats::RankProjector;

/// Stats and slot layout of one entity as they move through the precedence
/// chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStats {
    pub base: StatBlock,
    pub rank30: StatBlock,
    pub polarities: Vec<String>,
    pub aura: Option<String>,
}

/// Fill base stats, polarities and aura the primary export lacks from the
/// scraped metadata. Never replaces a present value.
pub fn fill_from_supplement(state: &mut ResolvedStats, entry: &SupplementEntry) {
    if let Some(stats) = &entry.stats {
        state.base.fill(Stat::Health, stats.health);
        state.base.fill(Stat::Shields, stats.shield);
        state.base.fill(Stat::Energy, stats.energy);
        state.base.fill(Stat::Armor, stats.armor);
        state.base.fill(Stat::SprintSpeed, stats.sprint_speed);
    }
    if state.polarities.is_empty() {
        if let Some(polarities) = &entry.polarities {
            state.polarities = polarities.clone();
        }
    }
    if state.aura.is_none() {
        state.aura = entry.aura.clone();
    }
}

/// Substitute the fallback polarities when none are known.
///
/// An entry may also supply an aura, used only when no aura is known.
pub fn apply_polarity_fallback(state: &mut ResolvedStats, entry: &PolarityEntry) {
    if !state.polarities.is_empty() {
        return;
    }
    state.polarities = entry.polarities().to_vec();
    if state.aura.is_none() {
        state.aura = entry.aura().map(str::to_string);
    }
}

/// Apply a manual override to the base block, polarities and aura. Each
/// field overwrites only when supplied. `*R30` fields are read by
/// [`resolve_rank30`].
pub fn apply_base_override(state: &mut ResolvedStats, o: &BaseOverride) {
    for stat in Stat::ALL {
        state.base.set_if_some(stat, o.base_value(stat));
    }
    if let Some(polarities) = &o.polarities {
        state.polarities = polarities.clone();
    }
    if let Some(aura) = &o.aura {
        state.aura = Some(aura.clone());
    }
}

/// Runs steps 2 and 3 of the precedence chain over primary-derived stats.
#[derive(Debug, Clone, Copy)]
pub struct OverrideResolver<'a> {
    pub polarity_fallback: Option<&'a PolarityEntry>,
    pub base_override: Option<&'a BaseOverride>,
}

impl OverrideResolver<'_> {
    pub fn resolve(&self, mut state: ResolvedStats) -> ResolvedStats {
        if let Some(entry) = self.polarity_fallback {
            apply_polarity_fallback(&mut state, entry);
        }
        if let Some(o) = self.base_override {
            apply_base_override(&mut state, o);
        }
        state
    }
}

/// Rank-30 block for the final `base`.
///
/// Per stat, the first of: the override's `*R30` value, the export's
/// explicit rank-30 value (dropped when the override replaced that stat's
/// base, since it no longer describes the same figure), the projection.
/// A supplied value below the base is ignored in favour of the projection,
/// so rank 30 never falls below rank 0.
pub fn resolve_rank30(
    name: &str,
    base: &StatBlock,
    projector: &RankProjector,
    explicit: &StatBlock,
    o: Option<&BaseOverride>,
) -> StatBlock {
    let mut rank30 = projector.project(name, base);

    for stat in Stat::ALL {
        let rebased = o.and_then(|o| o.base_value(stat)).is_some();
        let supplied = o
            .and_then(|o| o.rank30_value(stat))
            .or_else(|| explicit.get(stat).filter(|_| !rebased));
        let Some(value) = supplied else {
            continue;
        };
        match base.get(stat) {
            Some(floor) if value < floor => tracing::warn!(
                "{}: ignoring rank-30 {:?} of {} below base {}",
                name,
                stat,
                value,
                floor
            ),
            _ => rank30.set_if_some(stat, Some(value)),
        }
    }
    rank30
}

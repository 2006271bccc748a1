//! Ability enrichment
//!
//! Each ability slot of an entity is joined against three sources: per-slot
//! metadata from the frame ability index, a detail record from the
//! ability-detail dataset, and an optional manual override. Missing matches
//! are normal and leave the corresponding fields empty.

use crate::entity::{Ability, AbilityRow, AbilitySummary, Modifier};
use crate::index::DetailIndex;
use crate::sources::{AbilityOverride, DetailRecord, EntityOverride, ExportAbility, FrameAbility};
use crate::text::{normalize_name, strip_opt};

// ============================================================================
// Slot list
// ============================================================================

/// An ability slot before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRef {
    pub name: String,
    pub slot: u32,
    pub path: Option<String>,
}

/// Build the slot list from the export, falling back to a name list.
///
/// Slots missing from the source take their 1-based position. Entries
/// without a name are dropped. The result is stably sorted by slot.
pub fn slot_list(exported: &[ExportAbility], fallback_names: Option<&[String]>) -> Vec<SlotRef> {
    let mut slots: Vec<SlotRef> = if exported.is_empty() {
        fallback_names
            .unwrap_or_default()
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let name = name.trim();
                (!name.is_empty()).then(|| SlotRef {
                    name: name.to_string(),
                    slot: position_slot(i),
                    path: None,
                })
            })
            .collect()
    } else {
        exported
            .iter()
            .enumerate()
            .filter_map(|(i, ability)| {
                let name = ability.name.as_deref()?.trim();
                (!name.is_empty()).then(|| SlotRef {
                    name: name.to_string(),
                    slot: ability.slot.unwrap_or_else(|| position_slot(i)),
                    path: ability.path.clone(),
                })
            })
            .collect()
    };

    slots.sort_by_key(|s| s.slot);
    slots
}

fn position_slot(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

// ============================================================================
// Detail resolution
// ============================================================================

/// One way of finding an ability's detail record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailStrategy {
    /// Normalized display name.
    ByName,
    /// Internal path from the frame index, then from the export.
    ByPath,
}

/// Name first, then path.
pub const DEFAULT_STRATEGIES: &[DetailStrategy] = &[DetailStrategy::ByName, DetailStrategy::ByPath];

/// Join keys available for one slot.
#[derive(Debug, Clone, Copy)]
pub struct JoinKeys<'k> {
    pub name: &'k str,
    pub meta_path: Option<&'k str>,
    pub export_path: Option<&'k str>,
}

impl DetailStrategy {
    pub fn resolve<'a>(self, index: &DetailIndex<'a>, keys: &JoinKeys<'_>) -> Option<&'a DetailRecord> {
        match self {
            Self::ByName => index.by_name(keys.name),
            Self::ByPath => [keys.meta_path, keys.export_path]
                .into_iter()
                .flatten()
                .find_map(|path| index.by_path(path)),
        }
    }
}

/// First strategy that finds a record wins.
pub fn first_match<'a>(
    strategies: &[DetailStrategy],
    index: &DetailIndex<'a>,
    keys: &JoinKeys<'_>,
) -> Option<&'a DetailRecord> {
    strategies.iter().find_map(|s| s.resolve(index, keys))
}

/// Per-slot metadata: by slot number first, then by normalized name.
pub fn frame_meta<'m>(entries: &'m [FrameAbility], slot: &SlotRef) -> Option<&'m FrameAbility> {
    let wanted = normalize_name(&slot.name);
    entries
        .iter()
        .find(|m| m.slot == Some(slot.slot))
        .or_else(|| {
            entries
                .iter()
                .find(|m| m.name.as_deref().map(normalize_name).as_deref() == Some(wanted.as_str()))
        })
}

// ============================================================================
// Summary building
// ============================================================================

/// Summary from a detail record.
///
/// Declared "affected by" labels are read first, then row-level modifier
/// tags; each row fills its modifier's value if none has been recorded yet.
pub fn build_summary(detail: &DetailRecord) -> AbilitySummary {
    let mut summary = AbilitySummary::default();

    if let Some(header) = &detail.summary {
        summary.cost_type = header.cost_type.clone();
        summary.cost_energy = header.cost_energy.clone();
        for modifier in header.affected_by.iter().filter_map(|l| Modifier::from_label(l)) {
            summary.mark_affected(modifier);
        }
    }

    for row in detail.rows() {
        let Some(modifier) = row.modifier.as_deref().and_then(Modifier::from_tag) else {
            continue;
        };
        summary.fill(modifier, row.main_numeric);
        summary.mark_affected(modifier);
    }

    summary
}

/// Row-level detail with HTML stripped from labels.
pub fn clean_rows(detail: &DetailRecord) -> Vec<AbilityRow> {
    detail
        .rows()
        .iter()
        .map(|r| AbilityRow {
            label: strip_opt(r.label.as_deref()),
            filled_label: strip_opt(r.filled_label.as_deref()),
            modifier: r.modifier.clone(),
            values: r.values.clone(),
            main_numeric: r.main_numeric,
        })
        .collect()
}

/// Fold a manual ability override into a resolved ability.
///
/// The override description replaces the resolved one. Cost and modifier
/// values only fill fields that are still empty.
pub fn apply_ability_override(ability: &mut Ability, o: &AbilityOverride) {
    if let Some(desc) = strip_opt(o.desc.as_deref()) {
        ability.description = Some(desc);
    }

    let summary = &mut ability.summary;
    if let Some(cost) = &o.cost {
        if summary.cost_energy.is_none() {
            summary.cost_energy = Some(cost.clone());
        }
        if summary.cost_type.is_none() {
            summary.cost_type = Some("Energy".to_string());
        }
    }

    let Some(stats) = &o.stats else {
        return;
    };
    for (modifier, value) in [
        (Modifier::Strength, stats.strength),
        (Modifier::Duration, stats.duration),
        (Modifier::Range, stats.range),
        (Modifier::Efficiency, stats.efficiency),
    ] {
        if value.is_some() {
            summary.fill(modifier, value);
            summary.mark_affected(modifier);
        }
    }
    if summary.misc.is_none() {
        summary.misc = stats.misc.clone();
    }
}

// ============================================================================
// Enricher
// ============================================================================

/// Resolves full ability records for one entity at a time.
pub struct AbilityEnricher<'a> {
    index: &'a DetailIndex<'a>,
    strategies: &'a [DetailStrategy],
}

impl<'a> AbilityEnricher<'a> {
    pub fn new(index: &'a DetailIndex<'a>) -> Self {
        Self::with_strategies(index, DEFAULT_STRATEGIES)
    }

    pub fn with_strategies(index: &'a DetailIndex<'a>, strategies: &'a [DetailStrategy]) -> Self {
        Self { index, strategies }
    }

    /// Enrich one slot.
    pub fn enrich_slot(
        &self,
        slot: &SlotRef,
        meta: &[FrameAbility],
        overrides: Option<&EntityOverride>,
    ) -> Ability {
        let meta = frame_meta(meta, slot);
        let meta_path = meta.and_then(|m| m.path.as_deref());

        let keys = JoinKeys {
            name: &slot.name,
            meta_path,
            export_path: slot.path.as_deref(),
        };
        let detail = first_match(self.strategies, self.index, &keys);

        let mut ability = Ability {
            name: slot.name.clone(),
            slot: slot.slot,
            path: meta_path.or(slot.path.as_deref()).map(str::to_string),
            subsumable: meta.and_then(|m| m.subsumable),
            augments: meta.map(|m| dedup(&m.augments)).unwrap_or_default(),
            description: detail.and_then(|d| strip_opt(d.description.as_deref())),
            summary: detail.map(build_summary).unwrap_or_default(),
            rows: detail.map(clean_rows).unwrap_or_default(),
        };

        if detail.is_none() {
            tracing::debug!("No ability detail for {} (slot {})", slot.name, slot.slot);
        }
        if let Some(o) = overrides.and_then(|o| o.ability(&slot.name)) {
            apply_ability_override(&mut ability, o);
        }
        ability
    }

    /// Enrich every slot, keeping slot order.
    pub fn enrich(
        &self,
        slots: &[SlotRef],
        meta: &[FrameAbility],
        overrides: Option<&EntityOverride>,
    ) -> Vec<Ability> {
        slots
            .iter()
            .map(|slot| self.enrich_slot(slot, meta, overrides))
            .collect()
    }
}

fn dedup(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

//! End-to-end fusion: loaded sources in, output document out

use chrono::{DateTime, Utc};

use crate::abilities::{slot_list, AbilityEnricher};
use crate::assemble::{assemble, slug_collisions, DatasetDocument};
use crate::entity::{Entity, EntityType, SourceRef};
use crate::error::Result;
use crate::index::DetailIndex;
use crate::overrides::{fill_from_supplement, resolve_rank30, OverrideResolver, ResolvedStats};
use crate::output::entities_digest;
use crate::sources::{RawEntity, SourcePaths, Sources};
use crate::stats::{RankProjector, StatAliases};
use crate::text::{clean_display_name, slugify, strip_opt};

/// Configuration tables for stat extraction and rank projection.
#[derive(Debug, Clone, Default)]
pub struct MergeConfig {
    pub aliases: StatAliases,
    pub projector: RankProjector,
}

/// Load every source and merge them.
pub fn run(paths: &SourcePaths, config: &MergeConfig, generated_at: DateTime<Utc>) -> Result<DatasetDocument> {
    let sources = Sources::load(paths)?;
    let doc = merge(&sources, config, generated_at);

    for collision in slug_collisions(&doc.entities) {
        tracing::warn!(
            "Slug '{}' is shared by {} entities: {}",
            collision.slug,
            collision.names.len(),
            collision.names.join(", ")
        );
    }
    tracing::info!(
        "Merged {} entities, digest {}",
        doc.count,
        entities_digest(&doc.entities)?
    );
    Ok(doc)
}

/// Merge already-loaded sources into the output document.
///
/// Pure apart from logging: the same sources and config always produce the
/// same entities.
pub fn merge(sources: &Sources, config: &MergeConfig, generated_at: DateTime<Utc>) -> DatasetDocument {
    let index = DetailIndex::build(&sources.details);
    let enricher = AbilityEnricher::new(&index);

    let entities = sources
        .primary
        .iter()
        .map(|record| build_entity(record, sources, config, &enricher));

    assemble(entities, generated_at)
}

/// Resolve one primary-export record. Records without a name yield `None`.
pub fn build_entity(
    record: &RawEntity,
    sources: &Sources,
    config: &MergeConfig,
    enricher: &AbilityEnricher<'_>,
) -> Option<Entity> {
    let name = clean_display_name(record.name()?);
    if name.is_empty() {
        return None;
    }
    let kind = EntityType::classify(record.product_category(), record.type_hint());
    let supplement = sources.supplement.get(&name);
    let entity_override = sources.overrides.get(&name);
    let base_override = entity_override.and_then(|o| o.base.as_ref());

    let mut state = ResolvedStats {
        base: config.aliases.base.extract(record),
        rank30: Default::default(),
        polarities: record.polarities().unwrap_or_default(),
        aura: record.aura().map(str::to_string),
    };
    if let Some(entry) = supplement {
        fill_from_supplement(&mut state, entry);
    }

    let mut state = OverrideResolver {
        polarity_fallback: sources.polarities.get(&name),
        base_override,
    }
    .resolve(state);
    state.rank30 = resolve_rank30(
        &name,
        &state.base,
        &config.projector,
        &config.aliases.rank30.extract(record),
        base_override,
    );

    let slots = slot_list(
        &record.abilities(),
        sources.name_lists.get(&name).map(Vec::as_slice),
    );
    let abilities = enricher.enrich(&slots, sources.frame_index.for_frame(&name), entity_override);

    let description = record
        .description()
        .or_else(|| supplement.and_then(|s| s.description.as_deref()));
    let passive = record
        .passive()
        .or_else(|| supplement.and_then(|s| s.passive.as_deref()));

    tracing::debug!("Resolved {} ({}) with {} abilities", name, kind, abilities.len());

    Some(Entity {
        slug: slugify(&name),
        progenitor: sources.lineage.get(&name).cloned(),
        description: strip_opt(description),
        passive: strip_opt(passive),
        base_stats: state.base,
        base_stats_rank30: state.rank30,
        polarities: state.polarities,
        aura: state.aura,
        abilities,
        source: SourceRef {
            unique_name: record.unique_name().map(str::to_string),
            product_category: record.product_category().map(str::to_string),
            type_hint: record.type_hint().map(str::to_string),
        },
        kind,
        name,
    })
}

//! Entity assembly and the output document envelope

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entity::{Entity, EntityType};

/// The merged dataset as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDocument {
    /// ISO-8601 UTC timestamp of the run.
    pub generated_at: String,
    pub count: usize,
    pub entities: Vec<Entity>,
}

impl DatasetDocument {
    /// Entity by case-insensitive display name or exact slug.
    pub fn find(&self, name_or_slug: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.slug == name_or_slug || e.name.eq_ignore_ascii_case(name_or_slug))
    }

    /// Number of entities per type, in type order.
    pub fn type_counts(&self) -> BTreeMap<EntityType, usize> {
        let mut counts = BTreeMap::new();
        for entity in &self.entities {
            *counts.entry(entity.kind).or_insert(0) += 1;
        }
        counts
    }
}

/// Format a run timestamp the way the document carries it.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the output document from per-record results.
///
/// `None` results and nameless entities are dropped and never counted.
/// Entities sharing a slug are all kept; see [`slug_collisions`].
pub fn assemble<I>(entities: I, generated_at: DateTime<Utc>) -> DatasetDocument
where
    I: IntoIterator<Item = Option<Entity>>,
{
    let entities: Vec<Entity> = entities
        .into_iter()
        .flatten()
        .filter(|e| !e.name.trim().is_empty())
        .collect();

    DatasetDocument {
        generated_at: format_timestamp(generated_at),
        count: entities.len(),
        entities,
    }
}

/// Several entities mapping to one slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCollision {
    pub slug: String,
    pub names: Vec<String>,
}

/// Slugs shared by more than one entity, ordered by slug.
pub fn slug_collisions(entities: &[Entity]) -> Vec<SlugCollision> {
    let mut by_slug: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for entity in entities {
        by_slug
            .entry(entity.slug.as_str())
            .or_default()
            .push(entity.name.clone());
    }

    by_slug
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(slug, names)| SlugCollision {
            slug: slug.to_string(),
            names,
        })
        .collect()
}

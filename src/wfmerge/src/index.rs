//! Lookup tables over the ability-detail dataset

use std::collections::HashMap;

use crate::sources::{DetailDataset, DetailRecord};
use crate::text::normalize_name;

/// Ability-detail records indexed by normalized name and by internal path.
///
/// Joins are exact after normalization; there is no fuzzy matching. When two
/// records share a key the later one replaces the earlier.
#[derive(Debug, Default)]
pub struct DetailIndex<'a> {
    by_name: HashMap<String, &'a DetailRecord>,
    by_path: HashMap<String, &'a DetailRecord>,
}

impl<'a> DetailIndex<'a> {
    pub fn build(dataset: &'a DetailDataset) -> Self {
        let mut index = Self::default();
        let mut skipped = 0usize;

        for record in dataset.records() {
            let name = record
                .name
                .as_deref()
                .map(normalize_name)
                .filter(|n| !n.is_empty());
            let path = record
                .path
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty());

            if name.is_none() && path.is_none() {
                skipped += 1;
                continue;
            }
            if let Some(name) = name {
                index.by_name.insert(name, record);
            }
            if let Some(path) = path {
                index.by_path.insert(path.to_string(), record);
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} ability detail records without name or path", skipped);
        }
        index
    }

    pub fn by_name(&self, name: &str) -> Option<&'a DetailRecord> {
        self.by_name.get(&normalize_name(name)).copied()
    }

    pub fn by_path(&self, path: &str) -> Option<&'a DetailRecord> {
        self.by_path.get(path.trim()).copied()
    }

    /// Number of distinct names indexed.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_path.is_empty()
    }
}

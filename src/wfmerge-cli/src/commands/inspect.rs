//! Inspect command handler
//!
//! Reads a merged document back and prints either a summary or one entity.

use anyhow::{bail, Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use wfmerge::{read_document, slug_collisions, DatasetDocument};

use crate::config::Config;

pub fn handle(input: Option<&Path>, name: Option<&str>, config: &Config) -> Result<()> {
    let data_dir = config.data_dir(None);
    let input = config.output(input, &data_dir);

    let doc = read_document(&input)
        .with_context(|| format!("Failed to read merged document {}", input.display()))?;

    match name {
        Some(name) => {
            let Some(entity) = doc.find(name) else {
                bail!("No entity named '{}' in {}", name, input.display());
            };
            println!("{}", serde_json::to_string_pretty(entity)?);
        }
        None => print!("{}", summary(&doc)),
    }
    Ok(())
}

/// Count, per-type breakdown and slug collisions.
fn summary(doc: &DatasetDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Generated: {}", doc.generated_at);
    let _ = writeln!(out, "Entities:  {}", doc.count);
    for (kind, count) in doc.type_counts() {
        let _ = writeln!(out, "  {:<10} {}", kind.to_string(), count);
    }

    let collisions = slug_collisions(&doc.entities);
    if !collisions.is_empty() {
        let _ = writeln!(out, "Slug collisions:");
        for c in collisions {
            let _ = writeln!(out, "  {}: {}", c.slug, c.names.join(", "));
        }
    }
    out
}

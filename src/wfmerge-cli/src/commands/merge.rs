//! Merge command handler

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use wfmerge::{write_document, MergeConfig, SourcePaths};

use crate::cli::MergeArgs;
use crate::config::Config;

/// Run the pipeline and write the document.
///
/// Nothing is written when the run fails.
pub fn handle(args: &MergeArgs, config: &Config) -> Result<PathBuf> {
    let data_dir = config.data_dir(args.data_dir.as_deref());
    let output = config.output(args.output.as_deref(), &data_dir);
    let paths = source_paths(&data_dir, args);

    tracing::info!("Reading sources from {}", data_dir.display());
    let doc = wfmerge::run(&paths, &MergeConfig::default(), Utc::now())
        .with_context(|| format!("Failed to merge sources in {}", data_dir.display()))?;

    write_document(&output, &doc)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Wrote {} entities to {}", doc.count, output.display());
    Ok(output)
}

/// Default file locations under `data_dir`, replaced by any per-source flag.
fn source_paths(data_dir: &Path, args: &MergeArgs) -> SourcePaths {
    let mut paths = SourcePaths::in_dir(data_dir);
    let flags = [
        (&mut paths.primary, &args.primary),
        (&mut paths.supplement, &args.supplement),
        (&mut paths.details, &args.details),
        (&mut paths.frame_index, &args.frame_index),
        (&mut paths.name_lists, &args.name_lists),
        (&mut paths.polarities, &args.polarities),
        (&mut paths.overrides, &args.overrides),
        (&mut paths.lineage, &args.lineage),
    ];
    for (slot, flag) in flags {
        if let Some(path) = flag {
            slot.clone_from(path);
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use wfmerge::read_document;
    use wfmerge::sources::{DETAILS_FILE, PRIMARY_FILE};

    #[test]
    fn test_flags_override_single_sources() {
        let args = MergeArgs {
            details: Some(PathBuf::from("/tmp/scraped/abilities.json")),
            ..Default::default()
        };
        let paths = source_paths(Path::new("data"), &args);
        assert_eq!(paths.details, PathBuf::from("/tmp/scraped/abilities.json"));
        assert_eq!(paths.primary, Path::new("data").join(PRIMARY_FILE));
    }

    #[test]
    fn test_merge_writes_default_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(PRIMARY_FILE),
            r#"[{"name": "Nova", "health": 100, "shield": 75, "power": 150, "armor": 65}]"#,
        )
        .unwrap();

        let args = MergeArgs {
            data_dir: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let output = handle(&args, &Config::default()).unwrap();
        assert_eq!(output, temp_dir.path().join("merged_warframe.json"));

        let doc = read_document(&output).unwrap();
        assert_eq!(doc.count, 1);
        assert_eq!(doc.entities[0].base_stats_rank30.energy, Some(200.0));
    }

    #[test]
    fn test_failed_merge_leaves_no_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(PRIMARY_FILE), "{ broken").unwrap();
        fs::write(temp_dir.path().join(DETAILS_FILE), "[]").unwrap();

        let args = MergeArgs {
            data_dir: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(handle(&args, &Config::default()).is_err());
        assert!(!temp_dir.path().join("merged_warframe.json").exists());
    }
}

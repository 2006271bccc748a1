//! End-to-end runs over a data directory on disk

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use wfmerge::sources::{
    DETAILS_FILE, FRAME_INDEX_FILE, LINEAGE_FILE, OVERRIDES_FILE, POLARITIES_FILE, PRIMARY_FILE,
    SUPPLEMENT_FILE,
};
use wfmerge::{
    entities_digest, read_document, run, write_document, EntityType, MergeConfig, MergeError,
    Modifier, SourcePaths,
};

fn put(dir: &Path, file: &str, value: Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn seed(dir: &Path) {
    put(
        dir,
        PRIMARY_FILE,
        json!({"ExportWarframes": [
            {
                "uniqueName": "/Lotus/Powersuits/Brawler/Brawler",
                "name": "Atlas",
                "productCategory": "Suits",
                "health": 300, "shield": 150, "power": 100, "armor": 450,
                "sprintSpeed": 0.9, "masteryReq": 0,
                "description": "Atlas <b>commands</b> the earth.",
                "abilities": [
                    {"abilityName": "Rumbled", "abilityUniqueName": "/Lotus/Powersuits/Brawler/Rumbled", "slot": 4},
                    {"abilityName": "Landslide", "abilityUniqueName": "/Lotus/Powersuits/Brawler/Landslide", "slot": 1},
                    {"abilityName": "Petrify", "slot": 3},
                    {"abilityName": "Tectonics", "slot": 2}
                ]
            },
            {
                "uniqueName": "/Lotus/Powersuits/Archwing/StealthJetPack/StealthJetPack",
                "name": "<ARCHWING> Amesha",
                "productCategory": "SpaceSuits",
                "health": 400, "shield": 250, "power": 150, "armor": 100
            },
            {
                "uniqueName": "/Lotus/Powersuits/EntratiMech/ThanoTech",
                "name": "Bonewidow",
                "productCategory": "MechSuits",
                "health": 1400, "shield": 300, "power": 100, "armor": 350
            }
        ]}),
    );
    put(
        dir,
        DETAILS_FILE,
        json!({"abilities": [
            {
                "name": "Landslide",
                "description": "Dash and punch.",
                "summary": {"CostType": "Energy", "costEnergy": 25, "affectedBy": ["Ability Strength"]},
                "rows": [{"label": "Damage", "modifier": "AVATAR_ABILITY_STRENGTH", "mainNumeric": 350}]
            },
            {
                "path": "/Lotus/Powersuits/Brawler/Rumbled",
                "description": "Encase in stone.",
                "summary": {"costEnergy": 100}
            }
        ]}),
    );
    put(
        dir,
        FRAME_INDEX_FILE,
        json!({"Atlas": {"abilities": [
            {"SlotKey": 1, "Name": "Landslide", "Subsumable": true, "Augments": ["Path of Statues"]}
        ]}}),
    );
    put(dir, POLARITIES_FILE, json!({"Bonewidow": ["madurai", "vazarin"]}));
    put(dir, LINEAGE_FILE, json!({"Atlas": "Toxin"}));
    put(
        dir,
        SUPPLEMENT_FILE,
        json!([{"name": "Atlas", "passive": "Rubble heals armor.", "polarities": ["madurai"]}]),
    );
}

fn at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 3, 2, 1).unwrap()
}

#[test]
fn test_atlas_resolves_from_every_source() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());

    let doc = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at()).unwrap();
    assert_eq!(doc.count, 3);
    assert_eq!(doc.generated_at, "2026-05-04T03:02:01.000Z");

    let atlas = doc.find("atlas").unwrap();
    assert_eq!(atlas.base_stats_rank30.energy, Some(150.0));
    assert_eq!(atlas.base_stats_rank30.sprint_speed, Some(0.9));
    assert_eq!(atlas.progenitor.as_deref(), Some("Toxin"));
    assert_eq!(atlas.description.as_deref(), Some("Atlas commands the earth."));
    assert_eq!(atlas.passive.as_deref(), Some("Rubble heals armor."));
    assert_eq!(atlas.polarities, vec!["madurai".to_string()]);

    let slots: Vec<u32> = atlas.abilities.iter().map(|a| a.slot).collect();
    assert_eq!(slots, vec![1, 2, 3, 4]);

    let landslide = &atlas.abilities[0];
    assert_eq!(landslide.description.as_deref(), Some("Dash and punch."));
    assert_eq!(landslide.summary.strength, Some(350.0));
    assert_eq!(landslide.summary.affected_by, vec![Modifier::Strength]);
    assert_eq!(landslide.subsumable, Some(true));
    assert_eq!(landslide.augments, vec!["Path of Statues".to_string()]);

    // Joined by internal path when the name misses
    let rumbled = &atlas.abilities[3];
    assert_eq!(rumbled.description.as_deref(), Some("Encase in stone."));

    let tectonics = &atlas.abilities[1];
    assert_eq!(tectonics.description, None);
    assert!(tectonics.summary.is_empty());
}

#[test]
fn test_types_and_polarity_fallback() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());

    let doc = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at()).unwrap();

    let amesha = doc.find("Amesha").unwrap();
    assert_eq!(amesha.kind, EntityType::Archwing);
    assert_eq!(amesha.slug, "amesha");

    let bonewidow = doc.find("bonewidow").unwrap();
    assert_eq!(bonewidow.kind, EntityType::Necramech);
    assert_eq!(bonewidow.polarities, vec!["madurai".to_string(), "vazarin".to_string()]);
    assert!(bonewidow.abilities.is_empty());
}

#[test]
fn test_rank30_never_below_base() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());

    let doc = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at()).unwrap();
    for entity in &doc.entities {
        for (base, r30) in [
            (entity.base_stats.health, entity.base_stats_rank30.health),
            (entity.base_stats.shields, entity.base_stats_rank30.shields),
        ] {
            if let (Some(base), Some(r30)) = (base, r30) {
                assert!(r30 >= base, "{}: {} < {}", entity.name, r30, base);
            }
        }
    }
}

#[test]
fn test_runs_are_idempotent() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());
    let paths = SourcePaths::in_dir(temp_dir.path());

    let first = run(&paths, &MergeConfig::default(), at()).unwrap();
    let second = run(&paths, &MergeConfig::default(), Utc::now()).unwrap();
    assert_eq!(
        entities_digest(&first.entities).unwrap(),
        entities_digest(&second.entities).unwrap()
    );
}

#[test]
fn test_override_sets_energy_only() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());
    put(temp_dir.path(), OVERRIDES_FILE, json!({"Atlas": {"base": {"Energy": 150}}}));

    let doc = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at()).unwrap();
    let atlas = doc.find("Atlas").unwrap();
    assert_eq!(atlas.base_stats.energy, Some(150.0));
    assert_eq!(atlas.base_stats.health, Some(300.0));
    assert_eq!(atlas.base_stats_rank30.energy, Some(200.0));
}

#[test]
fn test_rank30_never_below_overridden_base() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());
    put(
        temp_dir.path(),
        OVERRIDES_FILE,
        json!({
            "Atlas": {"base": {"Health": 1000, "Energy": 150, "Armor": 900}},
            "Bonewidow": {"base": {"Shield": 2000, "HealthR30": 100}}
        }),
    );

    let doc = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at()).unwrap();
    for entity in &doc.entities {
        let pairs = [
            (entity.base_stats.health, entity.base_stats_rank30.health),
            (entity.base_stats.shields, entity.base_stats_rank30.shields),
            (entity.base_stats.energy, entity.base_stats_rank30.energy),
            (entity.base_stats.armor, entity.base_stats_rank30.armor),
        ];
        for (base, r30) in pairs {
            if let (Some(base), Some(r30)) = (base, r30) {
                assert!(r30 >= base, "{}: {} < {}", entity.name, r30, base);
            }
        }
    }

    let atlas = doc.find("Atlas").unwrap();
    assert_eq!(atlas.base_stats_rank30.health, Some(1100.0));
    assert_eq!(atlas.base_stats_rank30.armor, Some(900.0));
    let bonewidow = doc.find("Bonewidow").unwrap();
    assert_eq!(bonewidow.base_stats_rank30.shields, Some(2100.0));
    assert_eq!(bonewidow.base_stats_rank30.health, Some(1500.0));
}

#[test]
fn test_frame_list_found_beside_other_exports() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());
    put(
        temp_dir.path(),
        PRIMARY_FILE,
        json!({
            "ExportAbilities": [{"abilityName": "Landslide", "abilityUniqueName": "/Lotus/Powersuits/Brawler/Landslide"}],
            "ExportWarframes": [{"name": "Atlas", "productCategory": "Suits", "health": 300}]
        }),
    );

    let doc = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at()).unwrap();
    assert_eq!(doc.count, 1);
    assert_eq!(doc.entities[0].name, "Atlas");
}

#[test]
fn test_one_bad_detail_record_keeps_the_rest() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());
    put(
        temp_dir.path(),
        DETAILS_FILE,
        json!([
            {"name": "Landslide", "description": "Dash and punch."},
            {"name": "Petrify", "summary": "n/a"},
            {"name": "Tectonics", "Name": "Tectonics", "description": "Wall."}
        ]),
    );

    let doc = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at()).unwrap();
    let atlas = doc.find("Atlas").unwrap();
    assert_eq!(atlas.abilities[0].description.as_deref(), Some("Dash and punch."));
    assert_eq!(atlas.abilities[1].description, None);
    assert!(atlas.abilities[2].summary.is_empty());
}

#[test]
fn test_without_details_every_ability_degrades() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());
    fs::remove_file(temp_dir.path().join(DETAILS_FILE)).unwrap();

    let doc = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at()).unwrap();
    let atlas = doc.find("Atlas").unwrap();
    assert_eq!(atlas.abilities.len(), 4);
    for ability in &atlas.abilities {
        assert_eq!(ability.description, None);
        assert!(ability.summary.is_empty());
    }
}

#[test]
fn test_malformed_optional_source_is_ignored() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());
    fs::write(temp_dir.path().join(LINEAGE_FILE), "{ not json").unwrap();

    let doc = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at()).unwrap();
    assert_eq!(doc.find("Atlas").unwrap().progenitor, None);
}

#[test]
fn test_bad_primary_shape_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    seed(temp_dir.path());
    put(temp_dir.path(), PRIMARY_FILE, json!("not a record list"));
    let output = temp_dir.path().join("merged_warframe.json");

    let result = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at())
        .and_then(|doc| write_document(&output, &doc));
    assert!(matches!(result, Err(MergeError::PrimaryShape { .. })));
    assert!(!output.exists());
}

#[test]
fn test_written_document_reads_back() -> anyhow::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    seed(temp_dir.path());
    let output = temp_dir.path().join("out").join("merged_warframe.json");

    let doc = run(&SourcePaths::in_dir(temp_dir.path()), &MergeConfig::default(), at())?;
    write_document(&output, &doc)?;
    assert_eq!(read_document(&output)?, doc);
    Ok(())
}

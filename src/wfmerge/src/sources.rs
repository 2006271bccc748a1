//! Source loading and input schemas
//!
//! Every input document is parsed into an explicit type at this boundary.
//! Optional sources that are missing or malformed degrade to their empty
//! value, and single entries that do not fit their schema are skipped; only
//! the primary export can fail a run.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::entity::{Cost, Stat};
use crate::error::{MergeError, Result};
use crate::text::normalize_name;

// ============================================================================
// Source locations
// ============================================================================

/// Default file names inside a data directory.
pub const PRIMARY_FILE: &str = "ExportWarframes_en.json";
pub const SUPPLEMENT_FILE: &str = "Warframes_wikia.json";
pub const DETAILS_FILE: &str = "abilities.json";
pub const FRAME_INDEX_FILE: &str = "warframe_abilities.json";
pub const NAME_LISTS_FILE: &str = "abilities_by_warframe.json";
pub const POLARITIES_FILE: &str = "polarity_overrides.json";
pub const OVERRIDES_FILE: &str = "aw_overrides.json";
pub const LINEAGE_FILE: &str = "progenitors.json";

/// Locations of every input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub primary: PathBuf,
    pub supplement: PathBuf,
    pub details: PathBuf,
    pub frame_index: PathBuf,
    pub name_lists: PathBuf,
    pub polarities: PathBuf,
    pub overrides: PathBuf,
    pub lineage: PathBuf,
}

impl SourcePaths {
    /// Default file names resolved against `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            primary: dir.join(PRIMARY_FILE),
            supplement: dir.join(SUPPLEMENT_FILE),
            details: dir.join(DETAILS_FILE),
            frame_index: dir.join(FRAME_INDEX_FILE),
            name_lists: dir.join(NAME_LISTS_FILE),
            polarities: dir.join(POLARITIES_FILE),
            overrides: dir.join(OVERRIDES_FILE),
            lineage: dir.join(LINEAGE_FILE),
        }
    }
}

// ============================================================================
// Lenient scalar parsing
// ============================================================================

/// Scalar coercions shared by the input schemas.
///
/// Scraped sources mix numbers, numeric strings and junk in the same field;
/// anything that is not usable becomes `None` instead of failing the document.
pub(crate) mod lenient {
    use super::*;

    /// Finite number from a JSON number or numeric string.
    pub fn number(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }

    pub fn text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(number))
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u32>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?
            .as_ref()
            .and_then(number)
            .filter(|n| *n >= 1.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32))
    }

    pub fn opt_bool<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<bool>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.and_then(|v| v.as_bool()))
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<String>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(text))
    }

    /// List of strings; non-string members are dropped, non-lists become empty.
    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => items.iter().filter_map(text).collect(),
            _ => Vec::new(),
        })
    }

    pub fn opt_string_list<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<Vec<String>>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => Some(items.iter().filter_map(text).collect()),
            _ => None,
        })
    }

    /// Augment names as a list or a comma-separated string.
    pub fn augments<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::Array(items)) => items.iter().filter_map(text).collect(),
            _ => Vec::new(),
        })
    }

    /// Nested record; a value that does not fit the schema becomes `None`.
    pub fn opt_record<'de, D, T>(d: D) -> std::result::Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Value>::deserialize(d)?.and_then(|value| {
            serde_json::from_value(value)
                .map_err(|e| tracing::debug!("Dropping malformed nested record: {}", e))
                .ok()
        }))
    }

    /// List of records, parsed member by member.
    pub fn list<'de, D, T>(d: D) -> std::result::Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => members(items),
            _ => Vec::new(),
        })
    }

    pub fn opt_list<'de, D, T>(d: D) -> std::result::Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => Some(members(items)),
            _ => None,
        })
    }

    /// Parse each member on its own. Members that fail are skipped with a
    /// warning naming them, so one bad entry never costs its neighbours.
    pub fn members<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let label = member_label(i, &item);
                serde_json::from_value(item)
                    .map_err(|e| tracing::warn!("Skipping malformed entry {}: {}", label, e))
                    .ok()
            })
            .collect()
    }

    fn member_label(index: usize, item: &Value) -> String {
        let name = item
            .as_object()
            .and_then(|obj| first_present(obj, &["name", "Name"]))
            .and_then(Value::as_str);
        match name {
            Some(name) => format!("'{}'", name),
            None => format!("#{}", index),
        }
    }
}

// ============================================================================
// Name-keyed tables
// ============================================================================

/// Table keyed by entity display name with case-insensitive lookup.
///
/// An exact key match wins over a case-folded one.
#[derive(Debug, Clone)]
pub struct NameMap<T> {
    entries: BTreeMap<String, T>,
    folded: HashMap<String, String>,
}

impl<T> Default for NameMap<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            folded: HashMap::new(),
        }
    }
}

impl<T> From<BTreeMap<String, T>> for NameMap<T> {
    fn from(entries: BTreeMap<String, T>) -> Self {
        let mut folded = HashMap::new();
        for key in entries.keys() {
            folded
                .entry(normalize_name(key))
                .or_insert_with(|| key.clone());
        }
        Self { entries, folded }
    }
}

impl<T> FromIterator<(String, T)> for NameMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<_, _>>())
    }
}

/// Entries are parsed one at a time; an entry that does not fit `T` is
/// skipped with a warning and the rest of the table survives.
impl<'de, T: DeserializeOwned> Deserialize<'de> for NameMap<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(d)?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value(value) {
                Ok(entry) => Some((key, entry)),
                Err(e) => {
                    tracing::warn!("Skipping malformed entry '{}': {}", key, e);
                    None
                }
            })
            .collect())
    }
}

impl<T> NameMap<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        if let Some(v) = self.entries.get(name) {
            return Some(v);
        }
        self.folded
            .get(&normalize_name(name))
            .and_then(|key| self.entries.get(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Primary export
// ============================================================================

/// One record of the primary export.
///
/// Field names drifted across export versions, so the record stays a JSON
/// object and is read through alias lists (see [`crate::stats::AliasTable`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntity(Map<String, Value>);

impl RawEntity {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// First alias holding a non-null value.
    pub fn first(&self, aliases: &[&str]) -> Option<&Value> {
        first_present(&self.0, aliases)
    }

    /// First alias holding a usable number (or numeric string).
    pub fn first_number(&self, aliases: &[&str]) -> Option<f64> {
        aliases
            .iter()
            .filter_map(|alias| self.0.get(*alias))
            .find_map(lenient::number)
    }

    /// First alias holding a non-blank string.
    pub fn first_text(&self, aliases: &[&str]) -> Option<&str> {
        aliases
            .iter()
            .filter_map(|alias| self.0.get(*alias))
            .find_map(|v| v.as_str().filter(|s| !s.trim().is_empty()))
    }

    pub fn name(&self) -> Option<&str> {
        self.first_text(&["name", "Name"])
    }

    pub fn unique_name(&self) -> Option<&str> {
        self.first_text(&["uniqueName", "UniqueName"])
    }

    pub fn product_category(&self) -> Option<&str> {
        self.first_text(&["productCategory", "ProductCategory"])
    }

    pub fn type_hint(&self) -> Option<&str> {
        self.first_text(&["type", "Type"])
    }

    pub fn description(&self) -> Option<&str> {
        self.first_text(&["description", "Description"])
    }

    pub fn passive(&self) -> Option<&str> {
        self.first_text(&["passiveDescription", "passive", "Passive"])
    }

    pub fn aura(&self) -> Option<&str> {
        self.first_text(&["aura", "Aura"])
    }

    /// Polarity symbols, or `None` when the record has no polarity list.
    pub fn polarities(&self) -> Option<Vec<String>> {
        match self.first(&["polarities", "Polarities"])? {
            Value::Array(items) => Some(items.iter().filter_map(lenient::text).collect()),
            _ => None,
        }
    }

    /// Ability slots declared by the export, in export order.
    pub fn abilities(&self) -> Vec<ExportAbility> {
        let Some(Value::Array(items)) = self.first(&["abilities", "Abilities"]) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| ExportAbility {
                name: first_present(obj, &["name", "Name", "abilityName"])
                    .and_then(lenient::text)
                    .map(|s| s.trim().to_string()),
                slot: first_present(obj, &["SlotKey", "slot", "Slot"])
                    .and_then(lenient::number)
                    .filter(|n| *n >= 1.0 && n.fract() == 0.0)
                    .map(|n| n as u32),
                path: first_present(obj, &["path", "Path", "abilityUniqueName"])
                    .and_then(lenient::text),
            })
            .collect()
    }
}

fn first_present<'a>(fields: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| fields.get(*alias))
        .find(|v| !v.is_null())
}

/// Ability slot as declared by the primary export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportAbility {
    pub name: Option<String>,
    pub slot: Option<u32>,
    pub path: Option<String>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Keys the public export wraps its frame list under.
pub const PRIMARY_KEYS: &[&str] = &["ExportWarframes"];

/// Pick the record array out of a wrapped export.
///
/// Tried in order: a known key, an `Export*` key the file name starts with
/// (`ExportWarframes_en.json`), then the only array member. Several
/// candidates with none of those names is a shape error.
fn wrapped_records(path: &Path, mut map: Map<String, Value>) -> Result<Vec<Value>> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let is_array = |map: &Map<String, Value>, key: &str| map.get(key).is_some_and(Value::is_array);

    let key = PRIMARY_KEYS
        .iter()
        .map(|k| k.to_string())
        .find(|k| is_array(&map, k))
        .or_else(|| {
            map.keys()
                .filter(|k| k.starts_with("Export") && stem.starts_with(k.as_str()))
                .filter(|k| is_array(&map, k))
                .max_by_key(|k| k.len())
                .cloned()
        })
        .or_else(|| {
            let mut arrays = map.iter().filter(|(_, v)| v.is_array()).map(|(k, _)| k);
            match (arrays.next(), arrays.next()) {
                (Some(only), None) => Some(only.clone()),
                _ => None,
            }
        });

    match key.and_then(|k| map.remove(&k)) {
        Some(Value::Array(items)) => Ok(items),
        _ => {
            let arrays = map.values().filter(|v| v.is_array()).count();
            Err(MergeError::PrimaryShape {
                path: path.to_path_buf(),
                found: if arrays > 1 {
                    "an object with several record arrays and no known key"
                } else {
                    "an object without an array member"
                },
            })
        }
    }
}

/// Split a parsed primary export into records.
///
/// Accepts a bare array or an object wrapping the array (see
/// [`PRIMARY_KEYS`]). Non-object members are skipped.
pub fn primary_records(path: &Path, doc: Value) -> Result<Vec<RawEntity>> {
    let items = match doc {
        Value::Array(items) => items,
        Value::Object(map) => wrapped_records(path, map)?,
        other => {
            return Err(MergeError::PrimaryShape {
                path: path.to_path_buf(),
                found: json_kind(&other),
            })
        }
    };

    let total = items.len();
    let records: Vec<RawEntity> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(RawEntity::new(fields)),
            _ => None,
        })
        .collect();

    if records.len() < total {
        tracing::warn!(
            "{}: skipped {} non-object records",
            path.display(),
            total - records.len()
        );
    }
    Ok(records)
}

/// Load the primary export.
///
/// A missing file yields no records. Unreadable, unparseable or wrongly
/// shaped content is fatal.
pub fn load_primary(path: &Path) -> Result<Vec<RawEntity>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Primary export {} not found; no entities will be produced", path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(MergeError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let doc: Value = serde_json::from_str(&contents).map_err(|source| MergeError::PrimaryParse {
        path: path.to_path_buf(),
        source,
    })?;

    let records = primary_records(path, doc)?;
    tracing::info!("Loaded {} primary records from {}", records.len(), path.display());
    Ok(records)
}

/// Load an optional source, degrading to `T::default()` on any failure.
pub fn load_optional<T>(label: &str, path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("{} source {} not present; using empty input", label, path.display());
            return T::default();
        }
        Err(e) => {
            tracing::warn!("{} source {} unreadable ({}); using empty input", label, path.display(), e);
            return T::default();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => {
            tracing::debug!("Loaded {} source from {}", label, path.display());
            value
        }
        Err(e) => {
            tracing::warn!("{} source {} is malformed ({}); using empty input", label, path.display(), e);
            T::default()
        }
    }
}

// ============================================================================
// Ability-detail dataset
// ============================================================================

/// Detailed ability records, either flat or wrapped in `{abilities: [...]}`.
///
/// Records are parsed one by one; a record that cannot be read is skipped.
#[derive(Debug, Clone, Default)]
pub struct DetailDataset(Vec<DetailRecord>);

impl<'de> Deserialize<'de> for DetailDataset {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let items = match Value::deserialize(d)? {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("abilities").or_else(|| map.remove("Abilities")) {
                Some(Value::Array(items)) => items,
                _ => return Err(de::Error::custom("expected an `abilities` list")),
            },
            other => {
                return Err(de::Error::custom(format_args!(
                    "expected ability records, found {}",
                    json_kind(&other)
                )))
            }
        };
        Ok(Self(lenient::members(items)))
    }
}

impl FromIterator<DetailRecord> for DetailDataset {
    fn from_iter<I: IntoIterator<Item = DetailRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl DetailDataset {
    pub fn records(&self) -> &[DetailRecord] {
        &self.0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailRecord {
    #[serde(default, alias = "Name", deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, alias = "Path", deserialize_with = "lenient::opt_string")]
    pub path: Option<String>,
    #[serde(default, alias = "Description", deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_record")]
    pub summary: Option<DetailSummary>,
    #[serde(default, deserialize_with = "lenient::opt_list")]
    pub rows: Option<Vec<DetailRow>>,
}

impl DetailRecord {
    pub fn rows(&self) -> &[DetailRow] {
        self.rows.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailSummary {
    #[serde(default, rename = "CostType", alias = "costType", deserialize_with = "lenient::opt_string")]
    pub cost_type: Option<String>,
    #[serde(default, rename = "costEnergy", alias = "CostEnergy", deserialize_with = "lenient::opt_record")]
    pub cost_energy: Option<Cost>,
    #[serde(default, rename = "affectedBy", alias = "AffectedBy", deserialize_with = "lenient::string_list")]
    pub affected_by: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRow {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub filled_label: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub modifier: Option<String>,
    #[serde(default)]
    pub values: Option<Value>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub main_numeric: Option<f64>,
}

// ============================================================================
// Per-frame ability index
// ============================================================================

/// Per-slot metadata for one ability of one frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrameAbility {
    #[serde(default, alias = "SlotKey", alias = "Slot", deserialize_with = "lenient::opt_u32")]
    pub slot: Option<u32>,
    #[serde(default, alias = "Name", deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, alias = "Subsumable", alias = "helminth", deserialize_with = "lenient::opt_bool")]
    pub subsumable: Option<bool>,
    #[serde(default, alias = "Augments", deserialize_with = "lenient::augments")]
    pub augments: Vec<String>,
    #[serde(default, alias = "Path", alias = "InternalName", deserialize_with = "lenient::opt_string")]
    pub path: Option<String>,
}

/// Frame name → per-slot ability metadata.
#[derive(Debug, Clone, Default)]
pub struct FrameAbilityIndex(NameMap<Vec<FrameAbility>>);

/// Ability list of one frame entry: a bare list, or an object carrying it
/// under `abilities`/`ability`.
fn frame_abilities(frame: &str, entry: Value) -> Option<Vec<FrameAbility>> {
    let list = match entry {
        Value::Array(items) => Some(items),
        Value::Object(mut obj) => ["abilities", "Abilities", "ability"]
            .iter()
            .find_map(|key| match obj.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }),
        _ => None,
    };
    if list.is_none() {
        tracing::warn!("Skipping frame '{}': no ability list", frame);
    }
    list.map(lenient::members)
}

/// Accepts `{frame: [..]}`, `{frame: {abilities: [..]}}` or
/// `[{name, abilities}]`. Frames and abilities that cannot be read are
/// skipped individually.
impl<'de> Deserialize<'de> for FrameAbilityIndex {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let entries: Vec<(String, Value)> = match Value::deserialize(d)? {
            Value::Object(map) => map.into_iter().collect(),
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| {
                    let Value::Object(mut obj) = item else {
                        return None;
                    };
                    let name = lenient::text(&obj.remove("name").or_else(|| obj.remove("Name"))?)?;
                    Some((name, Value::Object(obj)))
                })
                .collect(),
            other => {
                return Err(de::Error::custom(format_args!(
                    "expected a frame ability index, found {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(entries
            .into_iter()
            .filter_map(|(frame, entry)| {
                let abilities = frame_abilities(&frame, entry)?;
                Some((frame, abilities))
            })
            .collect())
    }
}

impl FromIterator<(String, Vec<FrameAbility>)> for FrameAbilityIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<FrameAbility>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FrameAbilityIndex {
    pub fn for_frame(&self, name: &str) -> &[FrameAbility] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Name-keyed tables
// ============================================================================

/// Fallback ability display names per frame, in slot order.
pub type AbilityNameList = NameMap<Vec<String>>;

/// Polarity fallback entry: a bare list or a list with an aura.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PolarityEntry {
    List(Vec<String>),
    Detailed {
        #[serde(default, deserialize_with = "lenient::string_list")]
        polarities: Vec<String>,
        #[serde(default, deserialize_with = "lenient::opt_string")]
        aura: Option<String>,
    },
}

impl PolarityEntry {
    pub fn polarities(&self) -> &[String] {
        match self {
            Self::List(p) | Self::Detailed { polarities: p, .. } => p,
        }
    }

    pub fn aura(&self) -> Option<&str> {
        match self {
            Self::List(_) => None,
            Self::Detailed { aura, .. } => aura.as_deref(),
        }
    }
}

pub type PolarityTable = NameMap<PolarityEntry>;

/// Progenitor tag per entity name.
pub type LineageTable = NameMap<String>;

/// Manual corrections for one entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntityOverride {
    #[serde(default, deserialize_with = "lenient::opt_record")]
    pub base: Option<BaseOverride>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub abilities: Vec<AbilityOverride>,
}

impl EntityOverride {
    /// Ability override by case-insensitive name.
    pub fn ability(&self, name: &str) -> Option<&AbilityOverride> {
        let wanted = normalize_name(name);
        self.abilities
            .iter()
            .find(|a| a.name.as_deref().map(normalize_name).as_deref() == Some(wanted.as_str()))
    }
}

/// Base stat corrections. Every field is independent; absent fields leave
/// the resolved value untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseOverride {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub energy: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub health: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub shield: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub armor: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub sprint_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub mastery: Option<f64>,
    #[serde(default, rename = "EnergyR30", deserialize_with = "lenient::opt_f64")]
    pub energy_r30: Option<f64>,
    #[serde(default, rename = "HealthR30", deserialize_with = "lenient::opt_f64")]
    pub health_r30: Option<f64>,
    #[serde(default, rename = "ShieldR30", deserialize_with = "lenient::opt_f64")]
    pub shield_r30: Option<f64>,
    #[serde(default, rename = "ArmorR30", deserialize_with = "lenient::opt_f64")]
    pub armor_r30: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub polarities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub aura: Option<String>,
}

impl BaseOverride {
    /// Replacement base value for `stat`.
    pub fn base_value(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::Health => self.health,
            Stat::Shields => self.shield,
            Stat::Energy => self.energy,
            Stat::Armor => self.armor,
            Stat::SprintSpeed => self.sprint_speed,
            Stat::MasteryReq => self.mastery,
        }
    }

    /// Replacement rank-30 value for `stat`. Rank-independent stats have none.
    pub fn rank30_value(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::Health => self.health_r30,
            Stat::Shields => self.shield_r30,
            Stat::Energy => self.energy_r30,
            Stat::Armor => self.armor_r30,
            Stat::SprintSpeed | Stat::MasteryReq => None,
        }
    }
}

/// Replacement text and figures for one ability.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AbilityOverride {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_record")]
    pub cost: Option<Cost>,
    #[serde(default, deserialize_with = "lenient::opt_record")]
    pub stats: Option<AbilityOverrideStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AbilityOverrideStats {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub strength: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub range: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub efficiency: Option<f64>,
    #[serde(default)]
    pub misc: Option<Value>,
}

pub type OverrideTable = NameMap<EntityOverride>;

// ============================================================================
// Supplementary scraped metadata
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementStats {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub health: Option<f64>,
    #[serde(default, alias = "shields", deserialize_with = "lenient::opt_f64")]
    pub shield: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub energy: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub armor: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub sprint_speed: Option<f64>,
}

/// Scraped wiki record for one frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SupplementEntry {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub passive: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub aura: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub polarities: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::opt_record")]
    pub stats: Option<SupplementStats>,
}

/// Scraped metadata indexed by name. Entries without a name are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<Value>")]
pub struct SupplementTable(NameMap<SupplementEntry>);

impl From<Vec<Value>> for SupplementTable {
    fn from(items: Vec<Value>) -> Self {
        let mut map = BTreeMap::new();
        for entry in lenient::members::<SupplementEntry>(items) {
            if let Some(name) = entry.name.clone() {
                map.entry(name).or_insert(entry);
            }
        }
        Self(NameMap::from(map))
    }
}

impl SupplementTable {
    pub fn get(&self, name: &str) -> Option<&SupplementEntry> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// All sources
// ============================================================================

/// Every input document, parsed.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub primary: Vec<RawEntity>,
    pub supplement: SupplementTable,
    pub details: DetailDataset,
    pub frame_index: FrameAbilityIndex,
    pub name_lists: AbilityNameList,
    pub polarities: PolarityTable,
    pub overrides: OverrideTable,
    pub lineage: LineageTable,
}

impl Sources {
    /// Read all sources in parallel. Only the primary export can fail.
    pub fn load(paths: &SourcePaths) -> Result<Self> {
        let mut primary = Ok(Vec::new());
        let mut supplement = SupplementTable::default();
        let mut details = DetailDataset::default();
        let mut frame_index = FrameAbilityIndex::default();
        let mut name_lists = AbilityNameList::default();
        let mut polarities = PolarityTable::default();
        let mut overrides = OverrideTable::default();
        let mut lineage = LineageTable::default();

        rayon::scope(|s| {
            s.spawn(|_| primary = load_primary(&paths.primary));
            s.spawn(|_| supplement = load_optional("supplementary metadata", &paths.supplement));
            s.spawn(|_| details = load_optional("ability detail", &paths.details));
            s.spawn(|_| frame_index = load_optional("frame ability index", &paths.frame_index));
            s.spawn(|_| name_lists = load_optional("ability name list", &paths.name_lists));
            s.spawn(|_| polarities = load_optional("polarity fallback", &paths.polarities));
            s.spawn(|_| overrides = load_optional("manual override", &paths.overrides));
            s.spawn(|_| lineage = load_optional("lineage", &paths.lineage));
        });

        let sources = Self {
            primary: primary?,
            supplement,
            details,
            frame_index,
            name_lists,
            polarities,
            overrides,
            lineage,
        };

        tracing::debug!(
            "Sources: {} primary, {} supplementary, {} ability details, {} indexed frames, {} overrides",
            sources.primary.len(),
            sources.supplement.len(),
            sources.details.records().len(),
            sources.frame_index.len(),
            sources.overrides.len()
        );
        Ok(sources)
    }
}

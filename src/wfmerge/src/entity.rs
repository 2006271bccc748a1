//! Output data model for the merged dataset.
//!
//! Every optional field serializes as `null` rather than being omitted so all
//! records in the output document share one shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// Entity classification
// ============================================================================

/// Kind of playable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Warframe,
    Archwing,
    Necramech,
}

impl EntityType {
    /// Classify from the export's product category and type hints.
    ///
    /// Anything unrecognized is a warframe, the most general classification.
    pub fn classify(product_category: Option<&str>, type_hint: Option<&str>) -> Self {
        let category = product_category.unwrap_or_default().to_lowercase();
        let hint = type_hint.unwrap_or_default().to_lowercase();

        if category.contains("spacesuits") || hint.contains("archwing") {
            Self::Archwing
        } else if category.contains("mechsuits")
            || hint.contains("necramech")
            || hint.contains("vehicle")
        {
            Self::Necramech
        } else {
            Self::Warframe
        }
    }
}

impl Default for EntityType {
    fn default() -> Self {
        Self::Warframe
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warframe => write!(f, "warframe"),
            Self::Archwing => write!(f, "archwing"),
            Self::Necramech => write!(f, "necramech"),
        }
    }
}

// ============================================================================
// Stats
// ============================================================================

/// One logical numeric attribute of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Health,
    Shields,
    Energy,
    Armor,
    SprintSpeed,
    MasteryReq,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Health,
        Stat::Shields,
        Stat::Energy,
        Stat::Armor,
        Stat::SprintSpeed,
        Stat::MasteryReq,
    ];
}

/// Base or rank-30 attribute values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub health: Option<f64>,
    pub shields: Option<f64>,
    pub energy: Option<f64>,
    pub armor: Option<f64>,
    pub sprint_speed: Option<f64>,
    pub mastery_req: Option<f64>,
}

impl StatBlock {
    pub fn get(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::Health => self.health,
            Stat::Shields => self.shields,
            Stat::Energy => self.energy,
            Stat::Armor => self.armor,
            Stat::SprintSpeed => self.sprint_speed,
            Stat::MasteryReq => self.mastery_req,
        }
    }

    pub fn slot_mut(&mut self, stat: Stat) -> &mut Option<f64> {
        match stat {
            Stat::Health => &mut self.health,
            Stat::Shields => &mut self.shields,
            Stat::Energy => &mut self.energy,
            Stat::Armor => &mut self.armor,
            Stat::SprintSpeed => &mut self.sprint_speed,
            Stat::MasteryReq => &mut self.mastery_req,
        }
    }

    /// Overwrite `stat` when `value` is present; absent values leave it alone.
    pub fn set_if_some(&mut self, stat: Stat, value: Option<f64>) {
        if let Some(v) = value {
            *self.slot_mut(stat) = Some(v);
        }
    }

    /// Fill `stat` only when it is currently absent.
    pub fn fill(&mut self, stat: Stat, value: Option<f64>) {
        let slot = self.slot_mut(stat);
        if slot.is_none() {
            *slot = value;
        }
    }
}

// ============================================================================
// Abilities
// ============================================================================

/// Ability modifier that numerically influences an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Strength,
    Duration,
    Range,
    Efficiency,
}

impl Modifier {
    pub const ALL: [Modifier; 4] = [
        Modifier::Strength,
        Modifier::Duration,
        Modifier::Range,
        Modifier::Efficiency,
    ];

    /// Map a declared "affected by" label onto a modifier.
    ///
    /// Labels come from scraped pages in English or French
    /// (`"Ability Strength"`, `"Force de pouvoir"`, `"Portée"`).
    pub fn from_label(label: &str) -> Option<Self> {
        let l = label.to_lowercase();
        if l.contains("strength") || l.contains("force") {
            Some(Self::Strength)
        } else if l.contains("duration") || l.contains("durée") {
            Some(Self::Duration)
        } else if l.contains("range") || l.contains("portée") {
            Some(Self::Range)
        } else if l.contains("efficiency") || l.contains("efficacit") {
            Some(Self::Efficiency)
        } else {
            None
        }
    }

    /// Map a row-level modifier tag (`"AVATAR_ABILITY_STRENGTH"`) onto a modifier.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let t = tag.to_uppercase();
        if t.contains("STRENGTH") {
            Some(Self::Strength)
        } else if t.contains("DURATION") {
            Some(Self::Duration)
        } else if t.contains("RANGE") {
            Some(Self::Range)
        } else if t.contains("EFFICIENCY") {
            Some(Self::Efficiency)
        } else {
            None
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strength => write!(f, "strength"),
            Self::Duration => write!(f, "duration"),
            Self::Range => write!(f, "range"),
            Self::Efficiency => write!(f, "efficiency"),
        }
    }
}

/// Energy cost: usually numeric, sometimes a formula such as `"75 + 10/s"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cost {
    Number(f64),
    Text(String),
}

/// Cost and modifier summary for one ability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilitySummary {
    pub cost_type: Option<String>,
    pub cost_energy: Option<Cost>,
    pub strength: Option<f64>,
    pub duration: Option<f64>,
    pub range: Option<f64>,
    pub efficiency: Option<f64>,
    /// Modifiers influencing this ability, in order of first discovery.
    pub affected_by: Vec<Modifier>,
    pub misc: Option<Value>,
}

impl AbilitySummary {
    pub fn value(&self, modifier: Modifier) -> Option<f64> {
        match modifier {
            Modifier::Strength => self.strength,
            Modifier::Duration => self.duration,
            Modifier::Range => self.range,
            Modifier::Efficiency => self.efficiency,
        }
    }

    fn slot_mut(&mut self, modifier: Modifier) -> &mut Option<f64> {
        match modifier {
            Modifier::Strength => &mut self.strength,
            Modifier::Duration => &mut self.duration,
            Modifier::Range => &mut self.range,
            Modifier::Efficiency => &mut self.efficiency,
        }
    }

    /// Set the value for `modifier` unless one has already been recorded.
    pub fn fill(&mut self, modifier: Modifier, value: Option<f64>) {
        let slot = self.slot_mut(modifier);
        if slot.is_none() {
            *slot = value;
        }
    }

    /// Record `modifier` in `affected_by` unless already listed.
    pub fn mark_affected(&mut self, modifier: Modifier) {
        if !self.affected_by.contains(&modifier) {
            self.affected_by.push(modifier);
        }
    }

    /// True when no field carries information.
    pub fn is_empty(&self) -> bool {
        self.cost_type.is_none()
            && self.cost_energy.is_none()
            && Modifier::ALL.iter().all(|m| self.value(*m).is_none())
            && self.affected_by.is_empty()
            && self.misc.is_none()
    }
}

/// Cleaned row-level detail for an ability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityRow {
    pub label: Option<String>,
    pub filled_label: Option<String>,
    pub modifier: Option<String>,
    pub values: Option<Value>,
    pub main_numeric: Option<f64>,
}

/// One action slot of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub name: String,
    pub slot: u32,
    pub path: Option<String>,
    pub subsumable: Option<bool>,
    pub augments: Vec<String>,
    pub description: Option<String>,
    pub summary: AbilitySummary,
    pub rows: Vec<AbilityRow>,
}

// ============================================================================
// Entity
// ============================================================================

/// Provenance of an entity in the primary export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub unique_name: Option<String>,
    pub product_category: Option<String>,
    #[serde(rename = "type")]
    pub type_hint: Option<String>,
}

/// One playable unit in the merged dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub progenitor: Option<String>,
    pub description: Option<String>,
    pub passive: Option<String>,
    pub base_stats: StatBlock,
    pub base_stats_rank30: StatBlock,
    pub polarities: Vec<String>,
    pub aura: Option<String>,
    pub abilities: Vec<Ability>,
    pub source: SourceRef,
}

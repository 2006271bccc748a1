//! Stat extraction and rank-30 projection
//!
//! Export field names changed several times over the years. Each logical
//! attribute is read through a fixed alias list and the first present value
//! wins. Rank-30 values follow the generic per-rank increments unless the
//! entity appears in the exception table.

use crate::entity::{Stat, StatBlock};
use crate::sources::RawEntity;
use crate::text::normalize_name;

// ============================================================================
// Field aliases
// ============================================================================

/// Ordered field-name aliases for each logical attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasTable {
    pub health: &'static [&'static str],
    pub shields: &'static [&'static str],
    pub energy: &'static [&'static str],
    pub armor: &'static [&'static str],
    pub sprint_speed: &'static [&'static str],
    pub mastery_req: &'static [&'static str],
}

impl AliasTable {
    pub fn aliases(&self, stat: Stat) -> &'static [&'static str] {
        match stat {
            Stat::Health => self.health,
            Stat::Shields => self.shields,
            Stat::Energy => self.energy,
            Stat::Armor => self.armor,
            Stat::SprintSpeed => self.sprint_speed,
            Stat::MasteryReq => self.mastery_req,
        }
    }

    /// Coalesce every attribute of `record`, first alias wins.
    pub fn extract(&self, record: &RawEntity) -> StatBlock {
        let mut block = StatBlock::default();
        for stat in Stat::ALL {
            *block.slot_mut(stat) = record.first_number(self.aliases(stat));
        }
        block
    }
}

/// Base (rank 0) attribute aliases.
pub const BASE_ALIASES: AliasTable = AliasTable {
    health: &["health", "Health", "baseHealth"],
    shields: &["shield", "shields", "Shield", "baseShield"],
    energy: &["power", "energy", "Power", "baseEnergy"],
    armor: &["armor", "Armor", "Armour", "baseArmor"],
    sprint_speed: &["sprintSpeed", "SprintSpeed", "sprint"],
    mastery_req: &["masteryReq", "MasteryReq", "masteryRank"],
};

/// Explicit rank-30 aliases. Sprint speed and mastery do not change with rank.
pub const RANK30_ALIASES: AliasTable = AliasTable {
    health: &["HealthR30", "healthR30"],
    shields: &["ShieldR30", "shieldR30"],
    energy: &["EnergyR30", "energyR30", "PowerR30", "powerR30"],
    armor: &["ArmorR30", "armorR30", "armourR30"],
    sprint_speed: &[],
    mastery_req: &[],
};

/// Alias configuration for base and rank-30 extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatAliases {
    pub base: AliasTable,
    pub rank30: AliasTable,
}

impl Default for StatAliases {
    fn default() -> Self {
        Self {
            base: BASE_ALIASES,
            rank30: RANK30_ALIASES,
        }
    }
}

// ============================================================================
// Rank projection
// ============================================================================

pub const HEALTH_INCREMENT: f64 = 100.0;
pub const SHIELD_INCREMENT: f64 = 100.0;
/// Energy pools at or above this threshold gain the larger increment.
pub const ENERGY_HIGH_POOL: f64 = 200.0;
pub const ENERGY_INCREMENT_HIGH: f64 = 100.0;
pub const ENERGY_INCREMENT_LOW: f64 = 50.0;

/// Per-entity replacement for the generic rank-30 increments.
///
/// Only the fields that are set replace the generic rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RankException {
    pub name: String,
    pub health: Option<f64>,
    pub shields: Option<f64>,
    pub energy: Option<f64>,
}

impl RankException {
    pub fn new(name: &str, health: f64, shields: f64, energy: f64) -> Self {
        Self {
            name: name.to_string(),
            health: Some(health),
            shields: Some(shields),
            energy: Some(energy),
        }
    }
}

/// Units whose rank-30 growth differs from the generic rule.
pub fn default_exceptions() -> Vec<RankException> {
    vec![
        RankException::new("Inaros", 200.0, 0.0, 50.0),
        RankException::new("Inaros Prime", 200.0, 0.0, 50.0),
        RankException::new("Hildryn", 100.0, 500.0, 0.0),
        RankException::new("Hildryn Prime", 100.0, 500.0, 0.0),
        RankException::new("Lavos", 100.0, 100.0, 0.0),
    ]
}

/// Derives rank-30 attributes from base attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct RankProjector {
    exceptions: Vec<RankException>,
}

impl Default for RankProjector {
    fn default() -> Self {
        Self::new(default_exceptions())
    }
}

impl RankProjector {
    pub fn new(exceptions: Vec<RankException>) -> Self {
        Self { exceptions }
    }

    pub fn exceptions(&self) -> &[RankException] {
        &self.exceptions
    }

    fn exception(&self, name: &str) -> Option<&RankException> {
        let wanted = normalize_name(name);
        self.exceptions
            .iter()
            .find(|e| normalize_name(&e.name) == wanted)
    }

    /// Project `base` to rank 30 for the entity called `name`.
    ///
    /// Absent base values stay absent. Armor, sprint speed and mastery pass
    /// through unchanged.
    pub fn project(&self, name: &str, base: &StatBlock) -> StatBlock {
        let exception = self.exception(name);

        let health_inc = exception.and_then(|e| e.health).unwrap_or(HEALTH_INCREMENT);
        let shield_inc = exception.and_then(|e| e.shields).unwrap_or(SHIELD_INCREMENT);
        let energy_inc = |energy: f64| {
            exception.and_then(|e| e.energy).unwrap_or(if energy >= ENERGY_HIGH_POOL {
                ENERGY_INCREMENT_HIGH
            } else {
                ENERGY_INCREMENT_LOW
            })
        };

        StatBlock {
            health: base.health.map(|v| v + health_inc),
            shields: base.shields.map(|v| v + shield_inc),
            energy: base.energy.map(|v| v + energy_inc(v)),
            armor: base.armor,
            sprint_speed: base.sprint_speed,
            mastery_req: base.mastery_req,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(value: Value) -> RawEntity {
        let Value::Object(fields) = value else {
            panic!("test record must be an object");
        };
        RawEntity::new(fields)
    }

    fn base(health: f64, shields: f64, energy: f64) -> StatBlock {
        StatBlock {
            health: Some(health),
            shields: Some(shields),
            energy: Some(energy),
            armor: Some(65.0),
            sprint_speed: Some(1.0),
            mastery_req: Some(0.0),
        }
    }

    #[test]
    fn test_extract_first_alias_wins() {
        let r = record(json!({
            "health": null,
            "Health": 300,
            "baseHealth": 999,
            "shield": 150,
            "Power": 100,
            "Armour": "450",
            "sprint": 0.95
        }));
        let block = BASE_ALIASES.extract(&r);

        assert_eq!(block.health, Some(300.0));
        assert_eq!(block.shields, Some(150.0));
        assert_eq!(block.energy, Some(100.0));
        assert_eq!(block.armor, Some(450.0));
        assert_eq!(block.sprint_speed, Some(0.95));
        assert_eq!(block.mastery_req, None);
    }

    #[test]
    fn test_extract_rank30_aliases() {
        let r = record(json!({"HealthR30": 1200, "powerR30": 300, "sprintSpeed": 1.1}));
        let block = RANK30_ALIASES.extract(&r);
        assert_eq!(block.health, Some(1200.0));
        assert_eq!(block.energy, Some(300.0));
        assert_eq!(block.sprint_speed, None);
    }

    #[test]
    fn test_generic_projection() {
        let projector = RankProjector::default();
        let r30 = projector.project("Atlas", &base(300.0, 150.0, 100.0));

        assert_eq!(r30.health, Some(400.0));
        assert_eq!(r30.shields, Some(250.0));
        assert_eq!(r30.energy, Some(150.0));
        assert_eq!(r30.armor, Some(65.0));
        assert_eq!(r30.sprint_speed, Some(1.0));
    }

    #[test]
    fn test_high_energy_pool() {
        let projector = RankProjector::default();
        assert_eq!(projector.project("Trinity", &base(100.0, 100.0, 200.0)).energy, Some(300.0));
        assert_eq!(projector.project("Trinity", &base(100.0, 100.0, 199.0)).energy, Some(249.0));
    }

    #[test]
    fn test_exceptions() {
        let projector = RankProjector::default();

        let hildryn = projector.project("Hildryn", &base(300.0, 600.0, 0.0));
        assert_eq!(hildryn.health, Some(400.0));
        assert_eq!(hildryn.shields, Some(1100.0));
        assert_eq!(hildryn.energy, Some(0.0));

        let inaros = projector.project("inaros prime", &base(700.0, 0.0, 100.0));
        assert_eq!(inaros.health, Some(900.0));
        assert_eq!(inaros.shields, Some(0.0));
        assert_eq!(inaros.energy, Some(150.0));
    }

    #[test]
    fn test_partial_exception() {
        let projector = RankProjector::new(vec![RankException {
            name: "Custom".to_string(),
            health: None,
            shields: Some(0.0),
            energy: None,
        }]);
        let r30 = projector.project("Custom", &base(100.0, 100.0, 250.0));
        assert_eq!(r30.health, Some(200.0));
        assert_eq!(r30.shields, Some(100.0));
        assert_eq!(r30.energy, Some(350.0));
    }

    #[test]
    fn test_absent_base_stays_absent() {
        let projector = RankProjector::default();
        let r30 = projector.project("Lavos", &StatBlock::default());
        assert_eq!(r30, StatBlock::default());
    }

    #[test]
    fn test_projection_is_monotonic() {
        let projector = RankProjector::default();
        for name in ["Atlas", "Inaros", "Hildryn Prime", "Lavos"] {
            let b = base(250.0, 0.0, 150.0);
            let r30 = projector.project(name, &b);
            assert!(r30.health >= b.health, "{name}");
            assert!(r30.shields >= b.shields, "{name}");
        }
    }
}

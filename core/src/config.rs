use crate::types::RoleName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// The reference site's process paths, in display (and tie-break) order.
pub const DEFAULT_PROCESS_PATHS: &[&str] = &[
    "Pick Liquidation",
    "Pick Recycle",
    "Pick RMV-Hazmat",
    "Pick Multis",
    "Pick Singles",
    "Pick LTL",
    "Pick Donation",
    "Stow",
    "Rebin",
    "CRETS",
    "Slam",
    "WHO",
    "OB-PS",
    "IB-PS",
    "Ext-Repair",
    "WRAP",
    "TRANSHIP",
    "WATERSPIDER",
    "CREOLI",
    "LS - Pack",
    "ILS - WaterSpider",
    "ILS - Downstack",
    "ILS - PS",
    "Pit Driver",
    "Pack Singles",
    "Pack Multis",
    "Pack LTL",
];

pub const MIN_PRIORITY: i64 = 1;
pub const MAX_PRIORITY: i64 = 10;

// ── Role catalog ───────────────────────────────────────────────────

/// Ordered list of process paths. Order decides score ties, so it is
/// kept explicit instead of relying on map iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RoleName>", into = "Vec<RoleName>")]
pub struct RoleCatalog {
    roles: Vec<RoleName>,
}

impl RoleCatalog {
    /// Build a catalog. Repeated names keep their first position.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let roles = roles
            .into_iter()
            .map(Into::into)
            .filter(|r: &RoleName| seen.insert(r.clone()))
            .collect();
        Self { roles }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleName> {
        self.roles.iter()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_PROCESS_PATHS.iter().copied())
    }
}

impl From<Vec<RoleName>> for RoleCatalog {
    fn from(roles: Vec<RoleName>) -> Self {
        Self::new(roles)
    }
}

impl From<RoleCatalog> for Vec<RoleName> {
    fn from(catalog: RoleCatalog) -> Self {
        catalog.roles
    }
}

// ── Requirements ───────────────────────────────────────────────────

/// Staffing target for one role.
///
/// Fields are loose integers. `validate()` is applied where records enter
/// the system (config files, admin edits); the engine reads whatever is
/// stored and never asserts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub min: i64,
    pub max: i64,
    pub priority: i64,
}

impl Requirement {
    pub fn new(min: i64, max: i64, priority: i64) -> Self {
        Self { min, max, priority }
    }

    /// The record shown for a role that has none.
    pub fn unset() -> Self {
        Self { min: 0, max: 0, priority: 10 }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min < 0 {
            return Err(format!("min must be >= 0, got {}", self.min));
        }
        if self.max < self.min {
            return Err(format!("max ({}) must be >= min ({})", self.max, self.min));
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(format!(
                "priority must be in [{MIN_PRIORITY}, {MAX_PRIORITY}], got {}",
                self.priority
            ));
        }
        Ok(())
    }

    /// Copy of this record with one field replaced.
    pub fn with_field(mut self, field: RequirementField, value: i64) -> Self {
        match field {
            RequirementField::Min => self.min = value,
            RequirementField::Max => self.max = value,
            RequirementField::Priority => self.priority = value,
        }
        self
    }
}

impl Default for Requirement {
    /// The reference site's seed values for every process path.
    fn default() -> Self {
        Self { min: 1, max: 2, priority: 5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementField {
    Min,
    Max,
    Priority,
}

impl RequirementField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Priority => "priority",
        }
    }
}

/// Role → requirement. Roles absent from the table are never eligible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementTable {
    entries: HashMap<RoleName, Requirement>,
}

impl RequirementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every catalog role with the default requirement.
    pub fn seeded(catalog: &RoleCatalog) -> Self {
        let entries = catalog
            .iter()
            .map(|role| (role.clone(), Requirement::default()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, role: &str) -> Option<&Requirement> {
        self.entries.get(role)
    }

    pub fn set(&mut self, role: impl Into<String>, requirement: Requirement) {
        self.entries.insert(role.into(), requirement);
    }

    pub fn with(mut self, role: impl Into<String>, requirement: Requirement) -> Self {
        self.set(role, requirement);
        self
    }

    pub fn remove(&mut self, role: &str) -> Option<Requirement> {
        self.entries.remove(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RoleName, &Requirement)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(RoleName, Requirement)> for RequirementTable {
    fn from_iter<T: IntoIterator<Item = (RoleName, Requirement)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

// ── Scoring weights ────────────────────────────────────────────────

/// Constants of the rotation score. Defaults reproduce the reference site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub base: i64,
    pub trained_bonus: i64,
    /// Applied when the newest lookback entry is the candidate role.
    pub repeat_penalty: i64,
    /// Applied once per lookback entry equal to the candidate role.
    pub occurrence_penalty: i64,
    pub priority_pivot: i64,
    pub priority_step: i64,
    /// Priority used for a role with no requirement record.
    pub default_priority: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 100,
            trained_bonus: 50,
            repeat_penalty: 80,
            occurrence_penalty: 30,
            priority_pivot: 15,
            priority_step: 10,
            default_priority: 10,
        }
    }
}

// ── Desk configuration ─────────────────────────────────────────────

pub const DEFAULT_LOOKBACK_DAYS: u32 = 4;

/// Upper bound on the rotation lookback window.
pub const MAX_LOOKBACK_DAYS: u32 = 31;

#[derive(Debug, Clone, Deserialize)]
struct DeskConfigFile {
    #[serde(default)]
    catalog: Option<RoleCatalog>,
    #[serde(default)]
    requirements: Option<BTreeMap<RoleName, Requirement>>,
    #[serde(default = "default_rotation")]
    rotation_enabled: bool,
    #[serde(default = "default_lookback")]
    lookback_days: u32,
    #[serde(default)]
    scoring: ScoringWeights,
}

fn default_rotation() -> bool {
    true
}

fn default_lookback() -> u32 {
    DEFAULT_LOOKBACK_DAYS
}

#[derive(Debug, Clone)]
pub struct DeskConfig {
    pub catalog: RoleCatalog,
    pub requirements: RequirementTable,
    pub rotation_enabled: bool,
    pub lookback_days: u32,
    pub scoring: ScoringWeights,
}

impl DeskConfig {
    /// Load from a JSON file. Every key is optional; a missing
    /// `requirements` key seeds every catalog role with the defaults.
    /// In tests, use DeskConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content).map_err(|e| anyhow::anyhow!("{path}: {e}"))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let file: DeskConfigFile = serde_json::from_str(content)?;
        let catalog = file.catalog.unwrap_or_default();
        if catalog.is_empty() {
            anyhow::bail!("catalog must name at least one role");
        }

        if !(1..=MAX_LOOKBACK_DAYS).contains(&file.lookback_days) {
            anyhow::bail!(
                "lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}, got {}",
                file.lookback_days
            );
        }

        let requirements = match file.requirements {
            None => RequirementTable::seeded(&catalog),
            Some(entries) => {
                for (role, req) in &entries {
                    if !catalog.contains(role) {
                        anyhow::bail!("requirement for '{role}' which is not in the catalog");
                    }
                    req.validate()
                        .map_err(|reason| anyhow::anyhow!("requirement for '{role}': {reason}"))?;
                }
                entries.into_iter().collect()
            }
        };

        Ok(Self {
            catalog,
            requirements,
            rotation_enabled: file.rotation_enabled,
            lookback_days: file.lookback_days,
            scoring: file.scoring,
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let catalog = RoleCatalog::default();
        Self {
            requirements: RequirementTable::seeded(&catalog),
            catalog,
            rotation_enabled: true,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            scoring: ScoringWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_all_process_paths_in_order() {
        let catalog = RoleCatalog::default();
        assert_eq!(catalog.len(), 27);
        assert_eq!(catalog.iter().next().map(String::as_str), Some("Pick Liquidation"));
        assert_eq!(catalog.iter().last().map(String::as_str), Some("Pack LTL"));
    }

    #[test]
    fn catalog_drops_repeated_names() {
        let catalog = RoleCatalog::new(["Stow", "Rebin", "Stow"]);
        let roles: Vec<_> = catalog.iter().cloned().collect();
        assert_eq!(roles, vec!["Stow", "Rebin"]);
    }

    #[test]
    fn requirement_validation() {
        assert!(Requirement::new(1, 2, 5).validate().is_ok());
        assert!(Requirement::new(0, 0, 1).validate().is_ok());
        assert!(Requirement::new(3, 2, 5).validate().is_err());
        assert!(Requirement::new(-1, 2, 5).validate().is_err());
        assert!(Requirement::new(1, 2, 0).validate().is_err());
        assert!(Requirement::new(1, 2, 11).validate().is_err());
    }

    #[test]
    fn with_field_replaces_one_field() {
        let req = Requirement::default().with_field(RequirementField::Max, 7);
        assert_eq!(req, Requirement::new(1, 7, 5));
    }

    #[test]
    fn empty_file_uses_seeded_defaults() {
        let config = DeskConfig::from_json("{}").expect("parse");
        assert_eq!(config.catalog.len(), 27);
        assert_eq!(config.requirements.len(), 27);
        assert_eq!(config.requirements.get("Stow"), Some(&Requirement::new(1, 2, 5)));
        assert!(config.rotation_enabled);
        assert_eq!(config.lookback_days, 4);
        assert_eq!(config.scoring, ScoringWeights::default());
    }

    #[test]
    fn explicit_requirements_replace_defaults() {
        let json = r#"{
            "catalog": ["Stow", "Pack Singles", "Rebin"],
            "requirements": {
                "Stow": { "min": 1, "max": 2, "priority": 5 },
                "Pack Singles": { "min": 0, "max": 1, "priority": 5 }
            },
            "rotation_enabled": false,
            "scoring": { "repeat_penalty": 100 }
        }"#;
        let config = DeskConfig::from_json(json).expect("parse");
        assert_eq!(config.requirements.len(), 2);
        assert!(config.requirements.get("Rebin").is_none());
        assert!(!config.rotation_enabled);
        assert_eq!(config.scoring.repeat_penalty, 100);
        assert_eq!(config.scoring.occurrence_penalty, 30);
    }

    #[test]
    fn invalid_requirement_is_rejected_at_load() {
        let json = r#"{
            "catalog": ["Stow"],
            "requirements": { "Stow": { "min": 3, "max": 1, "priority": 5 } }
        }"#;
        let err = DeskConfig::from_json(json).unwrap_err();
        assert!(err.to_string().contains("Stow"), "unexpected error: {err}");
    }

    #[test]
    fn requirement_outside_catalog_is_rejected() {
        let json = r#"{
            "catalog": ["Stow"],
            "requirements": { "Rebin": { "min": 0, "max": 1, "priority": 5 } }
        }"#;
        assert!(DeskConfig::from_json(json).is_err());
    }

    #[test]
    fn lookback_window_is_bounded_at_load() {
        for bad in ["0", "32", "4294967295"] {
            let json = format!(r#"{{ "lookback_days": {bad} }}"#);
            let err = DeskConfig::from_json(&json).unwrap_err();
            assert!(err.to_string().contains("lookback_days"), "unexpected error: {err}");
        }
        for good in [1, MAX_LOOKBACK_DAYS] {
            let json = format!(r#"{{ "lookback_days": {good} }}"#);
            assert_eq!(DeskConfig::from_json(&json).expect("parse").lookback_days, good);
        }
    }
}

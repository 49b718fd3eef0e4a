//! Path configuration store.
//!
//! A "path" is a named weighting profile over tracked activities (financial,
//! physical, spiritual, ...). Each path maps activity names to scoring rules
//! and carries a maximum score. The registry is loaded once per process and
//! never mutated afterwards.
//!
//! Built-in paths live in code; deployments can override or extend them from
//! a TOML file (same priority idea as the user config).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default maximum daily score for a path.
pub const DEFAULT_MAX_SCORE: u32 = 100;

/// Scoring rule for a single activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityRule {
    /// Unit-counted activity: `min(value, max_units) * points_per_unit`.
    Metered { points_per_unit: f64, max_units: u32 },
    /// Flat boolean activity: `points` when done, 0 otherwise.
    Flat { points: f64 },
}

/// One path's complete scoring rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub path_id: String,
    /// Display name for the presentation layer.
    pub name: String,
    #[serde(default = "default_max_score")]
    pub max_score: u32,
    pub rules: BTreeMap<String, ActivityRule>,
}

fn default_max_score() -> u32 {
    DEFAULT_MAX_SCORE
}

/// Immutable `path_id -> PathConfig` lookup.
pub struct PathRegistry {
    paths: BTreeMap<String, PathConfig>,
}

/// On-disk shape for TOML-defined registries.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    paths: Vec<PathConfig>,
}

impl PathRegistry {
    /// Registry with the built-in paths only.
    pub fn builtin() -> Self {
        let mut paths = BTreeMap::new();
        for config in builtin_paths() {
            paths.insert(config.path_id.clone(), config);
        }
        Self { paths }
    }

    /// Load path definitions from a TOML file, layered over the built-ins.
    /// A file entry with a built-in id replaces that built-in.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: RegistryFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let mut registry = Self::builtin();
        for config in file.paths {
            registry.paths.insert(config.path_id.clone(), config);
        }
        Ok(registry)
    }

    pub fn get(&self, path_id: &str) -> Option<&PathConfig> {
        self.paths.get(path_id)
    }

    pub fn contains(&self, path_id: &str) -> bool {
        self.paths.contains_key(path_id)
    }

    pub fn path_ids(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(|k| k.as_str())
    }

    pub fn configs(&self) -> impl Iterator<Item = &PathConfig> {
        self.paths.values()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn metered(points_per_unit: f64, max_units: u32) -> ActivityRule {
    ActivityRule::Metered { points_per_unit, max_units }
}

fn flat(points: f64) -> ActivityRule {
    ActivityRule::Flat { points }
}

/// The built-in weighting profiles.
///
/// The `default` path is the balanced baseline: every tracked activity
/// contributes and the weights sum to the max score on a perfect day.
/// The themed paths shift weight toward their domain.
fn builtin_paths() -> Vec<PathConfig> {
    let mut out = Vec::new();

    let balanced: Vec<(&str, ActivityRule)> = vec![
        ("home_cooked_meals", metered(6.67, 3)),
        ("no_junk_food", flat(10.0)),
        ("exercise_minutes", metered(0.5, 40)),
        ("strength_training", flat(10.0)),
        ("no_spending", flat(5.0)),
        ("invested_bitcoin", flat(5.0)),
        ("meditation", flat(10.0)),
        ("gratitude", flat(5.0)),
        ("read_or_learned", flat(10.0)),
        ("environmental_action", flat(5.0)),
    ];
    out.push(make_path("default", "Balanced Sovereignty", &balanced));

    let financial: Vec<(&str, ActivityRule)> = vec![
        ("home_cooked_meals", metered(5.0, 3)),
        ("no_junk_food", flat(5.0)),
        ("exercise_minutes", metered(0.25, 40)),
        ("strength_training", flat(5.0)),
        ("no_spending", flat(20.0)),
        ("invested_bitcoin", flat(20.0)),
        ("meditation", flat(5.0)),
        ("gratitude", flat(5.0)),
        ("read_or_learned", flat(15.0)),
        ("environmental_action", flat(5.0)),
    ];
    out.push(make_path("financial_path", "Financial Path", &financial));

    let physical: Vec<(&str, ActivityRule)> = vec![
        ("home_cooked_meals", metered(8.0, 3)),
        ("no_junk_food", flat(15.0)),
        ("exercise_minutes", metered(0.625, 40)),
        ("strength_training", flat(15.0)),
        ("no_spending", flat(2.5)),
        ("invested_bitcoin", flat(2.5)),
        ("meditation", flat(5.0)),
        ("gratitude", flat(2.5)),
        ("read_or_learned", flat(5.0)),
        ("environmental_action", flat(3.5)),
    ];
    out.push(make_path("physical_path", "Physical Path", &physical));

    let mental: Vec<(&str, ActivityRule)> = vec![
        ("home_cooked_meals", metered(5.0, 3)),
        ("no_junk_food", flat(10.0)),
        ("exercise_minutes", metered(0.25, 40)),
        ("strength_training", flat(5.0)),
        ("no_spending", flat(2.5)),
        ("invested_bitcoin", flat(2.5)),
        ("meditation", flat(20.0)),
        ("gratitude", flat(10.0)),
        ("read_or_learned", flat(20.0)),
        ("environmental_action", flat(5.0)),
    ];
    out.push(make_path("mental_path", "Mental Resilience Path", &mental));

    let spiritual: Vec<(&str, ActivityRule)> = vec![
        ("home_cooked_meals", metered(5.0, 3)),
        ("no_junk_food", flat(5.0)),
        ("exercise_minutes", metered(0.25, 40)),
        ("strength_training", flat(5.0)),
        ("no_spending", flat(5.0)),
        ("invested_bitcoin", flat(2.5)),
        ("meditation", flat(25.0)),
        ("gratitude", flat(15.0)),
        ("read_or_learned", flat(7.5)),
        ("environmental_action", flat(10.0)),
    ];
    out.push(make_path("spiritual_path", "Spiritual Path", &spiritual));

    let planetary: Vec<(&str, ActivityRule)> = vec![
        ("home_cooked_meals", metered(6.67, 3)),
        ("no_junk_food", flat(10.0)),
        ("exercise_minutes", metered(0.25, 40)),
        ("strength_training", flat(5.0)),
        ("no_spending", flat(10.0)),
        ("invested_bitcoin", flat(2.5)),
        ("meditation", flat(5.0)),
        ("gratitude", flat(5.0)),
        ("read_or_learned", flat(7.5)),
        ("environmental_action", flat(25.0)),
    ];
    out.push(make_path("planetary_path", "Planetary Steward Path", &planetary));

    out
}

fn make_path(path_id: &str, name: &str, rules: &[(&str, ActivityRule)]) -> PathConfig {
    PathConfig {
        path_id: path_id.to_string(),
        name: name.to_string(),
        max_score: DEFAULT_MAX_SCORE,
        rules: rules
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    }
}

//! Session configuration loaded from TOML.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use ocean_descent_core::Category;
use ocean_descent_system_drift::DriftConfig;
use ocean_descent_system_hud::HudConfig;
use ocean_descent_system_ingestion::{
    LayerAssignment, LayerRange, RandomRangeAssignment, RecordFieldAssignment,
};
use ocean_descent_world::WorldConfig;
use serde::Deserialize;

/// Everything needed to start a dive. Every table is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct SessionConfig {
    pub(crate) world: WorldConfig,
    pub(crate) data: DataConfig,
    pub(crate) hud: HudConfig,
    pub(crate) drift: DriftConfig,
}

/// How dataset rows are loaded and spread across layers.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct DataConfig {
    pub(crate) dataset: Option<PathBuf>,
    pub(crate) seed: u64,
    pub(crate) policy: AssignmentPolicy,
    /// Inclusive `[first, last]` layer ranges keyed by table name.
    pub(crate) ranges: BTreeMap<String, [u32; 2]>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum AssignmentPolicy {
    /// Uniformly random layer within the category's range.
    #[default]
    Random,
    /// The record's own `layer` value, random when absent.
    Field,
}

impl SessionConfig {
    /// Reads a configuration file. A relative dataset path is resolved
    /// against the file's directory.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))?;
        if let (Some(dataset), Some(base)) = (&config.data.dataset, path.parent()) {
            if dataset.is_relative() {
                config.data.dataset = Some(base.join(dataset));
            }
        }
        Ok(config)
    }

    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse session config toml contents")
    }
}

impl DataConfig {
    /// Builds the layer assignment policy for a world with `layer_count` layers.
    pub(crate) fn assignment(&self, layer_count: u32) -> Result<Box<dyn LayerAssignment>> {
        let mut random = RandomRangeAssignment::new(self.seed, layer_count);
        for (table, [first, last]) in &self.ranges {
            let Some(category) = Category::from_table_name(table) else {
                bail!("unknown table `{table}` in layer ranges");
            };
            if *last > layer_count {
                bail!("layer range for `{table}` ends at {last} but the world has {layer_count} layers");
            }
            let range = LayerRange::new(*first, *last)
                .with_context(|| format!("invalid layer range for `{table}`"))?;
            random = random.with_range(category, range);
        }

        Ok(match self.policy {
            AssignmentPolicy::Random => Box::new(random),
            AssignmentPolicy::Field => Box::new(RecordFieldAssignment::new(random, layer_count)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocean_descent_core::{Layer, SourceRecord};

    #[test]
    fn empty_file_uses_defaults() {
        let config = SessionConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.world.layer_count, 6);
        assert_eq!(config.data.policy, AssignmentPolicy::Random);
        assert!(config.drift.enabled);
    }

    #[test]
    fn tables_override_individual_fields() {
        let config = SessionConfig::from_toml_str(
            r#"
            [world]
            layer_count = 4

            [data]
            dataset = "dive.json"
            seed = 7
            policy = "field"
            ranges = { hazards = [3, 4] }

            [hud]
            starting_fuel = 25.0

            [drift]
            enabled = false
            "#,
        )
        .expect("config parses");

        assert_eq!(config.world.layer_count, 4);
        assert_eq!(config.world.top_radius, 75);
        assert_eq!(config.data.dataset, Some(PathBuf::from("dive.json")));
        assert_eq!(config.data.policy, AssignmentPolicy::Field);
        assert_eq!(config.data.ranges.get("hazards"), Some(&[3, 4]));
        assert_eq!(config.hud.starting_fuel, 25.0);
        assert_eq!(config.hud.starting_hull, 100.0);
        assert!(!config.drift.enabled);
    }

    #[test]
    fn ranges_restrict_assignment() {
        let data = DataConfig {
            ranges: BTreeMap::from([("hazards".to_owned(), [6, 6])]),
            ..DataConfig::default()
        };
        let mut policy = data.assignment(6).expect("valid ranges");
        let record = SourceRecord::at(0, 0);
        for _ in 0..20 {
            assert_eq!(policy.assign(Category::Hazard, &record), Layer::new(6));
        }
    }

    #[test]
    fn bad_ranges_are_reported() {
        let unknown = DataConfig {
            ranges: BTreeMap::from([("kelp".to_owned(), [1, 2])]),
            ..DataConfig::default()
        };
        assert!(unknown.assignment(6).is_err());

        let reversed = DataConfig {
            ranges: BTreeMap::from([("life".to_owned(), [4, 2])]),
            ..DataConfig::default()
        };
        assert!(reversed.assignment(6).is_err());

        let too_deep = DataConfig {
            ranges: BTreeMap::from([("life".to_owned(), [1, 9])]),
            ..DataConfig::default()
        };
        assert!(too_deep.assignment(6).is_err());
    }
}

use crate::cli::FootprintArgs;
use crate::error::{CliError, Result};
use aipgen::core::surface::OwnershipMetric;
use aipgen::core::typing::AtomType;
use aipgen::engine::config::{FootprintConfig, FootprintConfigBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialTypingConfig {
    planarity_threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialEdgeConfig {
    percentile: Option<f64>,
    neighbor_radius: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialLonePairConfig {
    local_minimum_radius: Option<f64>,
    exclusion_radius: Option<f64>,
    outer_exclusion_radius: Option<f64>,
    sulfur_exclusion_radius: Option<f64>,
    ring_tolerance_factor: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialClusteringConfig {
    max_iterations: Option<usize>,
    separation_factor: Option<f64>,
    max_area_ratio: Option<f64>,
    random_seed: Option<u64>,
    dual_fraction: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialMinimumAreaConfig {
    default: Option<f64>,
    hydrogen: Option<f64>,
    /// Per atom type label, e.g. `"C.ar" = 2.0`.
    #[serde(default)]
    overrides: BTreeMap<String, f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialFootprintConfig {
    ownership: Option<OwnershipMetric>,
    tables: Option<PathBuf>,
    typing: Option<PartialTypingConfig>,
    edge: Option<PartialEdgeConfig>,
    lone_pair: Option<PartialLonePairConfig>,
    clustering: Option<PartialClusteringConfig>,
    minimum_area: Option<PartialMinimumAreaConfig>,
}

/// Fully resolved settings of one `footprint` invocation.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub footprint: FootprintConfig,
    /// Calibration table overrides; `None` means the built-in tables.
    pub tables: Option<PathBuf>,
}

fn parse_ownership(value: &str) -> Result<OwnershipMetric> {
    let name = toml::Value::String(value.trim().to_string());
    OwnershipMetric::deserialize(name).map_err(|_| {
        CliError::Config(format!(
            "Unknown ownership metric '{}'. Expected 'vdw-scaled', 'vdw-offset' or 'euclidean'.",
            value
        ))
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value))
    })
}

impl PartialFootprintConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Layers the command line over the file: dedicated flags win over
    /// `--set` values, which win over the file, which wins over defaults.
    pub fn merge_with_cli(mut self, args: &FootprintArgs) -> Result<ResolvedConfig> {
        self.apply_set_values(&args.set_values)?;

        if let Some(name) = &args.ownership {
            self.ownership = Some(parse_ownership(name)?);
        }
        if let Some(p) = args.edge_percentile {
            self.edge.get_or_insert_with(Default::default).percentile = Some(p);
        }
        let clustering = self.clustering.get_or_insert_with(Default::default);
        if let Some(seed) = args.random_seed {
            clustering.random_seed = Some(seed);
        }
        if let Some(fraction) = args.dual_fraction {
            clustering.dual_fraction = Some(fraction);
        }

        let tables = args.tables.clone().or(self.tables.take());
        let footprint = self
            .into_builder()?
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(ResolvedConfig { footprint, tables })
    }

    fn into_builder(self) -> Result<FootprintConfigBuilder> {
        let mut builder = FootprintConfig::builder();
        if let Some(metric) = self.ownership {
            builder = builder.ownership(metric);
        }

        if let Some(v) = self.typing.and_then(|t| t.planarity_threshold) {
            builder = builder.planarity_threshold(v);
        }

        let edge = self.edge.unwrap_or_default();
        if let Some(v) = edge.percentile {
            builder = builder.edge_percentile(v);
        }
        if let Some(v) = edge.neighbor_radius {
            builder = builder.edge_neighbor_radius(v);
        }

        let lp = self.lone_pair.unwrap_or_default();
        if let Some(v) = lp.local_minimum_radius {
            builder = builder.local_minimum_radius(v);
        }
        if let Some(v) = lp.exclusion_radius {
            builder = builder.exclusion_radius(v);
        }
        if let Some(v) = lp.outer_exclusion_radius {
            builder = builder.outer_exclusion_radius(v);
        }
        if let Some(v) = lp.sulfur_exclusion_radius {
            builder = builder.sulfur_exclusion_radius(v);
        }
        if let Some(v) = lp.ring_tolerance_factor {
            builder = builder.ring_tolerance_factor(v);
        }

        let clustering = self.clustering.unwrap_or_default();
        if let Some(v) = clustering.max_iterations {
            builder = builder.max_iterations(v);
        }
        if let Some(v) = clustering.separation_factor {
            builder = builder.separation_factor(v);
        }
        if let Some(v) = clustering.max_area_ratio {
            builder = builder.max_area_ratio(v);
        }
        if let Some(v) = clustering.random_seed {
            builder = builder.random_seed(v);
        }
        if let Some(v) = clustering.dual_fraction {
            builder = builder.dual_fraction(v);
        }

        let areas = self.minimum_area.unwrap_or_default();
        if let Some(v) = areas.default {
            builder = builder.minimum_area(v);
        }
        if let Some(v) = areas.hydrogen {
            builder = builder.hydrogen_minimum_area(v);
        }
        for (label, area) in areas.overrides {
            let atom_type: AtomType = label.parse().map_err(|_| {
                CliError::Config(format!(
                    "Unknown atom type '{}' in [minimum-area.overrides]",
                    label
                ))
            })?;
            builder = builder.minimum_area_for(atom_type, area);
        }
        Ok(builder)
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();

            match key {
                "ownership" => self.ownership = Some(parse_ownership(value)?),
                "tables" => self.tables = Some(PathBuf::from(value.trim())),
                "typing.planarity-threshold" => {
                    self.typing
                        .get_or_insert_with(Default::default)
                        .planarity_threshold = Some(parse_value(key, value)?)
                }
                "edge.percentile" => {
                    self.edge.get_or_insert_with(Default::default).percentile =
                        Some(parse_value(key, value)?)
                }
                "edge.neighbor-radius" => {
                    self.edge.get_or_insert_with(Default::default).neighbor_radius =
                        Some(parse_value(key, value)?)
                }
                "lone-pair.local-minimum-radius" => {
                    self.lone_pair
                        .get_or_insert_with(Default::default)
                        .local_minimum_radius = Some(parse_value(key, value)?)
                }
                "lone-pair.exclusion-radius" => {
                    self.lone_pair
                        .get_or_insert_with(Default::default)
                        .exclusion_radius = Some(parse_value(key, value)?)
                }
                "lone-pair.outer-exclusion-radius" => {
                    self.lone_pair
                        .get_or_insert_with(Default::default)
                        .outer_exclusion_radius = Some(parse_value(key, value)?)
                }
                "lone-pair.sulfur-exclusion-radius" => {
                    self.lone_pair
                        .get_or_insert_with(Default::default)
                        .sulfur_exclusion_radius = Some(parse_value(key, value)?)
                }
                "lone-pair.ring-tolerance-factor" => {
                    self.lone_pair
                        .get_or_insert_with(Default::default)
                        .ring_tolerance_factor = Some(parse_value(key, value)?)
                }
                "clustering.max-iterations" => {
                    self.clustering
                        .get_or_insert_with(Default::default)
                        .max_iterations = Some(parse_value(key, value)?)
                }
                "clustering.separation-factor" => {
                    self.clustering
                        .get_or_insert_with(Default::default)
                        .separation_factor = Some(parse_value(key, value)?)
                }
                "clustering.max-area-ratio" => {
                    self.clustering
                        .get_or_insert_with(Default::default)
                        .max_area_ratio = Some(parse_value(key, value)?)
                }
                "clustering.random-seed" => {
                    self.clustering
                        .get_or_insert_with(Default::default)
                        .random_seed = Some(parse_value(key, value)?)
                }
                "clustering.dual-fraction" => {
                    self.clustering
                        .get_or_insert_with(Default::default)
                        .dual_fraction = Some(parse_value(key, value)?)
                }
                "minimum-area.default" => {
                    self.minimum_area
                        .get_or_insert_with(Default::default)
                        .default = Some(parse_value(key, value)?)
                }
                "minimum-area.hydrogen" => {
                    self.minimum_area
                        .get_or_insert_with(Default::default)
                        .hydrogen = Some(parse_value(key, value)?)
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

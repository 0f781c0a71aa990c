use crate::core::models::element::Element;
use crate::core::surface::OwnershipMetric;
use crate::core::typing::AtomType;
use crate::core::typing::atom_type::{CarbonType, NitrogenType, SulfurType};
use crate::core::typing::classifier::PLANARITY_THRESHOLD_DEGREES;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeConfig {
    /// Sparsity percentile kept by the edge detector, in (0, 100].
    pub percentile: f64,
    /// Neighbour-count radius (Å).
    pub neighbor_radius: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            percentile: 90.0,
            neighbor_radius: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LonePairConfig {
    /// A local minimum has no lower sample within this radius (Å).
    pub local_minimum_radius: f64,
    pub exclusion_radius: f64,
    pub outer_exclusion_radius: f64,
    pub sulfur_exclusion_radius: f64,
    /// Snap tolerance factor: tolerance = π · r_circle · factor.
    pub ring_tolerance_factor: f64,
}

impl Default for LonePairConfig {
    fn default() -> Self {
        Self {
            local_minimum_radius: 1.0,
            exclusion_radius: 1.2,
            outer_exclusion_radius: 1.5,
            sulfur_exclusion_radius: 1.8,
            ring_tolerance_factor: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringConfig {
    pub max_iterations: usize,
    /// Minimum centroid separation as a multiple of the atom's van der Waals radius.
    pub separation_factor: f64,
    /// Largest accepted ratio between the two clusters' hull areas.
    pub max_area_ratio: f64,
    pub random_seed: u64,
    /// Minority-sign fraction at which a dual companion is attached.
    pub dual_fraction: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            separation_factor: 0.5,
            max_area_ratio: 4.0,
            random_seed: 42,
            dual_fraction: 0.10,
        }
    }
}

/// Built-in per-type minimum areas (Å²). Large polarizable atoms need a
/// wider patch before their extrema mean anything; sp atoms sit buried
/// between their neighbours and keep only a thin belt.
const TYPE_MINIMUM_AREAS: [(AtomType, f64); 11] = [
    (AtomType::Halogen(Element::Cl), 1.0),
    (AtomType::Halogen(Element::Br), 1.2),
    (AtomType::Halogen(Element::I), 1.5),
    (AtomType::Sulfur(SulfurType::Sp3), 0.8),
    (AtomType::Sulfur(SulfurType::Sp2), 0.8),
    (AtomType::Sulfur(SulfurType::Aromatic), 0.8),
    (AtomType::Sulfur(SulfurType::PhosphineSulfide), 0.8),
    (AtomType::Sulfur(SulfurType::Sulfoxide), 0.6),
    (AtomType::Sulfur(SulfurType::Sulfone), 0.6),
    (AtomType::Carbon(CarbonType::Sp), 0.2),
    (AtomType::Nitrogen(NitrogenType::Nitrile), 0.3),
];

/// Owned tight-surface area (Å²) an atom needs before it may emit AIPs.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimumAreaConfig {
    pub default: f64,
    pub hydrogen: f64,
    /// Per-type thresholds; starts from the built-in table.
    pub overrides: HashMap<AtomType, f64>,
}

impl Default for MinimumAreaConfig {
    fn default() -> Self {
        Self {
            default: 0.4,
            hydrogen: 0.2,
            overrides: TYPE_MINIMUM_AREAS.into_iter().collect(),
        }
    }
}

impl MinimumAreaConfig {
    pub fn for_type(&self, atom_type: AtomType) -> f64 {
        if let Some(area) = self.overrides.get(&atom_type) {
            *area
        } else if atom_type.is_hydrogen() {
            self.hydrogen
        } else {
            self.default
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypingConfig {
    /// Pyramidalization (degrees) above which a trigonal nitrogen is typed as an amine.
    pub planarity_threshold: f64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            planarity_threshold: PLANARITY_THRESHOLD_DEGREES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FootprintConfig {
    pub typing: TypingConfig,
    pub ownership: OwnershipMetric,
    pub edge: EdgeConfig,
    pub lone_pair: LonePairConfig,
    pub clustering: ClusteringConfig,
    pub minimum_area: MinimumAreaConfig,
}

impl FootprintConfig {
    pub fn builder() -> FootprintConfigBuilder {
        FootprintConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct FootprintConfigBuilder {
    config: FootprintConfig,
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name,
            reason: format!("must be a positive finite number, got {value}"),
        })
    }
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            name,
            reason: format!("must be a non-negative finite number, got {value}"),
        })
    }
}

impl FootprintConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn planarity_threshold(mut self, degrees: f64) -> Self {
        self.config.typing.planarity_threshold = degrees;
        self
    }
    pub fn ownership(mut self, metric: OwnershipMetric) -> Self {
        self.config.ownership = metric;
        self
    }
    pub fn edge_percentile(mut self, percentile: f64) -> Self {
        self.config.edge.percentile = percentile;
        self
    }
    pub fn edge_neighbor_radius(mut self, radius: f64) -> Self {
        self.config.edge.neighbor_radius = radius;
        self
    }
    pub fn local_minimum_radius(mut self, radius: f64) -> Self {
        self.config.lone_pair.local_minimum_radius = radius;
        self
    }
    pub fn exclusion_radius(mut self, radius: f64) -> Self {
        self.config.lone_pair.exclusion_radius = radius;
        self
    }
    pub fn outer_exclusion_radius(mut self, radius: f64) -> Self {
        self.config.lone_pair.outer_exclusion_radius = radius;
        self
    }
    pub fn sulfur_exclusion_radius(mut self, radius: f64) -> Self {
        self.config.lone_pair.sulfur_exclusion_radius = radius;
        self
    }
    pub fn ring_tolerance_factor(mut self, factor: f64) -> Self {
        self.config.lone_pair.ring_tolerance_factor = factor;
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.config.clustering.max_iterations = iterations;
        self
    }
    pub fn separation_factor(mut self, factor: f64) -> Self {
        self.config.clustering.separation_factor = factor;
        self
    }
    pub fn max_area_ratio(mut self, ratio: f64) -> Self {
        self.config.clustering.max_area_ratio = ratio;
        self
    }
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.clustering.random_seed = seed;
        self
    }
    pub fn dual_fraction(mut self, fraction: f64) -> Self {
        self.config.clustering.dual_fraction = fraction;
        self
    }
    pub fn minimum_area(mut self, area: f64) -> Self {
        self.config.minimum_area.default = area;
        self
    }
    pub fn hydrogen_minimum_area(mut self, area: f64) -> Self {
        self.config.minimum_area.hydrogen = area;
        self
    }
    pub fn minimum_area_for(mut self, atom_type: AtomType, area: f64) -> Self {
        self.config.minimum_area.overrides.insert(atom_type, area);
        self
    }

    pub fn build(self) -> Result<FootprintConfig, ConfigError> {
        let c = self.config;

        require_non_negative("typing.planarity_threshold", c.typing.planarity_threshold)?;
        // Out-of-range percentiles are coerced by the edge detector; only NaN is refused.
        if c.edge.percentile.is_nan() {
            return Err(ConfigError::InvalidValue {
                name: "edge.percentile",
                reason: "must be a number".to_string(),
            });
        }
        require_positive("edge.neighbor_radius", c.edge.neighbor_radius)?;

        let lp = &c.lone_pair;
        require_positive("lone_pair.local_minimum_radius", lp.local_minimum_radius)?;
        require_non_negative("lone_pair.exclusion_radius", lp.exclusion_radius)?;
        require_non_negative("lone_pair.outer_exclusion_radius", lp.outer_exclusion_radius)?;
        require_non_negative("lone_pair.sulfur_exclusion_radius", lp.sulfur_exclusion_radius)?;
        require_positive("lone_pair.ring_tolerance_factor", lp.ring_tolerance_factor)?;

        let cl = &c.clustering;
        if cl.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                name: "clustering.max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        require_non_negative("clustering.separation_factor", cl.separation_factor)?;
        if !(cl.max_area_ratio.is_finite() && cl.max_area_ratio >= 1.0) {
            return Err(ConfigError::InvalidValue {
                name: "clustering.max_area_ratio",
                reason: format!("must be at least 1, got {}", cl.max_area_ratio),
            });
        }
        if !(0.0..=1.0).contains(&cl.dual_fraction) {
            return Err(ConfigError::InvalidValue {
                name: "clustering.dual_fraction",
                reason: format!("must lie in [0, 1], got {}", cl.dual_fraction),
            });
        }

        require_non_negative("minimum_area.default", c.minimum_area.default)?;
        require_non_negative("minimum_area.hydrogen", c.minimum_area.hydrogen)?;
        for area in c.minimum_area.overrides.values() {
            require_non_negative("minimum_area.overrides", *area)?;
        }

        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_without_changes_yields_defaults() {
        let config = FootprintConfig::builder().build().unwrap();
        assert_eq!(config, FootprintConfig::default());
        assert_eq!(config.ownership, OwnershipMetric::VdwScaled);
        assert_eq!(config.clustering.dual_fraction, 0.10);
    }

    #[test]
    fn builder_applies_overrides() {
        let amide: AtomType = "N.am".parse().unwrap();
        let config = FootprintConfig::builder()
            .ownership(OwnershipMetric::Euclidean)
            .edge_percentile(75.0)
            .random_seed(7)
            .minimum_area_for(amide, 1.5)
            .build()
            .unwrap();
        assert_eq!(config.ownership, OwnershipMetric::Euclidean);
        assert_eq!(config.edge.percentile, 75.0);
        assert_eq!(config.clustering.random_seed, 7);
        assert_eq!(config.minimum_area.for_type(amide), 1.5);
    }

    #[test]
    fn minimum_area_distinguishes_hydrogens() {
        let areas = MinimumAreaConfig::default();
        assert_eq!(areas.for_type("H.O".parse().unwrap()), 0.2);
        assert_eq!(areas.for_type("C.3".parse().unwrap()), 0.4);
    }

    #[test]
    fn minimum_area_table_covers_heavy_and_linear_types() {
        let areas = MinimumAreaConfig::default();
        let area = |label: &str| areas.for_type(label.parse().unwrap());
        assert_eq!(area("Cl"), 1.0);
        assert_eq!(area("I"), 1.5);
        assert_eq!(area("S.3"), 0.8);
        assert_eq!(area("S.o2"), 0.6);
        assert_eq!(area("C.1"), 0.2);
        assert_eq!(area("N.1"), 0.3);
        // Fluorine and oxygen fall through to the general default.
        assert_eq!(area("F"), 0.4);
        assert_eq!(area("O.2"), 0.4);

        let config = FootprintConfig::builder()
            .minimum_area_for("Cl".parse().unwrap(), 0.5)
            .build()
            .unwrap();
        assert_eq!(config.minimum_area.for_type("Cl".parse().unwrap()), 0.5);
        assert_eq!(config.minimum_area.for_type("Br".parse().unwrap()), 1.2);
    }

    #[test]
    fn planarity_threshold_defaults_to_the_classifier_constant() {
        let config = FootprintConfig::default();
        assert_eq!(config.typing.planarity_threshold, PLANARITY_THRESHOLD_DEGREES);
        let err = FootprintConfig::builder()
            .planarity_threshold(-1.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { name: "typing.planarity_threshold", .. }
        ));
    }

    #[test]
    fn zero_percentile_is_accepted() {
        assert!(FootprintConfig::builder().edge_percentile(0.0).build().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected_with_their_name() {
        let err = FootprintConfig::builder()
            .edge_neighbor_radius(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { name: "edge.neighbor_radius", .. }
        ));

        let err = FootprintConfig::builder()
            .dual_fraction(1.5)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { name: "clustering.dual_fraction", .. }
        ));

        let err = FootprintConfig::builder().max_iterations(0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { name: "clustering.max_iterations", .. }
        ));

        let err = FootprintConfig::builder().max_area_ratio(0.5).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { name: "clustering.max_area_ratio", .. }
        ));
    }
}

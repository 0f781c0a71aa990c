use super::tables::{CalibrationTables, Coefficients};
use crate::core::models::element::Element;
use crate::core::typing::AtomType;
use crate::core::typing::atom_type::{CarbonType, NitrogenType, OxygenType};

/// Which family of surface feature a raw potential was sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalibrationMode {
    /// Lone-pair minimum on the loose isosurface.
    Polar,
    /// Clustered extremum on the tight isosurface.
    NonPolar,
    /// Lone-pair minimum recovered on the tight isosurface.
    OuterPolar,
    /// Sigma hole on the middle isosurface.
    Sigma,
}

/// Maps raw surface potentials to calibrated AIP interaction values.
#[derive(Debug, Clone, Default)]
pub struct ValueModel {
    tables: CalibrationTables,
}

fn round_two(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

impl ValueModel {
    pub fn new(tables: CalibrationTables) -> Self {
        Self { tables }
    }

    fn beta_loose_or_fallback(&self, atom_type: AtomType) -> Option<Coefficients> {
        self.tables.beta_loose.get(atom_type).or_else(|| {
            let fallback = match atom_type.element() {
                Element::N => AtomType::Nitrogen(NitrogenType::Amine),
                Element::O => AtomType::Oxygen(OxygenType::Sp3),
                _ => AtomType::Oxygen(OxygenType::Carbonyl),
            };
            self.tables.beta_loose.get(fallback)
        })
    }

    fn alpha_middle_value(&self, atom_type: AtomType, raw: f64) -> f64 {
        self.tables
            .alpha_middle
            .get(atom_type)
            .unwrap_or(self.tables.soft_hydrogen)
            .apply(raw)
    }

    fn beta_tight_or_aromatic(&self, atom_type: AtomType) -> Option<Coefficients> {
        self.tables.beta_tight.get(atom_type).or_else(|| {
            self.tables
                .beta_tight
                .get(AtomType::Carbon(CarbonType::Aromatic))
        })
    }

    /// Calibrates a raw potential (hartree/e) for an AIP of `atom_type`.
    ///
    /// Returns `None` for a non-finite potential or when no table (fallbacks
    /// included) can serve the request. The result is rounded to two decimals.
    pub fn calibrate(
        &self,
        atom_type: AtomType,
        raw: f64,
        mode: CalibrationMode,
        dual: bool,
    ) -> Option<f64> {
        if !raw.is_finite() {
            return None;
        }

        let value = match mode {
            _ if atom_type.is_hydrogen() => self.alpha_middle_value(atom_type, raw),
            CalibrationMode::Sigma => self.alpha_middle_value(atom_type, raw),
            CalibrationMode::NonPolar if raw >= 0.0 => {
                let fallback = if dual {
                    self.tables.dual
                } else {
                    self.tables.soft_hydrogen
                };
                self.tables
                    .alpha_tight
                    .get(atom_type)
                    .unwrap_or(fallback)
                    .apply(raw)
            }
            CalibrationMode::NonPolar | CalibrationMode::OuterPolar => {
                -self.beta_tight_or_aromatic(atom_type)?.apply(raw)
            }
            CalibrationMode::Polar if raw < 0.0 => {
                self.beta_loose_or_fallback(atom_type)?.apply(raw).min(0.0)
            }
            CalibrationMode::Polar => {
                (-self.beta_loose_or_fallback(atom_type)?.apply(raw)).min(0.0)
            }
        };

        value.is_finite().then(|| round_two(value))
    }

    /// Alpha value of a hydrogen in the all-atoms fallback model.
    pub fn all_atoms_alpha(&self, atom_type: AtomType, raw: f64) -> Option<f64> {
        if !raw.is_finite() {
            return None;
        }
        let c = self
            .tables
            .alpha_all_atoms
            .get(atom_type)
            .unwrap_or(self.tables.alpha_all_atoms_fallback);
        Some(round_two(c.apply(raw)))
    }

    /// Beta value of a heavy atom in the all-atoms fallback model.
    pub fn all_atoms_beta(&self, atom_type: AtomType, raw: f64) -> Option<f64> {
        if !raw.is_finite() {
            return None;
        }
        let c = self
            .tables
            .beta_all_atoms
            .get(atom_type)
            .unwrap_or(self.tables.beta_all_atoms_fallback);
        Some(round_two(c.apply(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(label: &str) -> AtomType {
        label.parse().unwrap()
    }

    fn model() -> ValueModel {
        ValueModel::default()
    }

    #[test]
    fn hydrogen_uses_alpha_middle() {
        // 0.24 + 25.6 * 0.1 = 2.80
        let v = model().calibrate(t("H.O"), 0.1, CalibrationMode::NonPolar, false);
        assert_eq!(v, Some(2.8));
    }

    #[test]
    fn sigma_mode_uses_alpha_middle_with_soft_hydrogen_fallback() {
        let m = model();
        // Cl: 0.05 + 16.2 * 0.05 = 0.86
        assert_eq!(m.calibrate(t("Cl"), 0.05, CalibrationMode::Sigma, false), Some(0.86));
        // F has no alpha-middle entry: 0.0 + 18.0 * 0.05 = 0.90
        assert_eq!(m.calibrate(t("F"), 0.05, CalibrationMode::Sigma, false), Some(0.9));
    }

    #[test]
    fn polar_negative_uses_beta_loose_clamped() {
        // O.3: -0.38 + 68.0 * -0.06 = -4.46
        let v = model().calibrate(t("O.3"), -0.06, CalibrationMode::Polar, false);
        assert_eq!(v, Some(-4.46));
        // A weak minimum is clamped to zero rather than turning positive.
        let weak = model().calibrate(t("O.3"), 0.001, CalibrationMode::Polar, false);
        assert_eq!(weak, Some(0.0));
    }

    #[test]
    fn polar_fallbacks_by_element() {
        let m = model();
        let amine = m.calibrate(t("N.3"), -0.05, CalibrationMode::Polar, false);
        assert_eq!(m.calibrate(t("N.am"), -0.05, CalibrationMode::Polar, false), amine);
        let ether = m.calibrate(t("O.3"), -0.05, CalibrationMode::Polar, false);
        assert_eq!(m.calibrate(t("O.ar"), -0.05, CalibrationMode::Polar, false), ether);
        let carbonyl = m.calibrate(t("O.2"), -0.05, CalibrationMode::Polar, false);
        assert_eq!(m.calibrate(t("S.o"), -0.05, CalibrationMode::Polar, false), carbonyl);
    }

    #[test]
    fn non_polar_positive_uses_alpha_tight_or_fallback() {
        let m = model();
        // C.3: 9.8 * 0.02 = 0.196 -> 0.2
        assert_eq!(m.calibrate(t("C.3"), 0.02, CalibrationMode::NonPolar, false), Some(0.2));
        // F: not in alpha-tight, soft hydrogen 18.0 * 0.02 = 0.36, dual 12.5 * 0.02 = 0.25
        assert_eq!(m.calibrate(t("F"), 0.02, CalibrationMode::NonPolar, false), Some(0.36));
        assert_eq!(m.calibrate(t("F"), 0.02, CalibrationMode::NonPolar, true), Some(0.25));
        assert_eq!(m.calibrate(t("C.3"), 0.0, CalibrationMode::NonPolar, false), Some(0.0));
    }

    #[test]
    fn non_polar_negative_is_not_clamped() {
        let m = model();
        // C.ar: -(0 + -14.2 * -0.03) = -0.426 -> -0.43
        assert_eq!(m.calibrate(t("C.ar"), -0.03, CalibrationMode::NonPolar, false), Some(-0.43));
        // N.pl3 lacks a beta-tight entry and falls back to C.ar.
        assert_eq!(m.calibrate(t("N.pl3"), -0.03, CalibrationMode::NonPolar, false), Some(-0.43));
    }

    #[test]
    fn outer_polar_uses_beta_tight() {
        // O.3: -(-16.4 * -0.1) = -1.64
        let v = model().calibrate(t("O.3"), -0.1, CalibrationMode::OuterPolar, false);
        assert_eq!(v, Some(-1.64));
    }

    #[test]
    fn polar_positive_is_negated_and_clamped() {
        // O.3: -(-0.38 + 68.0 * 0.001) = 0.312 -> clamped to 0
        let v = model().calibrate(t("O.3"), 0.001, CalibrationMode::Polar, false);
        assert_eq!(v, Some(0.0));
        // -(-0.38 + 68.0 * 0.01) = -0.30
        let v = model().calibrate(t("O.3"), 0.01, CalibrationMode::Polar, false);
        assert_eq!(v, Some(-0.3));
    }

    #[test]
    fn non_finite_input_is_undefined() {
        let m = model();
        assert_eq!(m.calibrate(t("O.3"), f64::NAN, CalibrationMode::Polar, false), None);
        assert_eq!(m.calibrate(t("H.O"), f64::INFINITY, CalibrationMode::Sigma, false), None);
        assert_eq!(m.all_atoms_alpha(t("H.O"), f64::NAN), None);
    }

    #[test]
    fn all_atoms_model_uses_fallbacks() {
        let m = model();
        // 0.30 + 27.0 * 0.1 = 3.0
        assert_eq!(m.all_atoms_alpha(t("H.O"), 0.1), Some(3.0));
        // Fallback beta: 30.0 * -0.05 = -1.5
        assert_eq!(m.all_atoms_beta(t("S.3"), -0.05), Some(-1.5));
    }
}

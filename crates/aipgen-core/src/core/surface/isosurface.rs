use serde::Serialize;
use std::fmt;

/// Electron-density cutoff (e/bohr³) a MEPS was sampled at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Isosurface {
    /// 0.0300, closest to the nuclei. Used for non-polar sites.
    Tight,
    /// 0.0104. Used for hydrogens and sigma holes.
    Middle,
    /// 0.0020, the outermost. Used for lone pairs.
    Loose,
}

impl Isosurface {
    pub const ALL: [Isosurface; 3] = [Isosurface::Tight, Isosurface::Middle, Isosurface::Loose];

    pub fn density(self) -> f64 {
        match self {
            Isosurface::Tight => 0.0300,
            Isosurface::Middle => 0.0104,
            Isosurface::Loose => 0.0020,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Isosurface::Tight => "tight",
            Isosurface::Middle => "middle",
            Isosurface::Loose => "loose",
        }
    }
}

impl fmt::Display for Isosurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn densities_decrease_outwards() {
        assert_eq!(Isosurface::Tight.density(), 0.03);
        assert_eq!(Isosurface::Middle.density(), 0.0104);
        assert_eq!(Isosurface::Loose.density(), 0.002);
        assert!(
            Isosurface::ALL
                .windows(2)
                .all(|w| w[0].density() > w[1].density())
        );
    }

    #[test]
    fn display_uses_lowercase_name() {
        assert_eq!(Isosurface::Middle.to_string(), "middle");
    }
}

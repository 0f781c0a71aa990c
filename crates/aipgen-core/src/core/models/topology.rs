use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Number of pi bonds contributed to each endpoint; aromatic bonds count as one.
    pub fn pi_count(self) -> usize {
        match self {
            BondOrder::Single => 0,
            BondOrder::Double | BondOrder::Aromatic => 1,
            BondOrder::Triple => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid bond order '{0}'")]
pub struct ParseBondOrderError(pub String);

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "s" | "single" | "am" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            "3" | "t" | "triple" => Ok(Self::Triple),
            "ar" | "aromatic" | "1.5" => Ok(Self::Aromatic),
            other => Err(ParseBondOrderError(other.to_string())),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "1",
            Self::Double => "2",
            Self::Triple => "3",
            Self::Aromatic => "ar",
        })
    }
}

/// An undirected bond between two atoms, addressed by their ordinal indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub first: usize,
    pub second: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(first: usize, second: usize, order: BondOrder) -> Self {
        Self {
            first,
            second,
            order,
        }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.first == atom || self.second == atom
    }

    /// Returns the partner of `atom` in this bond, if `atom` is an endpoint.
    pub fn partner(&self, atom: usize) -> Option<usize> {
        if self.first == atom {
            Some(self.second)
        } else if self.second == atom {
            Some(self.first)
        } else {
            None
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A tyre compound.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
}

impl Compound {
    /// All compounds, softest first
    pub const ALL: [Compound; 3] = [Compound::Soft, Compound::Medium, Compound::Hard];

    /// Lap reward on a brand-new set
    #[inline]
    pub const fn base_pace(self) -> f64 {
        match self {
            Compound::Soft => 10.0,
            Compound::Medium => 8.0,
            Compound::Hard => 6.0,
        }
    }

    /// Lap reward lost per lap of tyre age
    #[inline]
    pub const fn degradation(self) -> f64 {
        match self {
            Compound::Soft => 1.0,
            Compound::Medium => 0.75,
            Compound::Hard => 0.5,
        }
    }

    /// Lap reward for a lap started on tyres of the given age, never negative.
    pub fn lap_reward(self, age: u32) -> f64 {
        let pace = self.base_pace() - self.degradation() * f64::from(age);
        pace.max(0.0)
    }

    /// Total reward of a stint of `laps` laps starting at `start_age`.
    pub fn stint_reward(self, start_age: u32, laps: u32) -> f64 {
        (0..laps)
            .map(|k| self.lap_reward(start_age.saturating_add(k)))
            .sum()
    }

    /// Single-letter code (S, M, H)
    pub const fn letter(self) -> char {
        match self {
            Compound::Soft => 'S',
            Compound::Medium => 'M',
            Compound::Hard => 'H',
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compound::Soft => write!(f, "soft"),
            Compound::Medium => write!(f, "medium"),
            Compound::Hard => write!(f, "hard"),
        }
    }
}

/// Error returned when parsing an unknown compound name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tyre compound: {0:?} (expected soft, medium or hard)")]
pub struct ParseCompoundError(pub String);

impl FromStr for Compound {
    type Err = ParseCompoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "soft" => Ok(Compound::Soft),
            "m" | "medium" => Ok(Compound::Medium),
            "h" | "hard" => Ok(Compound::Hard),
            _ => Err(ParseCompoundError(s.to_string())),
        }
    }
}

/// Discrete tyre observation: compound plus new/old.
///
/// A set counts as new up to [`TyreKey::FRESH_AGE`] laps of running.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TyreKey {
    pub compound: Compound,
    pub fresh: bool,
}

impl TyreKey {
    /// Age up to which a set still counts as new.
    pub const FRESH_AGE: u32 = 1;

    pub fn new(compound: Compound, age: u32) -> Self {
        Self {
            compound,
            fresh: age <= Self::FRESH_AGE,
        }
    }

    /// All six keys, new sets first.
    pub fn all() -> impl Iterator<Item = TyreKey> {
        [true, false].into_iter().flat_map(|fresh| {
            Compound::ALL
                .into_iter()
                .map(move |compound| TyreKey { compound, fresh })
        })
    }
}

impl fmt::Display for TyreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let age = if self.fresh { 'N' } else { 'O' };
        write!(f, "{}{}", age, self.compound.letter())
    }
}

// Tier classification from composite score.

use serde::Serialize;
use std::fmt;

use crate::tables::TierCutoffs;

/// Ordinal start/sit tier. `Bye` overrides the score-based tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
    #[serde(rename = "BYE")]
    Bye,
}

impl Tier {
    /// Evaluate the cutoffs top-down. Position does not matter.
    pub fn from_score(score: f64, cutoffs: &TierCutoffs) -> Self {
        if score >= cutoffs.s {
            Tier::S
        } else if score >= cutoffs.a {
            Tier::A
        } else if score >= cutoffs.b {
            Tier::B
        } else if score >= cutoffs.c {
            Tier::C
        } else {
            Tier::D
        }
    }

    /// Like [`Tier::from_score`], but a bye-week player is always `Bye`.
    pub fn classify(score: f64, is_bye_week: bool, cutoffs: &TierCutoffs) -> Self {
        if is_bye_week {
            Tier::Bye
        } else {
            Tier::from_score(score, cutoffs)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::Bye => "BYE",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

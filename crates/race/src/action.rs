use crate::Compound;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A per-lap strategy decision.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceAction {
    /// Keep running on the current set.
    StayOut,
    /// Stop for a new set of the given compound.
    Pit(Compound),
}

impl RaceAction {
    /// Every action, in the order legal actions are listed.
    pub const ALL: [RaceAction; 4] = [
        RaceAction::StayOut,
        RaceAction::Pit(Compound::Soft),
        RaceAction::Pit(Compound::Medium),
        RaceAction::Pit(Compound::Hard),
    ];

    /// Returns true for a pit stop
    pub fn is_pit(self) -> bool {
        matches!(self, RaceAction::Pit(_))
    }

    /// Compound fitted by this action, if it is a stop.
    pub fn fitted(self) -> Option<Compound> {
        match self {
            RaceAction::StayOut => None,
            RaceAction::Pit(c) => Some(c),
        }
    }
}

impl fmt::Display for RaceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceAction::StayOut => write!(f, "stay out"),
            RaceAction::Pit(c) => write!(f, "pit {}", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pit() {
        assert!(!RaceAction::StayOut.is_pit());
        assert!(RaceAction::Pit(Compound::Hard).is_pit());
        assert_eq!(
            RaceAction::Pit(Compound::Medium).fitted(),
            Some(Compound::Medium)
        );
        assert_eq!(RaceAction::StayOut.fitted(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(RaceAction::StayOut.to_string(), "stay out");
        assert_eq!(RaceAction::Pit(Compound::Soft).to_string(), "pit soft");
    }

    #[test]
    fn test_serde_names() {
        let action = RaceAction::Pit(Compound::Hard);
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"pit":"hard"}"#);
        let json = serde_json::to_string(&RaceAction::StayOut).unwrap();
        assert_eq!(json, r#""stay_out""#);
    }
}

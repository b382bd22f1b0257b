use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Career ladder rungs, ordered from first to last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CareerStage {
    #[default]
    Intern,
    Junior,
    Mid,
    Senior,
    Staff,
    Principal,
    Distinguished,
}

impl CareerStage {
    /// Every stage in promotion order.
    pub const ALL: [Self; 7] = [
        Self::Intern,
        Self::Junior,
        Self::Mid,
        Self::Senior,
        Self::Staff,
        Self::Principal,
        Self::Distinguished,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[must_use]
    pub const fn first() -> Self {
        Self::ALL[0]
    }

    #[must_use]
    pub const fn last() -> Self {
        Self::ALL[Self::COUNT - 1]
    }

    /// Zero-based position on the ladder.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Intern => 0,
            Self::Junior => 1,
            Self::Mid => 2,
            Self::Senior => 3,
            Self::Staff => 4,
            Self::Principal => 5,
            Self::Distinguished => 6,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Successor stage, or `None` at the top of the ladder.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Distinguished)
    }

    /// True when `self` sits strictly higher on the ladder than `other`.
    #[must_use]
    pub const fn ranks_above(self, other: Self) -> bool {
        self.index() > other.index()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intern => "intern",
            Self::Junior => "junior",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Staff => "staff",
            Self::Principal => "principal",
            Self::Distinguished => "distinguished",
        }
    }

    /// Human-facing title used in messages.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Intern => "Intern",
            Self::Junior => "Junior Developer",
            Self::Mid => "Mid-level Developer",
            Self::Senior => "Senior Developer",
            Self::Staff => "Staff Engineer",
            Self::Principal => "Principal Engineer",
            Self::Distinguished => "Distinguished Engineer",
        }
    }
}

impl fmt::Display for CareerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CareerStage {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| GameError::unknown("stage", s))
    }
}

impl From<CareerStage> for String {
    fn from(value: CareerStage) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_total_and_indexed() {
        for (idx, stage) in CareerStage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), idx);
            assert_eq!(CareerStage::from_index(idx), Some(*stage));
        }
        assert!(CareerStage::ALL.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(CareerStage::from_index(CareerStage::COUNT), None);
    }

    #[test]
    fn successor_chain_ends_at_terminal_stage() {
        assert_eq!(CareerStage::Intern.next(), Some(CareerStage::Junior));
        assert_eq!(CareerStage::Principal.next(), Some(CareerStage::Distinguished));
        assert_eq!(CareerStage::Distinguished.next(), None);
        assert!(CareerStage::last().is_terminal());
        assert!(!CareerStage::first().is_terminal());
    }

    #[test]
    fn ranks_above_is_strict() {
        assert!(CareerStage::Senior.ranks_above(CareerStage::Junior));
        assert!(!CareerStage::Junior.ranks_above(CareerStage::Junior));
        assert!(!CareerStage::Intern.ranks_above(CareerStage::Mid));
    }

    #[test]
    fn parses_known_tags_and_rejects_unknown() {
        assert_eq!("staff".parse::<CareerStage>().unwrap(), CareerStage::Staff);
        let err = "midterm".parse::<CareerStage>().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
        assert_eq!(String::from(CareerStage::Mid), "mid");
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&CareerStage::Principal).unwrap();
        assert_eq!(json, "\"principal\"");
        let parsed: CareerStage = serde_json::from_str("\"distinguished\"").unwrap();
        assert_eq!(parsed, CareerStage::Distinguished);
    }
}

//! Point table for answered challenges.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::challenge::ChallengeCategory;
use crate::constants::{
    PENALTY_ARCHITECTURE_MISTAKE, PENALTY_DEFAULT_MISTAKE, POINTS_AFTER_ERROR, POINTS_CLEAN_ANSWER,
};

/// Errors raised when a scoring table is internally inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositiveReward { field: &'static str, value: i32 },
    #[error("{field} must not be positive (got {value})")]
    PositivePenalty { field: &'static str, value: i32 },
    #[error("reduced credit {after_error} exceeds clean credit {clean}")]
    ReducedExceedsClean { clean: i32, after_error: i32 },
}

/// Point deltas awarded per answer.
///
/// `prior_error_count` is the player's stage-wide running error counter at
/// submission time, not a per-challenge counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    #[serde(default = "ScoringRules::default_clean")]
    pub clean: i32,
    #[serde(default = "ScoringRules::default_after_error")]
    pub after_error: i32,
    #[serde(default = "ScoringRules::default_architecture_penalty")]
    pub architecture_penalty: i32,
    #[serde(default = "ScoringRules::default_mistake_penalty")]
    pub mistake_penalty: i32,
}

impl ScoringRules {
    const fn default_clean() -> i32 {
        POINTS_CLEAN_ANSWER
    }

    const fn default_after_error() -> i32 {
        POINTS_AFTER_ERROR
    }

    const fn default_architecture_penalty() -> i32 {
        PENALTY_ARCHITECTURE_MISTAKE
    }

    const fn default_mistake_penalty() -> i32 {
        PENALTY_DEFAULT_MISTAKE
    }

    /// Points for one answer. Pure: identical inputs give identical output.
    #[must_use]
    pub const fn calculate_points(
        &self,
        is_correct: bool,
        prior_error_count: u32,
        category: ChallengeCategory,
    ) -> i32 {
        match (is_correct, category) {
            (false, ChallengeCategory::Architecture) => self.architecture_penalty,
            (false, _) => self.mistake_penalty,
            (true, _) if prior_error_count == 0 => self.clean,
            (true, _) => self.after_error,
        }
    }

    /// Check the table for inverted or sign-flipped values.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub const fn validate(&self) -> Result<(), ScoringConfigError> {
        if self.clean <= 0 {
            return Err(ScoringConfigError::NonPositiveReward {
                field: "clean",
                value: self.clean,
            });
        }
        if self.after_error <= 0 {
            return Err(ScoringConfigError::NonPositiveReward {
                field: "after_error",
                value: self.after_error,
            });
        }
        if self.after_error > self.clean {
            return Err(ScoringConfigError::ReducedExceedsClean {
                clean: self.clean,
                after_error: self.after_error,
            });
        }
        if self.architecture_penalty > 0 {
            return Err(ScoringConfigError::PositivePenalty {
                field: "architecture_penalty",
                value: self.architecture_penalty,
            });
        }
        if self.mistake_penalty > 0 {
            return Err(ScoringConfigError::PositivePenalty {
                field: "mistake_penalty",
                value: self.mistake_penalty,
            });
        }
        Ok(())
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            clean: Self::default_clean(),
            after_error: Self::default_after_error(),
            architecture_penalty: Self::default_architecture_penalty(),
            mistake_penalty: Self::default_mistake_penalty(),
        }
    }
}

/// Score an answer with the default table.
#[must_use]
pub fn calculate_points(is_correct: bool, prior_error_count: u32, category: ChallengeCategory) -> i32 {
    ScoringRules::default().calculate_points(is_correct, prior_error_count, category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_answers_depend_on_prior_errors() {
        assert_eq!(calculate_points(true, 0, ChallengeCategory::Logic), 100);
        assert_eq!(calculate_points(true, 1, ChallengeCategory::Logic), 50);
        assert_eq!(calculate_points(true, 0, ChallengeCategory::Architecture), 100);
        assert_eq!(calculate_points(true, 7, ChallengeCategory::Architecture), 50);
    }

    #[test]
    fn wrong_architecture_answers_cost_more() {
        for errors in 0..4 {
            assert_eq!(
                calculate_points(false, errors, ChallengeCategory::Architecture),
                -30
            );
        }
        for category in ChallengeCategory::ALL
            .into_iter()
            .filter(|c| *c != ChallengeCategory::Architecture)
        {
            assert_eq!(calculate_points(false, 0, category), 0);
            assert_eq!(calculate_points(false, 1, category), 0);
        }
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let rules: ScoringRules = serde_json::from_str(r#"{"clean": 120}"#).unwrap();
        assert_eq!(rules.clean, 120);
        assert_eq!(rules.after_error, 50);
        assert_eq!(rules.architecture_penalty, -30);
        assert!(rules.validate().is_ok());
        assert!(ScoringRules::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_inconsistent_tables() {
        let inverted = ScoringRules {
            after_error: 150,
            ..ScoringRules::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ScoringConfigError::ReducedExceedsClean {
                clean: 100,
                after_error: 150
            })
        );

        let rewarding_penalty = ScoringRules {
            architecture_penalty: 10,
            ..ScoringRules::default()
        };
        assert!(matches!(
            rewarding_penalty.validate(),
            Err(ScoringConfigError::PositivePenalty { .. })
        ));

        let zero_clean = ScoringRules {
            clean: 0,
            after_error: 0,
            ..ScoringRules::default()
        };
        assert!(matches!(
            zero_clean.validate(),
            Err(ScoringConfigError::NonPositiveReward { field: "clean", .. })
        ));
    }
}

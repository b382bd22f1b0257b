use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_POINTS_ON_CORRECT, DEFAULT_POINTS_ON_WRONG, MIN_CHALLENGE_OPTIONS};
use crate::error::GameError;
use crate::stage::CareerStage;

/// Topic of a challenge; only consulted when scoring wrong answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeCategory {
    Logic,
    DomainModeling,
    Architecture,
    DistributedSystems,
    DataStructures,
    Testing,
    Security,
    Databases,
}

impl ChallengeCategory {
    pub const ALL: [Self; 8] = [
        Self::Logic,
        Self::DomainModeling,
        Self::Architecture,
        Self::DistributedSystems,
        Self::DataStructures,
        Self::Testing,
        Self::Security,
        Self::Databases,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Logic => "logic",
            Self::DomainModeling => "domain_modeling",
            Self::Architecture => "architecture",
            Self::DistributedSystems => "distributed_systems",
            Self::DataStructures => "data_structures",
            Self::Testing => "testing",
            Self::Security => "security",
            Self::Databases => "databases",
        }
    }
}

impl fmt::Display for ChallengeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeCategory {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| GameError::unknown("category", s))
    }
}

/// One answer choice of a challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: String,
}

impl ChallengeOption {
    #[must_use]
    pub fn new(text: impl Into<String>, is_correct: bool, explanation: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct,
            explanation: explanation.into(),
        }
    }
}

pub type ChallengeOptions = SmallVec<[ChallengeOption; 4]>;

/// Unvalidated challenge content, as authored in content files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeDraft {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub context: Option<String>,
    pub category: ChallengeCategory,
    pub required_stage: CareerStage,
    #[serde(default)]
    pub region: String,
    pub options: ChallengeOptions,
    #[serde(default)]
    pub mentor: Option<String>,
    #[serde(default = "default_points_on_correct")]
    pub points_on_correct: i32,
    #[serde(default = "default_points_on_wrong")]
    pub points_on_wrong: i32,
}

const fn default_points_on_correct() -> i32 {
    DEFAULT_POINTS_ON_CORRECT
}

const fn default_points_on_wrong() -> i32 {
    DEFAULT_POINTS_ON_WRONG
}

/// A validated multiple-choice challenge.
///
/// Instances can only be produced through [`Challenge::new`] (or deserialization,
/// which routes through it), so every challenge has at least two options and
/// exactly one correct answer. Serializing a `Challenge` yields the audit view,
/// including `is_correct`; use [`Challenge::player_view`] for anything shown to
/// players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChallengeDraft", into = "ChallengeDraft")]
pub struct Challenge {
    draft: ChallengeDraft,
}

impl Challenge {
    /// Validate authored content into a challenge.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidChallenge`] when the id is empty, fewer than
    /// two options are supplied, an option has empty text, or the number of
    /// correct options is not exactly one.
    pub fn new(draft: ChallengeDraft) -> Result<Self, GameError> {
        if draft.id.trim().is_empty() {
            return Err(GameError::invalid_challenge(&draft.id, "id must not be empty"));
        }
        if draft.options.len() < MIN_CHALLENGE_OPTIONS {
            return Err(GameError::invalid_challenge(
                &draft.id,
                format!(
                    "at least {MIN_CHALLENGE_OPTIONS} options required (got {})",
                    draft.options.len()
                ),
            ));
        }
        if let Some(idx) = draft.options.iter().position(|opt| opt.text.trim().is_empty()) {
            return Err(GameError::invalid_challenge(
                &draft.id,
                format!("option {idx} has empty text"),
            ));
        }
        let correct = draft.options.iter().filter(|opt| opt.is_correct).count();
        if correct != 1 {
            return Err(GameError::invalid_challenge(
                &draft.id,
                format!("exactly one correct option required (got {correct})"),
            ));
        }
        Ok(Self { draft })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.draft.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.draft.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.draft.description
    }

    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.draft.context.as_deref()
    }

    #[must_use]
    pub const fn category(&self) -> ChallengeCategory {
        self.draft.category
    }

    #[must_use]
    pub const fn required_stage(&self) -> CareerStage {
        self.draft.required_stage
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.draft.region
    }

    #[must_use]
    pub fn options(&self) -> &[ChallengeOption] {
        &self.draft.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&ChallengeOption> {
        self.draft.options.get(index)
    }

    #[must_use]
    pub fn mentor(&self) -> Option<&str> {
        self.draft.mentor.as_deref()
    }

    #[must_use]
    pub const fn points_on_correct(&self) -> i32 {
        self.draft.points_on_correct
    }

    #[must_use]
    pub const fn points_on_wrong(&self) -> i32 {
        self.draft.points_on_wrong
    }

    /// Index of the single correct option.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        // Construction guarantees exactly one match.
        self.draft
            .options
            .iter()
            .position(|opt| opt.is_correct)
            .unwrap_or_default()
    }

    /// Player-facing projection that never exposes correctness.
    #[must_use]
    pub fn player_view(&self) -> PlayerChallengeView<'_> {
        PlayerChallengeView {
            id: &self.draft.id,
            title: &self.draft.title,
            description: &self.draft.description,
            context: self.draft.context.as_deref(),
            category: self.draft.category,
            required_stage: self.draft.required_stage,
            region: &self.draft.region,
            mentor: self.draft.mentor.as_deref(),
            options: self
                .draft
                .options
                .iter()
                .enumerate()
                .map(|(index, opt)| PlayerOptionView {
                    index,
                    text: &opt.text,
                })
                .collect(),
        }
    }

    /// Borrow the underlying authored content.
    #[must_use]
    pub const fn as_draft(&self) -> &ChallengeDraft {
        &self.draft
    }
}

impl TryFrom<ChallengeDraft> for Challenge {
    type Error = GameError;

    fn try_from(draft: ChallengeDraft) -> Result<Self, Self::Error> {
        Self::new(draft)
    }
}

impl From<Challenge> for ChallengeDraft {
    fn from(value: Challenge) -> Self {
        value.draft
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerOptionView<'a> {
    pub index: usize,
    pub text: &'a str,
}

/// Serialization shape for clients: no answer key, no explanations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerChallengeView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a str>,
    pub category: ChallengeCategory,
    pub required_stage: CareerStage,
    pub region: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentor: Option<&'a str>,
    pub options: Vec<PlayerOptionView<'a>>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Four-option challenge whose correct answer sits at `correct`.
    pub(crate) fn challenge(
        id: &str,
        stage: CareerStage,
        category: ChallengeCategory,
        correct: usize,
    ) -> Challenge {
        let options = (0..4)
            .map(|idx| {
                ChallengeOption::new(
                    format!("option {idx}"),
                    idx == correct,
                    format!("explanation {idx}"),
                )
            })
            .collect();
        Challenge::new(ChallengeDraft {
            id: id.to_string(),
            title: format!("Challenge {id}"),
            description: "Pick the right answer".to_string(),
            context: None,
            category,
            required_stage: stage,
            region: "office".to_string(),
            options,
            mentor: None,
            points_on_correct: 100,
            points_on_wrong: 0,
        })
        .unwrap()
    }
}

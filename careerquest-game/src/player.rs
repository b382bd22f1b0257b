//! Player aggregate: the only place progression state changes.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::constants::{CHALLENGES_TO_PROMOTE, MAX_ERRORS_PER_STAGE, MSG_GAME_OVER};
use crate::error::GameError;
use crate::profile::normalize_name;
use crate::stage::CareerStage;
use crate::world::{Position, WorldState, WorldStateUpdate};

pub use crate::profile::{Character, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    #[default]
    InProgress,
    GameOver,
    Completed,
}

impl PlayerStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::GameOver => "game_over",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed challenge tagged with the stage the challenge belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletedChallenge {
    pub challenge_id: String,
    pub stage: CareerStage,
}

/// Immutable record of one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub challenge_id: String,
    pub selected_index: usize,
    pub is_correct: bool,
    pub points_awarded: i32,
    pub timestamp: DateTime<Utc>,
}

/// Result of [`Player::record_attempt`], tagged by `outcome`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Correct {
        points_awarded: i32,
        total_score: i32,
        current_errors: u32,
        errors_remaining: u32,
        stage: CareerStage,
    },
    Wrong {
        points_awarded: i32,
        current_errors: u32,
        errors_remaining: u32,
        total_score: i32,
        stage: CareerStage,
    },
    GameOver {
        points_awarded: i32,
        current_errors: u32,
        game_over_count: u32,
        total_score: i32,
        stage: CareerStage,
        message: String,
    },
}

impl AttemptOutcome {
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Correct { .. })
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        matches!(self, Self::GameOver { .. })
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Correct { .. } => "correct",
            Self::Wrong { .. } => "wrong",
            Self::GameOver { .. } => "game_over",
        }
    }

    #[must_use]
    pub const fn points_awarded(&self) -> i32 {
        match self {
            Self::Correct { points_awarded, .. }
            | Self::Wrong { points_awarded, .. }
            | Self::GameOver { points_awarded, .. } => *points_awarded,
        }
    }

    #[must_use]
    pub const fn total_score(&self) -> i32 {
        match self {
            Self::Correct { total_score, .. }
            | Self::Wrong { total_score, .. }
            | Self::GameOver { total_score, .. } => *total_score,
        }
    }

    #[must_use]
    pub const fn current_errors(&self) -> u32 {
        match self {
            Self::Correct { current_errors, .. }
            | Self::Wrong { current_errors, .. }
            | Self::GameOver { current_errors, .. } => *current_errors,
        }
    }

    /// Zero the error fields after a promotion reset the stage counter.
    pub(crate) fn reset_errors(&mut self) {
        match self {
            Self::Correct {
                current_errors,
                errors_remaining,
                ..
            }
            | Self::Wrong {
                current_errors,
                errors_remaining,
                ..
            } => {
                *current_errors = 0;
                *errors_remaining = MAX_ERRORS_PER_STAGE;
            }
            Self::GameOver { current_errors, .. } => *current_errors = 0,
        }
    }
}

/// Returned by [`Player::check_promotion`] when the player moved up a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub promoted: bool,
    pub previous_stage: CareerStage,
    pub new_stage: CareerStage,
}

/// Aggregate root for one player's run.
///
/// Fields are private so that every mutation goes through a transition that
/// upholds the invariants: `current_errors` never rests at or above
/// [`MAX_ERRORS_PER_STAGE`], completed ids are unique, and no attempt is
/// recorded during game over. Serializes through [`PlayerSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlayerSnapshot", into = "PlayerSnapshot")]
pub struct Player {
    id: String,
    name: String,
    character: Character,
    language: Language,
    stage: CareerStage,
    score: i32,
    current_errors: u32,
    completed: Vec<CompletedChallenge>,
    attempts: Vec<Attempt>,
    game_over_count: u32,
    status: PlayerStatus,
    created_at: DateTime<Utc>,
    world: WorldState,
}

impl Player {
    /// Start a fresh run at the first stage.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidName`] if the name fails validation.
    pub fn new(name: &str, character: Character, language: Language) -> Result<Self, GameError> {
        let name = normalize_name(name)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            character,
            language,
            stage: CareerStage::first(),
            score: 0,
            current_errors: 0,
            completed: Vec::new(),
            attempts: Vec::new(),
            game_over_count: 0,
            status: PlayerStatus::InProgress,
            created_at: Utc::now(),
            world: WorldState::default(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn character(&self) -> &Character {
        &self.character
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub const fn stage(&self) -> CareerStage {
        self.stage
    }

    #[must_use]
    pub const fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub const fn current_errors(&self) -> u32 {
        self.current_errors
    }

    #[must_use]
    pub const fn errors_remaining(&self) -> u32 {
        MAX_ERRORS_PER_STAGE.saturating_sub(self.current_errors)
    }

    #[must_use]
    pub fn completed_challenges(&self) -> &[CompletedChallenge] {
        &self.completed
    }

    pub fn completed_ids(&self) -> impl Iterator<Item = &str> {
        self.completed.iter().map(|entry| entry.challenge_id.as_str())
    }

    #[must_use]
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    #[must_use]
    pub const fn game_over_count(&self) -> u32 {
        self.game_over_count
    }

    #[must_use]
    pub const fn status(&self) -> PlayerStatus {
        self.status
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn world(&self) -> &WorldState {
        &self.world
    }

    #[must_use]
    pub fn has_completed(&self, challenge_id: &str) -> bool {
        self.completed
            .iter()
            .any(|entry| entry.challenge_id == challenge_id)
    }

    /// Completed challenges recorded against the current stage.
    #[must_use]
    pub fn stage_completed_count(&self) -> usize {
        self.completed
            .iter()
            .filter(|entry| entry.stage == self.stage)
            .count()
    }

    /// Whether an answer to `challenge_id` would be accepted right now.
    #[must_use]
    pub fn can_attempt(&self, challenge_id: &str, required_stage: CareerStage) -> bool {
        self.status == PlayerStatus::InProgress
            && !required_stage.ranks_above(self.stage)
            && !self.has_completed(challenge_id)
    }

    /// Append an attempt and apply its effect on score, errors and status.
    ///
    /// A correct answer is credited to `challenge_stage`, so answering a
    /// leftover lower-stage challenge never counts toward promotion out of the
    /// current stage and survives a game over there.
    ///
    /// A second error within the same stage ends the run in game over and the
    /// returned outcome reports that instead of a plain wrong answer.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameOver`] while in game over and
    /// [`GameError::CareerCompleted`] once the career is finished. Nothing is
    /// recorded in either case.
    pub fn record_attempt(
        &mut self,
        challenge_id: &str,
        challenge_stage: CareerStage,
        selected_index: usize,
        is_correct: bool,
        points: i32,
    ) -> Result<AttemptOutcome, GameError> {
        match self.status {
            PlayerStatus::GameOver => return Err(GameError::GameOver),
            PlayerStatus::Completed => return Err(GameError::CareerCompleted),
            PlayerStatus::InProgress => {}
        }

        self.attempts.push(Attempt {
            challenge_id: challenge_id.to_string(),
            selected_index,
            is_correct,
            points_awarded: points,
            timestamp: Utc::now(),
        });
        log::debug!(
            "player {} answered {challenge_id} (index {selected_index}, correct {is_correct}, points {points})",
            self.id
        );

        if is_correct {
            self.score = self.score.saturating_add(points.max(0));
            if !self.has_completed(challenge_id) {
                self.completed.push(CompletedChallenge {
                    challenge_id: challenge_id.to_string(),
                    stage: challenge_stage,
                });
            }
            return Ok(AttemptOutcome::Correct {
                points_awarded: points,
                total_score: self.score,
                current_errors: self.current_errors,
                errors_remaining: self.errors_remaining(),
                stage: self.stage,
            });
        }

        self.current_errors += 1;
        if self.current_errors >= MAX_ERRORS_PER_STAGE {
            return Ok(self.trigger_game_over(points));
        }
        Ok(AttemptOutcome::Wrong {
            points_awarded: points,
            current_errors: self.current_errors,
            errors_remaining: self.errors_remaining(),
            total_score: self.score,
            stage: self.stage,
        })
    }

    fn trigger_game_over(&mut self, points: i32) -> AttemptOutcome {
        let stage = self.stage;
        let before = self.completed.len();
        self.completed.retain(|entry| entry.stage != stage);
        self.game_over_count += 1;
        self.current_errors = 0;
        self.status = PlayerStatus::GameOver;
        log::info!(
            "player {} hit game over #{} at stage {stage}; cleared {} completed challenges",
            self.id,
            self.game_over_count,
            before - self.completed.len()
        );
        AttemptOutcome::GameOver {
            points_awarded: points,
            current_errors: self.current_errors,
            game_over_count: self.game_over_count,
            total_score: self.score,
            stage,
            message: MSG_GAME_OVER.to_string(),
        }
    }

    /// Leave game over. Returns `false` (and changes nothing) otherwise.
    pub fn recover_from_game_over(&mut self) -> bool {
        if self.status != PlayerStatus::GameOver {
            return false;
        }
        self.status = PlayerStatus::InProgress;
        self.current_errors = 0;
        log::info!("player {} recovered at stage {}", self.id, self.stage);
        true
    }

    /// Promote when the current stage quota is met and a next stage exists.
    pub fn check_promotion(&mut self) -> Option<Promotion> {
        if self.stage_completed_count() < CHALLENGES_TO_PROMOTE {
            return None;
        }
        let previous_stage = self.stage;
        let new_stage = previous_stage.next()?;
        self.stage = new_stage;
        self.current_errors = 0;
        log::info!(
            "player {} promoted from {previous_stage} to {new_stage}",
            self.id
        );
        Some(Promotion {
            promoted: true,
            previous_stage,
            new_stage,
        })
    }

    /// True when the terminal stage quota has been met.
    #[must_use]
    pub fn career_goal_reached(&self) -> bool {
        self.stage.is_terminal() && self.stage_completed_count() >= CHALLENGES_TO_PROMOTE
    }

    /// Enter the terminal `completed` status.
    pub fn mark_completed(&mut self) {
        if self.status != PlayerStatus::Completed {
            self.status = PlayerStatus::Completed;
            log::info!("player {} completed the career at score {}", self.id, self.score);
        }
    }

    pub fn collect_item(&mut self, item_id: &str) -> bool {
        self.world.collect_item(item_id)
    }

    pub fn complete_region(&mut self, region_id: &str) -> bool {
        self.world.complete_region(region_id)
    }

    pub fn set_current_region(&mut self, region_id: impl Into<String>) {
        self.world.set_current_region(region_id);
    }

    pub const fn set_position(&mut self, position: Position) {
        self.world.set_position(position);
    }

    pub fn update_world(&mut self, update: WorldStateUpdate) {
        self.world.apply(update);
    }

    pub fn reset_world(&mut self) {
        self.world.reset();
    }

    /// Flatten into a persistence record.
    #[must_use]
    pub fn to_snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot::from(self.clone())
    }

    /// Rebuild a player from a persistence record.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSnapshot`] or [`GameError::InvalidName`]
    /// when the record violates an aggregate invariant.
    pub fn from_snapshot(snapshot: PlayerSnapshot) -> Result<Self, GameError> {
        Self::try_from(snapshot)
    }
}

/// Flat persistence record for a [`Player`], including the full attempt log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub character: Character,
    #[serde(default)]
    pub language: Language,
    pub stage: CareerStage,
    pub score: i32,
    pub current_errors: u32,
    #[serde(default)]
    pub completed_challenges: Vec<CompletedChallenge>,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
    #[serde(default)]
    pub game_over_count: u32,
    pub status: PlayerStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub world: WorldState,
}

impl From<Player> for PlayerSnapshot {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            character: player.character,
            language: player.language,
            stage: player.stage,
            score: player.score,
            current_errors: player.current_errors,
            completed_challenges: player.completed,
            attempts: player.attempts,
            game_over_count: player.game_over_count,
            status: player.status,
            created_at: player.created_at,
            world: player.world,
        }
    }
}

impl TryFrom<PlayerSnapshot> for Player {
    type Error = GameError;

    fn try_from(snapshot: PlayerSnapshot) -> Result<Self, Self::Error> {
        if snapshot.id.trim().is_empty() {
            return Err(GameError::InvalidSnapshot {
                reason: "id must not be empty".to_string(),
            });
        }
        if snapshot.current_errors >= MAX_ERRORS_PER_STAGE {
            return Err(GameError::InvalidSnapshot {
                reason: format!(
                    "current_errors {} must stay below {MAX_ERRORS_PER_STAGE}",
                    snapshot.current_errors
                ),
            });
        }
        if snapshot.score < 0 {
            return Err(GameError::InvalidSnapshot {
                reason: format!("score must not be negative (got {})", snapshot.score),
            });
        }
        let mut seen = HashSet::with_capacity(snapshot.completed_challenges.len());
        for entry in &snapshot.completed_challenges {
            if !seen.insert(entry.challenge_id.as_str()) {
                return Err(GameError::InvalidSnapshot {
                    reason: format!("duplicate completed challenge '{}'", entry.challenge_id),
                });
            }
            if entry.stage.ranks_above(snapshot.stage) {
                return Err(GameError::InvalidSnapshot {
                    reason: format!(
                        "completed challenge '{}' belongs to {} above stage {}",
                        entry.challenge_id, entry.stage, snapshot.stage
                    ),
                });
            }
        }
        let name = normalize_name(&snapshot.name)?;
        Ok(Self {
            id: snapshot.id,
            name,
            character: snapshot.character,
            language: snapshot.language,
            stage: snapshot.stage,
            score: snapshot.score,
            current_errors: snapshot.current_errors,
            completed: snapshot.completed_challenges,
            attempts: snapshot.attempts,
            game_over_count: snapshot.game_over_count,
            status: snapshot.status,
            created_at: snapshot.created_at,
            world: snapshot.world,
        })
    }
}

//! Run lifecycle entry points: start, recovery, and progress projection.
use serde::{Deserialize, Serialize};

use crate::constants::{
    CHALLENGES_TO_PROMOTE, MAX_ERRORS_PER_STAGE, MSG_NOT_GAME_OVER, MSG_RECOVERED,
};
use crate::error::GameError;
use crate::player::{Character, Language, Player, PlayerStatus};
use crate::stage::CareerStage;

/// Create a player for a new run.
///
/// # Errors
///
/// Returns a validation failure for an invalid name or unknown language tag.
pub fn start_game(name: &str, character: Character, language: &str) -> Result<Player, GameError> {
    let language: Language = language.parse()?;
    let player = Player::new(name, character, language)?;
    log::info!(
        "started run {} for '{}' ({})",
        player.id(),
        player.name(),
        player.language()
    );
    Ok(player)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryResult {
    pub recovered: bool,
    pub status: PlayerStatus,
    pub stage: CareerStage,
    pub score: i32,
    pub message: String,
}

/// Bring a player out of game over. A no-op for any other status.
pub fn recover_from_game_over(player: &mut Player) -> RecoveryResult {
    let recovered = player.recover_from_game_over();
    let message = if recovered {
        MSG_RECOVERED
    } else {
        MSG_NOT_GAME_OVER
    };
    RecoveryResult {
        recovered,
        status: player.status(),
        stage: player.stage(),
        score: player.score(),
        message: message.to_string(),
    }
}

/// Read-only summary of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    pub stage: CareerStage,
    pub stage_name: String,
    pub stage_index: usize,
    pub total_stages: usize,
    pub score: i32,
    pub completed_challenge_count: usize,
    pub stage_completed_count: usize,
    pub challenges_to_promote: usize,
    pub total_attempt_count: usize,
    pub current_errors: u32,
    pub max_errors: u32,
    pub errors_remaining: u32,
    pub game_over_count: u32,
    pub status: PlayerStatus,
}

#[must_use]
pub fn get_progress(player: &Player) -> ProgressView {
    let stage = player.stage();
    ProgressView {
        stage,
        stage_name: stage.title().to_string(),
        stage_index: stage.index(),
        total_stages: CareerStage::COUNT,
        score: player.score(),
        completed_challenge_count: player.completed_challenges().len(),
        stage_completed_count: player.stage_completed_count(),
        challenges_to_promote: CHALLENGES_TO_PROMOTE,
        total_attempt_count: player.attempts().len(),
        current_errors: player.current_errors(),
        max_errors: MAX_ERRORS_PER_STAGE,
        errors_remaining: player.errors_remaining(),
        game_over_count: player.game_over_count(),
        status: player.status(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_game_validates_language_and_name() {
        let player = start_game("Ada", Character::default(), "rust").unwrap();
        assert_eq!(player.language(), Language::Rust);
        assert_eq!(player.stage(), CareerStage::Intern);

        let err = start_game("Ada", Character::default(), "klingon").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
        assert!(start_game("", Character::default(), "go").is_err());
    }

    #[test]
    fn recovery_is_noop_outside_game_over() {
        let mut player = start_game("Ada", Character::default(), "go").unwrap();
        player.record_attempt("a", CareerStage::Intern, 0, true, 100).unwrap();
        let result = recover_from_game_over(&mut player);
        assert!(!result.recovered);
        assert_eq!(result.status, PlayerStatus::InProgress);
        assert_eq!(result.score, 100);
        assert_eq!(result.message, MSG_NOT_GAME_OVER);
    }

    #[test]
    fn recovery_resets_status_and_preserves_history() {
        let mut player = start_game("Ada", Character::default(), "go").unwrap();
        player.record_attempt("a", CareerStage::Intern, 0, true, 100).unwrap();
        player.record_attempt("b", CareerStage::Intern, 1, false, 0).unwrap();
        player.record_attempt("c", CareerStage::Intern, 1, false, 0).unwrap();
        assert_eq!(player.status(), PlayerStatus::GameOver);

        let result = recover_from_game_over(&mut player);
        assert!(result.recovered);
        assert_eq!(result.status, PlayerStatus::InProgress);
        assert_eq!(result.stage, CareerStage::Intern);
        assert_eq!(result.score, 100);
        assert_eq!(player.current_errors(), 0);
        assert_eq!(player.game_over_count(), 1);
        assert_eq!(player.attempts().len(), 3);
    }

    #[test]
    fn progress_projects_without_mutation() {
        let mut player = start_game("Ada", Character::default(), "python").unwrap();
        player.record_attempt("a", CareerStage::Intern, 0, true, 100).unwrap();
        player.record_attempt("b", CareerStage::Intern, 2, false, 0).unwrap();
        let before = player.clone();

        let view = get_progress(&player);
        assert_eq!(view.stage, CareerStage::Intern);
        assert_eq!(view.stage_index, 0);
        assert_eq!(view.total_stages, 7);
        assert_eq!(view.score, 100);
        assert_eq!(view.completed_challenge_count, 1);
        assert_eq!(view.total_attempt_count, 2);
        assert_eq!(view.current_errors, 1);
        assert_eq!(view.max_errors, 2);
        assert_eq!(view.errors_remaining, 1);
        assert_eq!(view.status, PlayerStatus::InProgress);
        assert_eq!(player, before);
    }
}

//! Precondition checks shared by the answer flow and outer layers.
//!
//! Each guard is independent and fails with its own [`GameError`] variant.
use crate::error::GameError;
use crate::player::{CompletedChallenge, PlayerStatus};
use crate::stage::CareerStage;

/// Fails with a permission error when `required_stage` outranks `player_stage`.
///
/// # Errors
///
/// Returns [`GameError::StageLocked`].
pub fn validate_stage_access(
    player_stage: CareerStage,
    required_stage: CareerStage,
) -> Result<(), GameError> {
    if required_stage.ranks_above(player_stage) {
        return Err(GameError::StageLocked {
            required: required_stage,
            current: player_stage,
        });
    }
    Ok(())
}

/// Fails with a state conflict while the run is in game over.
///
/// # Errors
///
/// Returns [`GameError::GameOver`].
pub fn validate_not_game_over(status: PlayerStatus) -> Result<(), GameError> {
    if matches!(status, PlayerStatus::GameOver) {
        return Err(GameError::GameOver);
    }
    Ok(())
}

/// Fails with a state conflict when `challenge_id` is already completed.
///
/// # Errors
///
/// Returns [`GameError::AlreadyCompleted`].
pub fn validate_challenge_not_completed(
    completed: &[CompletedChallenge],
    challenge_id: &str,
) -> Result<(), GameError> {
    if completed.iter().any(|entry| entry.challenge_id == challenge_id) {
        return Err(GameError::AlreadyCompleted {
            challenge_id: challenge_id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn stage_access_allows_same_and_lower_stages() {
        assert!(validate_stage_access(CareerStage::Mid, CareerStage::Mid).is_ok());
        assert!(validate_stage_access(CareerStage::Mid, CareerStage::Intern).is_ok());
        let err = validate_stage_access(CareerStage::Intern, CareerStage::Staff).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Permission);
        assert!(err.to_string().contains("staff"));
    }

    #[test]
    fn game_over_guard_only_trips_on_game_over() {
        assert!(validate_not_game_over(PlayerStatus::InProgress).is_ok());
        assert!(validate_not_game_over(PlayerStatus::Completed).is_ok());
        assert_eq!(
            validate_not_game_over(PlayerStatus::GameOver),
            Err(GameError::GameOver)
        );
    }

    #[test]
    fn completed_guard_matches_exact_ids() {
        let completed = vec![CompletedChallenge {
            challenge_id: "intern_1".to_string(),
            stage: CareerStage::Intern,
        }];
        assert!(validate_challenge_not_completed(&completed, "intern_10").is_ok());
        let err = validate_challenge_not_completed(&completed, "intern_1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StateConflict);
        assert!(err.to_string().contains("intern_1"));
    }
}

//! Answer submission flow: guards, scoring, player transition, promotion.
use serde::Serialize;

use crate::challenge::Challenge;
use crate::constants::{MSG_CAREER_COMPLETED, MSG_PROMOTION_PREFIX};
use crate::error::GameError;
use crate::guards::{
    validate_challenge_not_completed, validate_not_game_over, validate_stage_access,
};
use crate::player::{AttemptOutcome, Player, Promotion};
use crate::scoring::ScoringRules;
use crate::stage::CareerStage;

/// Promotion fields merged into an answer result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotionNotice {
    pub promotion: bool,
    pub new_stage: CareerStage,
    pub promotion_message: String,
}

impl From<Promotion> for PromotionNotice {
    fn from(promotion: Promotion) -> Self {
        Self {
            promotion: promotion.promoted,
            new_stage: promotion.new_stage,
            promotion_message: format!("{MSG_PROMOTION_PREFIX} {}!", promotion.new_stage.title()),
        }
    }
}

/// Everything a client needs after submitting an answer.
///
/// Serializes flat: the `outcome` tag and its fields, `explanation`, and the
/// promotion fields when a promotion happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerResult {
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
    pub explanation: String,
    #[serde(flatten)]
    pub promotion: Option<PromotionNotice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_message: Option<String>,
}

impl AnswerResult {
    #[must_use]
    pub const fn promoted(&self) -> bool {
        self.promotion.is_some()
    }

    #[must_use]
    pub const fn career_completed(&self) -> bool {
        self.completion_message.is_some()
    }
}

/// Submit an answer using the default scoring table.
///
/// # Errors
///
/// See [`submit_answer_with_rules`].
pub fn submit_answer(
    player: &mut Player,
    challenge: &Challenge,
    selected_index: i64,
) -> Result<AnswerResult, GameError> {
    submit_answer_with_rules(player, challenge, selected_index, &ScoringRules::default())
}

/// Submit an answer and apply every resulting transition.
///
/// Guards run in a fixed order (game over, stage access, already completed,
/// option bounds) and the first failure is returned with the player untouched.
///
/// # Errors
///
/// Returns a state conflict during game over, after career completion, or for
/// an already completed challenge; a permission failure when the challenge
/// stage is locked; a validation failure for an out-of-range option index.
pub fn submit_answer_with_rules(
    player: &mut Player,
    challenge: &Challenge,
    selected_index: i64,
    rules: &ScoringRules,
) -> Result<AnswerResult, GameError> {
    validate_not_game_over(player.status())?;
    validate_stage_access(player.stage(), challenge.required_stage())?;
    validate_challenge_not_completed(player.completed_challenges(), challenge.id())?;

    let option_count = challenge.options().len();
    let (index, option) = usize::try_from(selected_index)
        .ok()
        .and_then(|idx| challenge.option(idx).map(|opt| (idx, opt)))
        .ok_or(GameError::InvalidOptionIndex {
            index: selected_index,
            option_count,
        })?;

    let is_correct = index == challenge.correct_index();
    // Stage-wide running counter, not a per-challenge count.
    let points = rules.calculate_points(is_correct, player.current_errors(), challenge.category());

    let mut outcome = player.record_attempt(
        challenge.id(),
        challenge.required_stage(),
        index,
        is_correct,
        points,
    )?;

    let mut promotion = None;
    let mut completion_message = None;
    if is_correct {
        if let Some(promoted) = player.check_promotion() {
            outcome.reset_errors();
            promotion = Some(PromotionNotice::from(promoted));
        } else if player.career_goal_reached() {
            player.mark_completed();
            completion_message = Some(MSG_CAREER_COMPLETED.to_string());
        }
    }

    Ok(AnswerResult {
        outcome,
        explanation: option.explanation.clone(),
        promotion,
        completion_message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::{ChallengeCategory, fixtures::challenge};
    use crate::error::ErrorKind;
    use crate::player::{Character, Language, PlayerStatus};

    fn fresh() -> Player {
        Player::new("Ada", Character::default(), Language::Rust).unwrap()
    }

    fn intern(id: &str) -> Challenge {
        challenge(id, CareerStage::Intern, ChallengeCategory::Logic, 1)
    }

    #[test]
    fn clean_correct_answer_awards_full_points_with_explanation() {
        let mut player = fresh();
        let result = submit_answer(&mut player, &intern("c1"), 1).unwrap();
        assert_eq!(result.outcome.label(), "correct");
        assert_eq!(result.outcome.total_score(), 100);
        assert_eq!(result.explanation, "explanation 1");
        assert!(!result.promoted());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "correct");
        assert_eq!(json["points_awarded"], 100);
        assert_eq!(json["errors_remaining"], 2);
        assert!(json.get("promotion").is_none());
    }

    #[test]
    fn correct_after_error_awards_reduced_points() {
        let mut player = fresh();
        submit_answer(&mut player, &intern("c1"), 0).unwrap();
        let result = submit_answer(&mut player, &intern("c2"), 1).unwrap();
        assert!(matches!(
            result.outcome,
            AttemptOutcome::Correct {
                points_awarded: 50,
                current_errors: 1,
                ..
            }
        ));
    }

    #[test]
    fn wrong_architecture_answer_records_penalty() {
        let mut player = fresh();
        let arch = challenge("a1", CareerStage::Intern, ChallengeCategory::Architecture, 0);
        let result = submit_answer(&mut player, &arch, 2).unwrap();
        assert!(matches!(
            result.outcome,
            AttemptOutcome::Wrong {
                points_awarded: -30,
                current_errors: 1,
                errors_remaining: 1,
                ..
            }
        ));
        assert_eq!(player.attempts()[0].points_awarded, -30);
        assert_eq!(player.score(), 0);
    }

    #[test]
    fn guards_fail_before_any_mutation() {
        let mut player = fresh();
        let locked = challenge("s1", CareerStage::Senior, ChallengeCategory::Logic, 0);
        let err = submit_answer(&mut player, &locked, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Permission);
        assert!(err.to_string().contains("senior"));

        let err = submit_answer(&mut player, &intern("c1"), 99).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("99"));
        let err = submit_answer(&mut player, &intern("c1"), -1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(player.attempts().is_empty());

        submit_answer(&mut player, &intern("c1"), 1).unwrap();
        let err = submit_answer(&mut player, &intern("c1"), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StateConflict);
        assert_eq!(player.attempts().len(), 1);
    }

    #[test]
    fn game_over_guard_runs_first() {
        let mut player = fresh();
        submit_answer(&mut player, &intern("c1"), 0).unwrap();
        let result = submit_answer(&mut player, &intern("c2"), 0).unwrap();
        assert!(result.outcome.is_game_over());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "game_over");
        assert_eq!(json["game_over_count"], 1);

        let locked = challenge("s1", CareerStage::Senior, ChallengeCategory::Logic, 0);
        assert_eq!(
            submit_answer(&mut player, &locked, 99),
            Err(GameError::GameOver)
        );
    }

    #[test]
    fn third_stage_completion_promotes_and_resets_errors() {
        let mut player = fresh();
        submit_answer(&mut player, &intern("c1"), 1).unwrap();
        submit_answer(&mut player, &intern("w1"), 0).unwrap();
        submit_answer(&mut player, &intern("c2"), 1).unwrap();
        let result = submit_answer(&mut player, &intern("c3"), 1).unwrap();

        assert!(result.promoted());
        assert_eq!(result.outcome.current_errors(), 0);
        let notice = result.promotion.as_ref().unwrap();
        assert_eq!(notice.new_stage, CareerStage::Junior);
        assert!(notice.promotion_message.contains("Junior Developer"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["promotion"], true);
        assert_eq!(json["new_stage"], "junior");
        assert_eq!(player.stage(), CareerStage::Junior);
        assert_eq!(player.current_errors(), 0);
    }

    #[test]
    fn completing_terminal_stage_finishes_career() {
        let mut snapshot = fresh().to_snapshot();
        snapshot.stage = CareerStage::Distinguished;
        let mut player = Player::from_snapshot(snapshot).unwrap();
        let top = |id: &str| challenge(id, CareerStage::Distinguished, ChallengeCategory::Logic, 0);

        submit_answer(&mut player, &top("d1"), 0).unwrap();
        submit_answer(&mut player, &top("d2"), 0).unwrap();
        let result = submit_answer(&mut player, &top("d3"), 0).unwrap();
        assert!(!result.promoted());
        assert!(result.career_completed());
        assert_eq!(player.status(), PlayerStatus::Completed);

        let err = submit_answer(&mut player, &top("d4"), 0).unwrap_err();
        assert_eq!(err, GameError::CareerCompleted);
        assert_eq!(player.attempts().len(), 3);
    }

    #[test]
    fn custom_rules_flow_through() {
        let mut player = fresh();
        let rules = ScoringRules {
            clean: 10,
            ..ScoringRules::default()
        };
        let result = submit_answer_with_rules(&mut player, &intern("c1"), 1, &rules).unwrap();
        assert_eq!(result.outcome.total_score(), 10);
    }
}

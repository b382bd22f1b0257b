//! Named simulation scenarios and the expectations that judge them.
use anyhow::Result;
use careerquest_game::{CHALLENGES_TO_PROMOTE, CareerStage, MAX_ERRORS_PER_STAGE, PlayerStatus};

use crate::logic::game_tester::{RunEnding, SimulationSummary};
use crate::logic::{AnswerStrategy, SimulationPlan};

/// Every runnable scenario key, in the order `all` expands to.
pub const SCENARIO_KEYS: [&str; 6] = [
    "smoke",
    "full-career",
    "game-over-recovery",
    "architecture-penalty",
    "promotion-ladder",
    "careless-run",
];

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    anyhow::ensure!(
        summary.attempts.len() == 1,
        "smoke run should answer exactly one challenge (answered {})",
        summary.attempts.len()
    );
    let first = &summary.attempts[0];
    anyhow::ensure!(first.outcome == "correct", "first answer should be correct");
    anyhow::ensure!(
        first.stage == CareerStage::first(),
        "first challenge should come from the first stage"
    );
    anyhow::ensure!(
        summary.progress.score == first.points_awarded,
        "score should equal the only award"
    );
    Ok(())
}

fn completed_career_expectation(summary: &SimulationSummary) -> Result<()> {
    anyhow::ensure!(
        summary.career_completed(),
        "career should complete (ended with {})",
        summary.ending.label()
    );
    anyhow::ensure!(
        summary.progress.status == PlayerStatus::Completed,
        "final status should be completed"
    );
    anyhow::ensure!(
        summary.progress.stage == CareerStage::last(),
        "final stage should be {}",
        CareerStage::last()
    );
    Ok(())
}

fn flawless_expectation(summary: &SimulationSummary) -> Result<()> {
    let expected = CareerStage::COUNT * CHALLENGES_TO_PROMOTE;
    anyhow::ensure!(
        summary.attempts.len() == expected,
        "flawless career should take {expected} answers (took {})",
        summary.attempts.len()
    );
    anyhow::ensure!(summary.misses().next().is_none(), "no answer should miss");
    anyhow::ensure!(
        summary.progress.game_over_count == 0,
        "flawless career should never hit game over"
    );
    Ok(())
}

fn recovery_expectation(summary: &SimulationSummary) -> Result<()> {
    anyhow::ensure!(
        summary.progress.game_over_count >= 1,
        "stubborn run should hit game over at least once"
    );
    anyhow::ensure!(
        summary.recoveries == summary.progress.game_over_count,
        "every game over should be recovered ({} recoveries, {} game overs)",
        summary.recoveries,
        summary.progress.game_over_count
    );
    let game_overs = summary
        .attempts
        .iter()
        .filter(|a| a.outcome == "game_over")
        .count();
    anyhow::ensure!(
        u32::try_from(game_overs).unwrap_or(u32::MAX) == summary.progress.game_over_count,
        "game over outcomes should match the persisted counter"
    );
    anyhow::ensure!(
        summary.progress.current_errors < MAX_ERRORS_PER_STAGE,
        "error counter must stay below the stage limit"
    );
    Ok(())
}

fn architecture_penalty_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut architecture_misses = 0;
    for miss in summary.misses() {
        let expected = if miss.category == "architecture" {
            architecture_misses += 1;
            -30
        } else {
            0
        };
        anyhow::ensure!(
            miss.points_awarded == expected,
            "miss on {} ({}) should award {expected}, got {}",
            miss.challenge_id,
            miss.category,
            miss.points_awarded
        );
    }
    anyhow::ensure!(
        architecture_misses > 0,
        "run should miss at least one architecture challenge"
    );
    Ok(())
}

fn monotonic_score_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut previous = 0;
    for attempt in &summary.attempts {
        anyhow::ensure!(
            attempt.total_score >= previous,
            "score dropped from {previous} to {} at {}",
            attempt.total_score,
            attempt.challenge_id
        );
        anyhow::ensure!(attempt.total_score >= 0, "score must never be negative");
        previous = attempt.total_score;
    }
    Ok(())
}

fn promotion_ladder_expectation(summary: &SimulationSummary) -> Result<()> {
    let expected: Vec<CareerStage> = CareerStage::ALL.iter().skip(1).copied().collect();
    anyhow::ensure!(
        summary.promotions == expected,
        "promotions should climb every stage in order (got {:?})",
        summary.promotions
    );
    for (idx, attempt) in summary.attempts.iter().enumerate() {
        let at_quota = (idx + 1) % CHALLENGES_TO_PROMOTE == 0;
        let expects_promotion = at_quota && !attempt.stage.is_terminal();
        anyhow::ensure!(
            attempt.promoted_to.is_some() == expects_promotion,
            "answer {} at {} promotion mismatch",
            idx + 1,
            attempt.stage
        );
        if let Some(next) = attempt.promoted_to {
            anyhow::ensure!(
                attempt.stage.next() == Some(next),
                "promotion from {} should reach the next stage, not {next}",
                attempt.stage
            );
        }
    }
    Ok(())
}

fn careless_run_expectation(summary: &SimulationSummary) -> Result<()> {
    anyhow::ensure!(
        !matches!(summary.ending, RunEnding::Rejected(_)),
        "no submission should be rejected ({})",
        summary.ending.label()
    );
    anyhow::ensure!(
        summary.final_player.attempts().len() == summary.attempts.len(),
        "attempt log should match the simulator record"
    );
    anyhow::ensure!(
        summary.progress.current_errors < MAX_ERRORS_PER_STAGE,
        "error counter must stay below the stage limit"
    );
    Ok(())
}

fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke Test",
        SimulationPlan::new(AnswerStrategy::Perfect)
            .with_max_attempts(1)
            .with_expectation(smoke_expectation),
    )
}

fn full_career_scenario() -> TestScenario {
    TestScenario::simulation(
        "Full Career - Perfect Strategy",
        SimulationPlan::new(AnswerStrategy::Perfect)
            .with_expectation(completed_career_expectation)
            .with_expectation(flawless_expectation),
    )
}

fn game_over_recovery_scenario() -> TestScenario {
    TestScenario::simulation(
        "Game Over Recovery - Stubborn Strategy",
        SimulationPlan::new(AnswerStrategy::Stubborn)
            .with_expectation(recovery_expectation)
            .with_expectation(completed_career_expectation),
    )
}

fn architecture_penalty_scenario() -> TestScenario {
    TestScenario::simulation(
        "Architecture Penalty",
        SimulationPlan::new(AnswerStrategy::Stubborn)
            .with_expectation(architecture_penalty_expectation)
            .with_expectation(monotonic_score_expectation),
    )
}

fn promotion_ladder_scenario() -> TestScenario {
    TestScenario::simulation(
        "Promotion Ladder",
        SimulationPlan::new(AnswerStrategy::Perfect).with_expectation(promotion_ladder_expectation),
    )
}

fn careless_run_scenario() -> TestScenario {
    TestScenario::simulation(
        "Careless Run",
        SimulationPlan::new(AnswerStrategy::Careless)
            .with_expectation(careless_run_expectation)
            .with_expectation(monotonic_score_expectation),
    )
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(smoke_scenario()),
        "full-career" | "full" => Some(full_career_scenario()),
        "game-over-recovery" | "recovery" => Some(game_over_recovery_scenario()),
        "architecture-penalty" | "architecture" => Some(architecture_penalty_scenario()),
        "promotion-ladder" | "ladder" => Some(promotion_ladder_scenario()),
        "careless-run" | "careless" => Some(careless_run_scenario()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("full-career", "Full Career - Perfect Strategy"),
        ("game-over-recovery", "Game Over Recovery - Stubborn Strategy"),
        ("architecture-penalty", "Architecture Penalty"),
        ("promotion-ladder", "Promotion Ladder"),
        ("careless-run", "Careless Run"),
    ]
}

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use careerquest_game::{
    CareerStage, Challenge, ChallengeCatalog, Character, Language, Player, PlayerStatus,
    ProgressView, ScoringRules, get_progress, recover_from_game_over, start_game,
    submit_answer_with_rules,
};
use serde::Serialize;

use crate::logic::policy::AnswerStrategy;

/// Upper bound on answers per run when a plan does not set one.
pub const DEFAULT_MAX_ATTEMPTS: usize = 500;

/// Content and scoring table shared by every simulated run.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    catalog: ChallengeCatalog,
    rules: ScoringRules,
}

impl TesterAssets {
    pub const fn new(catalog: ChallengeCatalog, rules: ScoringRules) -> Self {
        Self { catalog, rules }
    }

    /// Bundled catalog with the default scoring table.
    pub fn load_default() -> Result<Self> {
        let catalog =
            ChallengeCatalog::load_from_static().context("bundled challenge catalog is invalid")?;
        Ok(Self::new(catalog, ScoringRules::default()))
    }

    /// Load overrides from disk, falling back to bundled content for anything unset.
    pub fn load(catalog_path: Option<&Path>, rules_path: Option<&Path>) -> Result<Self> {
        let catalog = match catalog_path {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read catalog {}", path.display()))?;
                ChallengeCatalog::from_json(&json)
                    .with_context(|| format!("invalid catalog {}", path.display()))?
            }
            None => ChallengeCatalog::load_from_static()
                .context("bundled challenge catalog is invalid")?,
        };
        let rules = match rules_path {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read scoring rules {}", path.display()))?;
                let rules: ScoringRules = serde_json::from_str(&json)
                    .with_context(|| format!("invalid scoring rules {}", path.display()))?;
                rules
                    .validate()
                    .with_context(|| format!("inconsistent scoring rules {}", path.display()))?;
                rules
            }
            None => ScoringRules::default(),
        };
        Ok(Self::new(catalog, rules))
    }

    pub const fn catalog(&self) -> &ChallengeCatalog {
        &self.catalog
    }

    pub const fn rules(&self) -> &ScoringRules {
        &self.rules
    }
}

/// Declarative plan for running a simulated career.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: AnswerStrategy,
    pub max_attempts: Option<usize>,
    pub recover_on_game_over: bool,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: AnswerStrategy) -> Self {
        Self {
            strategy,
            max_attempts: None,
            recover_on_game_over: true,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Stop at the first game over instead of recovering.
    #[must_use]
    pub const fn without_recovery(mut self) -> Self {
        self.recover_on_game_over = false;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Why a simulated run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEnding {
    CareerCompleted,
    GameOver,
    AttemptLimit,
    CatalogExhausted,
    Rejected(String),
}

impl RunEnding {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::CareerCompleted => "career completed".to_string(),
            Self::GameOver => "game over".to_string(),
            Self::AttemptLimit => "attempt limit".to_string(),
            Self::CatalogExhausted => "catalog exhausted".to_string(),
            Self::Rejected(reason) => format!("rejected: {reason}"),
        }
    }
}

/// One answered challenge as seen by the simulator.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub challenge_id: String,
    pub category: String,
    pub stage: CareerStage,
    pub option_index: usize,
    pub outcome: &'static str,
    pub points_awarded: i32,
    pub total_score: i32,
    pub promoted_to: Option<CareerStage>,
    pub policy_name: &'static str,
    pub rationale: Option<String>,
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: AnswerStrategy,
    pub attempts: Vec<AttemptRecord>,
    pub promotions: Vec<CareerStage>,
    pub recoveries: u32,
    pub ending: RunEnding,
    pub progress: ProgressView,
    pub final_player: Player,
}

impl SimulationSummary {
    #[must_use]
    pub fn career_completed(&self) -> bool {
        self.ending == RunEnding::CareerCompleted
    }

    /// Wrong answers (including the ones that ended a stage in game over).
    pub fn misses(&self) -> impl Iterator<Item = &AttemptRecord> {
        self.attempts.iter().filter(|a| a.outcome != "correct")
    }
}

/// Headless deterministic runner for the progression rules.
#[derive(Clone)]
pub struct GameTester {
    verbose: bool,
    assets: Arc<TesterAssets>,
}

impl GameTester {
    pub const fn new(assets: Arc<TesterAssets>, verbose: bool) -> Self {
        Self { verbose, assets }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Next challenge to offer: an open one from the current stage first,
    /// then anything else the player may still attempt.
    fn next_challenge<'a>(&'a self, player: &'a Player) -> Option<&'a Challenge> {
        let catalog = &self.assets.catalog;
        catalog
            .for_stage(player.stage())
            .find(|c| !player.has_completed(c.id()))
            .or_else(|| catalog.available_for(player).next())
    }

    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let max_attempts = plan.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let language = Language::ALL[usize::try_from(seed).unwrap_or(0) % Language::ALL.len()];
        let mut player = start_game(&format!("sim-{seed}"), Character::default(), language.as_str())
            .context("failed to start simulated run")?;
        let mut policy = plan.strategy.create_policy(seed);

        if self.verbose {
            println!(
                "🎮 Starting simulation | seed:{seed} strategy:{} language:{language}",
                plan.strategy
            );
        }

        let mut attempts = Vec::new();
        let mut promotions = Vec::new();
        let mut recoveries = 0;

        let ending = loop {
            match player.status() {
                PlayerStatus::Completed => break RunEnding::CareerCompleted,
                PlayerStatus::GameOver if plan.recover_on_game_over => {
                    recover_from_game_over(&mut player);
                    recoveries += 1;
                    continue;
                }
                PlayerStatus::GameOver => break RunEnding::GameOver,
                PlayerStatus::InProgress => {}
            }
            if attempts.len() >= max_attempts {
                break RunEnding::AttemptLimit;
            }
            let Some(challenge) = self.next_challenge(&player).cloned() else {
                break RunEnding::CatalogExhausted;
            };

            let decision = policy.pick_option(&player, &challenge);
            let selected = i64::try_from(decision.option_index).unwrap_or(i64::MAX);
            let stage = player.stage();
            let result = match submit_answer_with_rules(
                &mut player,
                &challenge,
                selected,
                &self.assets.rules,
            ) {
                Ok(result) => result,
                Err(err) => break RunEnding::Rejected(err.to_string()),
            };

            let promoted_to = result.promotion.as_ref().map(|notice| notice.new_stage);
            promotions.extend(promoted_to);
            let record = AttemptRecord {
                challenge_id: challenge.id().to_string(),
                category: challenge.category().to_string(),
                stage,
                option_index: decision.option_index,
                outcome: result.outcome.label(),
                points_awarded: result.outcome.points_awarded(),
                total_score: result.outcome.total_score(),
                promoted_to,
                policy_name: policy.name(),
                rationale: decision.rationale,
            };
            log::debug!(
                "seed {seed}: {} [{}] -> {} ({} pts)",
                record.challenge_id,
                record.stage,
                record.outcome,
                record.points_awarded
            );
            if self.verbose {
                log_attempt(&record);
            }
            attempts.push(record);
        };

        if self.verbose {
            println!(
                "🏁 Run finished | {} after {} answers, score {}",
                ending.label(),
                attempts.len(),
                player.score()
            );
        }

        Ok(SimulationSummary {
            seed,
            strategy: plan.strategy,
            attempts,
            promotions,
            recoveries,
            ending,
            progress: get_progress(&player),
            final_player: player,
        })
    }
}

fn log_attempt(record: &AttemptRecord) {
    let marker = match record.outcome {
        "correct" => "✅",
        "wrong" => "❌",
        _ => "💥",
    };
    println!(
        "  {marker} {} [{}] option {} -> {} pts (score {})",
        record.challenge_id,
        record.stage,
        record.option_index,
        record.points_awarded,
        record.total_score
    );
    if let Some(stage) = record.promoted_to {
        println!("  🎉 Promoted to {}", stage.title());
    }
}

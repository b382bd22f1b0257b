use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use careerquest_game::{Challenge, Player};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Share of answers the careless strategy gets wrong.
pub const CARELESS_MISTAKE_RATE: f64 = 0.3;

/// Decision returned by an [`AnswerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub option_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(option_index: usize, rationale: Option<String>) -> Self {
        Self {
            option_index,
            rationale,
        }
    }
}

/// Policy interface for automated answering.
pub trait AnswerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select an option for the offered challenge.
    fn pick_option(&mut self, player: &Player, challenge: &Challenge) -> PolicyDecision;
}

/// Built-in answering strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnswerStrategy {
    /// Always picks the correct option.
    Perfect,
    /// Misses a seeded share of questions.
    Careless,
    /// Misses every challenge once, then answers it correctly.
    Stubborn,
}

impl AnswerStrategy {
    pub const ALL: [Self; 3] = [Self::Perfect, Self::Careless, Self::Stubborn];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Careless => "careless",
            Self::Stubborn => "stubborn",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn AnswerPolicy + Send> {
        match self {
            Self::Perfect => Box::new(PerfectPolicy),
            Self::Careless => Box::new(CarelessPolicy::new(seed, CARELESS_MISTAKE_RATE)),
            Self::Stubborn => Box::new(StubbornPolicy::default()),
        }
    }
}

impl fmt::Display for AnswerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnswerStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.label() == s.trim())
            .ok_or_else(|| format!("unknown strategy '{s}'"))
    }
}

struct PerfectPolicy;

struct CarelessPolicy {
    rng: ChaCha20Rng,
    mistake_rate: f64,
}

impl CarelessPolicy {
    fn new(seed: u64, mistake_rate: f64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            mistake_rate,
        }
    }
}

#[derive(Default)]
struct StubbornPolicy {
    missed: HashSet<String>,
}

impl AnswerPolicy for PerfectPolicy {
    fn name(&self) -> &'static str {
        "Perfect"
    }

    fn pick_option(&mut self, _player: &Player, challenge: &Challenge) -> PolicyDecision {
        PolicyDecision::new(challenge.correct_index(), None)
    }
}

impl AnswerPolicy for CarelessPolicy {
    fn name(&self) -> &'static str {
        "Careless"
    }

    fn pick_option(&mut self, _player: &Player, challenge: &Challenge) -> PolicyDecision {
        let correct = challenge.correct_index();
        let roll = self.rng.r#gen::<f64>();
        if roll >= self.mistake_rate {
            return PolicyDecision::new(correct, Some(format!("roll {roll:.2}")));
        }
        let wrong = wrong_indices(challenge);
        let idx = wrong[self.rng.gen_range(0..wrong.len())];
        PolicyDecision::new(idx, Some(format!("slipped (roll {roll:.2})")))
    }
}

impl AnswerPolicy for StubbornPolicy {
    fn name(&self) -> &'static str {
        "Stubborn"
    }

    fn pick_option(&mut self, _player: &Player, challenge: &Challenge) -> PolicyDecision {
        if self.missed.contains(challenge.id()) {
            return PolicyDecision::new(challenge.correct_index(), Some("second try".to_string()));
        }
        self.missed.insert(challenge.id().to_string());
        let idx = wrong_indices(challenge)[0];
        PolicyDecision::new(idx, Some("first try".to_string()))
    }
}

/// Indices of every incorrect option. Never empty for a valid challenge.
fn wrong_indices(challenge: &Challenge) -> Vec<usize> {
    challenge
        .options()
        .iter()
        .enumerate()
        .filter(|(_, option)| !option.is_correct)
        .map(|(idx, _)| idx)
        .collect()
}

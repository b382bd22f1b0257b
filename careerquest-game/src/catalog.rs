use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hasher;
use thiserror::Error;
use twox_hash::XxHash64;

use crate::challenge::Challenge;
use crate::error::GameError;
use crate::player::Player;
use crate::stage::CareerStage;

const BUNDLED_CATALOG: &str = include_str!("../assets/challenges.json");
const FINGERPRINT_SEED: u64 = 0x00C4_EE12;

/// Errors raised while loading challenge content.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse challenge content: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] GameError),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    challenges: Vec<Challenge>,
}

/// Validated set of challenges with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ChallengeCatalog {
    challenges: Vec<Challenge>,
}

impl ChallengeCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            challenges: Vec::new(),
        }
    }

    /// Build a catalog from already validated challenges.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidChallenge`] when two challenges share an id.
    pub fn from_challenges(challenges: Vec<Challenge>) -> Result<Self, GameError> {
        let mut seen = HashSet::with_capacity(challenges.len());
        for challenge in &challenges {
            if !seen.insert(challenge.id()) {
                return Err(GameError::invalid_challenge(
                    challenge.id(),
                    "duplicate challenge id",
                ));
            }
        }
        Ok(Self { challenges })
    }

    /// Load a catalog from a JSON document of the form `{"challenges": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed, any challenge violates its
    /// invariants, or ids are duplicated.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from_challenges(file.challenges)?)
    }

    /// Load the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled content is malformed.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id() == id)
    }

    /// Challenges whose required stage is exactly `stage`.
    pub fn for_stage(&self, stage: CareerStage) -> impl Iterator<Item = &Challenge> {
        self.challenges
            .iter()
            .filter(move |c| c.required_stage() == stage)
    }

    /// Challenges the player may attempt right now.
    pub fn available_for<'a>(&'a self, player: &'a Player) -> impl Iterator<Item = &'a Challenge> {
        self.challenges
            .iter()
            .filter(move |c| player.can_attempt(c.id(), c.required_stage()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Challenge> {
        self.challenges.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// Stable content hash used to tag reports with the catalog revision.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(FINGERPRINT_SEED);
        for challenge in &self.challenges {
            hash_challenge(&mut hasher, challenge);
        }
        hasher.finish()
    }
}

// Length-prefixed so adjacent fields cannot run together.
fn hash_str(hasher: &mut impl Hasher, value: &str) {
    hasher.write_u64(value.len() as u64);
    hasher.write(value.as_bytes());
}

fn hash_opt_str(hasher: &mut impl Hasher, value: Option<&str>) {
    match value {
        Some(text) => {
            hasher.write_u8(1);
            hash_str(hasher, text);
        }
        None => hasher.write_u8(0),
    }
}

fn hash_challenge(hasher: &mut impl Hasher, challenge: &Challenge) {
    hash_str(hasher, challenge.id());
    hash_str(hasher, challenge.title());
    hash_str(hasher, challenge.description());
    hash_opt_str(hasher, challenge.context());
    hash_str(hasher, challenge.category().as_str());
    hash_str(hasher, challenge.required_stage().as_str());
    hash_str(hasher, challenge.region());
    hash_opt_str(hasher, challenge.mentor());
    hasher.write_i32(challenge.points_on_correct());
    hasher.write_i32(challenge.points_on_wrong());
    hasher.write_u64(challenge.options().len() as u64);
    for option in challenge.options() {
        hash_str(hasher, &option.text);
        hasher.write_u8(u8::from(option.is_correct));
        hash_str(hasher, &option.explanation);
    }
}

impl<'a> IntoIterator for &'a ChallengeCatalog {
    type Item = &'a Challenge;
    type IntoIter = std::slice::Iter<'a, Challenge>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

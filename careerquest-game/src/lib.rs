//! Career Quest Game Engine
//!
//! Platform-agnostic progression rules for the Career Quest learning game:
//! challenges, scoring, the player aggregate and its state machine, and the
//! answer/recovery/progress flows. This crate performs no I/O of its own;
//! content loading and persistence are supplied by the platform through
//! [`ChallengeLoader`] and [`PlayerStorage`].

pub mod answer;
pub mod catalog;
pub mod challenge;
pub mod constants;
pub mod error;
pub mod guards;
pub mod player;
pub mod profile;
pub mod progress;
pub mod scoring;
pub mod stage;
pub mod world;

use anyhow::Context;

// Re-export commonly used types
pub use answer::{AnswerResult, PromotionNotice, submit_answer, submit_answer_with_rules};
pub use catalog::{CatalogError, ChallengeCatalog};
pub use challenge::{
    Challenge, ChallengeCategory, ChallengeDraft, ChallengeOption, PlayerChallengeView,
    PlayerOptionView,
};
pub use constants::{CHALLENGES_TO_PROMOTE, MAX_ERRORS_PER_STAGE};
pub use error::{ErrorKind, GameError};
pub use guards::{validate_challenge_not_completed, validate_not_game_over, validate_stage_access};
pub use player::{
    Attempt, AttemptOutcome, CompletedChallenge, Player, PlayerSnapshot, PlayerStatus, Promotion,
};
pub use profile::{Character, Language};
pub use progress::{ProgressView, RecoveryResult, get_progress, recover_from_game_over, start_game};
pub use scoring::{ScoringConfigError, ScoringRules, calculate_points};
pub use stage::CareerStage;
pub use world::{Position, WorldState, WorldStateUpdate};

/// Trait for abstracting challenge content loading.
/// Platform-specific implementations should provide this
pub trait ChallengeLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the validated challenge catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded or fails validation.
    fn load_catalog(&self) -> Result<ChallengeCatalog, Self::Error>;
}

/// Trait for abstracting player persistence.
/// Implementations are responsible for serializing concurrent writes per player.
pub trait PlayerStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a player snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the player cannot be saved.
    fn save_player(&self, player: &Player) -> Result<(), Self::Error>;

    /// Load a player by id
    ///
    /// # Errors
    ///
    /// Returns an error if the player cannot be loaded.
    fn load_player(&self, player_id: &str) -> Result<Option<Player>, Self::Error>;

    /// Delete a stored player
    ///
    /// # Errors
    ///
    /// Returns an error if the player cannot be deleted.
    fn delete_player(&self, player_id: &str) -> Result<(), Self::Error>;
}

/// Use-case facade binding content and storage to the progression rules
pub struct GameEngine<L, S>
where
    L: ChallengeLoader,
    S: PlayerStorage,
{
    loader: L,
    storage: S,
    rules: ScoringRules,
}

impl<L, S> GameEngine<L, S>
where
    L: ChallengeLoader,
    S: PlayerStorage,
{
    /// Create a new game engine with the provided loader and storage
    pub fn new(loader: L, storage: S) -> Self {
        Self {
            loader,
            storage,
            rules: ScoringRules::default(),
        }
    }

    /// Replace the scoring table used for submissions.
    #[must_use]
    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub const fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Load the current challenge catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn catalog(&self) -> Result<ChallengeCatalog, L::Error> {
        self.loader.load_catalog()
    }

    /// Start and persist a new run
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is invalid or the player cannot be saved.
    pub fn start_game(
        &self,
        name: &str,
        character: Character,
        language: &str,
    ) -> Result<Player, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let player = start_game(name, character, language)?;
        self.storage.save_player(&player).map_err(Into::<anyhow::Error>::into)?;
        Ok(player)
    }

    /// Load a stored player
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn load_player(&self, player_id: &str) -> Result<Option<Player>, S::Error> {
        self.storage.load_player(player_id)
    }

    fn require_player(&self, player_id: &str) -> Result<Player, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        self.storage
            .load_player(player_id)
            .map_err(Into::<anyhow::Error>::into)?
            .with_context(|| format!("player '{player_id}' not found"))
    }

    /// Load a player and challenge by id, submit, and persist on success
    ///
    /// # Errors
    ///
    /// Returns an error if the player or challenge cannot be found, the
    /// submission is rejected, or storage fails. Rejected submissions are not
    /// saved.
    pub fn submit_by_id(
        &self,
        player_id: &str,
        challenge_id: &str,
        selected_index: i64,
    ) -> Result<AnswerResult, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
        S::Error: Into<anyhow::Error>,
    {
        let catalog = self.loader.load_catalog().map_err(Into::<anyhow::Error>::into)?;
        let challenge = catalog
            .get(challenge_id)
            .ok_or_else(|| GameError::UnknownValue {
                field: "challenge",
                value: challenge_id.to_string(),
            })?;
        let mut player = self.require_player(player_id)?;
        let result = submit_answer_with_rules(&mut player, challenge, selected_index, &self.rules)?;
        self.storage.save_player(&player).map_err(Into::<anyhow::Error>::into)?;
        Ok(result)
    }

    /// Recover a stored player from game over
    ///
    /// # Errors
    ///
    /// Returns an error if the player cannot be found or storage fails.
    pub fn recover(&self, player_id: &str) -> Result<RecoveryResult, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let mut player = self.require_player(player_id)?;
        let result = recover_from_game_over(&mut player);
        if result.recovered {
            self.storage.save_player(&player).map_err(Into::<anyhow::Error>::into)?;
        }
        Ok(result)
    }

    /// Progress projection for a stored player
    ///
    /// # Errors
    ///
    /// Returns an error if the player cannot be found or storage fails.
    pub fn progress(&self, player_id: &str) -> Result<ProgressView, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let player = self.require_player(player_id)?;
        Ok(get_progress(&player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Copy, Default)]
    struct BundledLoader;

    impl ChallengeLoader for BundledLoader {
        type Error = CatalogError;

        fn load_catalog(&self) -> Result<ChallengeCatalog, Self::Error> {
            ChallengeCatalog::load_from_static()
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStorage {
        saves: Rc<RefCell<HashMap<String, String>>>,
    }

    impl PlayerStorage for MemoryStorage {
        type Error = Infallible;

        fn save_player(&self, player: &Player) -> Result<(), Self::Error> {
            let json = serde_json::to_string(player).unwrap();
            self.saves
                .borrow_mut()
                .insert(player.id().to_string(), json);
            Ok(())
        }

        fn load_player(&self, player_id: &str) -> Result<Option<Player>, Self::Error> {
            Ok(self
                .saves
                .borrow()
                .get(player_id)
                .map(|json| serde_json::from_str(json).unwrap()))
        }

        fn delete_player(&self, player_id: &str) -> Result<(), Self::Error> {
            self.saves.borrow_mut().remove(player_id);
            Ok(())
        }
    }

    fn first_intern_challenge(engine: &GameEngine<BundledLoader, MemoryStorage>) -> Challenge {
        engine
            .catalog()
            .unwrap()
            .for_stage(CareerStage::Intern)
            .next()
            .cloned()
            .expect("bundled intern challenge")
    }

    #[test]
    fn engine_persists_submissions_through_storage() {
        let storage = MemoryStorage::default();
        let engine = GameEngine::new(BundledLoader, storage.clone());
        let player = engine
            .start_game("Ada", Character::default(), "rust")
            .unwrap();

        let challenge = first_intern_challenge(&engine);
        let correct = i64::try_from(challenge.correct_index()).unwrap();
        let result = engine
            .submit_by_id(player.id(), challenge.id(), correct)
            .unwrap();
        assert!(result.outcome.is_correct());

        let stored = engine.load_player(player.id()).unwrap().expect("saved");
        assert_eq!(stored.score(), 100);
        assert!(stored.has_completed(challenge.id()));
        assert_eq!(engine.progress(player.id()).unwrap().total_attempt_count, 1);

        storage.delete_player(player.id()).unwrap();
        assert!(engine.load_player(player.id()).unwrap().is_none());
    }

    #[test]
    fn rejected_submissions_surface_game_errors() {
        let engine = GameEngine::new(BundledLoader, MemoryStorage::default());
        let player = engine
            .start_game("Ada", Character::default(), "go")
            .unwrap();
        let challenge = first_intern_challenge(&engine);

        let err = engine
            .submit_by_id(player.id(), challenge.id(), 99)
            .unwrap_err();
        let game_err = err.downcast_ref::<GameError>().expect("game error");
        assert_eq!(game_err.kind(), ErrorKind::Validation);
        assert!(
            engine
                .load_player(player.id())
                .unwrap()
                .unwrap()
                .attempts()
                .is_empty()
        );

        let err = engine
            .submit_by_id(player.id(), "no-such-challenge", 0)
            .unwrap_err();
        assert!(err.to_string().contains("no-such-challenge"));
        assert!(engine.submit_by_id("ghost", challenge.id(), 0).is_err());
    }

    #[test]
    fn engine_recovers_stored_player() {
        let engine = GameEngine::new(BundledLoader, MemoryStorage::default()).with_rules(
            ScoringRules {
                clean: 80,
                ..ScoringRules::default()
            },
        );
        assert_eq!(engine.rules().clean, 80);
        let player = engine
            .start_game("Ada", Character::default(), "java")
            .unwrap();
        let catalog = engine.catalog().unwrap();
        for challenge in catalog.for_stage(CareerStage::Intern).take(2) {
            let wrong = (challenge.correct_index() + 1) % challenge.options().len();
            engine
                .submit_by_id(player.id(), challenge.id(), i64::try_from(wrong).unwrap())
                .unwrap();
        }
        assert_eq!(
            engine.progress(player.id()).unwrap().status,
            PlayerStatus::GameOver
        );
        let recovery = engine.recover(player.id()).unwrap();
        assert!(recovery.recovered);
        assert_eq!(
            engine.progress(player.id()).unwrap().status,
            PlayerStatus::InProgress
        );
    }
}

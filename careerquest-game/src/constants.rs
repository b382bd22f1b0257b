//! Centralized progression and tuning constants for Career Quest.
//!
//! These values define the career ladder rules. Keeping them together ensures
//! that progression can only be adjusted via reviewed code changes rather than
//! through content files.

// Progression ---------------------------------------------------------------
/// Wrong answers allowed in a single stage before the run ends in game over.
pub const MAX_ERRORS_PER_STAGE: u32 = 2;
/// Distinct challenges a player must complete in a stage to be promoted.
pub const CHALLENGES_TO_PROMOTE: usize = 3;
/// Minimum number of options a challenge must offer.
pub const MIN_CHALLENGE_OPTIONS: usize = 2;

// Scoring -------------------------------------------------------------------
pub(crate) const POINTS_CLEAN_ANSWER: i32 = 100;
pub(crate) const POINTS_AFTER_ERROR: i32 = 50;
pub(crate) const PENALTY_ARCHITECTURE_MISTAKE: i32 = -30;
pub(crate) const PENALTY_DEFAULT_MISTAKE: i32 = 0;
pub(crate) const DEFAULT_POINTS_ON_CORRECT: i32 = 100;
pub(crate) const DEFAULT_POINTS_ON_WRONG: i32 = 0;

// Player profile ------------------------------------------------------------
pub(crate) const PLAYER_NAME_MAX_CHARS: usize = 50;
pub(crate) const DEFAULT_AVATAR: &str = "developer";
pub(crate) const DEFAULT_AVATAR_COLOR: &str = "#4a90d9";

// Messages ------------------------------------------------------------------
pub(crate) const MSG_GAME_OVER: &str =
    "Game over! Too many mistakes in this stage. Stage progress has been reset.";
pub(crate) const MSG_RECOVERED: &str = "Back in the game. Your error counter has been reset.";
pub(crate) const MSG_NOT_GAME_OVER: &str = "Nothing to recover from; the run is still active.";
pub(crate) const MSG_PROMOTION_PREFIX: &str = "Congratulations! You have been promoted to";
pub(crate) const MSG_CAREER_COMPLETED: &str =
    "You reached the top of the ladder. Career complete!";

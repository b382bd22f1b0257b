use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_AVATAR, DEFAULT_AVATAR_COLOR, PLAYER_NAME_MAX_CHARS};
use crate::error::GameError;

/// Programming language a player chose to study with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    JavaScript,
    TypeScript,
    Java,
    CSharp,
    Go,
    Rust,
}

impl Language {
    pub const ALL: [Self; 7] = [
        Self::Python,
        Self::JavaScript,
        Self::TypeScript,
        Self::Java,
        Self::CSharp,
        Self::Go,
        Self::Rust,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Go => "go",
            Self::Rust => "rust",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str() == lowered)
            .ok_or_else(|| GameError::unknown("language", s))
    }
}

/// Cosmetic avatar settings. Purely presentational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default = "Character::default_avatar")]
    pub avatar: String,
    #[serde(default = "Character::default_color")]
    pub color: String,
}

impl Character {
    fn default_avatar() -> String {
        DEFAULT_AVATAR.to_string()
    }

    fn default_color() -> String {
        DEFAULT_AVATAR_COLOR.to_string()
    }

    #[must_use]
    pub fn new(avatar: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            avatar: avatar.into(),
            color: color.into(),
        }
    }
}

impl Default for Character {
    fn default() -> Self {
        Self {
            avatar: Self::default_avatar(),
            color: Self::default_color(),
        }
    }
}

/// Trim and check a display name.
///
/// # Errors
///
/// Returns [`GameError::InvalidName`] for empty names, names longer than the
/// limit, or names containing control characters.
pub fn normalize_name(raw: &str) -> Result<String, GameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(GameError::InvalidName {
            reason: "name must not be empty".to_string(),
        });
    }
    let chars = name.chars().count();
    if chars > PLAYER_NAME_MAX_CHARS {
        return Err(GameError::InvalidName {
            reason: format!("name exceeds {PLAYER_NAME_MAX_CHARS} characters (got {chars})"),
        });
    }
    if name.chars().any(char::is_control) {
        return Err(GameError::InvalidName {
            reason: "name contains control characters".to_string(),
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parsing_is_case_insensitive() {
        assert_eq!("Rust".parse::<Language>().unwrap(), Language::Rust);
        assert_eq!(" csharp ".parse::<Language>().unwrap(), Language::CSharp);
        let err = "cobol".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("language"));
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(normalize_name("  Linus ").unwrap(), "Linus");
        assert!(normalize_name("   ").is_err());
        assert!(normalize_name(&"x".repeat(PLAYER_NAME_MAX_CHARS + 1)).is_err());
        assert!(normalize_name(&"x".repeat(PLAYER_NAME_MAX_CHARS)).is_ok());
        assert!(normalize_name("bad\u{0007}name").is_err());
    }

    #[test]
    fn character_defaults_fill_missing_fields() {
        let character: Character = serde_json::from_str(r#"{"avatar": "hacker"}"#).unwrap();
        assert_eq!(character.avatar, "hacker");
        assert_eq!(character.color, DEFAULT_AVATAR_COLOR);
    }
}

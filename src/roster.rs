//! Character roster
//!
//! The ordered, read-only list of characters the stages rotate through.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One puzzle character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Image reference (URL or asset path)
    pub image: String,
    /// Display name shown on the board and in the completion popup
    pub name: String,
}

impl Character {
    pub fn new(image: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            name: name.into(),
        }
    }
}

/// Non-empty character rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Default for Roster {
    fn default() -> Self {
        let characters = [
            ("assets/images/character-penguin.png", "뽀로로"),
            ("assets/images/duri.png", "까투리친구"),
            ("assets/images/ggatwori.png", "까투리"),
            ("assets/images/momtwori.png", "엄마까투리"),
            ("assets/images/kongsoone.png", "콩순이"),
            ("assets/images/poby.png", "포비"),
            ("assets/images/pinkfong.png", "핑크퐁"),
            ("assets/images/daddy_shark.png", "아빠상어"),
            ("assets/images/krong.png", "크롱"),
            ("assets/images/pepepin.png", "베베핀"),
        ]
        .into_iter()
        .map(|(image, name)| Character::new(image, name))
        .collect();
        Self { characters }
    }
}

impl Roster {
    /// Build a roster, rejecting an empty list or blank entries
    pub fn new(characters: Vec<Character>) -> Result<Self, ConfigError> {
        if characters.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        for (index, c) in characters.iter().enumerate() {
            if c.image.trim().is_empty() {
                return Err(ConfigError::BlankCharacter {
                    index,
                    field: "image",
                });
            }
            if c.name.trim().is_empty() {
                return Err(ConfigError::BlankCharacter {
                    index,
                    field: "name",
                });
            }
        }
        Ok(Self { characters })
    }

    /// Parse a JSON array of `{ "image": ..., "name": ... }`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let characters: Vec<Character> = serde_json::from_str(json)?;
        Self::new(characters)
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Character for a stage index. Indices wrap so a stale index never panics.
    pub fn get(&self, stage: usize) -> &Character {
        &self.characters[stage % self.characters.len()]
    }
}

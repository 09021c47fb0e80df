//! Presence records served by the presence proxy
//!
//! Provides:
//! - Typed presence records (friend, presence state, current game)
//! - HTTP lookup of a presence URL

mod client;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use client::{PresenceClient, PresenceError};

/// A presence proxy response for a single friend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceResponse {
    pub friend: Friend,
}

/// A friend and their current presence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub nsa_id: String,
    pub image_uri: String,
    pub name: String,
    #[serde(default)]
    pub is_friend: bool,
    #[serde(default)]
    pub is_favorite_friend: bool,
    #[serde(default)]
    pub is_service_user: bool,
    #[serde(default)]
    pub friend_created_at: i64,
    pub presence: Presence,
}

/// Online state reported for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PresenceState {
    #[default]
    Offline,
    Inactive,
    Online,
    Playing,
}

impl PresenceState {
    /// Whether the user is currently signed in
    pub fn is_online(&self) -> bool {
        matches!(self, PresenceState::Online | PresenceState::Playing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    #[serde(default)]
    pub state: PresenceState,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub logout_at: i64,
    pub game: PresenceGame,
}

/// The game entry of a presence record.
///
/// The proxy sends `{}` when the user is not in a game. Any object carrying
/// `imageUri` is a game; a malformed game is an error, not an empty entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PresenceGame {
    Game(Game),
    Empty {},
}

impl<'de> Deserialize<'de> for PresenceGame {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entry = Map::<String, Value>::deserialize(deserializer)?;
        if !entry.contains_key("imageUri") {
            return Ok(PresenceGame::Empty {});
        }
        Game::deserialize(Value::Object(entry))
            .map(PresenceGame::Game)
            .map_err(de::Error::custom)
    }
}

impl PresenceGame {
    /// Image URL of the current game, if the entry carries one
    pub fn image_uri(&self) -> Option<&str> {
        match self {
            PresenceGame::Game(game) => Some(&game.image_uri),
            PresenceGame::Empty {} => None,
        }
    }

    pub fn game(&self) -> Option<&Game> {
        match self {
            PresenceGame::Game(game) => Some(game),
            PresenceGame::Empty {} => None,
        }
    }
}

/// A title the user is playing or last played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(default)]
    pub name: String,
    pub image_uri: String,
    #[serde(default)]
    pub shop_uri: Option<String>,
    /// Total play time in minutes
    #[serde(default)]
    pub total_play_time: u64,
    #[serde(default)]
    pub first_played_at: i64,
    #[serde(default)]
    pub sys_description: Option<String>,
}

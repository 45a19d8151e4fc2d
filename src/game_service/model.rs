use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a game on the server. Built from either a string or a number and sent
/// as a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        GameId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        GameId(id.to_string())
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        GameId(id)
    }
}

impl From<&GameId> for GameId {
    fn from(id: &GameId) -> Self {
        id.clone()
    }
}

macro_rules! game_id_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for GameId {
            fn from(id: $t) -> Self {
                GameId(id.to_string())
            }
        })*
    };
}

game_id_from_int!(i32, i64, u32, u64, usize);

/// Board index of a move. The server decides what is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(pub usize);

impl From<usize> for Position {
    fn from(index: usize) -> Self {
        Position(index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MoveRequest {
    pub position: Position,
}

/// Parsed response body, kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameState(Value);

impl GameState {
    pub fn new(value: Value) -> Self {
        GameState(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// The `error` field the server puts in its failure bodies.
    pub fn error_message(&self) -> Option<&str> {
        self.0.get("error")?.as_str()
    }

    pub fn snapshot(&self) -> Result<GameSnapshot, serde_json::Error> {
        GameSnapshot::deserialize(&self.0)
    }
}

impl From<Value> for GameState {
    fn from(value: Value) -> Self {
        GameState(value)
    }
}

/// Result of a move: whether the status was in the success range, plus the body either way.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub ok: bool,
    pub data: GameState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => f.write_str("X"),
            Player::O => f.write_str("O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    XWins,
    OWins,
    Draw,
}

impl GameStatus {
    pub fn is_finished(self) -> bool {
        self != GameStatus::InProgress
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::XWins => Some(Player::X),
            GameStatus::OWins => Some(Player::O),
            GameStatus::InProgress | GameStatus::Draw => None,
        }
    }
}

/// Typed view of the game payload returned by the reference server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: i64,
    pub board: Vec<Option<Player>>, // nine cells, row-major
    pub current_player: Player,
    pub status: GameStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_display: Option<String>,
}

impl GameSnapshot {
    pub fn game_id(&self) -> GameId {
        GameId::from(self.id)
    }

    pub fn cell(&self, position: Position) -> Option<Player> {
        self.board.get(position.0).copied().flatten()
    }

    pub fn is_cell_open(&self, position: Position) -> bool {
        !self.status.is_finished()
            && matches!(self.board.get(position.0), Some(None))
    }
}

pub mod config;
pub mod game_service;
pub mod logging;

pub use game_service::{
    ApiError, GameApiClient, GameId, GameSnapshot, GameState, GameStatus, MoveOutcome, Player,
    Position,
};

pub mod error;
pub mod model;
pub mod service;

pub use error::ApiError;
pub use model::{GameId, GameSnapshot, GameState, GameStatus, MoveOutcome, Player, Position};
pub use service::GameApiClient;

use crate::game_service::error::ApiError;
use crate::game_service::model::{GameId, GameState, MoveOutcome, MoveRequest, Position};
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, warn};

const API: &str = "api";
const GAMES: &str = "games";
const MOVE: &str = "move";

/// Thin async wrapper over the game server's REST endpoints.
///
/// Every call is a single request with no retry, caching or timeout. Cloning is cheap and
/// clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GameApiClient {
    client: Client,
    base_url: Url,
}

impl GameApiClient {
    pub fn new(server_url: &str) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(client: Client, server_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(server_url).map_err(|_| ApiError::InvalidBaseUrl(server_url.to_string()))?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(server_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn create_game(&self) -> Result<GameState, ApiError> {
        let url = self.endpoint(&[API, GAMES])?;
        debug!("POST {}", url);

        let response = self.client.post(url).send().await?;
        Self::parse_body(response).await
    }

    pub async fn list_games(&self) -> Result<Vec<GameState>, ApiError> {
        let url = self.endpoint(&[API, GAMES])?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        serde_json::from_slice::<Vec<Value>>(&bytes)
            .map(|games| games.into_iter().map(GameState::new).collect())
            .map_err(|source| ApiError::Decode { status, source })
    }

    pub async fn load_game(&self, game_id: impl Into<GameId>) -> Result<GameState, ApiError> {
        let game_id = Self::require_id(game_id.into())?;
        let url = self.endpoint(&[API, GAMES, game_id.as_str()])?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        Self::parse_body(response).await
    }

    /// Sends `{"position": ..}` for the game. `ok` reflects the status class and the body
    /// is returned either way so the caller can read the server's reason for a rejection.
    pub async fn make_move(
        &self,
        game_id: impl Into<GameId>,
        position: impl Into<Position>,
    ) -> Result<MoveOutcome, ApiError> {
        let game_id = Self::require_id(game_id.into())?;
        let position = position.into();
        let url = self.endpoint(&[API, GAMES, game_id.as_str(), MOVE])?;
        debug!("POST {} position={}", url, position);

        let response = self
            .client
            .post(url)
            .json(&MoveRequest { position })
            .send()
            .await?;

        let ok = response.status().is_success();
        if !ok {
            warn!(
                "Move {} on game {} rejected with status {}",
                position,
                game_id,
                response.status()
            );
        }

        let data = Self::parse_body(response).await?;
        Ok(MoveOutcome { ok, data })
    }

    /// Returns whether the server answered with a success status. The body is ignored.
    pub async fn delete_game(&self, game_id: impl Into<GameId>) -> Result<bool, ApiError> {
        let game_id = Self::require_id(game_id.into())?;
        let url = self.endpoint(&[API, GAMES, game_id.as_str()])?;
        debug!("DELETE {}", url);

        let response = self.client.delete(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Delete of game {} failed with status {}", game_id, status);
        }

        Ok(status.is_success())
    }

    fn require_id(game_id: GameId) -> Result<GameId, ApiError> {
        if game_id.is_blank() {
            return Err(ApiError::EmptyGameId);
        }
        if matches!(game_id.as_str(), "." | "..") {
            return Err(ApiError::InvalidGameId(game_id.to_string()));
        }
        Ok(game_id)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn parse_body(response: Response) -> Result<GameState, ApiError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        serde_json::from_slice::<Value>(&bytes)
            .map(GameState::new)
            .map_err(|source| ApiError::Decode { status, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> GameApiClient {
        GameApiClient::new(url).unwrap()
    }

    #[test]
    fn endpoint_appends_to_bare_host() {
        let url = client("http://127.0.0.1:3001")
            .endpoint(&[API, GAMES, "42", MOVE])
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3001/api/games/42/move");
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let url = client("http://example.com/tictactoe/")
            .endpoint(&[API, GAMES])
            .unwrap();
        assert_eq!(url.as_str(), "http://example.com/tictactoe/api/games");
    }

    #[test]
    fn endpoint_escapes_game_id() {
        let url = client("http://example.com")
            .endpoint(&[API, GAMES, "a/b c"])
            .unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/games/a%2Fb%20c");
    }

    #[test]
    fn rejects_unusable_server_urls() {
        assert!(matches!(
            GameApiClient::new("not a url"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            GameApiClient::new("mailto:someone@example.com"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn blank_ids_are_refused() {
        assert!(matches!(
            GameApiClient::require_id(GameId::from(" ")),
            Err(ApiError::EmptyGameId)
        ));
        assert!(GameApiClient::require_id(GameId::from(3)).is_ok());
    }

    #[test]
    fn dot_segment_ids_are_refused() {
        for id in [".", ".."] {
            assert!(matches!(
                GameApiClient::require_id(GameId::from(id)),
                Err(ApiError::InvalidGameId(_))
            ));
        }
        assert!(GameApiClient::require_id(GameId::from("...")).is_ok());
        assert!(GameApiClient::require_id(GameId::from(".a")).is_ok());
    }
}

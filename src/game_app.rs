use tic_tac_toe_api::{
    GameApiClient, GameId, GameSnapshot, GameState, GameStatus, Player, Position,
};

use eframe::egui;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Everything the background requests write and the UI reads.
#[derive(Debug, Default)]
struct ViewState {
    games: Vec<GameSnapshot>,
    current: Option<GameSnapshot>,
    error_message: Option<String>,
}

impl ViewState {
    fn show_game(&mut self, state: GameState, context: &str) {
        if let Some(reason) = state.error_message() {
            self.error_message = Some(format!("{}: {}", context, reason));
            return;
        }

        match state.snapshot() {
            Ok(snapshot) => {
                match self.games.iter_mut().find(|g| g.id == snapshot.id) {
                    Some(existing) => *existing = snapshot.clone(),
                    None => self.games.insert(0, snapshot.clone()),
                }
                self.current = Some(snapshot);
                self.error_message = None;
            }
            Err(e) => {
                error!("Unexpected game payload: {}", e);
                self.error_message = Some(format!("{}: unexpected server response", context));
            }
        }
    }

    fn set_games(&mut self, games: Vec<GameState>) {
        self.games = games
            .iter()
            .filter_map(|game| match game.snapshot() {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!("Skipping unreadable game in list: {}", e);
                    None
                }
            })
            .collect();
        self.error_message = None;
    }

    fn close_game(&mut self) {
        self.current = None;
        self.error_message = None;
    }

    fn forget_game(&mut self, game_id: &GameId) {
        self.games.retain(|g| &g.game_id() != game_id);
        if self.current.as_ref().map(|g| g.game_id()).as_ref() == Some(game_id) {
            self.current = None;
        }
    }
}

enum Action {
    RefreshList,
    CreateGame,
    OpenGame(GameId),
    MakeMove(GameId, Position),
    DeleteGame(GameId),
    CloseGame,
}

pub struct GameApp {
    client: GameApiClient,
    state: Arc<Mutex<ViewState>>,
    input_game_id: String,
    loaded_once: bool,
}

impl GameApp {
    pub fn new(client: GameApiClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(ViewState::default())),
            input_game_id: String::new(),
            loaded_once: false,
        }
    }
}

impl eframe::App for GameApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        if !self.loaded_once {
            self.loaded_once = true;
            actions.push(Action::RefreshList);
        }

        let state = Arc::clone(&self.state);
        egui::CentralPanel::default().show(ctx, |ui| match state.try_lock() {
            Ok(view) => self.handle_game_ui(ui, &view, &mut actions),
            Err(_) => {
                ui.spinner();
            }
        });

        for action in actions {
            self.dispatch(ctx, action);
        }
    }
}

impl GameApp {
    fn handle_game_ui(&mut self, ui: &mut egui::Ui, view: &ViewState, actions: &mut Vec<Action>) {
        ui.vertical_centered(|ui| {
            ui.group(|ui| {
                ui.set_width(400.0);

                ui.heading("Tic-Tac-Toe");
                ui.add_space(10.0);

                if let Some(error) = &view.error_message {
                    ui.colored_label(egui::Color32::RED, error);
                    ui.add_space(10.0);
                }

                match &view.current {
                    Some(game) => self.render_game(ui, game, actions),
                    None => self.render_lobby(ui, view, actions),
                }
            });
        });
    }

    fn render_lobby(&mut self, ui: &mut egui::Ui, view: &ViewState, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new("New Game").min_size(egui::vec2(100.0, 30.0)))
                .clicked()
            {
                actions.push(Action::CreateGame);
            }
            if ui.button("🔄 Refresh").clicked() {
                actions.push(Action::RefreshList);
            }
        });

        ui.add_space(10.0);
        ui.label("Game ID:");
        ui.add_space(3.0);

        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.input_game_id);

            let game_id = GameId::from(self.input_game_id.trim());
            if ui
                .add_enabled(!game_id.is_blank(), egui::Button::new("Open"))
                .clicked()
            {
                actions.push(Action::OpenGame(game_id));
            }
        });

        ui.add_space(10.0);
        ui.separator();

        if view.games.is_empty() {
            ui.label("No games yet.");
            return;
        }

        egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
            for game in &view.games {
                ui.horizontal(|ui| {
                    ui.label(format!("Game #{}", game.id));
                    ui.label(status_text(game));

                    if ui.button("Open").clicked() {
                        actions.push(Action::OpenGame(game.game_id()));
                    }
                    if ui.button("🗑").clicked() {
                        actions.push(Action::DeleteGame(game.game_id()));
                    }
                });
            }
        });
    }

    fn render_game(&self, ui: &mut egui::Ui, game: &GameSnapshot, actions: &mut Vec<Action>) {
        let button_size = 100.0;

        ui.label(format!("Game #{}", game.id));
        ui.add_space(5.0);

        ui.vertical_centered(|ui| {
            for row in 0..3 {
                ui.horizontal(|ui| {
                    ui.add_space(40.0);
                    for col in 0..3 {
                        let position = Position(row * 3 + col);
                        let can_move = game.is_cell_open(position);

                        let label = match game.cell(position) {
                            Some(Player::X) => egui::RichText::new("X")
                                .size(50.0)
                                .color(egui::Color32::from_rgb(255, 99, 71)),
                            Some(Player::O) => egui::RichText::new("O")
                                .size(50.0)
                                .color(egui::Color32::from_rgb(34, 139, 34)),
                            None => egui::RichText::new(" ")
                                .size(50.0)
                                .color(egui::Color32::from_rgb(180, 180, 180)),
                        };

                        let button = ui.add_enabled(
                            can_move,
                            egui::Button::new(label).min_size(egui::vec2(button_size, button_size)),
                        );

                        if button.clicked() && can_move {
                            actions.push(Action::MakeMove(game.game_id(), position));
                        }
                    }
                });
            }
        });

        ui.add_space(10.0);

        let color = if game.status.is_finished() {
            egui::Color32::from_rgb(255, 0, 0)
        } else {
            egui::Color32::from_rgb(0, 255, 0)
        };
        ui.label(egui::RichText::new(status_text(game)).size(30.0).color(color));

        if let Some(display) = &game.board_display {
            ui.collapsing("Text board", |ui| {
                ui.monospace(display.as_str());
            });
        }

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if ui.button("🔄 Refresh").clicked() {
                actions.push(Action::OpenGame(game.game_id()));
            }
            let delete_label =
                egui::RichText::new("🗑 Delete Game").color(egui::Color32::from_rgb(240, 148, 0));
            if ui.button(delete_label).clicked() {
                actions.push(Action::DeleteGame(game.game_id()));
            }
            if ui.button("⬅ Back").clicked() {
                actions.push(Action::CloseGame);
            }
        });
    }

    fn dispatch(&self, ctx: &egui::Context, action: Action) {
        match action {
            Action::RefreshList => self.spawn_request(ctx, |client, state| async move {
                let result = client.list_games().await;
                let mut view = state.lock().await;
                match result {
                    Ok(games) => view.set_games(games),
                    Err(e) => {
                        error!("Failed to list games: {}", e);
                        view.error_message = Some(format!("Error loading games: {}", e));
                    }
                }
            }),
            Action::CreateGame => self.spawn_request(ctx, |client, state| async move {
                let result = client.create_game().await;
                let mut view = state.lock().await;
                match result {
                    Ok(game) => {
                        info!("✅ Game created");
                        view.show_game(game, "Error creating game");
                    }
                    Err(e) => {
                        error!("Failed to create game: {}", e);
                        view.error_message = Some(format!("Error creating game: {}", e));
                    }
                }
            }),
            Action::OpenGame(game_id) => self.spawn_request(ctx, |client, state| async move {
                let result = client.load_game(&game_id).await;
                let mut view = state.lock().await;
                match result {
                    Ok(game) => view.show_game(game, "Error loading game"),
                    Err(e) => {
                        error!("Failed to load game {}: {}", game_id, e);
                        view.error_message = Some(format!("Error loading game: {}", e));
                    }
                }
            }),
            Action::MakeMove(game_id, position) => {
                self.spawn_request(ctx, |client, state| async move {
                    let result = client.make_move(&game_id, position).await;
                    let mut view = state.lock().await;
                    match result {
                        Ok(outcome) if outcome.ok => {
                            view.show_game(outcome.data, "Error making move")
                        }
                        Ok(outcome) => {
                            let reason = outcome.data.error_message().unwrap_or("move rejected");
                            view.error_message = Some(format!("Error making move: {}", reason));
                        }
                        Err(e) => {
                            error!("Failed to send move for game {}: {}", game_id, e);
                            view.error_message = Some(format!("Error making move: {}", e));
                        }
                    }
                })
            }
            Action::DeleteGame(game_id) => self.spawn_request(ctx, |client, state| async move {
                let result = client.delete_game(&game_id).await;
                let mut view = state.lock().await;
                match result {
                    Ok(true) => {
                        info!("Game {} deleted", game_id);
                        view.forget_game(&game_id);
                        view.error_message = None;
                    }
                    Ok(false) => {
                        view.error_message = Some(format!("Could not delete game {}", game_id));
                    }
                    Err(e) => {
                        error!("Failed to delete game {}: {}", game_id, e);
                        view.error_message = Some(format!("Error deleting game: {}", e));
                    }
                }
            }),
            Action::CloseGame => self.spawn_request(ctx, |_, state| async move {
                state.lock().await.close_game();
            }),
        }
    }

    fn spawn_request<F, Fut>(&self, ctx: &egui::Context, request: F)
    where
        F: FnOnce(GameApiClient, Arc<Mutex<ViewState>>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = request(self.client.clone(), Arc::clone(&self.state));
        let ctx = ctx.clone();

        tokio::spawn(async move {
            task.await;
            ctx.request_repaint();
        });
    }
}

fn status_text(game: &GameSnapshot) -> String {
    match game.status.winner() {
        Some(winner) => format!("🏆 {} wins!", winner),
        None if game.status == GameStatus::Draw => "It's a draw!".to_string(),
        None => format!("🕐 {}'s turn", game.current_player),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn game_payload(id: i64, status: &str) -> GameState {
        GameState::new(json!({
            "id": id,
            "board": [null, null, null, null, null, null, null, null, null],
            "current_player": "O",
            "status": status,
            "created_at": "2025-01-01T10:00:00Z",
            "updated_at": "2025-01-01T10:00:00Z"
        }))
    }

    #[test]
    fn showing_a_game_opens_it_and_lists_it_once() {
        let mut view = ViewState::default();
        view.show_game(game_payload(1, "in_progress"), "ctx");
        view.show_game(game_payload(1, "x_wins"), "ctx");

        assert_eq!(view.games.len(), 1);
        assert_eq!(view.games[0].status, GameStatus::XWins);
        assert_eq!(view.current.as_ref().map(|g| g.id), Some(1));
        assert_eq!(view.error_message, None);
    }

    #[test]
    fn server_error_body_becomes_message() {
        let mut view = ViewState::default();
        view.show_game(
            GameState::new(json!({ "error": "Game not found" })),
            "Error loading game",
        );

        assert!(view.current.is_none());
        assert_eq!(
            view.error_message.as_deref(),
            Some("Error loading game: Game not found")
        );
    }

    #[test]
    fn unreadable_list_entries_are_skipped() {
        let mut view = ViewState::default();
        view.set_games(vec![
            game_payload(1, "in_progress"),
            GameState::new(json!({ "id": "bogus" })),
            game_payload(3, "draw"),
        ]);

        let ids: Vec<i64> = view.games.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn forgetting_current_game_closes_it() {
        let mut view = ViewState::default();
        view.show_game(game_payload(5, "in_progress"), "ctx");
        view.forget_game(&GameId::from(5));

        assert!(view.current.is_none());
        assert!(view.games.is_empty());
    }

    #[test]
    fn closing_a_game_returns_to_lobby_and_clears_error() {
        let mut view = ViewState::default();
        view.show_game(game_payload(5, "in_progress"), "ctx");
        view.error_message = Some("Error making move: cell occupied".to_string());

        view.close_game();

        assert!(view.current.is_none());
        assert_eq!(view.error_message, None);
        assert_eq!(view.games.len(), 1);
    }

    #[tokio::test]
    async fn close_waits_for_busy_state() {
        let state = Arc::new(Mutex::new(ViewState::default()));
        state.lock().await.show_game(game_payload(5, "in_progress"), "ctx");

        let guard = state.lock().await;
        let task = tokio::spawn({
            let state = Arc::clone(&state);
            async move { state.lock().await.close_game() }
        });
        tokio::task::yield_now().await;
        assert!(guard.current.is_some());
        drop(guard);

        task.await.unwrap();
        assert!(state.lock().await.current.is_none());
    }

    #[test]
    fn status_line_reflects_game_state() {
        let turn = game_payload(1, "in_progress").snapshot().unwrap();
        let won = game_payload(1, "o_wins").snapshot().unwrap();
        let draw = game_payload(1, "draw").snapshot().unwrap();

        assert_eq!(status_text(&turn), "🕐 O's turn");
        assert_eq!(status_text(&won), "🏆 O wins!");
        assert_eq!(
            status_text(&game_payload(1, "x_wins").snapshot().unwrap()),
            "🏆 X wins!"
        );
        assert_eq!(status_text(&draw), "It's a draw!");
    }
}

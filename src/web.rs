use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::board::Coordinate;
use crate::game::{GameError, GameRound};
use crate::piece::Owner;
use crate::settings::GameSettings;

/// Shared handle to the single game served over HTTP. The mutex is the
/// only thing serialising player actions.
#[derive(Clone)]
pub struct AppState {
    game: Arc<Mutex<WebGame>>,
    /// Settings the server was launched with; a new game without a body
    /// starts from these.
    settings: Arc<GameSettings>,
}

struct WebGame {
    round: GameRound,
    changed: bool,
}

#[derive(Serialize, Deserialize)]
pub struct SelectRequest {
    row: usize,
    col: usize,
}

#[derive(Serialize)]
pub struct GameResponse {
    board: Vec<Vec<u8>>,
    width: usize,
    height: usize,
    current_player: Owner,
    selected: Option<Coordinate>,
    destinations: Vec<Coordinate>,
    pending_captures: Vec<Coordinate>,
    must_continue_capture: bool,
    changed: bool,
    game_over: bool,
    winner: Option<Owner>,
    message: String,
}

impl AppState {
    pub fn new(settings: &GameSettings) -> Result<Self, GameError> {
        let game = WebGame {
            round: GameRound::from_settings(settings)?,
            changed: true,
        };
        Ok(AppState {
            game: Arc::new(Mutex::new(game)),
            settings: Arc::new(settings.clone()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, WebGame> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn error_response(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn game_response(game: &WebGame, message: String) -> GameResponse {
    let round = &game.round;
    GameResponse {
        board: round.board_view(),
        width: round.board().width(),
        height: round.board().height(),
        current_player: round.current_player(),
        selected: round.selected().map(|s| s.at),
        destinations: round.selected_destinations().into_iter().collect(),
        pending_captures: round.pending_captures().into_iter().collect(),
        must_continue_capture: round.must_continue_capture(),
        changed: game.changed,
        game_over: round.is_game_over(),
        winner: round.winner(),
        message,
    }
}

fn status_message(round: &GameRound) -> String {
    match round.winner() {
        Some(winner) => format!("{} wins!", winner),
        None if round.must_continue_capture() => {
            format!("{}: keep capturing with the same piece", round.current_player())
        }
        None => format!("{} to play", round.current_player()),
    }
}

#[axum::debug_handler]
async fn new_game(
    State(app_state): State<AppState>,
    body: Result<Json<GameSettings>, JsonRejection>,
) -> Response {
    let settings = match body {
        Ok(Json(settings)) => settings,
        Err(JsonRejection::MissingJsonContentType(_)) => (*app_state.settings).clone(),
        Err(rejection) => {
            return error_response(format!("Invalid settings: {}", rejection.body_text()));
        }
    };
    let round = match GameRound::from_settings(&settings) {
        Ok(round) => round,
        Err(e) => return error_response(format!("Invalid settings: {}", e)),
    };
    info!(
        width = round.board().width(),
        height = round.board().height(),
        "new game"
    );

    let mut game = app_state.lock();
    game.round = round;
    game.changed = true;
    let message = status_message(&game.round);
    Json(game_response(&game, message)).into_response()
}

#[axum::debug_handler]
async fn select(State(app_state): State<AppState>, Json(req): Json<SelectRequest>) -> Response {
    let mut game = app_state.lock();

    if game.round.is_game_over() {
        return error_response("Game is over".to_string());
    }

    let square = Coordinate::new(req.row, req.col);
    let changed = game.round.action(square);
    game.changed = changed;
    let message = status_message(&game.round);
    Json(game_response(&game, message)).into_response()
}

async fn get_game_state(State(app_state): State<AppState>) -> Json<GameResponse> {
    let game = app_state.lock();
    let message = status_message(&game.round);
    Json(game_response(&game, message))
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/new-game", post(new_game))
        .route("/api/select", post(select))
        .route("/api/game-state", get(get_game_state))
        .fallback_service(ServeDir::new("static"))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

pub async fn run_server(addr: &str, settings: GameSettings) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(AppState::new(&settings)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("web server running at http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use game_bridge::BridgeConfig;
use serde::Deserialize;
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::GameEntry;
use crate::store::GameStore;
use crate::views;

#[derive(Clone)]
pub struct AppState {
    pub games: Arc<Vec<GameEntry>>,
    pub store: Arc<GameStore>,
    pub bridge: Arc<BridgeConfig>,
}

impl AppState {
    fn game(&self, id: u64) -> Option<&GameEntry> {
        self.games.iter().find(|g| g.id == id)
    }
}

pub fn create_router(state: AppState, assets_dir: &FsPath) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/game/{id}", get(gameplay).post(gameplay_submit))
        .route("/game/{id}/scores", get(high_scores))
        .route("/health/live", get(health_live))
        .nest_service("/pkg", ServeDir::new(assets_dir))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(views::index_page(&state.games).into_string())
}

fn not_found(id: u64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(views::not_found_page(id).into_string()),
    )
        .into_response()
}

async fn gameplay(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    match state.game(id) {
        Some(game) => Html(views::gameplay_page(game, None, &state.bridge).into_string()).into_response(),
        None => not_found(id),
    }
}

/// Fields posted by the three bridge forms. Only one is present per request.
#[derive(Debug, Default, Deserialize)]
pub struct GameplayForm {
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub request_load: Option<String>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

/// Handle a form submitted by the bridge and re-render the page.
///
/// Invalid submissions are logged and dropped; the player just gets the page
/// back. Only a load request stages anything in `load_data`.
async fn gameplay_submit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Form(form): Form<GameplayForm>,
) -> Response {
    let Some(game) = state.game(id) else {
        return not_found(id);
    };

    let mut load_data = None;
    if let Some(score) = non_empty(&form.score) {
        match state.store.record_score(id, score).await {
            Ok(score) => info!(game_id = id, score, "Score submitted"),
            Err(e) => warn!(game_id = id, error = %e, "Ignoring score submission"),
        }
    } else if let Some(save) = non_empty(&form.state) {
        match state.store.record_save(id, save).await {
            Ok(()) => info!(game_id = id, "Game state saved"),
            Err(e) => warn!(game_id = id, error = %e, "Ignoring save submission"),
        }
    } else if non_empty(&form.request_load).is_some() {
        let staged = state.store.compose_load_data(id).await;
        info!(game_id = id, bytes = staged.len(), "Staging load data");
        load_data = Some(staged);
    } else {
        warn!(game_id = id, "Gameplay form posted with no recognised field");
    }

    Html(views::gameplay_page(game, load_data.as_deref(), &state.bridge).into_string())
        .into_response()
}

async fn high_scores(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    if state.game(id).is_none() {
        return not_found(id);
    }
    Json(state.store.high_scores(id).await).into_response()
}

async fn health_live() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "alive" }))
}

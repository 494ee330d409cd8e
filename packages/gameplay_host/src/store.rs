//! In-memory score and save-state storage for the dev host.
//!
//! Stands in for the server-side persistence the bridge delegates to. Nothing
//! survives a restart.

use chrono::{DateTime, Utc};
use game_bridge::OutboundMessage;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("score must be an integer, got {0:?}")]
    InvalidScore(String),

    #[error("save state is {len} characters, limit is {max}")]
    StateTooLong { len: usize, max: usize },

    #[error("save state is not valid JSON: {0}")]
    InvalidState(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HighScore {
    pub score: i64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct GameRecord {
    scores: Vec<HighScore>,
    saves: Vec<Value>,
}

pub struct GameStore {
    games: RwLock<HashMap<u64, GameRecord>>,
    max_state_len: usize,
}

impl GameStore {
    pub fn new(max_state_len: usize) -> Self {
        Self {
            games: RwLock::new(HashMap::new()),
            max_state_len,
        }
    }

    /// Record a submitted score field. Returns the parsed score.
    pub async fn record_score(&self, game_id: u64, raw: &str) -> Result<i64, StoreError> {
        let score: i64 = raw
            .trim()
            .parse()
            .map_err(|_| StoreError::InvalidScore(raw.to_string()))?;

        let mut games = self.games.write().await;
        games.entry(game_id).or_default().scores.push(HighScore {
            score,
            recorded_at: Utc::now(),
        });
        debug!(game_id, score, "Recorded score");
        Ok(score)
    }

    /// Record a submitted state field. The state must be a JSON document.
    pub async fn record_save(&self, game_id: u64, raw: &str) -> Result<(), StoreError> {
        let len = raw.chars().count();
        if len > self.max_state_len {
            return Err(StoreError::StateTooLong {
                len,
                max: self.max_state_len,
            });
        }
        let state: Value = serde_json::from_str(raw)?;

        let mut games = self.games.write().await;
        let record = games.entry(game_id).or_default();
        record.saves.push(state);
        debug!(game_id, saves = record.saves.len(), "Recorded save state");
        Ok(())
    }

    pub async fn latest_save(&self, game_id: u64) -> Option<Value> {
        let games = self.games.read().await;
        games.get(&game_id)?.saves.last().cloned()
    }

    /// Scores for a game, highest first.
    pub async fn high_scores(&self, game_id: u64) -> Vec<HighScore> {
        let games = self.games.read().await;
        let mut scores = games
            .get(&game_id)
            .map(|r| r.scores.clone())
            .unwrap_or_default();
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores
    }

    /// Value for the page's `load_data` field after a load request: the latest
    /// save wrapped as a LOAD message, or an ERROR message when there is none.
    pub async fn compose_load_data(&self, game_id: u64) -> String {
        let message = match self.latest_save(game_id).await {
            Some(game_state) => OutboundMessage::Load { game_state },
            None => OutboundMessage::load_failed(),
        };
        message.to_value().to_string()
    }
}

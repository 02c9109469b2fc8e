//! Static wellness content and sentiment scoring.
//!
//! Endpoints:
//! - GET  /api/v1/moods          - All mood cards
//! - GET  /api/v1/moods/{mood}   - One mood card
//! - GET  /api/v1/quick-prompts  - Canned conversation starters
//! - POST /api/v1/sentiment      - Score a piece of text

use std::time::Instant;

use axum::extract::Path;
use axum::Json;
use serde::{Deserialize, Serialize};

use mindwell_core::sentiment::{LexiconScorer, SentimentLabel, SentimentScorer};
use mindwell_types::wellness::{Mood, MoodCard, QuickPrompt};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;

#[derive(Debug, Serialize)]
pub struct QuickPromptView {
    pub index: usize,
    pub prompt: QuickPrompt,
    pub label: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SentimentView {
    pub score: f32,
    pub label: SentimentLabel,
}

/// GET /api/v1/moods
pub async fn list_moods() -> Json<ApiResponse<Vec<MoodCard>>> {
    let start = Instant::now();
    let cards = Mood::ALL.iter().map(Mood::card).collect();
    Json(ApiResponse::success(cards, start).with_link("self", "/api/v1/moods"))
}

/// GET /api/v1/moods/{mood}
pub async fn get_mood(Path(mood): Path<String>) -> Result<Json<ApiResponse<MoodCard>>, AppError> {
    let start = Instant::now();
    let parsed: Mood = mood.parse().map_err(|_| AppError::UnknownMood(mood))?;
    Ok(Json(ApiResponse::success(parsed.card(), start)))
}

/// GET /api/v1/quick-prompts
pub async fn list_quick_prompts() -> Json<ApiResponse<Vec<QuickPromptView>>> {
    let start = Instant::now();
    let prompts = QuickPrompt::ALL
        .iter()
        .enumerate()
        .map(|(i, prompt)| QuickPromptView {
            index: i + 1,
            prompt: *prompt,
            label: prompt.label(),
            message: prompt.message(),
        })
        .collect();
    Json(ApiResponse::success(prompts, start))
}

/// POST /api/v1/sentiment
pub async fn score_sentiment(
    Json(body): Json<SentimentRequest>,
) -> Json<ApiResponse<SentimentView>> {
    let start = Instant::now();
    let score = LexiconScorer.score(&body.text);
    Json(ApiResponse::success(
        SentimentView {
            score,
            label: SentimentLabel::from_score(score),
        },
        start,
    ))
}

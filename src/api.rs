use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::{SchedulerConfig, SessionConfig};
use crate::error::ApiError;
use crate::models::{Flashcard, Grade, ReviewLogEntry, ReviewOutcome, ReviewState};
use crate::session::select_due;
use crate::srs;
use crate::store::ReviewStore;

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn ReviewStore>,
    pub catalog: Arc<Catalog>,
    pub scheduler: SchedulerConfig,
    pub session: SessionConfig,
}

pub fn app_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/due-cards", get(due_cards))
        .route("/api/review", post(submit_review))
        .route("/api/stats", get(stats))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct DueQuery {
    user_id: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct DueCard {
    card: Flashcard,
    due_at: DateTime<Utc>,
    interval_days: f64,
    repetitions: u32,
    lapses: u32,
}

async fn due_cards(
    State(state): State<ApiState>,
    Query(query): Query<DueQuery>,
) -> Result<Json<Vec<DueCard>>, ApiError> {
    let user_id = query.user_id.ok_or(ApiError::MissingParam("user_id"))?;
    let limit = query
        .limit
        .unwrap_or(state.session.default_limit)
        .min(state.session.max_limit);

    let states = state.store.list_for_user(&user_id).await?;
    let by_card: HashMap<&str, &ReviewState> =
        states.iter().map(|s| (s.card_id.as_str(), s)).collect();

    let now = Utc::now();
    let mut batch = Vec::new();
    for card_id in select_due(&states, now, limit, state.session.fill) {
        // Review state can outlive a card that was removed from the deck.
        let Some(card) = state.catalog.get(&card_id) else {
            log::warn!("skipping review state for unknown card {card_id}");
            continue;
        };
        let review = by_card[card_id.as_str()];

        batch.push(DueCard {
            card: card.clone(),
            due_at: review.due_at,
            interval_days: review.interval_days,
            repetitions: review.repetitions,
            lapses: review.lapses,
        });
    }

    Ok(Json(batch))
}

#[derive(Deserialize)]
struct ReviewRequest {
    user_id: String,
    card_id: String,
    /// Grade ordinal: 0 fail, 1 hard, 2 good, 3 easy.
    grade: u8,
    reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct ReviewResponse {
    review_id: Uuid,
    card_id: String,
    interval_days: f64,
    ease_factor: f64,
    due_at: DateTime<Utc>,
    repetitions: u32,
    lapses: u32,
}

async fn submit_review(
    State(state): State<ApiState>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let grade =
        Grade::from_ordinal(payload.grade).ok_or(ApiError::InvalidGrade(payload.grade))?;

    if !state.catalog.contains(&payload.card_id) {
        return Err(ApiError::UnknownCard(payload.card_id));
    }

    let outcome = ReviewOutcome {
        grade,
        reviewed_at: payload.reviewed_at.unwrap_or_else(Utc::now),
    };

    let current = state.store.get(&payload.user_id, &payload.card_id).await?;
    let next = srs::schedule(current.as_ref(), &payload.card_id, &outcome, &state.scheduler);

    state
        .store
        .put(&payload.user_id, &payload.card_id, next.clone())
        .await?;

    let entry = ReviewLogEntry {
        id: Uuid::new_v4(),
        user_id: payload.user_id.clone(),
        card_id: payload.card_id.clone(),
        grade,
        reviewed_at: outcome.reviewed_at,
    };
    state.store.log_review(&entry).await?;

    log::info!(
        "user {} reviewed {} grade {}: next due {}",
        payload.user_id,
        payload.card_id,
        grade.ordinal(),
        next.due_at
    );

    Ok(Json(ReviewResponse {
        review_id: entry.id,
        card_id: next.card_id,
        interval_days: next.interval_days,
        ease_factor: next.ease_factor,
        due_at: next.due_at,
        repetitions: next.repetitions,
        lapses: next.lapses,
    }))
}

#[derive(Deserialize)]
struct StatsQuery {
    user_id: Option<String>,
}

#[derive(Serialize)]
struct StatsResponse {
    due_now: i64,
    tracked: usize,
}

async fn stats(
    State(state): State<ApiState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let user_id = query.user_id.ok_or(ApiError::MissingParam("user_id"))?;

    let due_now = state.store.due_count(&user_id, Utc::now()).await?;
    let tracked = state.store.list_for_user(&user_id).await?.len();

    Ok(Json(StatsResponse { due_now, tracked }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::Duration;
    use tower::util::ServiceExt;

    fn test_state() -> ApiState {
        ApiState {
            store: Arc::new(MemoryStore::default()),
            catalog: Arc::new(Catalog::builtin().unwrap()),
            scheduler: SchedulerConfig::default(),
            session: SessionConfig::default(),
        }
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn first_review_schedules_one_day_out() {
        let state = test_state();
        let app = app_router(state);

        let response = app
            .oneshot(post_json(
                "/api/review",
                serde_json::json!({
                    "user_id": "alice",
                    "card_id": "http-status-200",
                    "grade": 2
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["repetitions"], 1);
        assert_eq!(body["lapses"], 0);
        assert_eq!(body["interval_days"], 1.0);
        assert!(body["review_id"].is_string());
    }

    #[tokio::test]
    async fn overdue_card_shows_up_in_due_batch() {
        let state = test_state();

        // Seed a state two days overdue directly through the store.
        let overdue = ReviewState {
            card_id: "tcp-handshake".to_string(),
            interval_days: 6.0,
            ease_factor: 2.5,
            due_at: Utc::now() - Duration::days(2),
            repetitions: 2,
            lapses: 0,
        };
        state
            .store
            .put("alice", "tcp-handshake", overdue)
            .await
            .unwrap();

        let app = app_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/due-cards?user_id=alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["card"]["id"], "tcp-handshake");
        assert_eq!(body[0]["card"]["question"], "What are the three steps of the TCP handshake?");
    }

    #[tokio::test]
    async fn freshly_reviewed_card_is_not_due() {
        let state = test_state();
        let app = app_router(state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/review",
                serde_json::json!({
                    "user_id": "alice",
                    "card_id": "dns-record-a",
                    "grade": 3
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/due-cards?user_id=alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(response).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_grade_is_rejected_without_state_change() {
        let state = test_state();
        let store = state.store.clone();
        let app = app_router(state);

        let response = app
            .oneshot(post_json(
                "/api/review",
                serde_json::json!({
                    "user_id": "alice",
                    "card_id": "http-status-200",
                    "grade": 9
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(store
            .get("alice", "http-status-200")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unknown_card_is_a_404() {
        let app = app_router(test_state());

        let response = app
            .oneshot(post_json(
                "/api/review",
                serde_json::json!({
                    "user_id": "alice",
                    "card_id": "no-such-card",
                    "grade": 2
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_user_id_is_a_400() {
        let app = app_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/due-cards")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stats_counts_due_and_tracked() {
        let state = test_state();

        let overdue = ReviewState {
            card_id: "sql-left-join".to_string(),
            interval_days: 1.0,
            ease_factor: 2.5,
            due_at: Utc::now() - Duration::days(1),
            repetitions: 1,
            lapses: 0,
        };
        let upcoming = ReviewState {
            card_id: "git-rebase".to_string(),
            interval_days: 6.0,
            ease_factor: 2.5,
            due_at: Utc::now() + Duration::days(6),
            repetitions: 2,
            lapses: 0,
        };
        state.store.put("alice", "sql-left-join", overdue).await.unwrap();
        state.store.put("alice", "git-rebase", upcoming).await.unwrap();

        let app = app_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/stats?user_id=alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["due_now"], 1);
        assert_eq!(body["tracked"], 2);
    }

    #[tokio::test]
    async fn failing_a_card_resets_it_to_the_minimum_interval() {
        let state = test_state();
        let app = app_router(state);

        for grade in [2, 2, 2] {
            let response = app
                .clone()
                .oneshot(post_json(
                    "/api/review",
                    serde_json::json!({
                        "user_id": "alice",
                        "card_id": "cap-theorem",
                        "grade": grade
                    }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(post_json(
                "/api/review",
                serde_json::json!({
                    "user_id": "alice",
                    "card_id": "cap-theorem",
                    "grade": 0
                }),
            ))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["repetitions"], 0);
        assert_eq!(body["lapses"], 1);
        assert_eq!(body["interval_days"], 1.0);
    }
}

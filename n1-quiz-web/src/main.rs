use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use n1_quiz::sources::{HttpFetcher, MockMode, MockSource, VocabSource, default_sources, sample_records};
use n1_quiz::{Aggregator, Question, QuizConfig, QuizError, load_all, make_rng, parse_limit, prepare_quiz};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Default, Deserialize)]
pub struct QuestionsQuery {
    /// Kept as text so an unparseable value falls back to the maximum
    pub limit: Option<String>,
    pub category: Option<String>,
    pub seed: Option<u64>,
}

#[derive(Serialize)]
pub struct QuestionsResponse {
    pub total_words: usize,
    /// Seconds the player gets per question
    pub time_limit_secs: u64,
    pub questions: Vec<Question>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub sources: Arc<Vec<Box<dyn VocabSource>>>,
    pub config: QuizConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = QuizConfig::from_env()?;
    let sources: Vec<Box<dyn VocabSource>> = if std::env::var_os("N1QUIZ_MOCK").is_some() {
        info!("Serving the built-in sample vocabulary");
        vec![Box::new(MockSource::new("sample", MockMode::Records(sample_records())))]
    } else {
        let http = HttpFetcher::new(config.fetch_timeout)
            .map_err(|e| format!("Failed to initialize HTTP client: {}", e))?;
        default_sources(&http)
    };

    let state = AppState {
        sources: Arc::new(sources),
        config,
    };

    let addr = std::env::var("N1QUIZ_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("N1 quiz server running at http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/questions", get(questions))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn serve_index() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        include_str!("static/index.html"),
    )
}

async fn questions(
    State(state): State<AppState>,
    Query(query): Query<QuestionsQuery>,
) -> Result<Json<QuestionsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut config = state.config.clone();
    if let Some(limit) = &query.limit {
        config.limit = parse_limit(limit);
    }
    if let Some(category) = &query.category {
        config.category = category.parse().unwrap_or_default();
    }
    if query.seed.is_some() {
        config.seed = query.seed;
    }

    let vocab = load_all(&state.sources, &Aggregator::new(config.source_deadline)).await;
    let mut rng = make_rng(config.seed);
    let questions = prepare_quiz(&vocab, &config, &mut rng).map_err(error_response)?;

    info!(
        "Serving {} questions from {} words (category: {})",
        questions.len(),
        vocab.len(),
        config.category
    );

    Ok(Json(QuestionsResponse {
        total_words: vocab.len(),
        time_limit_secs: config.answer_time_limit.as_secs(),
        questions,
    }))
}

fn error_response(err: QuizError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        QuizError::InsufficientData(_) => StatusCode::SERVICE_UNAVAILABLE,
        QuizError::NoQuestionsForCategory(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!("Quiz request failed: {}", err);
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn state(mode: MockMode) -> AppState {
        AppState {
            sources: Arc::new(vec![Box::new(MockSource::new("mock", mode))]),
            config: QuizConfig::default(),
        }
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_questions_endpoint() {
        let (status, body) = get_json(
            state(MockMode::Records(sample_records())),
            "/api/questions?limit=10&seed=7",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_words"], 16);
        assert_eq!(body["time_limit_secs"], 5);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 10);
        assert_eq!(questions[0]["choices"].as_array().unwrap().len(), 4);
        assert!(questions[0]["answerIndex"].as_u64().unwrap() < 4);
    }

    #[tokio::test]
    async fn test_time_limit_follows_config() {
        let mut app_state = state(MockMode::Records(sample_records()));
        app_state.config.answer_time_limit = std::time::Duration::from_secs(12);
        let (status, body) = get_json(app_state, "/api/questions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["time_limit_secs"], 12);
    }

    #[tokio::test]
    async fn test_same_seed_same_questions() {
        let uri = "/api/questions?seed=42";
        let (_, a) = get_json(state(MockMode::Records(sample_records())), uri).await;
        let (_, b) = get_json(state(MockMode::Records(sample_records())), uri).await;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_category_filter() {
        let (status, body) = get_json(
            state(MockMode::Records(sample_records())),
            "/api/questions?category=%E5%8B%95%E8%A9%9E",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let questions = body["questions"].as_array().unwrap();
        assert!(!questions.is_empty());
        assert!(questions.iter().all(|q| q["pos"] == "動詞"));
    }

    #[tokio::test]
    async fn test_empty_category_is_unprocessable() {
        let (status, body) = get_json(
            state(MockMode::Records(sample_records())),
            "/api/questions?category=%E5%8A%A9%E8%A9%9E",
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("この条件では出題できません"));
    }

    #[tokio::test]
    async fn test_no_data_is_unavailable() {
        let (status, body) = get_json(
            state(MockMode::Error("offline".to_string())),
            "/api/questions",
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = app(state(MockMode::Records(Vec::new())))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/api/questions"));
    }
}

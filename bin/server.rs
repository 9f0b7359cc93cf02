// Tutorial Apps - Web Server
// REST API with Axum over the same screen models the TUI uses

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tutorial_apps::{
    format_currency, AppConfig, BillForm, BillInput, BizCard, CounterSnapshot, MoneyCounter,
    Project,
};

/// Env var pointing at an explicit config.toml
const CONFIG_ENV: &str = "TUTORIAL_APPS_CONFIG";

/// Shared application state
#[derive(Clone)]
struct AppState {
    counter: Arc<Mutex<MoneyCounter>>,
    card: Arc<Mutex<BizCard>>,
}

impl AppState {
    fn new(config: &AppConfig) -> Self {
        Self {
            counter: Arc::new(Mutex::new(MoneyCounter::new(&config.counter))),
            card: Arc::new(Mutex::new(BizCard::new(&config.card))),
        }
    }
}

/// Each handler updates its model in a single call, so a poisoned lock still
/// holds a consistent value.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
struct TipQuery {
    amount: String,
    #[serde(default = "default_split")]
    split: u32,
    #[serde(default)]
    tip: u32,
}

fn default_split() -> u32 {
    1
}

/// Tip response (raw numbers plus display text)
#[derive(Serialize)]
struct TipResponse {
    amount: f64,
    split: u32,
    tip_percent: u32,
    tip_amount: f64,
    per_person_amount: f64,
    tip_display: String,
    per_person_display: String,
}

/// Business card response
#[derive(Serialize)]
struct CardResponse {
    name: String,
    title: String,
    handle: String,
    portfolio_visible: bool,
    projects: Vec<Project>,
}

impl From<&BizCard> for CardResponse {
    fn from(card: &BizCard) -> Self {
        Self {
            name: card.name.clone(),
            title: card.title.clone(),
            handle: card.handle.clone(),
            portfolio_visible: card.portfolio_visible(),
            projects: card.visible_projects().to_vec(),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/tip?amount=&split=&tip= - Tip and per-person total
async fn calculate_tip(query: Result<Query<TipQuery>, QueryRejection>) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            log::warn!("Malformed tip query: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<TipResponse>::err(rejection.body_text())),
            )
                .into_response();
        }
    };

    let mut form = BillForm::default();
    form.set_bill_text(&query.amount);

    let input = match form
        .parse_bill()
        .and_then(|bill| BillInput::validated(bill, query.split, query.tip))
    {
        Ok(input) => input,
        Err(e) => {
            log::warn!("Rejected tip request: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<TipResponse>::err(e.to_string())),
            )
                .into_response();
        }
    };

    let result = input.compute();
    let response = TipResponse {
        amount: input.amount,
        split: input.split_count,
        tip_percent: input.tip_percent,
        tip_amount: result.tip_amount,
        per_person_amount: result.per_person_amount,
        tip_display: format_currency(result.tip_amount),
        per_person_display: format_currency(result.per_person_amount),
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/counter - Current counter value
async fn get_counter(State(state): State<AppState>) -> impl IntoResponse {
    let counter = lock(&state.counter);
    Json(ApiResponse::ok(CounterSnapshot::from(&*counter)))
}

/// POST /api/counter/tap - One tap
async fn tap_counter(State(state): State<AppState>) -> impl IntoResponse {
    let mut counter = lock(&state.counter);
    counter.tap();
    Json(ApiResponse::ok(CounterSnapshot::from(&*counter)))
}

/// GET /api/card - Business card with visible projects
async fn get_card(State(state): State<AppState>) -> impl IntoResponse {
    let card = lock(&state.card);
    Json(ApiResponse::ok(CardResponse::from(&*card)))
}

/// POST /api/card/portfolio - Toggle the portfolio
async fn toggle_portfolio(State(state): State<AppState>) -> impl IntoResponse {
    let mut card = lock(&state.card);
    card.toggle_portfolio();
    Json(ApiResponse::ok(CardResponse::from(&*card)))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/tip", get(calculate_tip))
        .route("/counter", get(get_counter))
        .route("/counter/tap", post(tap_counter))
        .route("/card", get(get_card))
        .route("/card/portfolio", post(toggle_portfolio))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("🌐 Tutorial Apps - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())
        .context("Failed to load configuration")?;

    let app = router(AppState::new(&config));

    let addr = config.server.addr.as_str();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/tip?amount=100&split=4&tip=10", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn test_app() -> Router {
        router(AppState::new(&AppConfig::default()))
    }

    #[tokio::test]
    async fn test_tip_endpoint() {
        let app = test_app();
        let (status, body) = call(&app, Method::GET, "/api/tip?amount=100&split=4&tip=10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["tip_amount"], 10.0);
        assert_eq!(body["data"]["per_person_amount"], 27.5);
        assert_eq!(body["data"]["per_person_display"], "$27.50");
    }

    #[tokio::test]
    async fn test_tip_endpoint_rejects_bad_input() {
        let app = test_app();

        let (status, body) = call(&app, Method::GET, "/api/tip?amount=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = call(&app, Method::GET, "/api/tip?amount=100&split=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_tip_query_gets_envelope() {
        let app = test_app();

        let (status, body) = call(&app, Method::GET, "/api/tip?amount=100&split=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());

        let (status, body) = call(&app, Method::GET, "/api/tip?split=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_counter_taps_are_shared() {
        let app = test_app();
        for _ in 0..11 {
            call(&app, Method::POST, "/api/counter/tap").await;
        }

        let (_, body) = call(&app, Method::GET, "/api/counter").await;
        assert_eq!(body["data"]["value"], 11);
        assert_eq!(body["data"]["rich"], true);
    }

    #[tokio::test]
    async fn test_portfolio_toggle() {
        let app = test_app();

        let (_, body) = call(&app, Method::GET, "/api/card").await;
        assert_eq!(body["data"]["portfolio_visible"], false);
        assert_eq!(body["data"]["projects"].as_array().unwrap().len(), 0);

        let (_, body) = call(&app, Method::POST, "/api/card/portfolio").await;
        assert_eq!(body["data"]["portfolio_visible"], true);
        assert_eq!(body["data"]["projects"][0]["name"], "Project 1");
    }
}

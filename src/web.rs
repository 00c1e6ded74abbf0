use crate::model::{
    AutocompleteHit, DefinitionSubmission, ExampleSubmission, FuzzyResult, NymSubmission, Outcome,
    Results, VoteDirection, VoteOutcome, Wordwheel,
};
use crate::service::{Dvlf, ServiceError, WordwheelQuery, today};
use crate::wordwheel::Direction;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info};

type SharedState = Arc<AppState>;

/// Client-side routes answered with the single-page app shell.
const SPA_ROUTES: &[&str] = &[
    "/",
    "/apropos",
    "/definition",
    "/exemple",
    "/synonyme",
    "/antonyme",
];

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Dvlf>,
    pub static_dir: Option<PathBuf>,
}

#[derive(Clone)]
pub struct WebConfig {
    pub addr: SocketAddr,
    /// Directory holding `index.html` and the `css`, `js`, `img` asset folders.
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            static_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum WebError {
    Io(std::io::Error),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<std::io::Error> for WebError {
    fn from(value: std::io::Error) -> Self {
        WebError::Io(value)
    }
}

pub async fn serve(service: Arc<Dvlf>, config: WebConfig) -> Result<(), WebError> {
    let state = Arc::new(AppState {
        service,
        static_dir: config.static_dir.clone(),
    });
    let router = build_router(state);
    info!(
        %config.addr,
        static_dir = ?config.static_dir,
        "Binding HTTP listener"
    );
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        error!(error = %err, "request failed");
        ApiError::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.message });
        (self.status, Json(payload)).into_response()
    }
}

/// Runs a service call on the blocking pool: store writes, verification
/// round-trips and fuzzy scans must not stall the async workers.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(work)
        .await
        .map_err(|err| ApiError::internal(format!("worker task failed: {err}")))?
        .map_err(ApiError::from)
}

fn build_router(state: SharedState) -> Router {
    let mut router = Router::new()
        .route("/api/mot/:headword", get(api_lookup))
        .route("/api/autocomplete/:prefix", get(api_autocomplete))
        .route("/api/wordwheel", get(api_wordwheel))
        .route("/api/fuzzy/:headword", get(api_fuzzy))
        .route("/api/vote/:headword/:example_id/:vote", get(api_vote))
        .route("/api/submit", post(api_submit_definition))
        .route("/api/submitExample", post(api_submit_example))
        .route("/api/submitNym", post(api_submit_nym))
        .route("/api/wordoftheday", get(api_word_of_the_day))
        .route("/api/explore/:headword", get(api_explore))
        .route("/healthz", get(health))
        .with_state(Arc::clone(&state));
    if let Some(dir) = &state.static_dir {
        router = router.merge(static_routes(dir));
    }
    router
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CompressionLayer::new())
}

fn static_routes(dir: &FsPath) -> Router {
    let index = ServeFile::new(dir.join("index.html"));
    let mut router = Router::new()
        .nest_service("/css", ServeDir::new(dir.join("css")))
        .nest_service("/js", ServeDir::new(dir.join("js")))
        .nest_service("/img", ServeDir::new(dir.join("img")))
        .route_service("/mot/*headword", index.clone());
    for &route in SPA_ROUTES {
        router = router.route_service(route, index.clone());
    }
    router
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "dvlf-web" }))
}

async fn api_lookup(
    State(state): State<SharedState>,
    Path(headword): Path<String>,
) -> Result<Json<Results>, ApiError> {
    let service = Arc::clone(&state.service);
    let results = blocking(move || service.lookup(&headword)).await?;
    Ok(Json(results))
}

async fn api_autocomplete(
    State(state): State<SharedState>,
    Path(prefix): Path<String>,
) -> Result<Json<Vec<AutocompleteHit>>, ApiError> {
    let service = Arc::clone(&state.service);
    let hits = blocking(move || service.autocomplete(&prefix)).await?;
    Ok(Json(hits))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordwheelParams {
    headword: Option<String>,
    start_index: Option<usize>,
    end_index: Option<usize>,
    position: Option<Direction>,
}

impl WordwheelParams {
    fn into_query(self) -> Result<WordwheelQuery, ApiError> {
        if let Some(headword) = self.headword {
            return Ok(WordwheelQuery::Centered(headword));
        }
        match (self.start_index, self.end_index, self.position) {
            (Some(start_index), Some(end_index), Some(direction)) => Ok(WordwheelQuery::Extend {
                start_index,
                end_index,
                direction,
            }),
            _ => Err(ApiError::bad_request(
                "expected `headword` or `startIndex`, `endIndex` and `position`",
            )),
        }
    }
}

async fn api_wordwheel(
    State(state): State<SharedState>,
    Query(params): Query<WordwheelParams>,
) -> Result<Json<Wordwheel>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.service.wordwheel(&query)))
}

async fn api_fuzzy(
    State(state): State<SharedState>,
    Path(headword): Path<String>,
) -> Result<Json<Vec<FuzzyResult>>, ApiError> {
    let service = Arc::clone(&state.service);
    let results = blocking(move || Ok(service.fuzzy(&headword))).await?;
    Ok(Json(results))
}

async fn api_vote(
    State(state): State<SharedState>,
    Path((headword, example_id, vote)): Path<(String, u64, String)>,
) -> Result<Json<VoteOutcome>, ApiError> {
    // Anything but "up" counts as a downvote.
    let direction = if vote == "up" {
        VoteDirection::Up
    } else {
        VoteDirection::Down
    };
    let service = Arc::clone(&state.service);
    let outcome = blocking(move || service.vote(&headword, example_id, direction)).await?;
    Ok(Json(outcome))
}

async fn api_submit_definition(
    State(state): State<SharedState>,
    Json(submission): Json<DefinitionSubmission>,
) -> Result<Json<Outcome>, ApiError> {
    let service = Arc::clone(&state.service);
    let outcome = blocking(move || service.submit_definition(&submission)).await?;
    Ok(Json(outcome))
}

async fn api_submit_example(
    State(state): State<SharedState>,
    Json(submission): Json<ExampleSubmission>,
) -> Result<Json<Outcome>, ApiError> {
    let service = Arc::clone(&state.service);
    let outcome = blocking(move || service.submit_example(&submission)).await?;
    Ok(Json(outcome))
}

async fn api_submit_nym(
    State(state): State<SharedState>,
    Json(submission): Json<NymSubmission>,
) -> Result<Json<Outcome>, ApiError> {
    let service = Arc::clone(&state.service);
    let outcome = blocking(move || service.submit_nym(&submission)).await?;
    Ok(Json(outcome))
}

async fn api_word_of_the_day(State(state): State<SharedState>) -> Result<Json<String>, ApiError> {
    let date = today();
    state
        .service
        .word_of_the_day(&date)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("no word scheduled for {date}")))
}

async fn api_explore(
    State(state): State<SharedState>,
    Path(headword): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let service = Arc::clone(&state.service);
    let vectors = blocking(move || service.explore(&headword)).await?;
    Ok(Json(vectors))
}

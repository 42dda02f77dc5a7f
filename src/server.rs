//! Web server module for litebench.
//!
//! Two pages worth of routes: the latest persons list and the insert action
//! that feeds it.

use std::fmt::Write as _;
use std::sync::Arc;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderName, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

use crate::config::DEFAULT_REGION_ENV;
use crate::fake;
use crate::storage::{LATEST_LIMIT, Person, PersonStore};

/// Response header asking the edge proxy to replay the request elsewhere.
pub const FLY_REPLAY: HeaderName = HeaderName::from_static("fly-replay");

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub persons: PersonStore,
    /// Environment variable holding the current region, read per request.
    pub region_env: String,
    /// Cancelled on server shutdown; in-flight inserts observe it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(persons: PersonStore) -> Self {
        Self {
            persons,
            region_env: DEFAULT_REGION_ENV.to_string(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_region_env(mut self, name: impl Into<String>) -> Self {
        self.region_env = name.into();
        self
    }

    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Region this instance runs in; empty when the variable is unset.
    fn current_region(&self) -> String {
        std::env::var(&self.region_env).unwrap_or_default()
    }
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

/// Query parameters for the index page.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IndexParams {
    pub region: Option<String>,
}

impl IndexParams {
    /// Pick the parameters out of raw query pairs; the first `region` wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let region = pairs
            .into_iter()
            .find(|(key, _)| key == "region")
            .map(|(_, value)| value);
        Self { region }
    }
}

/// Index page template.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    region: String,
    persons: Vec<Person>,
}

/// Wrapper to render Askama templates as Axum responses.
struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(rendered) => Html(rendered).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Template render failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let app_state = Arc::new(state);

    Router::new()
        .route("/", get(index_handler))
        .route("/generate", post(generate_handler))
        .route("/healthz", get(healthz_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .with_state(app_state)
}

/// Latest persons, as HTML or plain text.
///
/// A `region` parameter naming another region is answered with a replay
/// redirect instead of a database read.
async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let params = IndexParams::from_pairs(pairs);
    let current = state.current_region();

    if let Some(region) = params.region.filter(|r| !r.is_empty())
        && region != current
    {
        tracing::info!(from = %current, to = %region, "Redirecting to region");
        return (
            StatusCode::TEMPORARY_REDIRECT,
            [(FLY_REPLAY, format!("region={region}"))],
        )
            .into_response();
    }

    let persons = match state.persons.latest(LATEST_LIMIT).await {
        Ok(persons) => persons,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    let wants_text = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept == "text/plain");

    if wants_text {
        render_text(&current, &persons).into_response()
    } else {
        HtmlTemplate(IndexTemplate {
            region: current,
            persons,
        })
        .into_response()
    }
}

fn render_text(region: &str, persons: &[Person]) -> String {
    let mut body = format!("REGION: {region}\n\n");
    for person in persons {
        let _ = writeln!(
            body,
            "- {} @ {} ({})",
            person.name, person.company, person.phone
        );
    }
    body
}

/// Insert one fake person, then send the client back where it came from.
async fn generate_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let person = fake::person(&mut rand::thread_rng());

    // Cancelled when the server shuts down or this request is dropped.
    let cancel = state.shutdown.child_token();
    let _abort_on_drop = cancel.clone().drop_guard();

    if let Err(e) = state.persons.insert(&cancel, &person).await {
        tracing::error!(error = %e, "Failed to insert person");
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    let location = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("/")
        .to_string();

    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Liveness probe.
async fn healthz_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::companion::catalog::{Persona, PersonaCatalog};
use crate::companion::dialogue;
use crate::companion::progression::ReflectionOutcome;
use crate::companion::quiz::{assign_persona, QuizQuestion};
use crate::companion::sentiment::MoodLabel;
use crate::config::AppConfig;
use crate::error::CoreError;
use crate::session::{SessionProfile, SessionStore};
use crate::subscribe::{is_valid_email, SubscribeClient, SubscribeError};

#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<PersonaCatalog>,
    pub sessions: SessionStore,
    /// `None` until a provider token is configured; the subscribe route
    /// answers 500 in the meantime.
    pub subscriber: Option<SubscribeClient>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
struct AssignQuizRequest {
    answers: Vec<String>,
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssignQuizResponse {
    session_id: String,
    persona: Persona,
    greeting: &'static str,
    welcome_prompt: &'static str,
}

#[derive(Debug, Deserialize)]
struct ReflectRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct ReflectResponse {
    profile: SessionProfile,
    /// Absent when the reflection was below the minimum length.
    outcome: Option<ReflectionView>,
}

#[derive(Debug, Serialize)]
struct ReflectionView {
    #[serde(flatten)]
    outcome: ReflectionOutcome,
    insight: &'static str,
    dialogue: &'static str,
}

#[derive(Debug, Serialize)]
struct PromptResponse {
    prompt: &'static str,
}

#[derive(Debug, Deserialize)]
struct DialogueQuery {
    mood: String,
}

#[derive(Debug, Serialize)]
struct DialogueResponse {
    mood: MoodLabel,
    line: &'static str,
}

#[derive(Debug, Serialize)]
struct SubscribeOk {
    ok: bool,
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let bind_addr = config
        .bind
        .parse::<SocketAddr>()
        .context("Invalid bind address (expected host:port)")?;

    let catalog = PersonaCatalog::builtin().context("Persona catalog failed validation")?;

    let subscriber = match config.subscribe.api_token.clone() {
        Some(token) => Some(SubscribeClient::new(
            config.subscribe.provider,
            token,
            config.subscribe.group_id.clone(),
        )),
        None => {
            tracing::warn!(
                "No subscribe API token configured; /api/subscribe will answer 500 until one is set"
            );
            None
        }
    };

    let state = Arc::new(ServerState {
        catalog: Arc::new(catalog),
        sessions: SessionStore::new(),
        subscriber,
    });

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind server to {}", bind_addr))?;
    tracing::info!("MindQuest backend listening on http://{}", bind_addr);
    axum::serve(listener, app)
        .await
        .context("Backend server failed")?;
    Ok(())
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/personas", get(list_personas))
        .route("/api/personas/:id", get(get_persona))
        .route("/api/personas/:id/dialogue", get(get_persona_dialogue))
        .route("/api/quiz", get(get_quiz))
        .route("/api/quiz/assign", post(assign_quiz))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/prompt", get(get_daily_prompt))
        .route("/api/sessions/:id/reflect", post(reflect))
        .route("/api/sessions/:id/streak", post(increment_streak))
        .route(
            "/api/subscribe",
            post(subscribe).fallback(method_not_allowed),
        )
        .with_state(state)
}

fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn core_error_json(error: CoreError) -> Response {
    let status = match error {
        CoreError::PersonaNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::InvalidAnswer(_) | CoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
    };
    error_json(status, error.to_string())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn list_personas(State(state): State<Arc<ServerState>>) -> Json<Vec<Persona>> {
    Json(state.catalog.personas().to_vec())
}

async fn get_persona(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Response {
    match state.catalog.get(&id) {
        Ok(persona) => Json(persona.clone()).into_response(),
        Err(error) => core_error_json(error),
    }
}

/// Speech-bubble line for a companion in a given mood, e.g.
/// `/api/personas/luna/dialogue?mood=sad`.
async fn get_persona_dialogue(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Query(query): Query<DialogueQuery>,
) -> Response {
    let persona = match state.catalog.get(&id) {
        Ok(persona) => persona,
        Err(error) => return core_error_json(error),
    };
    let mood = match MoodLabel::parse(&query.mood) {
        Ok(mood) => mood,
        Err(error) => return core_error_json(error),
    };
    let line = dialogue::pick_dialogue(persona, mood, &mut rand::thread_rng());
    Json(DialogueResponse { mood, line }).into_response()
}

async fn get_quiz(State(state): State<Arc<ServerState>>) -> Json<&'static [QuizQuestion]> {
    Json(state.catalog.questions())
}

async fn assign_quiz(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<AssignQuizRequest>,
) -> Response {
    let persona_id = match assign_persona(
        &request.answers,
        state.catalog.questions(),
        &state.catalog,
    ) {
        Ok(id) => id,
        Err(error) => {
            tracing::warn!("Quiz scoring rejected answers: {}", error);
            return core_error_json(error);
        }
    };

    // assign_persona only returns ids from the catalog.
    let persona = match state.catalog.get(persona_id) {
        Ok(persona) => persona.clone(),
        Err(error) => return core_error_json(error),
    };

    let email = request
        .email
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let profile = SessionProfile::new(persona_id, email);
    let session_id = profile.id.clone();

    // ThreadRng is !Send; keep it scoped so the handler future stays Send
    // across the store await.
    let (greeting, welcome_prompt) = {
        let mut rng = rand::thread_rng();
        (
            dialogue::pick_dialogue(&persona, profile.progression.current_mood, &mut rng),
            dialogue::pick_welcome_prompt(&mut rng),
        )
    };

    state.sessions.insert(profile).await;
    tracing::info!("Assigned companion '{}' to session {}", persona_id, session_id);

    Json(AssignQuizResponse {
        session_id,
        persona,
        greeting,
        welcome_prompt,
    })
    .into_response()
}

async fn get_session(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Response {
    match state.sessions.get(&id).await {
        Some(profile) => Json(profile).into_response(),
        None => error_json(StatusCode::NOT_FOUND, "Session not found"),
    }
}

async fn get_daily_prompt(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Response {
    if state.sessions.get(&id).await.is_none() {
        return error_json(StatusCode::NOT_FOUND, "Session not found");
    }
    let prompt = dialogue::pick_daily_prompt(&mut rand::thread_rng());
    Json(PromptResponse { prompt }).into_response()
}

async fn reflect(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(request): Json<ReflectRequest>,
) -> Response {
    let Some((profile, outcome)) = state.sessions.apply_reflection(&id, &request.text).await
    else {
        return error_json(StatusCode::NOT_FOUND, "Session not found");
    };

    let outcome = match outcome {
        Some(outcome) => {
            let persona = match state.catalog.get(&profile.progression.persona_id) {
                Ok(persona) => persona,
                Err(error) => {
                    tracing::error!("Session references unknown persona: {}", error);
                    return error_json(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Session persona missing from catalog",
                    );
                }
            };
            let mut rng = rand::thread_rng();
            let insight = dialogue::pick_insight(outcome.sentiment.mood, &mut rng);
            let line = dialogue::pick_dialogue(persona, outcome.sentiment.mood, &mut rng);
            Some(ReflectionView {
                outcome,
                insight,
                dialogue: line,
            })
        }
        None => None,
    };

    Json(ReflectResponse { profile, outcome }).into_response()
}

async fn increment_streak(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Response {
    match state.sessions.increment_streak(&id).await {
        Some(profile) => Json(profile).into_response(),
        None => error_json(StatusCode::NOT_FOUND, "Session not found"),
    }
}

async fn method_not_allowed() -> Response {
    error_json(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// POST /api/subscribe. The body is parsed by hand so malformed JSON maps to
/// the documented 400 shape instead of the framework rejection.
async fn subscribe(State(state): State<Arc<ServerState>>, body: String) -> Response {
    let (email, firstname) = match parse_subscribe_body(&body) {
        Ok(parsed) => parsed,
        Err(message) => return error_json(StatusCode::BAD_REQUEST, message),
    };

    let Some(client) = state.subscriber.as_ref() else {
        tracing::error!("Subscribe API token is not set");
        return error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server configuration error",
        );
    };

    match client.create_subscriber(&email, firstname.as_deref()).await {
        Ok(()) => Json(SubscribeOk { ok: true }).into_response(),
        Err(SubscribeError::Rejected(message)) => error_json(StatusCode::BAD_REQUEST, message),
        Err(SubscribeError::Unavailable) => {
            error_json(StatusCode::BAD_GATEWAY, "Subscription service unavailable")
        }
    }
}

/// Validate the subscribe request body: required well-formed email, optional
/// trimmed firstname.
fn parse_subscribe_body(raw: &str) -> Result<(String, Option<String>), &'static str> {
    let body: serde_json::Value = serde_json::from_str(raw).map_err(|_| "Invalid JSON")?;

    let email = body
        .get("email")
        .and_then(|value| value.as_str())
        .map(str::trim)
        .unwrap_or("");
    if !is_valid_email(email) {
        return Err("Valid email is required");
    }

    let firstname = body
        .get("firstname")
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok((email.to_string(), firstname))
}

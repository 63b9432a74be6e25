use crate::core::{CandidateSource, DeckSession};
use crate::models::{
    Candidate, CreateDeckRequest, CreateDeckResponse, DragPhase, DragRequest, DragResponse,
    ErrorResponse, HealthResponse, SwipeRequest, SwipeResponse,
};
use crate::routes::{optional_auth, AppState};
use crate::services::ProfileStore;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Configure health and deck routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/decks", web::post().to(create_deck))
        .route("/decks/{id}", web::get().to(get_deck))
        .route("/decks/{id}", web::delete().to(delete_deck))
        .route("/decks/{id}/drag", web::post().to(drag))
        .route("/decks/{id}/swipe", web::post().to(swipe))
        .route("/decks/{id}/candidates/{candidate_id}", web::get().to(get_candidate));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let ledger_healthy = match &state.ledger {
        Some(ledger) => ledger.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if ledger_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.sessions.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Open a deck session
///
/// POST /api/v1/decks
///
/// Request body:
/// ```json
/// {
///   "deckSize": 20,
///   "role": "founder|investor"
/// }
/// ```
async fn create_deck(
    state: web::Data<AppState>,
    req: web::Json<CreateDeckRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_deck request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let user_id = match optional_auth(&state, &http_req) {
        Ok(claims) => claims.map(|c| c.sub),
        Err(response) => return response,
    };

    let size = req
        .deck_size
        .map(usize::from)
        .unwrap_or(state.deck.default_size)
        .min(state.deck.max_size);

    let candidates = match load_candidates(&state, &req, user_id.as_deref(), size).await {
        Ok(candidates) => candidates,
        Err(response) => return response,
    };

    let session = state.sessions.insert(DeckSession::new(
        user_id.clone(),
        candidates,
        state.deck_settings,
        state.ledger_tx.clone(),
    ))
    .await;

    let deck = session.snapshot().await;

    tracing::info!(
        "Opened deck with {} candidates for {}",
        deck.deck_size,
        user_id.as_deref().unwrap_or("anonymous")
    );
    tracing::debug!("Deck session id {}", session.id());

    HttpResponse::Created().json(CreateDeckResponse {
        session_id: session.id(),
        deck,
    })
}

/// Candidates for a new deck, never including the caller's own profile
async fn load_candidates(
    state: &AppState,
    req: &CreateDeckRequest,
    user_id: Option<&str>,
    size: usize,
) -> Result<Vec<Candidate>, HttpResponse> {
    if let Some(fixture) = &state.fixture {
        return Ok(fixture
            .clone()
            .with_role(req.role)
            .excluding(user_id)
            .next(size));
    }

    state.backend.list_candidates(req.role, user_id, size).await.map_err(|e| {
        tracing::error!("Failed to fetch candidates: {}", e);
        HttpResponse::BadGateway().json(ErrorResponse::new(
            "Failed to fetch candidates",
            e.to_string(),
            502,
        ))
    })
}

fn deck_not_found(id: &Uuid) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "Deck not found",
        format!("No deck session with id {}", id),
        404,
    ))
}

/// Look up a deck the caller may drive.
///
/// Decks opened with a token belong to that user; anyone else gets the same
/// 404 as for an unknown id.
async fn find_session(
    state: &AppState,
    id: &Uuid,
    http_req: &HttpRequest,
) -> Result<Arc<DeckSession>, HttpResponse> {
    let session = state.sessions.get(id).await.ok_or_else(|| deck_not_found(id))?;

    if session.user_id().is_some() {
        let caller = optional_auth(state, http_req)?.map(|claims| claims.sub);
        if !session.is_owned_by(caller.as_deref()) {
            tracing::warn!(
                "Rejected access to deck owned by {} from {}",
                session.user_id().unwrap_or_default(),
                caller.as_deref().unwrap_or("anonymous")
            );
            return Err(deck_not_found(id));
        }
    }

    Ok(session)
}

/// GET /api/v1/decks/{id}
async fn get_deck(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    http_req: HttpRequest,
) -> impl Responder {
    match find_session(&state, &path, &http_req).await {
        Ok(session) => HttpResponse::Ok().json(session.snapshot().await),
        Err(response) => response,
    }
}

/// DELETE /api/v1/decks/{id}
async fn delete_deck(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(response) = find_session(&state, &path, &http_req).await {
        return response;
    }

    if state.sessions.remove(&path).await {
        HttpResponse::NoContent().finish()
    } else {
        deck_not_found(&path)
    }
}

/// Drive the drag lifecycle of the top card
///
/// POST /api/v1/decks/{id}/drag
///
/// Request body:
/// ```json
/// {
///   "phase": "start|move|end",
///   "offset": { "x": 0.0, "y": 0.0 },
///   "velocity": { "x": 0.0, "y": 0.0 }
/// }
/// ```
async fn drag(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<DragRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let session = match find_session(&state, &path, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let response = match req.phase {
        DragPhase::Start => {
            let step = session.drag_start().await;
            DragResponse {
                accepted: step.result,
                release: None,
                haptics: step.haptics,
                deck: step.deck,
            }
        }
        DragPhase::Move => {
            let step = session.drag_move(req.offset).await;
            DragResponse {
                accepted: step.result,
                release: None,
                haptics: step.haptics,
                deck: step.deck,
            }
        }
        DragPhase::End => {
            let step = session.drag_end(req.offset, req.velocity).await;
            if let Some(release) = &step.result {
                tracing::debug!("Deck {} released with {}", session.id(), release.decision.as_str());
            }
            DragResponse {
                accepted: step.result.is_some(),
                release: step.result,
                haptics: step.haptics,
                deck: step.deck,
            }
        }
    };

    HttpResponse::Ok().json(response)
}

/// Swipe the top card from a button
///
/// POST /api/v1/decks/{id}/swipe
///
/// Request body:
/// ```json
/// { "direction": "left|right|up" }
/// ```
async fn swipe(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<SwipeRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let session = match find_session(&state, &path, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let step = session.swipe(req.direction).await;

    HttpResponse::Ok().json(SwipeResponse {
        result: step.result,
        haptics: step.haptics,
        deck: step.deck,
    })
}

/// Candidate detail view; never moves the deck
///
/// GET /api/v1/decks/{id}/candidates/{candidate_id}
async fn get_candidate(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
    http_req: HttpRequest,
) -> impl Responder {
    let (id, candidate_id) = path.into_inner();

    let session = match find_session(&state, &id, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match session.candidate(&candidate_id).await {
        Some(candidate) => HttpResponse::Ok().json(candidate),
        None => HttpResponse::NotFound().json(ErrorResponse::new(
            "Candidate not found",
            format!("Candidate {} is not in deck {}", candidate_id, id),
            404,
        )),
    }
}
